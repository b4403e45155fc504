//! Definition registry - the `components.schemas` lookup table.

use serde_json::{Map, Value};

use crate::types::SCHEMA_REF_PREFIX;

/// Outcome of looking up a reference string in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    /// The reference names a definition that exists.
    Found(&'a Value),
    /// The reference points into the definitions section but the named
    /// definition is absent.
    Missing(String),
    /// The reference does not address the definitions section.
    Foreign,
}

/// Read-only view of a document's named definitions.
///
/// Borrows the document; an absent or non-object `components.schemas`
/// yields an empty registry.
#[derive(Debug, Clone, Copy)]
pub struct Registry<'a> {
    definitions: Option<&'a Map<String, Value>>,
}

impl<'a> Registry<'a> {
    /// Build the registry from a document's `components.schemas` section.
    pub fn from_document(document: &'a Value) -> Self {
        let definitions = document
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object);
        Self { definitions }
    }

    /// Look up a definition by exact (case-sensitive) name.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.definitions.and_then(|defs| defs.get(name))
    }

    /// Classify a reference string against this registry.
    pub fn lookup(&self, reference: &str) -> Lookup<'a> {
        match definition_name(reference) {
            Some(name) => match self.get(&name) {
                Some(def) => Lookup::Found(def),
                None => Lookup::Missing(name),
            },
            None => Lookup::Foreign,
        }
    }

    /// The raw definitions map, if the document has one.
    pub fn definitions(&self) -> Option<&'a Map<String, Value>> {
        self.definitions
    }

    /// Definition names in document order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.definitions
            .into_iter()
            .flat_map(|defs| defs.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.definitions.map(Map::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract the definition name from a `#/components/schemas/<Name>` pointer.
///
/// The name must be a single non-empty pointer segment; `~1` and `~0` are
/// unescaped. Deeper pointers into a definition's body return `None`.
pub fn definition_name(reference: &str) -> Option<String> {
    let raw = reference.strip_prefix(SCHEMA_REF_PREFIX)?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(raw.replace("~1", "/").replace("~0", "~"))
}
