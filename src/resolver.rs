//! Reference resolution - inlines or repoints `$ref` nodes under `paths`.
//!
//! Two strategies share the same walk over the `paths` section:
//!
//! - [`resolve_refs`] replaces each `#/components/schemas/<Name>` reference
//!   with a resolved copy of the definition. A reference already open on the
//!   current recursion path is a cycle and is left as-is.
//! - [`resolve_refs_with_defs`] keeps references but rewrites them to
//!   `#/$defs/<Name>` and copies the definitions into a root `$defs` block.
//!
//! Neither strategy mutates its input or fails on malformed documents.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::registry::{Lookup, Registry};
use crate::types::{
    as_reference, pointer_push, ResolveOptions, Strategy, DEFS_KEY, DEFS_REF_PREFIX, PATHS_KEY,
    REF_KEY, SCHEMA_REF_PREFIX,
};

/// Why a reference node survived inline resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedReason {
    /// The reference is one of its own ancestors on the resolution path.
    Cycle,
    /// The reference names a definition the document does not have.
    Missing,
    /// The reference does not address `components.schemas`.
    Foreign,
}

/// A reference node left in the output of inline resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedRef {
    /// JSON Pointer (RFC 6901) to the node in the resolved document.
    pub path: String,
    /// The `$ref` string as written.
    pub reference: String,
    pub reason: UnresolvedReason,
}

/// Inline resolution output together with the references it had to keep.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub document: Value,
    pub unresolved: Vec<UnresolvedRef>,
}

/// Inline every resolvable definition reference under `paths`.
///
/// Returns a new document; the input is never modified. Keys other than
/// `paths` are copied unchanged. Cyclic, dangling and foreign references stay
/// in place as reference nodes.
pub fn resolve_refs(document: &Value) -> Value {
    resolve_with_report(document).document
}

/// Like [`resolve_refs`], also reporting every reference node left behind.
pub fn resolve_with_report(document: &Value) -> Resolution {
    let registry = Registry::from_document(document);
    let mut inliner = Inliner::new(registry);

    let document = map_paths(document, |paths| {
        inliner.resolve_value(paths, &pointer_push("", PATHS_KEY))
    });

    if !inliner.unresolved.is_empty() {
        debug!(
            count = inliner.unresolved.len(),
            "inline resolution kept unresolved references"
        );
    }

    Resolution {
        document,
        unresolved: inliner.unresolved,
    }
}

/// Repoint definition references under `paths` at a root `$defs` block.
///
/// Copies `components.schemas` unmodified into `$defs` (replacing any existing
/// block) when the section is a non-empty object, and rewrites every `$ref`
/// string starting with `#/components/schemas/` to start with `#/$defs/`.
/// Other references are left untouched.
pub fn resolve_refs_with_defs(document: &Value) -> Value {
    let registry = Registry::from_document(document);
    let mut result = map_paths(document, rewrite_value);

    match registry.definitions().filter(|defs| !defs.is_empty()) {
        Some(defs) => {
            if let Value::Object(root) = &mut result {
                root.insert(DEFS_KEY.to_string(), Value::Object(defs.clone()));
            }
        }
        None => debug!("no definitions to copy into {}", DEFS_KEY),
    }

    result
}

/// Resolve a document according to `options`.
///
/// # Errors
///
/// With `options.strict`, returns `ResolveError::DanglingReference` for the
/// first definitions pointer naming a missing definition. Without strict mode
/// this never fails.
pub fn resolve(document: &Value, options: &ResolveOptions) -> Result<Value, ResolveError> {
    match options.strategy {
        Strategy::Inline => {
            let resolution = resolve_with_report(document);
            if options.strict {
                if let Some(dangling) = resolution
                    .unresolved
                    .iter()
                    .find(|r| r.reason == UnresolvedReason::Missing)
                {
                    return Err(ResolveError::DanglingReference {
                        path: dangling.path.clone(),
                        reference: dangling.reference.clone(),
                    });
                }
            }
            Ok(resolution.document)
        }
        Strategy::Defs => {
            if options.strict {
                let registry = Registry::from_document(document);
                if let Some(paths) = document.get(PATHS_KEY) {
                    let start = pointer_push("", PATHS_KEY);
                    if let Some((path, reference)) = find_dangling_pointer(paths, &registry, &start)
                    {
                        return Err(ResolveError::DanglingReference { path, reference });
                    }
                }
            }
            Ok(resolve_refs_with_defs(document))
        }
    }
}

/// Rewrite a `#/components/schemas/...` pointer to `#/$defs/...`.
///
/// Pointers outside the definitions section are returned unchanged.
pub fn rewrite_pointer(reference: &str) -> String {
    match reference.strip_prefix(SCHEMA_REF_PREFIX) {
        Some(rest) => format!("{}{}", DEFS_REF_PREFIX, rest),
        None => reference.to_string(),
    }
}

// --- Internal implementation ---

/// Copy `document`, replacing the `paths` value with `f(paths)`.
///
/// Key order is preserved. Non-object documents and documents without
/// `paths` are cloned as-is.
fn map_paths(document: &Value, mut f: impl FnMut(&Value) -> Value) -> Value {
    let Value::Object(root) = document else {
        debug!("document is not an object; nothing to resolve");
        return document.clone();
    };

    if !root.contains_key(PATHS_KEY) {
        debug!("document has no {} section; nothing to resolve", PATHS_KEY);
    }

    let result: Map<String, Value> = root
        .iter()
        .map(|(key, value)| {
            let value = if key == PATHS_KEY {
                f(value)
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect();

    Value::Object(result)
}

/// Depth-first inliner carrying the open-reference set for cycle detection.
struct Inliner<'a> {
    registry: Registry<'a>,
    /// References currently being expanded (ancestors of the current node).
    visited: HashSet<String>,
    unresolved: Vec<UnresolvedRef>,
}

impl<'a> Inliner<'a> {
    fn new(registry: Registry<'a>) -> Self {
        Self {
            registry,
            visited: HashSet::new(),
            unresolved: Vec::new(),
        }
    }

    /// Build a resolved copy of `value`. `path` is the node's pointer in the output.
    fn resolve_value(&mut self, value: &Value, path: &str) -> Value {
        if let Some(reference) = as_reference(value) {
            return self.resolve_reference(value, reference, path);
        }

        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, child)| {
                        let child_path = pointer_push(path, key);
                        (key.clone(), self.resolve_value(child, &child_path))
                    })
                    .collect(),
            ),
            Value::Array(arr) => Value::Array(
                arr.iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let item_path = pointer_push(path, &i.to_string());
                        self.resolve_value(item, &item_path)
                    })
                    .collect(),
            ),
            // Primitives pass through unchanged
            other => other.clone(),
        }
    }

    fn resolve_reference(&mut self, node: &Value, reference: &str, path: &str) -> Value {
        if self.visited.contains(reference) {
            debug!(path, reference, "cyclic reference left in place");
            self.keep(path, reference, UnresolvedReason::Cycle);
            return node.clone();
        }

        match self.registry.lookup(reference) {
            Lookup::Found(definition) => {
                trace!(path, reference, "inlining definition");
                self.visited.insert(reference.to_string());
                let resolved = self.resolve_value(definition, path);
                self.visited.remove(reference);
                resolved
            }
            Lookup::Missing(name) => {
                debug!(path, reference, name = %name, "definition not found");
                self.keep(path, reference, UnresolvedReason::Missing);
                node.clone()
            }
            Lookup::Foreign => {
                debug!(path, reference, "reference outside definitions left in place");
                self.keep(path, reference, UnresolvedReason::Foreign);
                node.clone()
            }
        }
    }

    fn keep(&mut self, path: &str, reference: &str, reason: UnresolvedReason) {
        self.unresolved.push(UnresolvedRef {
            path: path.to_string(),
            reference: reference.to_string(),
            reason,
        });
    }
}

fn rewrite_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| {
                    let rewritten = match child {
                        Value::String(reference) if key == REF_KEY => {
                            Value::String(rewrite_pointer(reference))
                        }
                        _ => rewrite_value(child),
                    };
                    (key.clone(), rewritten)
                })
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(rewrite_value).collect()),
        other => other.clone(),
    }
}

/// Find the first `$ref` under `value` whose rewritten target would not exist.
fn find_dangling_pointer(
    value: &Value,
    registry: &Registry<'_>,
    path: &str,
) -> Option<(String, String)> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get(REF_KEY) {
                if let Some(rest) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
                    // Pointers may reach into a definition; only its name must exist
                    let head = rest.split('/').next().unwrap_or_default();
                    let name = head.replace("~1", "/").replace("~0", "~");
                    if head.is_empty() || registry.get(&name).is_none() {
                        return Some((path.to_string(), reference.clone()));
                    }
                }
            }
            map.iter().find_map(|(key, child)| {
                find_dangling_pointer(child, registry, &pointer_push(path, key))
            })
        }
        Value::Array(arr) => arr.iter().enumerate().find_map(|(i, item)| {
            find_dangling_pointer(item, registry, &pointer_push(path, &i.to_string()))
        }),
        _ => None,
    }
}
