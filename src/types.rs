//! Core types for OpenAPI reference resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key marking a reference node.
pub const REF_KEY: &str = "$ref";

/// Pointer prefix addressing the document's definitions section.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Root key of the consolidated definitions block written in defs mode.
pub const DEFS_KEY: &str = "$defs";

/// Pointer prefix addressing the consolidated definitions block.
pub const DEFS_REF_PREFIX: &str = "#/$defs/";

/// Document key holding the operation paths.
pub const PATHS_KEY: &str = "paths";

/// Returns the JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the reference string if `value` is a reference node.
///
/// A reference node is an object whose only key is `$ref` with a string value.
pub fn as_reference(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get(REF_KEY).and_then(Value::as_str)
}

/// Append a key to a JSON Pointer (RFC 6901), escaping `~` and `/`.
pub fn pointer_push(pointer: &str, token: &str) -> String {
    format!("{}/{}", pointer, token.replace('~', "~0").replace('/', "~1"))
}

/// How references are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Replace each reference with a deep copy of its definition.
    #[default]
    Inline,
    /// Keep references, repoint them at a root `$defs` block.
    Defs,
}

impl Strategy {
    /// Parse a strategy name.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inline" => Some(Strategy::Inline),
            "defs" => Some(Strategy::Defs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Inline => "inline",
            Strategy::Defs => "defs",
        }
    }
}

/// Options for option-driven resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Which resolution strategy to apply.
    pub strategy: Strategy,
    /// When true, a pointer to a missing definition is an error instead of
    /// being passed through. Defaults to false.
    pub strict: bool,
}

impl ResolveOptions {
    /// Create options for the given strategy with strict mode disabled.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            strict: false,
        }
    }

    /// Set strict mode (fail on dangling definition references).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn as_reference_single_key() {
        let node = json!({"$ref": "#/components/schemas/Pet"});
        assert_eq!(as_reference(&node), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn as_reference_rejects_siblings_and_non_strings() {
        assert_eq!(
            as_reference(&json!({"$ref": "#/components/schemas/Pet", "description": "x"})),
            None
        );
        assert_eq!(as_reference(&json!({"$ref": 5})), None);
        assert_eq!(as_reference(&json!(["$ref"])), None);
        assert_eq!(as_reference(&json!({})), None);
    }

    #[test]
    fn pointer_push_escapes() {
        assert_eq!(pointer_push("", "paths"), "/paths");
        assert_eq!(pointer_push("/paths", "/api/{id}"), "/paths/~1api~1{id}");
        assert_eq!(pointer_push("", "a~b"), "/a~0b");
    }

    #[test]
    fn strategy_parse() {
        assert_eq!(Strategy::parse("inline"), Some(Strategy::Inline));
        assert_eq!(Strategy::parse("defs"), Some(Strategy::Defs));
        assert_eq!(Strategy::parse("Inline"), None);
        assert_eq!(Strategy::Defs.as_str(), "defs");
    }

    #[test]
    fn strategy_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Strategy::Defs).unwrap(), json!("defs"));
    }

    #[test]
    fn resolve_options_defaults() {
        let opts = ResolveOptions::default();
        assert_eq!(opts.strategy, Strategy::Inline);
        assert!(!opts.strict);

        let opts = ResolveOptions::new(Strategy::Defs).strict(true);
        assert_eq!(opts.strategy, Strategy::Defs);
        assert!(opts.strict);
    }
}
