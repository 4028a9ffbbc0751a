//! Local `$ref` registry for a single schema generation pass.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::MapError;

/// Build the reference key for a model: `prefix` followed by the declared name.
pub fn ref_key(prefix: &str, model_name: &str) -> String {
    format!("{}{}", prefix, model_name)
}

/// Build a reference pointer object, `{"$ref": key}`.
pub fn ref_pointer(key: &str) -> Value {
    json!({ "$ref": key })
}

/// Returns the target key if `schema` is a reference pointer.
pub fn as_ref_pointer(schema: &Value) -> Option<&str> {
    schema.get("$ref").and_then(Value::as_str)
}

/// Whether `schema` holds a reference pointer to `key` at any depth.
pub fn contains_ref(schema: &Value, key: &str) -> bool {
    match schema {
        Value::Object(map) => {
            as_ref_pointer(schema) == Some(key) || map.values().any(|v| contains_ref(v, key))
        }
        Value::Array(items) => items.iter().any(|v| contains_ref(v, key)),
        _ => false,
    }
}

/// Mapping of reference key to schema document.
///
/// One registry belongs to one generation pass: create a fresh instance per
/// pass and drop it afterwards. Entries keep their registration order so the
/// assembled `definitions` are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRefRegistry {
    refs: IndexMap<String, Value>,
}

impl SchemaRefRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `schema` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, schema: Value) {
        let key = key.into();
        debug!(key = %key, "registered schema");
        self.refs.insert(key, schema);
    }

    /// Insert `schema` under `key` unless a different schema is already there.
    ///
    /// Re-registering a structurally identical schema is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `MapError::ConflictingDefinition` if `key` holds a schema that
    /// differs from `schema`.
    pub fn register_checked(
        &mut self,
        key: impl Into<String>,
        schema: Value,
    ) -> Result<(), MapError> {
        let key = key.into();
        match self.refs.get(&key) {
            Some(existing) if *existing == schema => Ok(()),
            Some(_) => Err(MapError::ConflictingDefinition { key }),
            None => {
                self.register(key, schema);
                Ok(())
            }
        }
    }

    /// Look up the schema registered under `key`.
    pub fn get_local_ref(&self, key: &str) -> Option<&Value> {
        self.refs.get(key)
    }

    /// Whether `key` has a registered schema.
    pub fn has(&self, key: &str) -> bool {
        self.refs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.refs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Remove and return the schema registered under `key`.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.refs.shift_remove(key)
    }

    /// Consume the registry into a `definitions` map.
    ///
    /// Definition names are the keys with `prefix` stripped; keys outside the
    /// namespace are kept whole.
    pub fn into_definitions(self, prefix: &str) -> Map<String, Value> {
        self.refs
            .into_iter()
            .map(|(key, schema)| {
                let name = key.strip_prefix(prefix).unwrap_or(&key).to_string();
                (name, schema)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> Value {
        json!({
            "description": "User",
            "type": "object",
            "properties": {
                "id": { "description": "Id", "type": "integer" }
            },
            "required": ["id"]
        })
    }

    #[test]
    fn register_then_get_round_trips() {
        let mut registry = SchemaRefRegistry::new();
        registry.register("#/definitions/User", user_schema());

        assert!(registry.has("#/definitions/User"));
        assert_eq!(
            registry.get_local_ref("#/definitions/User"),
            Some(&user_schema())
        );
    }

    #[test]
    fn missing_key_is_not_found() {
        let registry = SchemaRefRegistry::new();
        assert!(!registry.has("#/definitions/User"));
        assert!(registry.get_local_ref("#/definitions/User").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn register_overwrites() {
        let mut registry = SchemaRefRegistry::new();
        registry.register("k", json!({ "type": "string" }));
        registry.register("k", json!({ "type": "integer" }));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_local_ref("k"), Some(&json!({ "type": "integer" })));
    }

    #[test]
    fn register_checked_accepts_identical() {
        let mut registry = SchemaRefRegistry::new();
        registry.register_checked("k", user_schema()).unwrap();
        registry.register_checked("k", user_schema()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_checked_rejects_conflict() {
        let mut registry = SchemaRefRegistry::new();
        registry.register_checked("k", user_schema()).unwrap();

        let result = registry.register_checked("k", json!({ "type": "string" }));
        assert!(matches!(
            result,
            Err(MapError::ConflictingDefinition { key }) if key == "k"
        ));
        assert_eq!(registry.get_local_ref("k"), Some(&user_schema()));
    }

    #[test]
    fn into_definitions_strips_prefix_in_order() {
        let mut registry = SchemaRefRegistry::new();
        registry.register("#/definitions/B", json!({ "type": "object" }));
        registry.register("#/definitions/A", json!({ "type": "object" }));
        registry.register("external", json!({ "type": "string" }));

        let defs = registry.into_definitions("#/definitions/");
        let names: Vec<&String> = defs.keys().collect();
        assert_eq!(names, vec!["B", "A", "external"]);
    }

    #[test]
    fn ref_helpers() {
        let key = ref_key("#/definitions/", "User");
        assert_eq!(key, "#/definitions/User");

        let pointer = ref_pointer(&key);
        assert_eq!(pointer, json!({ "$ref": "#/definitions/User" }));
        assert_eq!(as_ref_pointer(&pointer), Some("#/definitions/User"));
        assert_eq!(as_ref_pointer(&json!({ "type": "string" })), None);
    }

    #[test]
    fn contains_ref_searches_nested_values() {
        let schema = json!({
            "type": "object",
            "properties": {
                "children": { "type": "array", "items": { "$ref": "#/definitions/Node" } }
            }
        });
        assert!(contains_ref(&schema, "#/definitions/Node"));
        assert!(!contains_ref(&schema, "#/definitions/Leaf"));
        assert!(!contains_ref(&json!("#/definitions/Node"), "#/definitions/Node"));
    }
}
