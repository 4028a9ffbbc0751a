//! Model to JSON Schema mapping.
//!
//! Walks a model depth-first and either inlines nested models or, when a
//! [`SchemaRefRegistry`] is supplied, registers each model under its reference
//! key and emits `{"$ref": ...}` pointers in its place. The mapper only fills
//! the registry; assembling `definitions` is left to the caller.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::MapError;
use crate::model::{FieldDefinition, FieldType, ModelCatalog, ModelDefinition};
use crate::registry::{as_ref_pointer, ref_key, ref_pointer, SchemaRefRegistry};
use crate::types::DEFAULT_REF_PREFIX;

/// Where a request parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
}

/// A request parameter derived from one schema property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub required: bool,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Property schema as-is; reference pointers are not dereferenced.
    pub schema: Value,
}

/// Returns true for schemas without a flat value representation: reference
/// pointers and `object` schemas.
pub fn is_object_schema(schema: &Value) -> bool {
    as_ref_pointer(schema).is_some()
        || schema.get("type").and_then(Value::as_str) == Some("object")
}

/// Derive query parameter descriptors from a schema's properties.
///
/// One descriptor per property, in property order. No filtering is applied.
pub fn extract_query_parameters(schema: &Value) -> Vec<ParameterDescriptor> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(props) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    props
        .iter()
        .map(|(name, prop)| ParameterDescriptor {
            name: name.clone(),
            required: required.contains(&name.as_str()),
            location: ParameterLocation::Query,
            schema: prop.clone(),
        })
        .collect()
}

/// Per-call walk state.
struct Walk<'r> {
    registry: Option<&'r mut SchemaRefRegistry>,
    /// Models currently being mapped, outermost first.
    stack: Vec<String>,
}

/// Maps models from a catalog to schema documents.
#[derive(Debug, Clone)]
pub struct ModelSchemaMapper<'a> {
    catalog: &'a ModelCatalog,
    ref_prefix: String,
    use_aliases: bool,
}

impl<'a> ModelSchemaMapper<'a> {
    /// Create a mapper resolving nested models through `catalog`.
    pub fn new(catalog: &'a ModelCatalog) -> Self {
        Self {
            catalog,
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
            use_aliases: false,
        }
    }

    /// Set the reference key prefix.
    pub fn ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ref_prefix = prefix.into();
        self
    }

    /// Emit field aliases instead of declared names.
    pub fn use_aliases(mut self, use_aliases: bool) -> Self {
        self.use_aliases = use_aliases;
        self
    }

    /// Reference key of the named model under this mapper's prefix.
    pub fn ref_key(&self, model_name: &str) -> String {
        ref_key(&self.ref_prefix, model_name)
    }

    /// Map a model to its schema.
    ///
    /// Without a registry the fully inlined document is returned. With one,
    /// the model and every nested model are registered and a reference
    /// pointer to the model is returned.
    ///
    /// # Errors
    ///
    /// Returns `MapError::UnresolvedModel` for a nested model missing from the
    /// catalog, `MapError::RecursiveModel` when a recursive model must be
    /// inlined, and `MapError::ConflictingDefinition` when a different schema
    /// is already registered under the model's key.
    pub fn map_model(
        &self,
        model: &ModelDefinition,
        registry: Option<&mut SchemaRefRegistry>,
    ) -> Result<Value, MapError> {
        let mut walk = Walk {
            registry,
            stack: Vec::new(),
        };
        self.map_in(model, &mut walk)
    }

    /// Like [`map_model`](Self::map_model), looking the model up by name.
    pub fn map_named(
        &self,
        name: &str,
        registry: Option<&mut SchemaRefRegistry>,
    ) -> Result<Value, MapError> {
        let model = self
            .catalog
            .get(name)
            .ok_or_else(|| MapError::UnknownModel {
                name: name.to_string(),
            })?;
        self.map_model(model, registry)
    }

    fn map_in(&self, model: &ModelDefinition, walk: &mut Walk<'_>) -> Result<Value, MapError> {
        walk.stack.push(model.name.clone());
        let schema = self.object_schema(model, walk);
        walk.stack.pop();
        let schema = schema?;

        match walk.registry.as_deref_mut() {
            Some(registry) => {
                let key = self.ref_key(&model.name);
                registry.register_checked(key.clone(), schema)?;
                Ok(ref_pointer(&key))
            }
            None => Ok(schema),
        }
    }

    fn object_schema(
        &self,
        model: &ModelDefinition,
        walk: &mut Walk<'_>,
    ) -> Result<Value, MapError> {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &model.fields {
            let name = field.output_name(self.use_aliases);
            let schema = self.field_schema(model, field, walk)?;
            properties.insert(name.to_string(), schema);
            if field.is_required() {
                required.push(Value::String(name.to_string()));
            }
        }

        let mut schema = Map::new();
        schema.insert(
            "description".to_string(),
            Value::String(model.description.clone().unwrap_or_else(|| model.name.clone())),
        );
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        Ok(Value::Object(schema))
    }

    fn field_schema(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
        walk: &mut Walk<'_>,
    ) -> Result<Value, MapError> {
        let mut typed = self.type_schema(model, field, &field.field_type, walk)?;

        // Inline nested models take the field label over their own
        // description; pointers stay bare
        if matches!(field.field_type, FieldType::Model { .. }) {
            if let (Some(label), Value::Object(nested)) = (&field.label, &mut typed) {
                if !nested.contains_key("$ref") {
                    nested.insert("description".to_string(), Value::String(label.clone()));
                }
            }
            return Ok(typed);
        }

        let mut schema = Map::new();
        schema.insert("description".to_string(), Value::String(field.description()));
        if let Value::Object(typed) = typed {
            schema.extend(typed);
        }
        Ok(Value::Object(schema))
    }

    fn type_schema(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
        field_type: &FieldType,
        walk: &mut Walk<'_>,
    ) -> Result<Value, MapError> {
        let schema = match field_type {
            FieldType::String => json!({ "type": "string" }),
            FieldType::Integer => json!({ "type": "integer" }),
            FieldType::Number => json!({ "type": "number" }),
            FieldType::Boolean => json!({ "type": "boolean" }),
            FieldType::DateTime => json!({ "type": "string", "format": "date-time" }),
            FieldType::Enum { choices } => json!({ "type": "string", "enum": choices }),
            FieldType::Array { items } => {
                let items = self.type_schema(model, field, items, walk)?;
                json!({ "type": "array", "items": items })
            }
            FieldType::Model { model: target } => {
                return self.nested_schema(model, field, target, walk)
            }
        };
        Ok(schema)
    }

    fn nested_schema(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
        target: &str,
        walk: &mut Walk<'_>,
    ) -> Result<Value, MapError> {
        let nested = self
            .catalog
            .get(target)
            .ok_or_else(|| MapError::UnresolvedModel {
                model: model.name.clone(),
                field: field.name.clone(),
                target: target.to_string(),
            })?;

        let key = self.ref_key(target);
        let in_progress = walk.stack.iter().any(|name| name == target);

        match walk.registry.as_deref() {
            // Back-edge: the model registers itself once its walk finishes
            Some(_) if in_progress => return Ok(ref_pointer(&key)),
            Some(registry) if registry.has(&key) => return Ok(ref_pointer(&key)),
            Some(_) => {}
            None if in_progress => {
                let mut path = walk.stack.clone();
                path.push(target.to_string());
                return Err(MapError::RecursiveModel {
                    model: target.to_string(),
                    path,
                });
            }
            None => {}
        }

        self.map_in(nested, walk)
    }
}
