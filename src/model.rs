//! Model definitions consumed by the schema mapper.
//!
//! A model is an ordered list of typed fields. Fields may point at other
//! models by declared name; a [`ModelCatalog`] resolves those names.

use heck::ToTitleCase;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Semantic type of a model field.
///
/// Serialized with an internal `type` tag:
/// `{"type": "array", "items": {"type": "integer"}}`,
/// `{"type": "model", "model": "Buyer"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    /// Timestamp, rendered as a `date-time` formatted string.
    DateTime,
    Array {
        items: Box<FieldType>,
    },
    /// String restricted to a fixed set of choices.
    Enum {
        choices: Vec<String>,
    },
    /// Nested model, referenced by declared name.
    Model {
        model: String,
    },
}

impl FieldType {
    /// Nested model field of the given model name.
    pub fn model(name: impl Into<String>) -> Self {
        FieldType::Model { model: name.into() }
    }

    /// Array field with the given item type.
    pub fn array(items: FieldType) -> Self {
        FieldType::Array {
            items: Box::new(items),
        }
    }
}

/// A single declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Human label; the title-cased name is used when absent.
    ///
    /// On a nested model field the label replaces the model's description
    /// when inlined and is dropped when the field becomes a `$ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// External name used when the generator emits aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            alias: None,
            has_default: false,
            nullable: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark the field as having a default value.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Required fields have no default and are not nullable.
    pub fn is_required(&self) -> bool {
        !self.has_default && !self.nullable
    }

    /// The schema description: label, or the title-cased field name.
    pub fn description(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.name.to_title_case())
    }

    /// Property name to emit, honoring the alias when requested.
    pub fn output_name(&self, use_aliases: bool) -> &str {
        match (&self.alias, use_aliases) {
            (Some(alias), true) => alias,
            _ => &self.name,
        }
    }
}

/// A declared data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field; declaration order is preserved.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

/// Models indexed by declared name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    models: IndexMap<String, ModelDefinition>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of models.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::DuplicateModel` if two models share a name.
    pub fn from_models<I>(models: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = ModelDefinition>,
    {
        let mut catalog = Self::new();
        for model in models {
            if catalog.models.contains_key(&model.name) {
                return Err(LoadError::DuplicateModel { name: model.name });
            }
            catalog.insert(model);
        }
        Ok(catalog)
    }

    /// Insert a model, returning the previous definition of that name.
    pub fn insert(&mut self, model: ModelDefinition) -> Option<ModelDefinition> {
        self.models.insert(model.name.clone(), model)
    }

    pub fn get(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Model names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn description_defaults_to_title_case() {
        let field = FieldDefinition::new("created_at", FieldType::DateTime);
        assert_eq!(field.description(), "Created At");

        let field = FieldDefinition::new("field_a", FieldType::String).label("Custom");
        assert_eq!(field.description(), "Custom");
    }

    #[test]
    fn required_rules() {
        assert!(FieldDefinition::new("a", FieldType::String).is_required());
        assert!(!FieldDefinition::new("a", FieldType::String)
            .with_default()
            .is_required());
        assert!(!FieldDefinition::new("a", FieldType::String)
            .nullable()
            .is_required());
    }

    #[test]
    fn output_name_uses_alias_only_when_asked() {
        let field = FieldDefinition::new("object_type", FieldType::String).alias("type");
        assert_eq!(field.output_name(false), "object_type");
        assert_eq!(field.output_name(true), "type");

        let field = FieldDefinition::new("title", FieldType::String);
        assert_eq!(field.output_name(true), "title");
    }

    #[test]
    fn field_deserializes_tagged_types() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "tags",
            "type": "array",
            "items": { "type": "string" },
            "has_default": true
        }))
        .unwrap();
        assert_eq!(field.field_type, FieldType::array(FieldType::String));
        assert!(field.has_default);

        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "created_at",
            "type": "date-time"
        }))
        .unwrap();
        assert_eq!(field.field_type, FieldType::DateTime);

        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "buyer",
            "type": "model",
            "model": "Buyer"
        }))
        .unwrap();
        assert_eq!(field.field_type, FieldType::model("Buyer"));
    }

    #[test]
    fn catalog_rejects_duplicates() {
        let result = ModelCatalog::from_models([
            ModelDefinition::new("User"),
            ModelDefinition::new("Order"),
            ModelDefinition::new("User"),
        ]);
        assert!(matches!(
            result,
            Err(LoadError::DuplicateModel { name }) if name == "User"
        ));
    }

    #[test]
    fn catalog_keeps_declaration_order() {
        let catalog = ModelCatalog::from_models([
            ModelDefinition::new("Order"),
            ModelDefinition::new("Buyer"),
        ])
        .unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Order", "Buyer"]);
        assert!(catalog.contains("Buyer"));
        assert_eq!(catalog.len(), 2);
    }
}
