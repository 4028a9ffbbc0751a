//! API documentation schema core
//!
//! Two pieces used when generating documentation for a versioned web API:
//!
//! - **Format negotiation**: format identifiers may embed a version range,
//!   e.g. `vendor+json;version={1,2,5}`. These expand into concrete formats and
//!   a concrete request can be narrowed against a broader advertised format.
//! - **Schema generation**: model definitions become JSON Schema documents,
//!   either fully inlined or with nested models deduplicated into `$ref`
//!   pointers collected in a per-pass [`SchemaRefRegistry`].
//!
//! # Example
//!
//! ```
//! use apidoc_schema::{
//!     expand_format, DocumentGenerator, FieldDefinition, FieldType, GeneratorOptions,
//!     ModelCatalog, ModelDefinition,
//! };
//! use serde_json::json;
//!
//! assert_eq!(
//!     expand_format("fmt;version={1,2,3}", Some(2)),
//!     vec!["fmt;version=1", "fmt;version=2"]
//! );
//!
//! let catalog = ModelCatalog::from_models([
//!     ModelDefinition::new("Buyer").field(FieldDefinition::new("email", FieldType::String)),
//!     ModelDefinition::new("Order")
//!         .field(FieldDefinition::new("buyer", FieldType::model("Buyer"))),
//! ])
//! .unwrap();
//!
//! let generator = DocumentGenerator::new(catalog, GeneratorOptions::new().refs(true));
//! let document = generator.serializer_schema("Order").unwrap();
//!
//! assert_eq!(document["properties"]["buyer"], json!({ "$ref": "#/definitions/Buyer" }));
//! assert_eq!(document["definitions"]["Buyer"]["required"], json!(["email"]));
//! ```
//!
//! # Field Mapping
//!
//! | Field type | Schema |
//! |------------|--------|
//! | `string` | `{"type": "string"}` |
//! | `integer` | `{"type": "integer"}` |
//! | `number` | `{"type": "number"}` |
//! | `boolean` | `{"type": "boolean"}` |
//! | `date-time` | `{"type": "string", "format": "date-time"}` |
//! | `array` | `{"type": "array", "items": ...}` |
//! | `enum` | `{"type": "string", "enum": [...]}` |
//! | `model` | nested object schema or `{"$ref": ...}` |
//!
//! Every non-model property carries a `description`: the field label, or the
//! title-cased field name. An inlined nested model takes the field label as
//! its description when one is set. A field is required unless it has a
//! default or is nullable.

mod error;
mod format;
mod generator;
mod loader;
mod mapper;
mod model;
mod registry;
mod types;

pub use error::{LoadError, MapError};
pub use format::{
    collect_available, expand_format, parse_version_range, resolve_for_request, FormatResolver,
};
pub use generator::DocumentGenerator;
pub use loader::{catalog_from_value, is_url, load_catalog, load_catalog_auto, load_catalog_str};
pub use mapper::{
    extract_query_parameters, is_object_schema, ModelSchemaMapper, ParameterDescriptor,
    ParameterLocation,
};
pub use model::{FieldDefinition, FieldType, ModelCatalog, ModelDefinition};
pub use registry::{as_ref_pointer, ref_key, ref_pointer, SchemaRefRegistry};
pub use types::{
    GeneratorOptions, ObjectParameterPolicy, DEFAULT_REF_PREFIX, DEFAULT_VERSION_SEPARATOR,
};

#[cfg(feature = "remote")]
pub use loader::load_catalog_url;
