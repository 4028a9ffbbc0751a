//! Shared constants and generator configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token separating a format name from its version or version range block.
pub const DEFAULT_VERSION_SEPARATOR: &str = "version=";

/// Namespace prefix of reference keys. Matches the `definitions` envelope
/// assembled by the generator, so emitted pointers resolve inside the document.
pub const DEFAULT_REF_PREFIX: &str = "#/definitions/";

/// Returns the JSON type name for error messages.
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

/// What request-parameter extraction does with object-typed fields.
///
/// Query strings carry flat values, so nested models and `$ref` properties
/// usually have no sensible query representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectParameterPolicy {
    /// Pass object fields through unchanged.
    Keep,
    /// Drop object fields from the parameter list.
    Skip,
    /// Fail with `MapError::ObjectQueryParameter`.
    #[default]
    Reject,
}

impl ObjectParameterPolicy {
    /// Parse a policy from its lowercase name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "keep" => Some(ObjectParameterPolicy::Keep),
            "skip" => Some(ObjectParameterPolicy::Skip),
            "reject" => Some(ObjectParameterPolicy::Reject),
            _ => None,
        }
    }
}

/// Options for a documentation generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Version separator token inside format identifiers.
    pub separator: String,
    /// Namespace prefix for reference keys.
    pub ref_prefix: String,
    /// Formats advertised for content negotiation, in priority order.
    pub available_formats: Vec<String>,
    /// Deduplicate nested models into `definitions` instead of inlining them.
    pub refs: bool,
    /// Emit field aliases instead of declared field names.
    pub use_aliases: bool,
    /// Handling of object-typed fields in request parameters.
    pub object_parameters: ObjectParameterPolicy,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_VERSION_SEPARATOR.to_string(),
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
            available_formats: Vec::new(),
            refs: false,
            use_aliases: false,
            object_parameters: ObjectParameterPolicy::default(),
        }
    }
}

impl GeneratorOptions {
    /// Create options with defaults: inline mode, `version=` separator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version separator token.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the reference key prefix.
    pub fn ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ref_prefix = prefix.into();
        self
    }

    /// Set the advertised formats.
    pub fn available_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable `$ref` deduplication.
    pub fn refs(mut self, refs: bool) -> Self {
        self.refs = refs;
        self
    }

    /// Enable or disable alias output.
    pub fn use_aliases(mut self, use_aliases: bool) -> Self {
        self.use_aliases = use_aliases;
        self
    }

    /// Set the object parameter policy.
    pub fn object_parameters(mut self, policy: ObjectParameterPolicy) -> Self {
        self.object_parameters = policy;
        self
    }
}
