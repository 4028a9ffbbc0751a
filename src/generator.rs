//! Documentation generator: the thin layer tying format negotiation and
//! schema mapping to a configured model catalog.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::MapError;
use crate::format::FormatResolver;
use crate::mapper::{
    extract_query_parameters, is_object_schema, ModelSchemaMapper, ParameterDescriptor,
};
use crate::model::ModelCatalog;
use crate::registry::{contains_ref, SchemaRefRegistry};
use crate::types::{GeneratorOptions, ObjectParameterPolicy};

/// Generates schema documents, request parameters, and negotiable formats.
#[derive(Debug)]
pub struct DocumentGenerator {
    options: GeneratorOptions,
    catalog: ModelCatalog,
    resolver: Arc<FormatResolver>,
}

impl DocumentGenerator {
    /// Create a generator over `catalog`.
    ///
    /// The default separator shares the process-wide format cache; any other
    /// separator gets a resolver of its own.
    pub fn new(catalog: ModelCatalog, options: GeneratorOptions) -> Self {
        let resolver = FormatResolver::for_separator(options.separator.as_str());
        Self::with_resolver(catalog, options, resolver)
    }

    /// Create a generator using an injected format resolver.
    pub fn with_resolver(
        catalog: ModelCatalog,
        options: GeneratorOptions,
        resolver: Arc<FormatResolver>,
    ) -> Self {
        Self {
            options,
            catalog,
            resolver,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    fn mapper(&self) -> ModelSchemaMapper<'_> {
        ModelSchemaMapper::new(&self.catalog)
            .ref_prefix(self.options.ref_prefix.clone())
            .use_aliases(self.options.use_aliases)
    }

    /// Map a model, registering into `registry` when one is given.
    ///
    /// See [`ModelSchemaMapper::map_model`].
    pub fn map_serializer(
        &self,
        model_name: &str,
        registry: Option<&mut SchemaRefRegistry>,
    ) -> Result<Value, MapError> {
        self.mapper().map_named(model_name, registry)
    }

    /// Generate the complete schema document for a model.
    ///
    /// In refs mode the model's own schema forms the body and every nested
    /// model it reaches is attached under `definitions`. A model reachable
    /// from itself is also listed there, so every pointer in the document
    /// resolves locally. Otherwise nested models are inlined and no
    /// `definitions` are emitted.
    pub fn serializer_schema(&self, model_name: &str) -> Result<Value, MapError> {
        if !self.options.refs {
            return self.map_serializer(model_name, None);
        }

        let mut registry = SchemaRefRegistry::new();
        self.map_serializer(model_name, Some(&mut registry))?;

        let key = self.mapper().ref_key(model_name);
        let mut document = registry
            .get_local_ref(&key)
            .cloned()
            .ok_or_else(|| MapError::UnknownModel {
                name: model_name.to_string(),
            })?;

        // A recursive model keeps its own entry so back-pointers resolve
        if registry.iter().any(|(_, schema)| contains_ref(schema, &key)) {
            debug!(model = model_name, "kept recursive model in definitions");
        } else {
            registry.take(&key);
        }

        if !registry.is_empty() {
            let definitions = registry.into_definitions(&self.options.ref_prefix);
            debug!(
                model = model_name,
                definitions = definitions.len(),
                "assembled schema document"
            );
            if let Value::Object(map) = &mut document {
                map.insert("definitions".to_string(), Value::Object(definitions));
            }
        }
        Ok(document)
    }

    /// Query parameters describing a model used as a request filter.
    ///
    /// Object-typed fields are handled per the configured
    /// [`ObjectParameterPolicy`].
    pub fn request_parameters(
        &self,
        model_name: &str,
    ) -> Result<Vec<ParameterDescriptor>, MapError> {
        let schema = self.map_serializer(model_name, None)?;
        let mut params = Vec::new();

        for param in extract_query_parameters(&schema) {
            if !is_object_schema(&param.schema) {
                params.push(param);
                continue;
            }
            match self.options.object_parameters {
                ObjectParameterPolicy::Keep => params.push(param),
                ObjectParameterPolicy::Skip => {
                    debug!(name = %param.name, "skipped object query parameter");
                }
                ObjectParameterPolicy::Reject => {
                    return Err(MapError::ObjectQueryParameter { name: param.name })
                }
            }
        }
        Ok(params)
    }

    /// Concrete formats acceptable for a request.
    ///
    /// With a requested format, it is resolved against the advertised
    /// formats; without one, all advertised formats are expanded.
    pub fn negotiate_formats(&self, requested: Option<&str>) -> Vec<String> {
        let available = &self.options.available_formats;
        match requested {
            Some(requested) => self.resolver.resolve_for_request(available, requested),
            None => self.resolver.collect_available(available),
        }
    }
}
