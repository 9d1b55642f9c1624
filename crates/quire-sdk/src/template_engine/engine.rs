//! The document facade: one template, its derived model, and its data.

use std::collections::HashSet;

use quire_model::{
    build_metadata_model, build_trie, collect_text, compile_fields, extract_directives,
    extract_paths, parse_template, validate, Directive, Field, FieldOption, MetadataNode,
    PathTrie, ValidationError,
};
use serde_json::{Map, Value};
use tera::{Context, Tera};

use super::settings::{title_from_heading, DocumentSettings};
use crate::config::DocumentConfig;
use crate::error::{DocumentError, DocumentResult};
use crate::modules::ModuleRegistry;

/// Name the template source is registered under. The `.html` suffix turns
/// on engine autoescaping.
pub const DOCUMENT_TEMPLATE: &str = "document.html";

/// A template instance with its metadata model and current data.
#[derive(Debug)]
pub struct Document {
    config: DocumentConfig,
    registry: ModuleRegistry,
    state: DocumentState,
    data: Value,
}

/// Everything derived from one template source. Replaced as a whole.
#[derive(Debug)]
struct DocumentState {
    tera: Tera,
    directives: Vec<Directive>,
    paths: Vec<String>,
    trie: PathTrie,
    fields: Vec<Field>,
    options: Vec<FieldOption>,
    settings: DocumentSettings,
    modules: Vec<String>,
    helper_names: HashSet<String>,
    model: Vec<MetadataNode>,
}

impl DocumentState {
    fn build(
        source: &str,
        config: &DocumentConfig,
        registry: &ModuleRegistry,
    ) -> DocumentResult<Self> {
        let template = parse_template(source)?;
        let directives = extract_directives(&template.ast, config.strict_directives)?;
        let paths = extract_paths(&template.ast);
        let trie = build_trie(&paths, config.max_depth)?;
        let (fields, options) = compile_fields(&directives)?;

        let mut settings = DocumentSettings::from_directives(&directives)?;
        if settings.title.is_none() && config.title_from_heading {
            settings.title = title_from_heading(&collect_text(&template.ast));
        }

        let mut modules: Vec<String> = Vec::new();
        for name in config.default_modules.iter().chain(&settings.modules) {
            if !modules.contains(name) {
                modules.push(name.clone());
            }
        }
        let helper_names = registry.helper_names(&modules)?;
        let model = build_metadata_model(&trie, &fields, &helper_names, config.max_depth)?;

        let mut tera = Tera::default();
        for name in &modules {
            registry.resolve(name)?.register(&mut tera);
        }
        tera.add_raw_template(DOCUMENT_TEMPLATE, source)
            .map_err(DocumentError::render)?;

        tracing::debug!(
            directives = directives.len(),
            paths = paths.len(),
            fields = fields.len(),
            options = options.len(),
            modules = ?modules,
            "Template loaded"
        );

        Ok(Self {
            tera,
            directives,
            paths,
            trie,
            fields,
            options,
            settings,
            modules,
            helper_names,
            model,
        })
    }
}

impl Document {
    /// Build a document from template source with the given config.
    pub fn new(config: DocumentConfig, source: &str) -> DocumentResult<Self> {
        Self::with_registry(config, ModuleRegistry::builtin(), source)
    }

    /// Build a document with a custom module registry.
    pub fn with_registry(
        config: DocumentConfig,
        registry: ModuleRegistry,
        source: &str,
    ) -> DocumentResult<Self> {
        let state = DocumentState::build(source, &config, &registry)?;
        Ok(Self {
            config,
            registry,
            state,
            data: Value::Object(Map::new()),
        })
    }

    /// Build a document from template source with the default config.
    pub fn from_source(source: &str) -> DocumentResult<Self> {
        Self::new(DocumentConfig::default(), source)
    }

    /// Replace the template. On error the previous template and model stay
    /// in place.
    pub fn set_template(&mut self, source: &str) -> DocumentResult<()> {
        let state = DocumentState::build(source, &self.config, &self.registry).map_err(|e| {
            tracing::warn!(error = %e, "Template rejected, keeping previous state");
            e
        })?;
        self.state = state;
        Ok(())
    }

    /// Enable a helper module on the loaded template. Its helper names are
    /// excluded from the model from now on.
    pub fn use_module(&mut self, name: &str) -> DocumentResult<()> {
        let module = self.registry.resolve(name)?;
        if self.state.modules.iter().any(|m| m == name) {
            return Ok(());
        }

        let mut helper_names = self.state.helper_names.clone();
        helper_names.extend(module.helper_names());
        let model = build_metadata_model(
            &self.state.trie,
            &self.state.fields,
            &helper_names,
            self.config.max_depth,
        )?;

        module.register(&mut self.state.tera);
        self.state.helper_names = helper_names;
        self.state.model = model;
        self.state.modules.push(name.to_string());
        tracing::debug!(module = name, "Helper module enabled");
        Ok(())
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn directives(&self) -> &[Directive] {
        &self.state.directives
    }

    /// Cleaned data paths bound by the template, in first-seen order.
    pub fn paths(&self) -> &[String] {
        &self.state.paths
    }

    pub fn trie(&self) -> &PathTrie {
        &self.state.trie
    }

    pub fn fields(&self) -> &[Field] {
        &self.state.fields
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.state.options
    }

    /// The metadata model, top-level nodes sorted.
    pub fn model(&self) -> &[MetadataNode] {
        &self.state.model
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.state.settings
    }

    /// Enabled module names, defaults first.
    pub fn modules(&self) -> &[String] {
        &self.state.modules
    }

    pub fn helper_names(&self) -> &HashSet<String> {
        &self.state.helper_names
    }

    pub fn set_data(&mut self, data: Value) {
        self.data = data;
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Validate arbitrary data against the model.
    pub fn validate(&self, data: &Value) -> DocumentResult<Vec<ValidationError>> {
        Ok(validate(data, &self.state.model, self.config.max_depth)?)
    }

    /// Validate the instance data with `overlay`'s top-level keys replacing
    /// the instance's.
    pub fn validate_with(&self, overlay: &Value) -> DocumentResult<Vec<ValidationError>> {
        self.validate(&merge_top_level(&self.data, overlay))
    }

    pub fn is_valid(&self) -> DocumentResult<bool> {
        Ok(self.validate(&self.data)?.is_empty())
    }

    pub fn is_valid_with(&self, overlay: &Value) -> DocumentResult<bool> {
        Ok(self.validate_with(overlay)?.is_empty())
    }

    /// Render the template against `data`, which must be a JSON object.
    pub fn render(&self, data: &Value) -> DocumentResult<String> {
        let context = Context::from_value(data.clone()).map_err(DocumentError::render)?;
        self.state
            .tera
            .render(DOCUMENT_TEMPLATE, &context)
            .map_err(DocumentError::render)
    }

    /// Render the template against the instance data.
    pub fn html(&self) -> DocumentResult<String> {
        self.render(&self.data)
    }
}

/// Overlay top-level keys. A non-object on either side yields the overlay.
fn merge_top_level(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            let mut merged = base.clone();
            merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}
