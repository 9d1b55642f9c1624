//! Quire: directive-driven data models for Tera document templates.
//!
//! Templates declare the data they expect in comment directives. Quire reads
//! those directives together with the template's own variable bindings and
//! produces a metadata model that drives form generation and data validation.
//!
//! ```text
//! {# @field "data.client.name" label="Client" required #}
//! {# @field "data.total" type="number" min="0" #}
//! <h1>Invoice for {{ data.client.name }}</h1>
//! ```
//!
//! # Crates
//!
//! - [`model`] (`quire-model`): directives, path tries, fields, metadata
//!   model and validation
//! - [`sdk`] (`quire-sdk`): the [`Document`] facade, configuration and
//!   helper modules

pub use quire_model as model;
pub use quire_sdk as sdk;

pub use quire_model::{
    Field, FieldOption, FieldType, MetadataNode, ModelError, ValidationCode, ValidationError,
};
pub use quire_sdk::{
    load_template, Document, DocumentConfig, DocumentError, DocumentResult, DocumentSettings,
};
