//! Document facade for directive-annotated Tera templates.
//!
//! Builds on `quire-model` to load a template, expose its fields and
//! metadata model, validate data and render HTML.
//!
//! # Modules
//!
//! - [`template_engine`]: the [`Document`] facade, settings and file loading
//! - [`modules`]: helper modules (`put`, `case`) enabled with `@use`
//! - [`config`]: `quire.toml` configuration
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod modules;
pub mod template_engine;

pub use config::DocumentConfig;
pub use error::{DocumentError, DocumentResult};
pub use modules::{CondModule, CondOp, HelperModule, ModuleRegistry, PutModule};
pub use template_engine::{load_template, Document, DocumentSettings};
