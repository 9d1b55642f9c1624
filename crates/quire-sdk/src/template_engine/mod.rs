//! Tera-backed document templates.
//!
//! [`Document`] owns one template source, the metadata model derived from
//! its directives and bindings, and the data it is rendered with.

mod engine;
mod loader;
mod settings;

pub use engine::{Document, DOCUMENT_TEMPLATE};
pub use loader::{load_template, TEMPLATE_FILENAME};
pub use settings::{title_from_heading, DocumentSettings};
