//! Directive-driven data models for Tera document templates.
//!
//! A template annotates its data with comment directives:
//!
//! ```text
//! {# @field "data.user.age" type="number" label="Age" min="18" required #}
//! <p>{{ data.user.age }}</p>
//! ```
//!
//! This crate turns such a template into a typed metadata model and checks
//! candidate data against it. Everything here is pure and synchronous; every
//! recursive walk takes an explicit depth bound.
//!
//! # Modules
//!
//! - [`directive`]: Directive grammar and comment extraction
//! - [`path`]: Bound data path extraction and cleanup
//! - [`trie`]: Path trie construction with depth and graft guards
//! - [`field`]: Field and option compilation from directives
//! - [`metadata`]: Metadata model merge, requiredness inference and ordering
//! - [`validation`]: Recursive data validation
//! - [`error`]: Error taxonomy

pub mod collect;
pub mod directive;
pub mod error;
pub mod field;
pub mod metadata;
pub mod path;
pub mod trie;
pub mod validation;

/// Default recursion bound for trie, metadata and validation walks.
pub const DEFAULT_MODEL_DEPTH: usize = 10;

pub use collect::{collect_text, parse_template};
pub use directive::{extract_directives, parse_directive, Directive, MacroParam};
pub use error::{LoopStage, ModelError, ModelResult};
pub use field::{
    apply_absolute_order, apply_options_to_fields, compile_field, compile_fields, compile_option,
    Field, FieldBound, FieldExtra, FieldOption, FieldType,
};
pub use metadata::{build_metadata_model, find_node, MetadataExtra, MetadataNode};
pub use path::{clean_path, extract_paths, is_reserved_path};
pub use trie::{build_trie, PathTrie, PathTrieNode};
pub use validation::{audit, validate, ValidationCode, ValidationError};
