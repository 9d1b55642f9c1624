//! Helper modules: named bundles of Tera filters and functions a template enables with
//! `{# @use "put" #}`.
//!
//! Helper names double as top-level identifiers in the template, so the
//! metadata model skips any trie branch named after an enabled helper.

pub(crate) mod cond;
pub(crate) mod put;

use std::collections::HashSet;
use std::fmt;

use tera::Tera;

use crate::error::{DocumentError, DocumentResult};

pub use cond::{CondModule, CondOp};
pub use put::PutModule;

/// A bundle of template helpers.
pub trait HelperModule: Send + Sync + fmt::Debug {
    /// Name used in `@use` directives and `default-modules`.
    fn name(&self) -> &'static str;

    /// Names this module registers with the engine.
    fn helper_names(&self) -> Vec<String>;

    /// Register every helper with the engine.
    fn register(&self, tera: &mut Tera);
}

/// Registered name of a module helper. The default helper takes the module
/// name itself.
pub(crate) fn helper_name(module: &str, helper: Option<&str>) -> String {
    match helper {
        Some(helper) => format!("{module}_{helper}"),
        None => module.to_string(),
    }
}

/// Resolves module names to implementations.
#[derive(Debug)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn HelperModule>>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// A registry with the built-in `put` and `cond` modules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_module(Box::new(PutModule::default()));
        registry.register_module(Box::new(CondModule));
        registry
    }

    /// Add a module. A module with the same name replaces the earlier one.
    pub fn register_module(&mut self, module: Box<dyn HelperModule>) {
        let name = module.name();
        if let Some(pos) = self.modules.iter().position(|m| m.name() == name) {
            tracing::debug!(module = name, "Replacing helper module");
            self.modules[pos] = module;
        } else {
            self.modules.push(module);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn HelperModule> {
        self.modules
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    /// Look up a module, failing on unknown names.
    pub fn resolve(&self, name: &str) -> DocumentResult<&dyn HelperModule> {
        self.get(name).ok_or_else(|| DocumentError::UnknownModule {
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Union of helper names across the given modules.
    pub fn helper_names<S: AsRef<str>>(&self, enabled: &[S]) -> DocumentResult<HashSet<String>> {
        let mut names = HashSet::new();
        for name in enabled {
            names.extend(self.resolve(name.as_ref())?.helper_names());
        }
        Ok(names)
    }
}
