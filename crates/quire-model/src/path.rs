//! Bound data path extraction.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tera::ast::Node;

use crate::collect::{walk, Collector};

static SUBSCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("subscript pattern is valid"));

/// Block keywords that other engines expose as bare path expressions.
const RESERVED_KEYWORDS: &[&str] = &["if", "unless", "each", "with"];

/// Strip index notation (`items[0]`, `items.[0]`, `items.0`) from a dotted path.
pub fn clean_path(path: &str) -> String {
    let stripped = SUBSCRIPT.replace_all(path, "");
    stripped
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !segment.bytes().all(|b| b.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether a path refers to engine scoping rather than caller data.
pub fn is_reserved_path(path: &str) -> bool {
    let head = path.split('.').next().unwrap_or(path);
    path.starts_with('.')
        || path.starts_with('/')
        || path.starts_with('@')
        || head == "this"
        || RESERVED_KEYWORDS.contains(&path)
}

#[derive(Debug, Default)]
struct PathCollector {
    seen: HashSet<String>,
    paths: Vec<String>,
}

impl Collector for PathCollector {
    fn ident(&mut self, ident: &str) {
        if is_reserved_path(ident) {
            return;
        }
        let path = clean_path(ident);
        if !path.is_empty() && self.seen.insert(path.clone()) {
            self.paths.push(path);
        }
    }
}

/// Every distinct data path the template binds to, in first-seen order.
pub fn extract_paths(nodes: &[Node]) -> Vec<String> {
    let mut collector = PathCollector::default();
    walk(nodes, &mut collector);
    collector.paths
}
