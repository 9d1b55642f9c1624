//! Tera syntax tree traversal shared by the directive and path collectors.
//!
//! The walker tracks names bound by the template itself (loop variables,
//! `set` locals, macro arguments) so collectors only see references into
//! the caller's data.

use std::collections::HashMap;

use tera::ast::{Expr, ExprVal, FunctionCall, Node};
use tera::Template;

use crate::error::{ModelError, ModelResult};

const TEMPLATE_NAME: &str = "__quire__";

/// Engine-provided names that are never caller data.
const ENGINE_LOCALS: &[&str] = &["loop", "__tera_context", "super"];

/// Text prefixed to the source before parsing. Tera discards comments that
/// open the template, so the prefix keeps them in the tree as
/// [`Node::Comment`]. It is removed again from the parsed tree.
const LEADING_TEXT: &str = "\u{1}";

/// Parse template source with Tera, returning the parsed template.
///
/// Only the syntax tree is meant for analysis; rendering goes through the
/// engine with the unmodified source.
pub fn parse_template(source: &str) -> ModelResult<Template> {
    let prefixed = format!("{LEADING_TEXT}{source}");
    let mut template = Template::new(TEMPLATE_NAME, None, &prefixed)
        .map_err(|source| ModelError::Template { source })?;
    strip_leading_text(&mut template.ast);
    Ok(template)
}

fn strip_leading_text(nodes: &mut Vec<Node>) {
    let emptied = match nodes.first_mut() {
        Some(Node::Text(text)) if text.starts_with(LEADING_TEXT) => {
            text.replace_range(..LEADING_TEXT.len(), "");
            text.is_empty()
        }
        _ => false,
    };
    if emptied {
        nodes.remove(0);
    }
}

/// Callbacks fired while walking a syntax tree. All default to no-ops.
pub(crate) trait Collector {
    fn comment(&mut self, _text: &str) {}
    fn text(&mut self, _text: &str) {}
    fn ident(&mut self, _ident: &str) {}
}

/// Template-local names currently in scope.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    locals: Vec<String>,
}

impl Scope {
    fn bind(&mut self, name: &str) {
        self.locals.push(name.to_string());
    }

    fn mark(&self) -> usize {
        self.locals.len()
    }

    fn restore(&mut self, mark: usize) {
        self.locals.truncate(mark);
    }

    /// Whether the first segment of `ident` is bound by the template.
    fn binds(&self, ident: &str) -> bool {
        let head = ident
            .split(['.', '['])
            .next()
            .unwrap_or(ident);
        ENGINE_LOCALS.contains(&head) || self.locals.iter().any(|l| l == head)
    }
}

pub(crate) fn walk(nodes: &[Node], collector: &mut impl Collector) {
    let mut scope = Scope::default();
    walk_nodes(nodes, collector, &mut scope);
}

fn walk_nodes(nodes: &[Node], collector: &mut impl Collector, scope: &mut Scope) {
    let mark = scope.mark();

    for node in nodes {
        match node {
            Node::Comment(_, text) => collector.comment(text),
            Node::Text(text) => collector.text(text),
            Node::VariableBlock(_, expr) => walk_expr(expr, collector, scope),
            Node::Set(_, set) => {
                walk_expr(&set.value, collector, scope);
                scope.bind(&set.key);
            }
            Node::FilterSection(_, section, _) => {
                walk_call(&section.filter, collector, scope);
                walk_nodes(&section.body, collector, scope);
            }
            Node::Block(_, block, _) => walk_nodes(&block.body, collector, scope),
            Node::Forloop(_, forloop, _) => {
                walk_expr(&forloop.container, collector, scope);

                let inner = scope.mark();
                if let Some(key) = &forloop.key {
                    scope.bind(key);
                }
                scope.bind(&forloop.value);
                walk_nodes(&forloop.body, collector, scope);
                scope.restore(inner);

                if let Some(empty_body) = &forloop.empty_body {
                    walk_nodes(empty_body, collector, scope);
                }
            }
            Node::If(branches, _) => {
                for (_, condition, body) in &branches.conditions {
                    walk_expr(condition, collector, scope);
                    walk_nodes(body, collector, scope);
                }
                if let Some((_, body)) = &branches.otherwise {
                    walk_nodes(body, collector, scope);
                }
            }
            Node::MacroDefinition(_, definition, _) => {
                let inner = scope.mark();
                for (arg, default) in sorted(&definition.args) {
                    if let Some(default) = default {
                        walk_expr(default, collector, scope);
                    }
                    scope.bind(arg);
                }
                walk_nodes(&definition.body, collector, scope);
                scope.restore(inner);
            }
            Node::Super
            | Node::Extends(..)
            | Node::Include(..)
            | Node::ImportMacro(..)
            | Node::Raw(..)
            | Node::Break(_)
            | Node::Continue(_) => {}
        }
    }

    scope.restore(mark);
}

fn walk_expr(expr: &Expr, collector: &mut impl Collector, scope: &mut Scope) {
    walk_val(&expr.val, collector, scope);
    for filter in &expr.filters {
        walk_call(filter, collector, scope);
    }
}

fn walk_val(val: &ExprVal, collector: &mut impl Collector, scope: &mut Scope) {
    match val {
        ExprVal::Ident(ident) => {
            if !scope.binds(ident) {
                collector.ident(ident);
            }
        }
        ExprVal::Math(math) => {
            walk_expr(&math.lhs, collector, scope);
            walk_expr(&math.rhs, collector, scope);
        }
        ExprVal::Logic(logic) => {
            walk_expr(&logic.lhs, collector, scope);
            walk_expr(&logic.rhs, collector, scope);
        }
        ExprVal::Test(test) => {
            if !scope.binds(&test.ident) {
                collector.ident(&test.ident);
            }
            for arg in &test.args {
                walk_expr(arg, collector, scope);
            }
        }
        ExprVal::MacroCall(call) => {
            for (_, arg) in sorted(&call.args) {
                walk_expr(arg, collector, scope);
            }
        }
        ExprVal::FunctionCall(call) => walk_call(call, collector, scope),
        ExprVal::Array(items) => {
            for item in items {
                walk_expr(item, collector, scope);
            }
        }
        ExprVal::StringConcat(concat) => {
            for value in &concat.values {
                walk_val(value, collector, scope);
            }
        }
        ExprVal::In(contains) => {
            walk_expr(&contains.lhs, collector, scope);
            walk_expr(&contains.rhs, collector, scope);
        }
        ExprVal::String(_) | ExprVal::Int(_) | ExprVal::Float(_) | ExprVal::Bool(_) => {}
    }
}

/// Helper and filter calls: the callee name is not data, its arguments may be.
fn walk_call(call: &FunctionCall, collector: &mut impl Collector, scope: &mut Scope) {
    for (_, arg) in sorted(&call.args) {
        walk_expr(arg, collector, scope);
    }
}

/// Named arguments in key order, so collection order does not depend on hashing.
fn sorted<V>(args: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = args.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Collects the raw content of every text node, in source order.
#[derive(Debug, Default)]
struct TextCollector {
    texts: Vec<String>,
}

impl Collector for TextCollector {
    fn text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }
}

/// All literal text (HTML) segments of a template, in source order.
pub fn collect_text(nodes: &[Node]) -> Vec<String> {
    let mut collector = TextCollector::default();
    walk(nodes, &mut collector);
    collector.texts
}
