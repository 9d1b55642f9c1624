//! Directive parsing and extraction.
//!
//! A directive is a template comment of the form
//! `{# @name "positional" key="value" flag #}`. Plain comments that do not
//! start with `@` are ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tera::ast::Node;

use crate::collect::{walk, Collector};
use crate::error::{ModelError, ModelResult};

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^@(?P<name>\S+)\s+(?P<params>.+)$").expect("directive pattern is valid")
});

static PARAM_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#""(?P<positional>[^"]*)""#,
        r#"|(?P<key>[A-Za-z][A-Za-z0-9_]*)="(?P<value>[^"]*)""#,
        r#"|(?P<flag>[A-Za-z][A-Za-z0-9_]*)"#,
        r#"|(?P<bad>\S+)"#,
    ))
    .expect("param token pattern is valid")
});

/// One directive parameter.
///
/// Positional params have `name == value`, named params carry both, and bare
/// flags have no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroParam {
    pub name: String,
    pub value: Option<String>,
}

impl MacroParam {
    pub fn positional(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: value.clone(),
            value: Some(value),
        }
    }

    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn is_positional(&self) -> bool {
        self.value.as_deref() == Some(self.name.as_str())
    }
}

/// A parsed `@name ...` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub name: String,
    pub params: Vec<MacroParam>,
}

impl Directive {
    /// Value of the first param when it is positional.
    pub fn first_positional(&self) -> Option<&str> {
        self.params
            .first()
            .filter(|p| p.is_positional())
            .and_then(|p| p.value.as_deref())
    }

    /// Values of every positional param, in order.
    pub fn positionals(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| p.is_positional())
            .filter_map(|p| p.value.as_deref())
    }

    /// Value of a named param among the params after the first.
    ///
    /// Empty values count as absent.
    pub fn named(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .skip(1)
            .find(|p| p.name == key)
            .and_then(|p| p.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// Whether a flag is present, bare or with any value.
    pub fn flag(&self, key: &str) -> bool {
        self.params.iter().skip(1).any(|p| p.name == key)
    }
}

/// Parse one comment body into a directive.
///
/// Returns `Ok(None)` for comments that are not directives. In lenient mode
/// malformed directives are skipped and bad tokens dropped, with a warning.
pub fn parse_directive(comment: &str, strict: bool) -> ModelResult<Option<Directive>> {
    let text = comment.trim();
    if !text.starts_with('@') {
        return Ok(None);
    }

    let Some(captures) = DIRECTIVE.captures(text) else {
        if strict {
            return Err(ModelError::MalformedDirective {
                directive: text.to_string(),
            });
        }
        tracing::warn!(directive = %text, "Skipping malformed directive");
        return Ok(None);
    };

    let name = captures["name"].to_string();
    let params = parse_params(&captures["params"], text, strict)?;

    Ok(Some(Directive { name, params }))
}

fn parse_params(input: &str, directive: &str, strict: bool) -> ModelResult<Vec<MacroParam>> {
    let mut params = Vec::new();

    for token in PARAM_TOKEN.captures_iter(input) {
        if let Some(value) = token.name("positional") {
            params.push(MacroParam::positional(value.as_str()));
        } else if let (Some(key), Some(value)) = (token.name("key"), token.name("value")) {
            params.push(MacroParam::named(key.as_str(), value.as_str()));
        } else if let Some(flag) = token.name("flag") {
            params.push(MacroParam::flag(flag.as_str()));
        } else if let Some(bad) = token.name("bad") {
            if strict {
                return Err(ModelError::BadToken {
                    token: bad.as_str().to_string(),
                    directive: directive.to_string(),
                });
            }
            tracing::warn!(token = %bad.as_str(), directive = %directive, "Dropping bad directive token");
        }
    }

    Ok(params)
}

#[derive(Debug, Default)]
struct CommentCollector {
    comments: Vec<String>,
}

impl Collector for CommentCollector {
    fn comment(&mut self, text: &str) {
        self.comments.push(text.to_string());
    }
}

/// Every directive in the template, in source order.
///
/// Strict mode aborts on the first malformed directive; lenient mode skips it.
pub fn extract_directives(nodes: &[Node], strict: bool) -> ModelResult<Vec<Directive>> {
    let mut collector = CommentCollector::default();
    walk(nodes, &mut collector);

    let mut directives = Vec::new();
    for comment in &collector.comments {
        if let Some(directive) = parse_directive(comment, strict)? {
            directives.push(directive);
        }
    }
    Ok(directives)
}
