//! Document-level settings read from directives.
//!
//! ```text
//! {# @v "1.0.0-beta.3" #}
//! {# @lang "en-US" #}
//! {# @title "Quarterly Report" #}
//! {# @timeZone "Europe/Madrid" #}
//! {# @lineHeight "1.5" #}
//! {# @use "put" "cond" #}
//! ```

use once_cell::sync::Lazy;
use quire_model::Directive;
use regex::Regex;
use serde::Serialize;

use crate::error::{DocumentError, DocumentResult};

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<h1(?:\s[^>]*)?>(?P<value>.*?)</h1\s*>")
        .expect("heading pattern is valid")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("non-word pattern is valid"));

/// Settings declared by the template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    pub version: Option<String>,
    pub lang: Option<String>,
    pub title: Option<String>,
    pub time_zone: Option<String>,
    pub line_height: Option<f64>,
    /// Modules named by `@use`, in declaration order.
    pub modules: Vec<String>,
}

impl DocumentSettings {
    /// Read settings from extracted directives. The first directive of each
    /// name wins, except `@use`, which accumulates.
    pub fn from_directives(directives: &[Directive]) -> DocumentResult<Self> {
        let first = |name: &str| {
            directives
                .iter()
                .find(|d| d.name == name)
                .and_then(|d| d.first_positional())
                .map(str::to_string)
        };

        let line_height = first("lineHeight")
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| DocumentError::invalid_setting("lineHeight", raw.as_str()))
            })
            .transpose()?;

        let modules = directives
            .iter()
            .filter(|d| d.name == "use")
            .flat_map(|d| d.positionals())
            .flat_map(|p| p.split(','))
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            version: first("v"),
            lang: first("lang"),
            title: first("title"),
            time_zone: first("timeZone"),
            line_height,
            modules,
        })
    }
}

/// Title text of the first `<h1>` across the template's text nodes.
pub fn title_from_heading<S: AsRef<str>>(texts: &[S]) -> Option<String> {
    texts
        .iter()
        .find_map(|text| HEADING.captures(text.as_ref()))
        .map(|caps| clean_title(&caps["value"]))
        .filter(|title| !title.is_empty())
}

fn clean_title(raw: &str) -> String {
    let text = TAG.replace_all(raw, "");
    let text = WHITESPACE.replace_all(&text, " ");
    NON_WORD.replace_all(&text, "").trim().to_string()
}
