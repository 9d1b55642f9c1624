//! The `put` module: print a value or a fallback.
//!
//! ```text
//! {{ data.client.name | put(fallback="Unknown") }}
//! {{ data.client.name | put_no_color(fallback="Unknown") }}
//! ```

use std::collections::HashMap;

use tera::{Filter, Result, Tera, Value};

use super::{helper_name, HelperModule};

/// Default CSS class wrapped around `put` output.
pub const DEFAULT_COLOR_CLASS: &str = "text-blue-500";

#[derive(Debug, Clone)]
pub struct PutModule {
    pub color_class: String,
}

impl Default for PutModule {
    fn default() -> Self {
        Self {
            color_class: DEFAULT_COLOR_CLASS.to_string(),
        }
    }
}

impl HelperModule for PutModule {
    fn name(&self) -> &'static str {
        "put"
    }

    fn helper_names(&self) -> Vec<String> {
        vec![
            helper_name(self.name(), None),
            helper_name(self.name(), Some("no_color")),
        ]
    }

    fn register(&self, tera: &mut Tera) {
        tera.register_filter(
            &helper_name(self.name(), None),
            PutFilter {
                color_class: Some(self.color_class.clone()),
            },
        );
        tera.register_filter(
            &helper_name(self.name(), Some("no_color")),
            PutFilter { color_class: None },
        );
    }
}

#[derive(Debug)]
struct PutFilter {
    color_class: Option<String>,
}

impl Filter for PutFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
        let text = display_text(value)
            .or_else(|| args.get("fallback").and_then(display_text))
            .unwrap_or_default();

        Ok(Value::String(match &self.color_class {
            Some(class) => format!(
                r#"<span class="{}">{}</span>"#,
                tera::escape_html(class),
                tera::escape_html(&text)
            ),
            None => text,
        }))
    }

    // The colored variant escapes its own content.
    fn is_safe(&self) -> bool {
        self.color_class.is_some()
    }
}

/// Text for a value, `None` when null or an empty string.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
