//! Field and option records compiled from `@field`, `@group` and `@option`
//! directives.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::directive::Directive;
use crate::error::{ModelError, ModelResult};
use crate::path::clean_path;

pub const FIELD_DIRECTIVE: &str = "field";
pub const GROUP_DIRECTIVE: &str = "group";
pub const OPTION_DIRECTIVE: &str = "option";

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    Mixed,
    /// Any other type name, kept verbatim.
    Custom(String),
}

impl FieldType {
    pub fn parse(name: &str) -> Self {
        match name {
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "object" => FieldType::Object,
            "array" => FieldType::Array,
            "mixed" => FieldType::Mixed,
            other => FieldType::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Mixed => "mixed",
            FieldType::Custom(name) => name,
        }
    }

    /// Types whose values are compared against `min`/`max` as a range.
    pub fn is_ranged(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Date)
    }

    /// Types whose values hold other values; length bounds do not apply.
    pub fn is_container(&self) -> bool {
        matches!(self, FieldType::Object | FieldType::Array | FieldType::Mixed)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A `min`/`max` bound: a number, or a calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldBound {
    Number(f64),
    Date(NaiveDate),
}

impl FieldBound {
    /// Parse a bound param. Values that are neither numbers nor dates yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(number) = raw.parse::<f64>() {
            return number.is_finite().then_some(FieldBound::Number(number));
        }
        parse_date(raw).map(FieldBound::Date)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldBound::Number(n) => Some(*n),
            FieldBound::Date(_) => None,
        }
    }
}

impl fmt::Display for FieldBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldBound::Number(n) => write!(f, "{n}"),
            FieldBound::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for FieldBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldBound::Number(n) => serializer.serialize_f64(*n),
            FieldBound::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Bookkeeping attached to a field after compilation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldExtra {
    /// Directive the field came from: `field` or `group`.
    pub macro_name: String,
    /// Zero-based position among all field/group directives.
    pub absolute_order: Option<usize>,
}

/// A selectable value attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    pub field_name: String,
    pub label: Option<String>,
    pub descr: Option<String>,
    pub value: Option<Value>,
    pub is_disabled: bool,
}

/// A named, typed description of one data path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    pub label: Option<String>,
    pub descr: Option<String>,
    pub hint: Option<String>,
    pub min: Option<FieldBound>,
    pub max: Option<FieldBound>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub order: Option<i64>,
    pub value: Option<Value>,
    pub is_required: bool,
    pub options: Option<Vec<FieldOption>>,
    pub extra: FieldExtra,
}

impl Field {
    pub fn is_group(&self) -> bool {
        self.extra.macro_name == GROUP_DIRECTIVE
    }
}

/// Parse a param value permissively: JSON when it parses, the raw string otherwise.
pub fn parse_field_value(raw: Option<&str>) -> Option<Value> {
    let raw = raw?;
    Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

fn parse_length(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|v| v.trim().parse().ok())
}

fn parse_order(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse().ok())
}

fn describe(directive: &Directive) -> String {
    let params: Vec<String> = directive
        .params
        .iter()
        .map(|p| match &p.value {
            Some(v) if p.is_positional() => format!("\"{v}\""),
            Some(v) => format!("{}=\"{v}\"", p.name),
            None => p.name.clone(),
        })
        .collect();
    format!("@{} {}", directive.name, params.join(" "))
}

/// Compile a `field` or `group` directive into a [`Field`].
pub fn compile_field(directive: &Directive) -> ModelResult<Field> {
    let raw_name = directive
        .first_positional()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ModelError::MissingFieldName {
            directive: describe(directive),
        })?;

    let name = clean_path(raw_name);
    let field_type = if directive.name == GROUP_DIRECTIVE {
        FieldType::Object
    } else {
        directive
            .named("type")
            .map(FieldType::parse)
            .unwrap_or_default()
    };

    Ok(Field {
        field_type,
        name,
        label: directive.named("label").map(str::to_string),
        descr: directive.named("descr").map(str::to_string),
        hint: directive.named("hint").map(str::to_string),
        min: directive.named("min").and_then(FieldBound::parse),
        max: directive.named("max").and_then(FieldBound::parse),
        min_length: parse_length(directive.named("minLength")),
        max_length: parse_length(directive.named("maxLength")),
        order: parse_order(directive.named("order")),
        value: parse_field_value(directive.named("value")),
        is_required: directive.flag("required"),
        options: None,
        extra: FieldExtra {
            macro_name: directive.name.clone(),
            absolute_order: None,
        },
    })
}

/// Compile an `option` directive into a [`FieldOption`].
pub fn compile_option(directive: &Directive) -> ModelResult<FieldOption> {
    let name = directive
        .first_positional()
        .filter(|name| !name.is_empty())
        .ok_or(ModelError::MissingOptionName)?;

    let field_name = directive
        .named("for")
        .ok_or_else(|| ModelError::MissingOptionTarget {
            option: name.to_string(),
        })?;

    Ok(FieldOption {
        field_type: directive
            .named("type")
            .map(FieldType::parse)
            .unwrap_or_default(),
        name: name.to_string(),
        field_name: clean_path(field_name),
        label: directive.named("label").map(str::to_string),
        descr: directive.named("descr").map(str::to_string),
        value: parse_field_value(directive.named("value")),
        is_disabled: directive.flag("disabled"),
    })
}

/// Attach options to fields by name. A field's options are only replaced
/// when at least one option targets it.
pub fn apply_options_to_fields(options: &[FieldOption], fields: &mut [Field]) {
    for field in fields.iter_mut() {
        let matching: Vec<FieldOption> = options
            .iter()
            .filter(|o| o.field_name == field.name)
            .cloned()
            .collect();

        if !matching.is_empty() {
            field.options = Some(matching);
        }
    }
}

/// Record each field's declaration index as its absolute order.
pub fn apply_absolute_order(fields: &mut [Field]) {
    for (index, field) in fields.iter_mut().enumerate() {
        field.extra.absolute_order = Some(index);
    }
}

/// Compile every field, group and option directive, then apply options and
/// absolute order.
pub fn compile_fields(directives: &[Directive]) -> ModelResult<(Vec<Field>, Vec<FieldOption>)> {
    let mut fields = Vec::new();
    let mut options = Vec::new();

    for directive in directives {
        match directive.name.as_str() {
            FIELD_DIRECTIVE | GROUP_DIRECTIVE => fields.push(compile_field(directive)?),
            OPTION_DIRECTIVE => options.push(compile_option(directive)?),
            _ => {}
        }
    }

    apply_options_to_fields(&options, &mut fields);
    apply_absolute_order(&mut fields);

    Ok((fields, options))
}
