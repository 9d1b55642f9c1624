//! Data validation against a metadata model.
//!
//! Validation failures are returned as data. Only the depth guard fails the
//! call itself.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::{LoopStage, ModelError, ModelResult};
use crate::field::{parse_date, FieldBound, FieldType};
use crate::metadata::MetadataNode;

/// Machine-readable kind of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    Required,
    LessThanRange,
    GreaterThanRange,
    ShorterThanRange,
    LongerThanRange,
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub code: ValidationCode,
    /// Fully qualified dotted path of the failing node.
    pub field_name: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Only `null`, a missing key and `""` count as absent; `0`, `false`, `{}` and `[]` are values.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Display form of a value in messages: strings quoted, absent as `undefined`.
pub fn audit(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => format!("'{s}'"),
        Some(other) => other.to_string(),
    }
}

/// Length of the value's string form.
fn text_length(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_date(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(|s| parse_date(s.trim()))
}

/// Order `value` against `bound`, when both are comparable.
fn compare_to_bound(value: &Value, bound: &FieldBound) -> Option<std::cmp::Ordering> {
    match bound {
        FieldBound::Number(limit) => as_number(value).and_then(|v| v.partial_cmp(limit)),
        FieldBound::Date(limit) => as_date(value).map(|v| v.cmp(limit)),
    }
}

/// Length bounds for a node: `minLength`/`maxLength` win; string fields fall
/// back to numeric `min`/`max`.
fn length_bounds(node: &MetadataNode) -> (Option<f64>, Option<f64>) {
    let fallback = |bound: Option<FieldBound>| {
        if node.field_type != FieldType::String {
            return None;
        }
        bound.and_then(|b| b.as_number())
    };

    (
        node.min_length
            .map(|n| n as f64)
            .or_else(|| fallback(node.min)),
        node.max_length
            .map(|n| n as f64)
            .or_else(|| fallback(node.max)),
    )
}

/// First constraint violation of a present value, if any.
fn check_constraints(node: &MetadataNode, value: &Value) -> Option<(ValidationCode, String)> {
    let name = &node.extra.field_name;
    let shown = audit(Some(value));

    if node.field_type.is_ranged() {
        if let Some(min) = &node.min {
            if compare_to_bound(value, min) == Some(std::cmp::Ordering::Less) {
                return Some((
                    ValidationCode::LessThanRange,
                    format!("'{name}' field value is less than the range ({shown} is passed, the minimum is {min})"),
                ));
            }
        }
        if let Some(max) = &node.max {
            if compare_to_bound(value, max) == Some(std::cmp::Ordering::Greater) {
                return Some((
                    ValidationCode::GreaterThanRange,
                    format!("'{name}' field value is greater than the range ({shown} is passed, the maximum is {max})"),
                ));
            }
        }
    }

    if !node.field_type.is_container() {
        let (min_length, max_length) = length_bounds(node);
        let length = text_length(value) as f64;

        if let Some(min_length) = min_length {
            if length < min_length {
                return Some((
                    ValidationCode::ShorterThanRange,
                    format!("'{name}' field value is shorter than the range ({shown} is passed, the minimum is {min_length})"),
                ));
            }
        }
        if let Some(max_length) = max_length {
            if length > max_length {
                return Some((
                    ValidationCode::LongerThanRange,
                    format!("'{name}' field value is longer than the range ({shown} is passed, the maximum is {max_length})"),
                ));
            }
        }
    }

    None
}

fn validate_level(
    data: &Value,
    nodes: &[MetadataNode],
    depth: usize,
    max_depth: usize,
    errors: &mut Vec<ValidationError>,
) -> ModelResult<()> {
    if depth == 0 {
        return Err(ModelError::potential_loop(LoopStage::Validation, max_depth));
    }

    for node in nodes {
        let value = data.as_object().and_then(|object| object.get(&node.name));

        if !is_present(value) {
            if node.is_required {
                errors.push(ValidationError {
                    code: ValidationCode::Required,
                    field_name: node.extra.field_name.clone(),
                    message: format!(
                        "Field '{}' is required ({} is passed)",
                        node.extra.field_name,
                        audit(value)
                    ),
                });
                continue;
            }
        } else if let Some(value) = value {
            if let Some((code, message)) = check_constraints(node, value) {
                errors.push(ValidationError {
                    code,
                    field_name: node.extra.field_name.clone(),
                    message,
                });
            }
        }

        if !node.children.is_empty() {
            let empty = Value::Object(Default::default());
            let nested = value.filter(|v| !v.is_null()).unwrap_or(&empty);
            validate_level(nested, &node.children, depth - 1, max_depth, errors)?;
        }
    }

    Ok(())
}

/// Validate `data` against a metadata model, collecting every failure in one pass.
pub fn validate(
    data: &Value,
    model: &[MetadataNode],
    max_depth: usize,
) -> ModelResult<Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_level(data, model, max_depth, max_depth, &mut errors)?;
    Ok(errors)
}
