//! The `cond` module: comparisons and boolean operators as template functions.
//!
//! ```text
//! {% if cond(a=data.total, op="greater", b=1000) %}...{% endif %}
//! {% if cond_soft_equal(a=data.count, b="3") %}...{% endif %}
//! {{ cond_or(a=data.nickname, b=data.name) }}
//! ```

use std::collections::HashMap;

use quire_model::audit;
use tera::{Function, Result, Tera, Value};

use super::{helper_name, HelperModule};

/// Operations understood by `cond`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Equal,
    SoftEqual,
    NotEqual,
    SoftNotEqual,
    And,
    Or,
    Greater,
    Less,
}

impl CondOp {
    const ALL: [CondOp; 8] = [
        CondOp::Equal,
        CondOp::SoftEqual,
        CondOp::NotEqual,
        CondOp::SoftNotEqual,
        CondOp::And,
        CondOp::Or,
        CondOp::Greater,
        CondOp::Less,
    ];

    /// Name accepted by the `op` argument.
    pub fn as_str(self) -> &'static str {
        match self {
            CondOp::Equal => "equal",
            CondOp::SoftEqual => "softEqual",
            CondOp::NotEqual => "notEqual",
            CondOp::SoftNotEqual => "softNotEqual",
            CondOp::And => "and",
            CondOp::Or => "or",
            CondOp::Greater => "greater",
            CondOp::Less => "less",
        }
    }

    /// Suffix of the dedicated helper, `cond_<suffix>`.
    fn helper(self) -> &'static str {
        match self {
            CondOp::Equal => "equal",
            CondOp::SoftEqual => "soft_equal",
            CondOp::NotEqual => "not_equal",
            CondOp::SoftNotEqual => "soft_not_equal",
            CondOp::And => "and",
            CondOp::Or => "or",
            CondOp::Greater => "greater",
            CondOp::Less => "less",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    pub fn apply(self, a: &Value, b: &Value) -> Value {
        match self {
            CondOp::Equal => Value::Bool(strict_equal(a, b)),
            CondOp::SoftEqual => Value::Bool(soft_equal(a, b)),
            CondOp::NotEqual => Value::Bool(!strict_equal(a, b)),
            CondOp::SoftNotEqual => Value::Bool(!soft_equal(a, b)),
            CondOp::And => (if is_truthy(a) { b } else { a }).clone(),
            CondOp::Or => (if is_truthy(a) { a } else { b }).clone(),
            CondOp::Greater => Value::Bool(to_number(a) > to_number(b)),
            CondOp::Less => Value::Bool(to_number(a) < to_number(b)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CondModule;

impl HelperModule for CondModule {
    fn name(&self) -> &'static str {
        "cond"
    }

    fn helper_names(&self) -> Vec<String> {
        let mut names = vec![
            helper_name(self.name(), None),
            helper_name(self.name(), Some("op")),
            helper_name(self.name(), Some("no_color")),
        ];
        names.extend(
            CondOp::ALL
                .iter()
                .map(|op| helper_name(self.name(), Some(op.helper()))),
        );
        names
    }

    fn register(&self, tera: &mut Tera) {
        for helper in [None, Some("op"), Some("no_color")] {
            tera.register_function(&helper_name(self.name(), helper), CondFunction { op: None });
        }
        for op in CondOp::ALL {
            tera.register_function(
                &helper_name(self.name(), Some(op.helper())),
                CondFunction { op: Some(op) },
            );
        }
    }
}

/// A `cond` helper. Without a fixed operation it reads the `op` argument.
#[derive(Debug)]
struct CondFunction {
    op: Option<CondOp>,
}

impl Function for CondFunction {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let op = match self.op {
            Some(op) => op,
            None => {
                let raw = args.get("op");
                raw.and_then(Value::as_str)
                    .and_then(CondOp::parse)
                    .ok_or_else(|| {
                        tera::Error::msg(format!("Condition: Unknown operation: {}", audit(raw)))
                    })?
            }
        };

        let a = args.get("a").unwrap_or(&Value::Null);
        let b = args.get("b").unwrap_or(&Value::Null);
        Ok(op.apply(a, b))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion: null and blank strings are zero, anything unparsable is NaN.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Same type and same value. Integers and floats compare numerically.
fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Equality after coercing strings and booleans to numbers.
fn soft_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Bool(_), _)
        | (_, Value::Bool(_))
        | (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_)) => to_number(a) == to_number(b),
        _ => strict_equal(a, b),
    }
}
