#![forbid(unsafe_code)]

//! Recursive emptiness classification and scalar-to-number coercion.
//!
//! Submitted answers arrive as a JSON-like tree whose leaves may be numbers,
//! numeric strings, blanks, or nulls. Two independent traversals mirror the
//! grading contract: [`is_empty`] decides whether a tree carries any content
//! at all, and [`coerce`] rewrites every leaf into a real number.

use serde_json::Value;

use crate::error::EvalError;

/// Normalized input: same nesting as the raw tree, every leaf numeric.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Leaf(f64),
    Seq(Vec<Normalized>),
}

/// A value is empty if it is null, a string that trims to nothing, or a
/// sequence whose elements are all recursively empty. An empty sequence is
/// vacuously empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_empty),
        _ => false,
    }
}

/// Rewrite every leaf into an `f64`, preserving the nesting shape.
///
/// Blank strings, nulls, and the literal `"undefined"` become 0.0; any other
/// string must parse as a float or the whole evaluation fails.
pub fn coerce(value: &Value) -> Result<Normalized, EvalError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(coerce)
            .collect::<Result<Vec<_>, _>>()
            .map(Normalized::Seq),
        scalar => coerce_leaf(scalar).map(Normalized::Leaf),
    }
}

fn coerce_leaf(value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Number(n) => n.as_f64().ok_or_else(|| EvalError::UnsupportedLeaf {
            raw: n.to_string(),
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "undefined" {
                Ok(0.0)
            } else {
                trimmed
                    .parse::<f64>()
                    .map_err(|source| EvalError::MalformedScalar {
                        raw: s.clone(),
                        source,
                    })
            }
        }
        other => Err(EvalError::UnsupportedLeaf {
            raw: other.to_string(),
        }),
    }
}
