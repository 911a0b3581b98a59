#![forbid(unsafe_code)]

//! Shape resolution and matrix construction.
//!
//! A normalized tree is resolved once into a tagged [`InputShape`] — scalar,
//! flat row, or matrix of rows — and then materialized as a row-major matrix
//! with single-precision entries. Deeper or mixed nesting is rejected here
//! rather than inferred ad hoc downstream.

use crate::error::EvalError;
use crate::normalize::Normalized;

#[derive(Debug, Clone, PartialEq)]
pub enum InputShape {
    Scalar(f64),
    Row(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

pub fn resolve_shape(input: &Normalized) -> Result<InputShape, EvalError> {
    match input {
        Normalized::Leaf(value) => Ok(InputShape::Scalar(*value)),
        Normalized::Seq(items) => {
            if let Some(row) = leaf_values(items) {
                return Ok(InputShape::Row(row));
            }
            let rows = items
                .iter()
                .map(|item| match item {
                    Normalized::Seq(cells) => leaf_values(cells).ok_or(EvalError::InvalidShape),
                    Normalized::Leaf(_) => Err(EvalError::InvalidShape),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(InputShape::Matrix(rows))
        }
    }
}

/// All items as leaves, or `None` if any is itself a sequence.
fn leaf_values(items: &[Normalized]) -> Option<Vec<f64>> {
    items
        .iter()
        .map(|item| match item {
            Normalized::Leaf(value) => Some(*value),
            Normalized::Seq(_) => None,
        })
        .collect()
}

/// Materialize the resolved shape as a row-major matrix. A scalar becomes a
/// 1×1 matrix and a flat row a 1×n matrix. Entries are quantized through
/// `f32` for parity with the single-precision grading history.
pub fn to_matrix(shape: InputShape) -> Result<Vec<Vec<f64>>, EvalError> {
    let rows: Vec<Vec<f64>> = match shape {
        InputShape::Scalar(value) => vec![vec![quantize(value)]],
        InputShape::Row(row) => vec![row.into_iter().map(quantize).collect()],
        InputShape::Matrix(rows) => rows
            .into_iter()
            .map(|row| row.into_iter().map(quantize).collect())
            .collect(),
    };

    let width = rows[0].len();
    for row in &rows {
        if row.len() != width {
            return Err(EvalError::RaggedRows {
                expected: width,
                actual: row.len(),
            });
        }
    }
    if width == 0 {
        return Err(EvalError::NoColumns);
    }
    Ok(rows)
}

fn quantize(value: f64) -> f64 {
    f64::from(value as f32)
}
