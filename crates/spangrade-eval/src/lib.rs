#![forbid(unsafe_code)]

//! Grading pipeline for affine-subspace answers.
//!
//! A submitted `response` and reference `answer` arrive as JSON-like trees
//! of numbers, numeric strings, blanks, and nulls. [`evaluate`] normalizes
//! both, builds row-major matrices, and decides whether they describe the
//! same affine subspace of R^n within floating-point tolerance.
//!
//! ## Module layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | `normalize` | emptiness classification, scalar-to-number coercion   |
//! | `build`     | [`InputShape`] resolution, fixed-precision matrices   |
//! | `error`     | [`EvalError`]                                         |

pub mod build;
pub mod error;
pub mod normalize;

// ── Re-exports: flat public API ─────────────────────────────────────
pub use build::{InputShape, resolve_shape, to_matrix};
pub use error::EvalError;
pub use normalize::{Normalized, coerce, is_empty};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spangrade_linalg::{SubspaceOptions, same_affine_subspace};

/// Grading options. No tolerance knobs are recognized today; unknown fields
/// from the caller's configuration object are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub check_finite: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self { check_finite: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResult {
    pub is_correct: bool,
}

/// Grade `response` against `answer`.
///
/// Two fully empty inputs are trivially equal and short-circuit to a correct
/// verdict before any matrix is built. Row-count mismatches are incorrect
/// verdicts, not errors; only malformed leaves and invalid nesting fail.
pub fn evaluate(response: &Value, answer: &Value, params: &Params) -> Result<EvalResult, EvalError> {
    if normalize::is_empty(response) && normalize::is_empty(answer) {
        return Ok(EvalResult { is_correct: true });
    }

    let response = build_matrix(response)?;
    let answer = build_matrix(answer)?;
    let options = SubspaceOptions {
        check_finite: params.check_finite,
        ..SubspaceOptions::default()
    };
    let is_correct = same_affine_subspace(&response, &answer, options)?;
    Ok(EvalResult { is_correct })
}

fn build_matrix(value: &Value) -> Result<Vec<Vec<f64>>, EvalError> {
    let normalized = normalize::coerce(value)?;
    let shape = build::resolve_shape(&normalized)?;
    build::to_matrix(shape)
}
