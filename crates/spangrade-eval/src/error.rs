#![forbid(unsafe_code)]

use spangrade_linalg::LinalgError;
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("cannot interpret `{raw}` as a number: {source}")]
    MalformedScalar {
        raw: String,
        source: ParseFloatError,
    },
    #[error("unsupported leaf value `{raw}`")]
    UnsupportedLeaf { raw: String },
    #[error("input must be a scalar, a flat vector, or a matrix of equal-length rows")]
    InvalidShape,
    #[error("matrix rows must all have equal length: expected {expected}, got {actual}")]
    RaggedRows { expected: usize, actual: usize },
    #[error("matrix must have at least one column")]
    NoColumns,
    #[error("linear algebra failed: {0}")]
    Linalg(#[from] LinalgError),
}
