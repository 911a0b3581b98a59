#![forbid(unsafe_code)]

//! Dense linear-algebra primitives for grading affine-subspace answers.
//!
//! ## Module layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | `dense`    | row-major matrix shape validation, [`LinalgError`]        |
//! | `subspace` | SVD rank, least-squares residual, affine-subspace equality |

pub mod dense;
pub mod subspace;

// ── Re-exports: flat public API ─────────────────────────────────────
pub use dense::{LinalgError, matrix_shape};
pub use subspace::{
    LstsqFit, LstsqOptions, RANK_EPS, RESIDUAL_ATOL, RESIDUAL_RTOL, RankOptions, SubspaceOptions,
    hstack, lstsq_residual, rank, same_affine_subspace, split_affine,
};
