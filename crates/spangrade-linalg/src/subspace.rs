#![forbid(unsafe_code)]

//! Affine-subspace equality via rank comparison and least-squares residual.
//!
//! Matrices are row-major `Vec<Vec<f64>>` with rows indexing the ambient
//! dimension of R^n. Every column except the last is a spanning direction;
//! the last column is the affine offset. Two matrices describe the same
//! affine subspace iff their span blocks generate identical column spaces
//! and the offset difference lies inside that space.

use nalgebra::{DMatrix, DVector, Dyn, linalg::SVD};

use crate::dense::{
    LinalgError, dmatrix_from_rows, matrix_shape, validate_finite_matrix, validate_finite_vector,
};

/// Default relative gap under which a singular value counts as zero.
/// Single-precision semantics: grading history was produced at float32.
pub const RANK_EPS: f64 = f32::EPSILON as f64;

/// Absolute tolerance for the offset residual (float32 `allclose` family).
pub const RESIDUAL_ATOL: f64 = 1e-8;
/// Relative tolerance for the offset residual (float32 `allclose` family).
pub const RESIDUAL_RTOL: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub cond: Option<f64>,
    pub check_finite: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            cond: None,
            check_finite: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LstsqOptions {
    pub cond: Option<f64>,
    pub check_finite: bool,
}

impl Default for LstsqOptions {
    fn default() -> Self {
        Self {
            cond: None,
            check_finite: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubspaceOptions {
    pub cond: Option<f64>,
    pub check_finite: bool,
}

impl Default for SubspaceOptions {
    fn default() -> Self {
        Self {
            cond: None,
            check_finite: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LstsqFit {
    pub x: Vec<f64>,
    pub residual: f64,
    pub rank: usize,
}

/// Numerical rank from SVD singular values.
///
/// The cutoff is `max_s * max(rows, cols) * eps` with `eps` defaulting to
/// [`RANK_EPS`]; a matrix with no rows or no columns has rank 0.
pub fn rank(a: &[Vec<f64>], options: RankOptions) -> Result<usize, LinalgError> {
    let (rows, cols) = matrix_shape(a)?;
    validate_finite_matrix(a, options.check_finite)?;
    if rows == 0 || cols == 0 {
        return Ok(0);
    }

    let matrix = dmatrix_from_rows(a)?;
    let svd = SVD::new(matrix, false, false);
    Ok(count_above_cutoff(
        svd.singular_values.as_slice(),
        rows,
        cols,
        options.cond,
    ))
}

/// Minimum-norm least-squares solve of `a · x ≈ b` with an explicit residual.
///
/// The residual sum of squares `||a·x − b||²` is always computed, including
/// for rank-deficient and underdetermined systems where the scipy convention
/// would return an empty residual array. A span block with zero columns
/// degenerates to `x = []` and residual `||b||²`.
pub fn lstsq_residual(
    a: &[Vec<f64>],
    b: &[f64],
    options: LstsqOptions,
) -> Result<LstsqFit, LinalgError> {
    let (rows, cols) = matrix_shape(a)?;
    if b.len() != rows {
        return Err(LinalgError::IncompatibleShapes {
            a_shape: (rows, cols),
            b_len: b.len(),
        });
    }
    validate_finite_matrix(a, options.check_finite)?;
    validate_finite_vector(b, options.check_finite)?;

    if cols == 0 {
        let residual = b.iter().map(|v| v * v).sum();
        return Ok(LstsqFit {
            x: Vec::new(),
            residual,
            rank: 0,
        });
    }

    let matrix = dmatrix_from_rows(a)?;
    let rhs = DVector::from_column_slice(b);
    let svd = SVD::new(matrix.clone(), true, true);
    let singular_values: Vec<f64> = svd.singular_values.iter().copied().collect();
    let threshold = cutoff(&singular_values, rows, cols, options.cond);
    let rank = singular_values.iter().filter(|s| **s > threshold).count();

    let pinv = pseudo_inverse_from_svd(&svd, threshold)?;
    let x = pinv * rhs.clone();
    let residual_vec = rhs - matrix * &x;
    Ok(LstsqFit {
        x: x.iter().copied().collect(),
        residual: residual_vec.dot(&residual_vec),
        rank,
    })
}

/// Split a matrix into its span block (all columns but the last) and its
/// constant column (the last column).
pub fn split_affine(m: &[Vec<f64>]) -> Result<(Vec<Vec<f64>>, Vec<f64>), LinalgError> {
    let (_rows, cols) = matrix_shape(m)?;
    if cols == 0 {
        return Err(LinalgError::MissingConstantColumn);
    }
    let span = m
        .iter()
        .map(|row| row[..cols - 1].to_vec())
        .collect::<Vec<_>>();
    let constant = m.iter().map(|row| row[cols - 1]).collect::<Vec<_>>();
    Ok((span, constant))
}

/// Horizontal concatenation of two matrices with equal row counts.
pub fn hstack(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
    a.iter()
        .zip(b.iter())
        .map(|(left, right)| {
            let mut row = left.clone();
            row.extend_from_slice(right);
            row
        })
        .collect()
}

/// Decide whether `response` and `answer` describe the same affine subspace.
///
/// 1. A row-count mismatch is a plain `false` verdict, never an error.
/// 2. The span blocks generate the same column space iff
///    `rank(R) == rank(A) == rank([R | A])`.
/// 3. The offset difference must be expressible in the answer's span: the
///    least-squares residual of `A · x ≈ (r_const − a_const)` has to be
///    indistinguishable from zero at float32 closeness tolerance.
///
/// The answer's span is the reference basis for the offset solve, so the
/// relation is not symmetric in general.
pub fn same_affine_subspace(
    response: &[Vec<f64>],
    answer: &[Vec<f64>],
    options: SubspaceOptions,
) -> Result<bool, LinalgError> {
    let (r_rows, _) = matrix_shape(response)?;
    let (a_rows, _) = matrix_shape(answer)?;
    validate_finite_matrix(response, options.check_finite)?;
    validate_finite_matrix(answer, options.check_finite)?;
    if r_rows != a_rows {
        return Ok(false);
    }

    let (r_span, r_const) = split_affine(response)?;
    let (a_span, a_const) = split_affine(answer)?;

    // Inputs are already validated; skip redundant finite scans below.
    let rank_options = RankOptions {
        cond: options.cond,
        check_finite: false,
    };
    let r_rank = rank(&r_span, rank_options)?;
    let a_rank = rank(&a_span, rank_options)?;
    if r_rank != a_rank {
        return Ok(false);
    }
    let joint = hstack(&r_span, &a_span);
    if rank(&joint, rank_options)? != a_rank {
        return Ok(false);
    }

    let diff: Vec<f64> = r_const
        .iter()
        .zip(a_const.iter())
        .map(|(r, a)| r - a)
        .collect();
    let fit = lstsq_residual(
        &a_span,
        &diff,
        LstsqOptions {
            cond: options.cond,
            check_finite: false,
        },
    )?;
    Ok(allclose(fit.residual, 0.0))
}

fn allclose(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= RESIDUAL_ATOL + RESIDUAL_RTOL * expected.abs()
}

fn cutoff(singular_values: &[f64], rows: usize, cols: usize, cond: Option<f64>) -> f64 {
    let max_s = singular_values.iter().copied().fold(0.0_f64, f64::max);
    let eps = cond.unwrap_or(RANK_EPS);
    max_s * (rows.max(cols) as f64) * eps
}

fn count_above_cutoff(
    singular_values: &[f64],
    rows: usize,
    cols: usize,
    cond: Option<f64>,
) -> usize {
    let threshold = cutoff(singular_values, rows, cols, cond);
    singular_values.iter().filter(|s| **s > threshold).count()
}

fn pseudo_inverse_from_svd(
    svd: &SVD<f64, Dyn, Dyn>,
    threshold: f64,
) -> Result<DMatrix<f64>, LinalgError> {
    let u = svd.u.as_ref().ok_or(LinalgError::DegenerateSvd)?;
    let v_t = svd.v_t.as_ref().ok_or(LinalgError::DegenerateSvd)?;
    let p = svd.singular_values.len();
    if u.ncols() != p || v_t.nrows() != p {
        return Err(LinalgError::DegenerateSvd);
    }

    let mut sigma_pinv = DMatrix::zeros(p, p);
    for (i, s) in svd.singular_values.iter().enumerate() {
        if *s > threshold {
            sigma_pinv[(i, i)] = 1.0 / *s;
        }
    }
    Ok(v_t.transpose() * sigma_pinv * u.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_of_full_rank_square() {
        let a = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(rank(&a, RankOptions::default()).unwrap(), 2);
    }

    #[test]
    fn rank_of_dependent_columns() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]];
        assert_eq!(rank(&a, RankOptions::default()).unwrap(), 1);
    }

    #[test]
    fn rank_of_zero_and_empty_matrices() {
        let zeros = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        assert_eq!(rank(&zeros, RankOptions::default()).unwrap(), 0);
        let no_cols: Vec<Vec<f64>> = vec![Vec::new(), Vec::new()];
        assert_eq!(rank(&no_cols, RankOptions::default()).unwrap(), 0);
        assert_eq!(rank(&[], RankOptions::default()).unwrap(), 0);
    }

    #[test]
    fn rank_distinguishes_near_parallel_columns() {
        // Determinant ~1e-5: well above the float32 cutoff, so rank 2.
        let a = vec![vec![-1.0, -1.0], vec![1.0, 1.00001]];
        assert_eq!(rank(&a, RankOptions::default()).unwrap(), 2);
    }

    #[test]
    fn lstsq_residual_consistent_system_is_zero() {
        let a = vec![vec![-1.0], vec![1.0]];
        let b = vec![1.0, -1.0];
        let fit = lstsq_residual(&a, &b, LstsqOptions::default()).unwrap();
        assert_eq!(fit.rank, 1);
        assert!((fit.x[0] + 1.0).abs() < 1e-10);
        assert!(fit.residual < 1e-20);
    }

    #[test]
    fn lstsq_residual_inconsistent_system_is_positive() {
        let a = vec![vec![1.0], vec![0.0]];
        let b = vec![0.5, 1.0];
        let fit = lstsq_residual(&a, &b, LstsqOptions::default()).unwrap();
        assert!((fit.residual - 1.0).abs() < 1e-10);
    }

    #[test]
    fn lstsq_residual_with_no_columns_is_norm_of_rhs() {
        let a: Vec<Vec<f64>> = vec![Vec::new(), Vec::new()];
        let b = vec![3.0, 4.0];
        let fit = lstsq_residual(&a, &b, LstsqOptions::default()).unwrap();
        assert!(fit.x.is_empty());
        assert_eq!(fit.rank, 0);
        assert!((fit.residual - 25.0).abs() < 1e-12);
    }

    #[test]
    fn lstsq_rejects_mismatched_rhs() {
        let a = vec![vec![1.0], vec![0.0]];
        let err = lstsq_residual(&a, &[1.0], LstsqOptions::default()).unwrap_err();
        assert_eq!(
            err,
            LinalgError::IncompatibleShapes {
                a_shape: (2, 1),
                b_len: 1,
            }
        );
    }

    #[test]
    fn split_affine_peels_last_column() {
        let m = vec![vec![-1.0, 1.0], vec![1.0, 1.0]];
        let (span, constant) = split_affine(&m).unwrap();
        assert_eq!(span, vec![vec![-1.0], vec![1.0]]);
        assert_eq!(constant, vec![1.0, 1.0]);
    }

    #[test]
    fn split_affine_needs_a_column() {
        let m: Vec<Vec<f64>> = vec![Vec::new()];
        assert_eq!(split_affine(&m), Err(LinalgError::MissingConstantColumn));
    }

    #[test]
    fn same_span_different_offset_is_equal() {
        let response = vec![vec![-1.0, 1.0], vec![1.0, 1.0]];
        let answer = vec![vec![-1.0, 0.0], vec![1.0, 2.0]];
        assert!(same_affine_subspace(&response, &answer, SubspaceOptions::default()).unwrap());
    }

    #[test]
    fn slightly_rotated_span_is_not_equal() {
        let response = vec![vec![-1.0, 1.0], vec![1.0, 1.0]];
        let answer = vec![vec![-1.0, 1.0], vec![1.00001, 1.0]];
        assert!(!same_affine_subspace(&response, &answer, SubspaceOptions::default()).unwrap());
    }

    #[test]
    fn offset_outside_span_is_not_equal() {
        // Span is the x-axis; offsets differ along y.
        let response = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let answer = vec![vec![1.0, 0.0], vec![0.0, 0.0]];
        assert!(!same_affine_subspace(&response, &answer, SubspaceOptions::default()).unwrap());
    }

    #[test]
    fn row_count_mismatch_is_a_false_verdict() {
        let response = vec![vec![1.0, 2.0]];
        let answer = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert!(!same_affine_subspace(&response, &answer, SubspaceOptions::default()).unwrap());
    }

    #[test]
    fn one_column_matrices_compare_constants_only() {
        let response = vec![vec![2.0], vec![3.0]];
        let answer = vec![vec![2.0], vec![3.0]];
        assert!(same_affine_subspace(&response, &answer, SubspaceOptions::default()).unwrap());
        let other = vec![vec![2.0], vec![3.5]];
        assert!(!same_affine_subspace(&response, &other, SubspaceOptions::default()).unwrap());
    }

    #[test]
    fn extra_redundant_direction_still_matches() {
        // Response lists the same direction twice; span is unchanged.
        let response = vec![vec![1.0, 2.0, 0.0], vec![1.0, 2.0, 0.0]];
        let answer = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        assert!(same_affine_subspace(&response, &answer, SubspaceOptions::default()).unwrap());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let response = vec![vec![f64::INFINITY, 1.0]];
        let answer = vec![vec![1.0, 1.0]];
        let err =
            same_affine_subspace(&response, &answer, SubspaceOptions::default()).unwrap_err();
        assert_eq!(err, LinalgError::NonFiniteInput);
    }
}
