//! Matrix operations.
//!
//! Small, stack-allocated linear algebra helpers backing the circumcenter
//! constructions.

#![forbid(unsafe_code)]

use la_stack::{DEFAULT_PIVOT_TOL, LaError, Matrix as LaMatrix, Vector as LaVector};

/// Internal linear algebra matrix type used by this crate for fixed-size operations.
pub type Matrix<const D: usize> = LaMatrix<D>;

/// Default absolute pivot tolerance for LU factorization, re-exported from `la-stack`.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = DEFAULT_PIVOT_TOL;

#[inline]
pub(crate) fn matrix_set<const D: usize>(m: &mut Matrix<D>, r: usize, c: usize, value: f64) {
    let ok = m.set(r, c, value);
    assert!(ok, "matrix index out of bounds: ({r}, {c}) for {D}x{D}");
}

/// Solve `a * x = b` by LU factorization.
///
/// The factorization first uses `pivot_tolerance`; if that reports a singular
/// matrix it retries with a zero tolerance so that badly scaled but invertible
/// systems still solve. Exactly singular systems fail both attempts.
pub(crate) fn lu_solve<const D: usize>(
    a: &Matrix<D>,
    b: [f64; D],
    pivot_tolerance: f64,
) -> Result<[f64; D], LaError> {
    let lu = match a.lu(pivot_tolerance) {
        Ok(lu) => lu,
        Err(LaError::Singular { .. }) if pivot_tolerance > 0.0 => {
            tracing::trace!(
                "lu_solve<{D}>: falling back to zero pivot tolerance (was {pivot_tolerance})"
            );
            a.lu(0.0)?
        }
        Err(e) => return Err(e),
    };
    Ok(lu.solve_vec(LaVector::<D>::new(b))?.into_array())
}
