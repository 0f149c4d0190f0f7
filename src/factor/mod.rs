//! Factorizations: precomputed decompositions supporting repeated
//! solves, inversion, and determinant queries.
//!
//! [`Matrix::factorize`] dispatches on the matrix shape: dense matrices
//! go through [LU with partial pivoting](lu::LuFactor), symmetric packed
//! matrices through [LDLᵗ with diagonal pivoting](ldlt::LdltFactor), and
//! the structurally simple shapes (identity, diagonal, permutation)
//! short-circuit every operation in closed form.

pub(crate) mod ldlt;
pub(crate) mod lu;

pub use ldlt::LdltFactor;
pub use lu::LuFactor;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::matrix::{Matrix, Repr};
use crate::perm::Perm;
use crate::traits::FloatScalar;

/// Errors from factorization.
///
/// ```
/// use lamina::{LinalgError, Matrix};
///
/// let singular = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// assert_eq!(singular.factorize(1e-12).unwrap_err(), LinalgError::Singular);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// A pivot magnitude fell at or below the caller's tolerance.
    /// Raised eagerly during factorization, never at solve time.
    Singular,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "matrix is singular at the given tolerance"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// A decomposition of a square matrix `A`, ready for repeated queries.
///
/// All operations read the decomposition without mutating it, so a
/// fully constructed factorization can be shared freely.
pub trait Factorization<T: FloatScalar>: core::fmt::Debug {
    /// Dimension of the factored matrix.
    fn size(&self) -> usize;

    /// Solve `A·X = B` for `X`. Panics unless `B` has `size()` rows.
    fn left_solve(&self, b: &Matrix<T>) -> Matrix<T>;

    /// Solve `X·A = B` for `X`. Panics unless `B` has `size()` columns.
    fn right_solve(&self, b: &Matrix<T>) -> Matrix<T>;

    /// Determinant of `A`, precomputed at factorization time.
    fn det(&self) -> T;

    /// `A⁻¹`, by solving against the identity.
    fn inverse(&self) -> Matrix<T> {
        self.left_solve(&Matrix::identity(self.size()))
    }
}

pub(crate) fn check_left_shape<T: FloatScalar>(n: usize, b: &Matrix<T>) {
    assert_eq!(
        b.nrows(),
        n,
        "dimension mismatch: left solve against {} rows, factorization is {}x{}",
        b.nrows(),
        n,
        n,
    );
}

pub(crate) fn check_right_shape<T: FloatScalar>(n: usize, b: &Matrix<T>) {
    assert_eq!(
        b.ncols(),
        n,
        "dimension mismatch: right solve against {} columns, factorization is {}x{}",
        b.ncols(),
        n,
        n,
    );
}

// ── Closed-form factorizations ──────────────────────────────────────

/// Factorization of the identity: every query is trivial.
#[derive(Debug)]
pub struct IdentityFactor {
    n: usize,
}

impl<T: FloatScalar> Factorization<T> for IdentityFactor {
    fn size(&self) -> usize {
        self.n
    }

    fn left_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        check_left_shape(self.n, b);
        b.clone()
    }

    fn right_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        check_right_shape(self.n, b);
        b.clone()
    }

    fn det(&self) -> T {
        T::one()
    }

    fn inverse(&self) -> Matrix<T> {
        Matrix::identity(self.n)
    }
}

/// Factorization of a diagonal matrix: solves divide by the diagonal.
#[derive(Debug)]
pub struct DiagonalFactor<T> {
    diag: Vec<T>,
}

impl<T: FloatScalar> DiagonalFactor<T> {
    fn new(diag: &[T], tolerance: T) -> Result<Self, LinalgError> {
        if diag.iter().any(|d| d.abs() <= tolerance) {
            return Err(LinalgError::Singular);
        }
        Ok(Self { diag: diag.to_vec() })
    }
}

impl<T: FloatScalar> Factorization<T> for DiagonalFactor<T> {
    fn size(&self) -> usize {
        self.diag.len()
    }

    fn left_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        check_left_shape(self.diag.len(), b);
        Matrix::from_fn(b.nrows(), b.ncols(), |i, j| b.get(i, j) / self.diag[i])
    }

    fn right_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        check_right_shape(self.diag.len(), b);
        Matrix::from_fn(b.nrows(), b.ncols(), |i, j| b.get(i, j) / self.diag[j])
    }

    fn det(&self) -> T {
        self.diag.iter().fold(T::one(), |acc, &d| acc * d)
    }

    fn inverse(&self) -> Matrix<T> {
        Matrix::diagonal(self.diag.iter().map(|&d| T::one() / d).collect())
    }
}

/// Factorization of a permutation matrix: solves apply the inverse
/// permutation, the determinant is the parity.
#[derive(Debug)]
pub struct PermutationFactor {
    n: usize,
    perm: Perm,
}

impl<T: FloatScalar> Factorization<T> for PermutationFactor {
    fn size(&self) -> usize {
        self.n
    }

    fn left_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        check_left_shape(self.n, b);
        // P·X = B, so X = Pᵗ·B: row perm[i] of X is row i of B.
        let inv = self.perm.invert();
        Matrix::from_fn(b.nrows(), b.ncols(), |i, j| b.get(inv.apply(i), j))
    }

    fn right_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        check_right_shape(self.n, b);
        // X·P = B, so column k of X is column perm[k] of B.
        Matrix::from_fn(b.nrows(), b.ncols(), |i, j| b.get(i, self.perm.apply(j)))
    }

    fn det(&self) -> T {
        if self.perm.parity() >= 0 {
            T::one()
        } else {
            T::zero() - T::one()
        }
    }

    fn inverse(&self) -> Matrix<T> {
        Matrix::permutation(self.n, self.perm.invert())
    }
}

// ── Dispatch ────────────────────────────────────────────────────────

impl<T: FloatScalar + 'static> Matrix<T> {
    /// Decompose this matrix for solving, inversion, and determinants.
    ///
    /// Dense matrices factor as LU with partial pivoting; symmetric
    /// packed matrices as LDLᵗ with diagonal pivoting; identity,
    /// diagonal, and permutation shapes return closed-form
    /// factorizations. A square zero or constant matrix of size ≥ 2 is
    /// structurally singular.
    ///
    /// `tolerance` is the pivot-magnitude threshold below which the
    /// matrix is reported [`LinalgError::Singular`]. Factorization is
    /// deterministic: to retry with a different threshold, call again.
    pub fn factorize(&self, tolerance: T) -> Result<Box<dyn Factorization<T>>, LinalgError> {
        assert!(
            self.is_square(),
            "factorization requires a square matrix, got {}x{}",
            self.nrows(),
            self.ncols(),
        );
        match &self.repr {
            Repr::Identity { n } => Ok(Box::new(IdentityFactor { n: *n })),
            Repr::Diagonal { diag } => Ok(Box::new(DiagonalFactor::new(diag, tolerance)?)),
            Repr::Permutation { n, perm } => {
                Ok(Box::new(PermutationFactor { n: *n, perm: perm.clone() }))
            }
            Repr::Zero { .. } => Err(LinalgError::Singular),
            Repr::Constant { rows, value, .. } => {
                // Rank one: invertible only in the 1x1 case.
                if *rows == 1 && value.abs() > tolerance {
                    Ok(Box::new(DiagonalFactor::new(core::slice::from_ref(value), tolerance)?))
                } else {
                    Err(LinalgError::Singular)
                }
            }
            Repr::SymmetricPacked { .. } => Ok(Box::new(ldlt::LdltFactor::new(self, tolerance)?)),
            Repr::Dense { .. } => Ok(Box::new(lu::LuFactor::new(self, tolerance)?)),
        }
    }

    /// One-shot solve of `A·X = B`. Factorize and keep the
    /// [`Factorization`] instead when solving against several right-hand
    /// sides.
    pub fn solve(&self, b: &Matrix<T>, tolerance: T) -> Result<Matrix<T>, LinalgError> {
        Ok(self.factorize(tolerance)?.left_solve(b))
    }

    /// One-shot inverse.
    pub fn inverse(&self, tolerance: T) -> Result<Matrix<T>, LinalgError> {
        Ok(self.factorize(tolerance)?.inverse())
    }

    /// One-shot determinant.
    pub fn det(&self, tolerance: T) -> Result<T, LinalgError> {
        Ok(self.factorize(tolerance)?.det())
    }
}
