//! Matrix multiplication.
//!
//! A single priority-ordered dispatch: the right operand's fast path is
//! tried first, then the left's, then the generic triple-nested
//! accumulation. The closed-form cases never call back into the general
//! entry point, so the dispatch cannot recurse.

use alloc::vec::Vec;

use crate::perm::Perm;
use crate::traits::Scalar;

use super::{Matrix, Repr};

impl<T: Scalar> Matrix<T> {
    /// Matrix product `self · rhs`.
    ///
    /// Structurally simple operands (zero, identity, diagonal,
    /// permutation, constant) are handled in closed form without
    /// materializing dense storage.
    ///
    /// ```
    /// use lamina::Matrix;
    /// let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let p = a.multiply(&Matrix::identity(2));
    /// assert!(p.eq_within(&a, 0.0));
    /// ```
    pub fn multiply(&self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.ncols(),
            rhs.nrows(),
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows(),
            self.ncols(),
            rhs.nrows(),
            rhs.ncols(),
        );
        let (m, inner, p) = (self.nrows(), self.ncols(), rhs.ncols());

        // Right operand first.
        match &rhs.repr {
            Repr::Zero { .. } => return Matrix::zero(m, p),
            Repr::Identity { .. } => return self.clone(),
            Repr::Diagonal { diag } => return scale_cols(self, diag),
            Repr::Permutation { perm, .. } => return permute_cols(self, perm),
            Repr::Constant { value, .. } => return row_sums_times(self, *value, p),
            _ => {}
        }
        // Then the left.
        match &self.repr {
            Repr::Zero { .. } => return Matrix::zero(m, p),
            Repr::Identity { .. } => return rhs.clone(),
            Repr::Diagonal { diag } => return scale_rows(rhs, diag),
            Repr::Permutation { perm, .. } => {
                return Matrix::from_fn(m, p, |i, j| rhs.get(perm.apply(i), j));
            }
            Repr::Constant { value, .. } => return col_sums_times(rhs, *value, m),
            _ => {}
        }
        // Dense fallback: triple-nested accumulation.
        Matrix::from_fn(m, p, |i, j| {
            let mut sum = T::zero();
            for k in 0..inner {
                sum = sum + self.get(i, k) * rhs.get(k, j);
            }
            sum
        })
    }
}

/// `lhs · D`: scale column `j` by `d[j]`.
fn scale_cols<T: Scalar>(lhs: &Matrix<T>, d: &[T]) -> Matrix<T> {
    match &lhs.repr {
        Repr::Zero { rows, .. } => Matrix::zero(*rows, d.len()),
        Repr::Identity { .. } => Matrix::diagonal(d.to_vec()),
        Repr::Diagonal { diag } => {
            Matrix::diagonal(diag.iter().zip(d.iter()).map(|(&a, &b)| a * b).collect())
        }
        _ => Matrix::from_fn(lhs.nrows(), d.len(), |i, j| lhs.get(i, j) * d[j]),
    }
}

/// `D · rhs`: scale row `i` by `d[i]`.
fn scale_rows<T: Scalar>(rhs: &Matrix<T>, d: &[T]) -> Matrix<T> {
    match &rhs.repr {
        Repr::Zero { cols, .. } => Matrix::zero(d.len(), *cols),
        Repr::Identity { .. } => Matrix::diagonal(d.to_vec()),
        Repr::Diagonal { diag } => {
            Matrix::diagonal(d.iter().zip(diag.iter()).map(|(&a, &b)| a * b).collect())
        }
        _ => Matrix::from_fn(d.len(), rhs.ncols(), |i, j| d[i] * rhs.get(i, j)),
    }
}

/// `lhs · P`: column `k` of `lhs` lands in column `perm[k]`.
fn permute_cols<T: Scalar>(lhs: &Matrix<T>, perm: &Perm) -> Matrix<T> {
    match &lhs.repr {
        Repr::Zero { rows, cols } => Matrix::zero(*rows, *cols),
        Repr::Identity { n } => Matrix::permutation(*n, perm.clone()),
        Repr::Permutation { n, perm: pa } => {
            // (Pa · P)·B picks row perm[pa[i]] of B.
            Matrix::permutation(*n, perm.clone().combine(pa))
        }
        _ => {
            let inv = perm.invert();
            Matrix::from_fn(lhs.nrows(), lhs.ncols(), |i, j| lhs.get(i, inv.apply(j)))
        }
    }
}

/// `lhs · C` where every element of `C` is `value`: each result column
/// is the row-sum vector of `lhs` scaled by `value`.
fn row_sums_times<T: Scalar>(lhs: &Matrix<T>, value: T, out_cols: usize) -> Matrix<T> {
    if let Repr::Zero { rows, .. } = &lhs.repr {
        return Matrix::zero(*rows, out_cols);
    }
    let sums: Vec<T> = (0..lhs.nrows())
        .map(|i| {
            let mut s = T::zero();
            for k in 0..lhs.ncols() {
                s = s + lhs.get(i, k);
            }
            s * value
        })
        .collect();
    Matrix::from_fn(lhs.nrows(), out_cols, |i, _| sums[i])
}

/// `C · rhs` where every element of `C` is `value`.
fn col_sums_times<T: Scalar>(rhs: &Matrix<T>, value: T, out_rows: usize) -> Matrix<T> {
    if let Repr::Zero { cols, .. } = &rhs.repr {
        return Matrix::zero(out_rows, *cols);
    }
    let sums: Vec<T> = (0..rhs.ncols())
        .map(|j| {
            let mut s = T::zero();
            for k in 0..rhs.nrows() {
                s = s + rhs.get(k, j);
            }
            s * value
        })
        .collect();
    Matrix::from_fn(out_rows, rhs.ncols(), |_, j| sums[j])
}
