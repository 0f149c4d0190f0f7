//! LDLᵗ decomposition with diagonal pivoting for symmetric matrices.
//!
//! Works on packed triangular storage throughout: the input's lower
//! triangle is copied into a padded [`PackedLayout`] and both factors
//! are accumulated in place. Pivoting swaps rows and columns together,
//! so the permutation is a similarity transform and the determinant is
//! the plain product of the pivoted diagonal entries, with no sign
//! correction.

use alloc::vec;
use alloc::vec::Vec;

use crate::factor::{check_left_shape, check_right_shape, Factorization, LinalgError};
use crate::layout::{Layout, PackedLayout};
use crate::matrix::Matrix;
use crate::perm::Perm;
use crate::traits::FloatScalar;

/// Row padding that keeps 32-byte chunks of a packed row from spilling
/// into the next row.
fn simd_padding<T>() -> usize {
    (32 / core::mem::size_of::<T>()).saturating_sub(1)
}

/// LDLᵗ decomposition of a symmetric matrix: `P·A·Pᵗ = L·D·Lᵗ` with `L`
/// unit lower triangular and `D` diagonal, both held in one packed
/// triangle.
///
/// # Example
///
/// ```
/// use lamina::{Factorization, Matrix};
/// use lamina::factor::LdltFactor;
///
/// let a = Matrix::symmetric_from_rows(2, &[4.0_f64, 1.0, 1.0, 3.0]);
/// let f = LdltFactor::new(&a, 1e-12).unwrap();
/// assert!((f.det() - 11.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct LdltFactor<T> {
    data: Vec<T>,
    layout: PackedLayout,
    perm: Perm,
    det: T,
}

impl<T: FloatScalar> LdltFactor<T> {
    /// Decompose a symmetric matrix. At each step the largest-magnitude
    /// updated diagonal entry is chosen as pivot; the decomposition
    /// fails if that magnitude is at or below `tolerance`.
    pub fn new(a: &Matrix<T>, tolerance: T) -> Result<Self, LinalgError> {
        assert!(
            a.is_symmetric(),
            "LDLt decomposition requires a symmetric matrix"
        );
        let n = a.nrows();
        let layout = PackedLayout::with_padding(n, simd_padding::<T>());
        let mut data = vec![T::zero(); layout.required_len()];
        for r in 0..n {
            for c in 0..=r {
                data[layout.index(r, c)] = a.get(r, c);
            }
        }

        let mut perm = Perm::identity();
        let mut det = T::one();

        for k in 0..n {
            // Diagonal pivoting over the already-updated trailing
            // diagonal entries.
            let mut pivot_row = k;
            let mut pivot_mag = data[layout.index(k, k)].abs();
            for i in (k + 1)..n {
                let mag = data[layout.index(i, i)].abs();
                if mag > pivot_mag {
                    pivot_mag = mag;
                    pivot_row = i;
                }
            }
            if pivot_mag <= tolerance {
                return Err(LinalgError::Singular);
            }

            if pivot_row != k {
                perm.swap(k, pivot_row, n);
                // The reflecting packed index makes the simultaneous
                // row and column exchange a single sweep. Element
                // (k, pivot_row) maps to itself and stays put.
                for j in 0..n {
                    if j != k && j != pivot_row {
                        data.swap(layout.index(k, j), layout.index(pivot_row, j));
                    }
                }
                data.swap(layout.index(k, k), layout.index(pivot_row, pivot_row));
            }

            let d = data[layout.index(k, k)];
            det = det * d;

            // Left-looking multipliers for column k, folding in the
            // columns already computed. Trailing diagonals are updated
            // eagerly so the next pivot search reads current values;
            // trailing off-diagonals stay untouched until their column
            // comes up.
            for i in (k + 1)..n {
                let mut sum = data[layout.index(i, k)];
                for j in 0..k {
                    sum = sum
                        - data[layout.index(k, j)]
                            * data[layout.index(i, j)]
                            * data[layout.index(j, j)];
                }
                let l = sum / d;
                data[layout.index(i, k)] = l;
                let di = layout.index(i, i);
                data[di] = data[di] - d * l * l;
            }
        }

        Ok(Self { data, layout, perm, det })
    }

    /// The stored pivoting permutation.
    pub fn perm(&self) -> &Perm {
        &self.perm
    }

    /// Solve `L·D·Lᵗ·w = P·b` for one gathered column, leaving `w` in
    /// pivoted order. Callers scatter through the permutation.
    fn solve_column(&self, b: impl Fn(usize) -> T, w: &mut [T]) {
        let n = self.layout.size();
        // Forward substitution through the unit lower factor.
        for i in 0..n {
            let mut sum = b(self.perm.apply(i));
            for j in 0..i {
                sum = sum - self.data[self.layout.index(i, j)] * w[j];
            }
            w[i] = sum;
        }
        // Divide by D, then back-substitute through Lᵗ.
        for (i, v) in w.iter_mut().enumerate() {
            *v = *v / self.data[self.layout.index(i, i)];
        }
        for i in (0..n).rev() {
            let mut sum = w[i];
            for j in (i + 1)..n {
                sum = sum - self.data[self.layout.index(j, i)] * w[j];
            }
            w[i] = sum;
        }
    }
}

impl<T: FloatScalar> Factorization<T> for LdltFactor<T> {
    fn size(&self) -> usize {
        self.layout.size()
    }

    fn left_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        let n = self.layout.size();
        check_left_shape(n, b);
        let m = b.ncols();

        let mut data = vec![T::zero(); n * m];
        let mut work = vec![T::zero(); n];
        for col in 0..m {
            self.solve_column(|i| b.get(i, col), &mut work);
            let x = &mut data[col * n..(col + 1) * n];
            for i in 0..n {
                x[self.perm.apply(i)] = work[i];
            }
        }
        Matrix::from_parts(data, Layout::column_major(n, m))
    }

    /// Solve `X·A = B`. The matrix is symmetric, so each row of `X` is
    /// the left solve of the matching row of `B`.
    fn right_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        let n = self.layout.size();
        check_right_shape(n, b);
        let m = b.nrows();

        let mut data = vec![T::zero(); m * n];
        let mut work = vec![T::zero(); n];
        for row in 0..m {
            self.solve_column(|j| b.get(row, j), &mut work);
            for j in 0..n {
                data[self.perm.apply(j) * m + row] = work[j];
            }
        }
        Matrix::from_parts(data, Layout::column_major(m, n))
    }

    fn det(&self) -> T {
        self.det
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::lu::LuFactor;

    fn indefinite_matrix() -> Matrix<f64> {
        // Zero leading diagonal forces pivoting on the first step.
        Matrix::symmetric_from_rows(
            3,
            &[0.0, -1.0, 0.5, -1.0, -1.0, 1.5, 0.5, 1.5, 0.0],
        )
    }

    #[test]
    fn left_solve_scenario() {
        let a = indefinite_matrix();
        let b = Matrix::from_nested(&[&[1.0, -1.0][..], &[0.0, 1.0], &[0.5, 0.25]]);
        let x = LdltFactor::new(&a, 1e-9).unwrap().left_solve(&b);
        let expected = Matrix::from_nested(&[
            &[2.2, -2.2][..],
            &[-0.4, 0.9],
            &[1.2, -0.2],
        ]);
        assert!(x.eq_within(&expected, 1e-6), "got {:?}", x);
        assert!(a.multiply(&x).eq_within(&b, 1e-10));
    }

    #[test]
    fn determinant_is_plain_pivot_product() {
        let f = LdltFactor::new(&indefinite_matrix(), 1e-9).unwrap();
        assert!((f.det() + 1.25).abs() < 1e-10);
        assert!(!f.perm().is_identity());
    }

    #[test]
    fn determinant_agrees_with_lu() {
        let a = indefinite_matrix();
        let ldlt = LdltFactor::new(&a, 1e-9).unwrap();
        let lu = LuFactor::new(&a.to_dense(), 1e-9).unwrap();
        assert!((ldlt.det() - lu.det()).abs() < 1e-10);
    }

    #[test]
    fn right_solve_property() {
        let a = indefinite_matrix();
        let b = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = LdltFactor::new(&a, 1e-9).unwrap().right_solve(&b);
        assert!(x.multiply(&a).eq_within(&b, 1e-10), "got {:?}", x.multiply(&a));
    }

    #[test]
    fn inverse_roundtrip() {
        let a = Matrix::symmetric_from_fn(4, |i, j| {
            if i == j {
                10.0 + i as f64
            } else {
                1.0 / (1.0 + (i + j) as f64)
            }
        });
        let inv = LdltFactor::new(&a, 1e-9).unwrap().inverse();
        assert!(a.multiply(&inv).eq_within(&Matrix::identity(4), 1e-10));
    }

    #[test]
    fn no_pivot_when_diagonally_dominant() {
        let a = Matrix::symmetric_from_rows(2, &[4.0_f64, 1.0, 1.0, 3.0]);
        let f = LdltFactor::new(&a, 1e-9).unwrap();
        assert!(f.perm().is_identity());
        assert!((f.det() - 11.0).abs() < 1e-12);
    }

    #[test]
    fn singular_symmetric_detected() {
        // Rank one.
        let a = Matrix::symmetric_from_rows(2, &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(LdltFactor::new(&a, 1e-9).unwrap_err(), LinalgError::Singular);
    }

    #[test]
    fn agrees_with_lu_solve() {
        let a = indefinite_matrix();
        let b = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x_ldlt = LdltFactor::new(&a, 1e-9).unwrap().left_solve(&b);
        let x_lu = LuFactor::new(&a.to_dense(), 1e-9).unwrap().left_solve(&b);
        assert!(x_ldlt.eq_within(&x_lu, 1e-9));
    }

    #[test]
    fn padded_storage_solves_like_unpadded() {
        // Same matrix through the dispatcher, which always pads, and
        // against a dense LU of the same values.
        let a = Matrix::symmetric_from_fn(5, |i, j| ((i * 5 + j) % 7) as f64 + if i == j { 20.0 } else { 0.0 });
        let f = a.factorize(1e-9).unwrap();
        let b = Matrix::from_fn(5, 1, |i, _| i as f64 + 1.0);
        let x = f.left_solve(&b);
        assert!(a.multiply(&x).eq_within(&b, 1e-9));
    }

    #[test]
    #[should_panic(expected = "symmetric")]
    fn rejects_unsymmetric_input() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let _ = LdltFactor::new(&a, 1e-9);
    }
}
