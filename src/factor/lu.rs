//! LU decomposition with partial pivoting for general square matrices.

use alloc::vec;

use crate::factor::{check_left_shape, check_right_shape, Factorization, LinalgError};
use crate::layout::Layout;
use crate::matrix::Matrix;
use crate::perm::Perm;
use crate::traits::{FloatScalar, MatrixMut};

/// Perform LU decomposition with partial pivoting, in place.
///
/// On return, `a` contains both factors packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): L (diagonal of L is implicitly 1)
///
/// `perm` is filled with the row permutation indices (`perm[i]` is the
/// source row landing at row `i`). Returns `true` if the number of row
/// swaps actually performed was even.
///
/// Fails with [`LinalgError::Singular`] as soon as a selected pivot
/// magnitude is at or below `tolerance`.
pub fn lu_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
    tolerance: T,
) -> Result<bool, LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");
    assert_eq!(n, perm.len(), "permutation slice length must match matrix size");

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let mut even = true;

    for col in 0..n {
        // Partial pivoting: the largest magnitude at or below the diagonal.
        let mut max_row = col;
        let mut max_val = a.get(col, col).abs();
        for row in (col + 1)..n {
            let val = a.get(row, col).abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val <= tolerance {
            return Err(LinalgError::Singular);
        }

        // Only a swap that moves a row flips the determinant sign.
        if max_row != col {
            perm.swap(col, max_row);
            for j in 0..n {
                let tmp = a.get(col, j);
                a.set(col, j, a.get(max_row, j));
                a.set(max_row, j, tmp);
            }
            even = !even;
        }

        // Scale the sub-column into multipliers, then eliminate below.
        let pivot = a.get(col, col);
        let inv_pivot = T::one() / pivot;
        for row in (col + 1)..n {
            a.set(row, col, a.get(row, col) * inv_pivot);
        }
        for j in (col + 1)..n {
            let u_col_j = a.get(col, j);
            if u_col_j == T::zero() {
                continue;
            }
            for row in (col + 1)..n {
                a.set(row, j, a.get(row, j) - a.get(row, col) * u_col_j);
            }
        }
    }

    Ok(even)
}

/// LU decomposition of a square matrix, with the packed factors, the row
/// permutation, and the precomputed determinant.
///
/// # Example
///
/// ```
/// use lamina::{Factorization, Matrix};
/// use lamina::factor::LuFactor;
///
/// let a = Matrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let lu = LuFactor::new(&a, 1e-12).unwrap();
///
/// let b = Matrix::from_rows(2, 1, &[4.0, 11.0]);
/// let x = lu.left_solve(&b);
/// assert!((x.get(0, 0) - 1.0).abs() < 1e-12);
/// assert!((x.get(1, 0) - 2.0).abs() < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct LuFactor<T> {
    lu: Matrix<T>,
    perm: Perm,
    det: T,
}

impl<T: FloatScalar> LuFactor<T> {
    /// Decompose a matrix. Fails if a pivot magnitude is at or below
    /// `tolerance`.
    pub fn new(a: &Matrix<T>, tolerance: T) -> Result<Self, LinalgError> {
        assert!(a.is_square(), "LU decomposition requires a square matrix");
        let n = a.nrows();
        let mut lu = a.to_dense();
        let mut perm = vec![0usize; n];
        let even = lu_in_place(&mut lu, &mut perm, tolerance)?;

        let mut det = if even { T::one() } else { T::zero() - T::one() };
        for i in 0..n {
            det = det * lu.get(i, i);
        }

        Ok(Self { lu, perm: Perm::from_vec(perm), det })
    }

    /// The stored row permutation.
    pub fn perm(&self) -> &Perm {
        &self.perm
    }
}

impl<T: FloatScalar> Factorization<T> for LuFactor<T> {
    fn size(&self) -> usize {
        self.lu.nrows()
    }

    /// Solve `A·X = B`: permute B's rows, forward-substitute through the
    /// unit lower factor, back-substitute through the upper factor.
    fn left_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        let n = self.lu.nrows();
        check_left_shape(n, b);
        let m = b.ncols();

        let mut data = vec![T::zero(); n * m];
        for col in 0..m {
            let x = &mut data[col * n..(col + 1) * n];
            // Forward substitution of the permuted column: L·y = P·b.
            for i in 0..n {
                let mut sum = b.get(self.perm.apply(i), col);
                for j in 0..i {
                    sum = sum - self.lu.get(i, j) * x[j];
                }
                x[i] = sum;
            }
            // Back substitution: U·x = y.
            for i in (0..n).rev() {
                let mut sum = x[i];
                for j in (i + 1)..n {
                    sum = sum - self.lu.get(i, j) * x[j];
                }
                x[i] = sum / self.lu.get(i, i);
            }
        }
        Matrix::from_parts(data, Layout::column_major(n, m))
    }

    /// Solve `X·A = B`: the column dual. With `A = Pᵗ·L·U`, solve
    /// `Y·U = B` sweeping columns forward, `W·L = Y` sweeping backward,
    /// then scatter W's columns through the stored permutation.
    fn right_solve(&self, b: &Matrix<T>) -> Matrix<T> {
        let n = self.lu.nrows();
        check_right_shape(n, b);
        let m = b.nrows();

        // w[j*m..] holds column j during both sweeps.
        let mut w = vec![T::zero(); m * n];
        for j in 0..n {
            let diag = self.lu.get(j, j);
            for i in 0..m {
                let mut sum = b.get(i, j);
                for k in 0..j {
                    sum = sum - w[k * m + i] * self.lu.get(k, j);
                }
                w[j * m + i] = sum / diag;
            }
        }
        for j in (0..n).rev() {
            for k in (j + 1)..n {
                let l_kj = self.lu.get(k, j);
                if l_kj == T::zero() {
                    continue;
                }
                for i in 0..m {
                    w[j * m + i] = w[j * m + i] - w[k * m + i] * l_kj;
                }
            }
        }

        // X = W·P: column k of W lands in column perm[k].
        let mut data = vec![T::zero(); m * n];
        for k in 0..n {
            let dst = self.perm.apply(k);
            data[dst * m..(dst + 1) * m].copy_from_slice(&w[k * m..(k + 1) * m]);
        }
        Matrix::from_parts(data, Layout::column_major(m, n))
    }

    fn det(&self) -> T {
        self.det
    }
}
