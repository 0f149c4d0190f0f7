//! Element-wise arithmetic.
//!
//! Every operation checks the specialized shapes before falling back to
//! the dense element-wise path, so algebraically closed combinations
//! stay closed: zero + x = x, diagonal + diagonal = diagonal,
//! constant + constant = constant, symmetric + symmetric = symmetric.

use alloc::vec::Vec;
use core::ops::{Add, Mul, Neg, Sub};

use crate::traits::Scalar;

use super::{Matrix, Repr};

/// The diagonal of a shape that is structurally diagonal, if any.
fn diag_of<T: Scalar>(m: &Matrix<T>) -> Option<Vec<T>> {
    match &m.repr {
        Repr::Diagonal { diag } => Some(diag.clone()),
        Repr::Identity { n } => Some(alloc::vec![T::one(); *n]),
        _ => None,
    }
}

fn assert_same_shape<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>, op: &str) {
    assert_eq!(
        (a.nrows(), a.ncols()),
        (b.nrows(), b.ncols()),
        "dimension mismatch: {}x{} {} {}x{}",
        a.nrows(),
        a.ncols(),
        op,
        b.nrows(),
        b.ncols(),
    );
}

impl<T: Scalar> Matrix<T> {
    /// Element-wise sum.
    ///
    /// ```
    /// use lamina::Matrix;
    /// let d = Matrix::diagonal(vec![1.0, 2.0]);
    /// let id = Matrix::identity(2);
    /// let s = d.add(&id);
    /// assert_eq!(s.get(0, 0), 2.0);
    /// assert_eq!(s.get(0, 1), 0.0);
    /// ```
    pub fn add(&self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_same_shape(self, rhs, "+");
        match (&self.repr, &rhs.repr) {
            (Repr::Zero { .. }, _) => rhs.clone(),
            (_, Repr::Zero { .. }) => self.clone(),
            (Repr::Constant { rows, cols, value: a }, Repr::Constant { value: b, .. }) => {
                Matrix::constant(*rows, *cols, *a + *b)
            }
            _ => {
                if let (Some(a), Some(b)) = (diag_of(self), diag_of(rhs)) {
                    return Matrix::diagonal(a.iter().zip(b.iter()).map(|(&x, &y)| x + y).collect());
                }
                if self.is_symmetric() && rhs.is_symmetric() {
                    return Matrix::symmetric_from_fn(self.nrows(), |i, j| self.get(i, j) + rhs.get(i, j));
                }
                Matrix::from_fn(self.nrows(), self.ncols(), |i, j| self.get(i, j) + rhs.get(i, j))
            }
        }
    }

    /// Element-wise difference.
    pub fn sub(&self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_same_shape(self, rhs, "-");
        match (&self.repr, &rhs.repr) {
            (_, Repr::Zero { .. }) => self.clone(),
            (Repr::Zero { .. }, _) => rhs.neg(),
            (Repr::Constant { rows, cols, value: a }, Repr::Constant { value: b, .. }) => {
                Matrix::constant(*rows, *cols, *a - *b)
            }
            _ => {
                if let (Some(a), Some(b)) = (diag_of(self), diag_of(rhs)) {
                    return Matrix::diagonal(a.iter().zip(b.iter()).map(|(&x, &y)| x - y).collect());
                }
                if self.is_symmetric() && rhs.is_symmetric() {
                    return Matrix::symmetric_from_fn(self.nrows(), |i, j| self.get(i, j) - rhs.get(i, j));
                }
                Matrix::from_fn(self.nrows(), self.ncols(), |i, j| self.get(i, j) - rhs.get(i, j))
            }
        }
    }

    /// Multiply every element by a scalar, preserving the shape's
    /// specialized form where one exists.
    pub fn scale(&self, factor: T) -> Matrix<T> {
        match &self.repr {
            Repr::Zero { .. } => self.clone(),
            Repr::Constant { rows, cols, value } => Matrix::constant(*rows, *cols, *value * factor),
            Repr::Diagonal { diag } => Matrix::diagonal(diag.iter().map(|&d| d * factor).collect()),
            Repr::Identity { n } => Matrix::diagonal(alloc::vec![factor; *n]),
            Repr::Dense { data, layout } => {
                let data = data.iter().map(|&x| x * factor).collect();
                Matrix { repr: Repr::Dense { data, layout: *layout } }
            }
            Repr::SymmetricPacked { data, layout } => {
                let data = data.iter().map(|&x| x * factor).collect();
                Matrix { repr: Repr::SymmetricPacked { data, layout: *layout } }
            }
            Repr::Permutation { .. } => {
                Matrix::from_fn(self.nrows(), self.ncols(), |i, j| self.get(i, j) * factor)
            }
        }
    }

    /// `self + rhs·factor`, with the same fast paths as `add`/`scale`.
    pub fn scale_add(&self, rhs: &Matrix<T>, factor: T) -> Matrix<T> {
        self.add(&rhs.scale(factor))
    }

    /// Linear interpolation: `self·(1 - t) + rhs·t`.
    pub fn interpolate(&self, rhs: &Matrix<T>, t: T) -> Matrix<T> {
        self.scale(T::one() - t).add(&rhs.scale(t))
    }

    /// Element-wise negation.
    pub fn neg(&self) -> Matrix<T> {
        self.scale(T::zero() - T::one())
    }

    /// Apply `f` to every element.
    ///
    /// Array-backed shapes map their storage; zero and constant shapes
    /// stay constant; a diagonal stays diagonal when `f` fixes zero.
    pub fn map(&self, f: impl Fn(T) -> T) -> Matrix<T> {
        match &self.repr {
            Repr::Dense { data, layout } => {
                let data = data.iter().map(|&x| f(x)).collect();
                Matrix { repr: Repr::Dense { data, layout: *layout } }
            }
            Repr::SymmetricPacked { data, layout } => {
                let data = data.iter().map(|&x| f(x)).collect();
                Matrix { repr: Repr::SymmetricPacked { data, layout: *layout } }
            }
            Repr::Zero { rows, cols } => Matrix::constant(*rows, *cols, f(T::zero())),
            Repr::Constant { rows, cols, value } => Matrix::constant(*rows, *cols, f(*value)),
            Repr::Diagonal { diag } if f(T::zero()) == T::zero() => {
                Matrix::diagonal(diag.iter().map(|&d| f(d)).collect())
            }
            _ => Matrix::from_fn(self.nrows(), self.ncols(), |i, j| f(self.get(i, j))),
        }
    }

    /// Sum of every element.
    pub fn sum(&self) -> T {
        if let Repr::Zero { .. } = &self.repr {
            return T::zero();
        }
        let mut s = T::zero();
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                s = s + self.get(i, j);
            }
        }
        s
    }

    /// Sum of the diagonal. Panics unless the matrix is square.
    pub fn trace(&self) -> T {
        assert!(
            self.is_square(),
            "trace requires a square matrix, got {}x{}",
            self.nrows(),
            self.ncols(),
        );
        match &self.repr {
            Repr::Zero { .. } => T::zero(),
            Repr::Diagonal { diag } => diag.iter().fold(T::zero(), |acc, &d| acc + d),
            _ => (0..self.nrows()).fold(T::zero(), |acc, i| acc + self.get(i, i)),
        }
    }
}

// ── Operator sugar ──────────────────────────────────────────────────

impl<T: Scalar> Add for Matrix<T> {
    type Output = Matrix<T>;
    fn add(self, rhs: Matrix<T>) -> Matrix<T> {
        Matrix::add(&self, &rhs)
    }
}

impl<T: Scalar> Add<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;
    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix::add(&self, rhs)
    }
}

impl<T: Scalar> Add<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;
    fn add(self, rhs: Matrix<T>) -> Matrix<T> {
        Matrix::add(self, &rhs)
    }
}

impl<T: Scalar> Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;
    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix::add(self, rhs)
    }
}

impl<T: Scalar> Sub for Matrix<T> {
    type Output = Matrix<T>;
    fn sub(self, rhs: Matrix<T>) -> Matrix<T> {
        Matrix::sub(&self, &rhs)
    }
}

impl<T: Scalar> Sub<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;
    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix::sub(&self, rhs)
    }
}

impl<T: Scalar> Sub<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;
    fn sub(self, rhs: Matrix<T>) -> Matrix<T> {
        Matrix::sub(self, &rhs)
    }
}

impl<T: Scalar> Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;
    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix::sub(self, rhs)
    }
}

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Matrix<T>;
    fn neg(self) -> Matrix<T> {
        Matrix::neg(&self)
    }
}

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;
    fn neg(self) -> Matrix<T> {
        Matrix::neg(self)
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        Matrix::multiply(&self, &rhs)
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix::multiply(&self, rhs)
    }
}

impl<T: Scalar> Mul<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        Matrix::multiply(self, &rhs)
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix::multiply(self, rhs)
    }
}

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: T) -> Matrix<T> {
        self.scale(rhs)
    }
}

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: T) -> Matrix<T> {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn zero_add_is_identity_op() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let z = Matrix::zero(2, 2);
        let s = Matrix::add(&a, &z);
        assert!(s.eq_within(&a, 0.0));
        // And the closed form survives on the other side.
        let s = Matrix::add(&z, &a);
        assert!(s.eq_within(&a, 0.0));
    }

    #[test]
    fn diagonal_addition_stays_diagonal() {
        let a = Matrix::diagonal(vec![1.0, 2.0]);
        let b = Matrix::identity(2);
        let s = a.add(&b);
        assert!(matches!(s.repr, Repr::Diagonal { .. }));
        assert_eq!(s.get(0, 0), 2.0);
        assert_eq!(s.get(1, 1), 3.0);
    }

    #[test]
    fn constant_addition_stays_constant() {
        let s = Matrix::constant(2, 3, 1.5).add(&Matrix::constant(2, 3, 2.5));
        assert!(matches!(s.repr, Repr::Constant { .. }));
        assert_eq!(s.get(1, 2), 4.0);
    }

    #[test]
    fn symmetric_addition_stays_symmetric() {
        let a = Matrix::symmetric_from_fn(3, |i, j| (i + j) as f64);
        let b = Matrix::diagonal(vec![1.0, 1.0, 1.0]);
        let s = a.add(&b);
        assert!(matches!(s.repr, Repr::SymmetricPacked { .. }));
        assert_eq!(s.get(0, 0), 1.0);
        assert_eq!(s.get(2, 1), 3.0);
    }

    #[test]
    fn sub_with_zero_left() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let d = Matrix::zero(2, 2).sub(&a);
        assert_eq!(d.get(1, 1), -4.0);
    }

    #[test]
    fn scale_preserves_specialized_forms() {
        assert!(matches!(Matrix::<f64>::zero(2, 2).scale(3.0).repr, Repr::Zero { .. }));
        assert!(matches!(Matrix::constant(2, 2, 2.0).scale(3.0).repr, Repr::Constant { .. }));
        assert!(matches!(Matrix::<f64>::identity(2).scale(3.0).repr, Repr::Diagonal { .. }));
        let s = Matrix::symmetric_from_fn(2, |i, j| (i + j) as f64).scale(2.0);
        assert!(matches!(s.repr, Repr::SymmetricPacked { .. }));
        assert_eq!(s.get(1, 0), 2.0);
    }

    #[test]
    fn scale_add_and_interpolate() {
        let a = Matrix::from_rows(1, 2, &[1.0, 2.0]);
        let b = Matrix::from_rows(1, 2, &[3.0, 6.0]);
        let s = a.scale_add(&b, 2.0);
        assert_eq!(s.get(0, 0), 7.0);
        assert_eq!(s.get(0, 1), 14.0);

        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.get(0, 0), 2.0);
        assert_eq!(mid.get(0, 1), 4.0);
    }

    #[test]
    fn operator_sugar() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::from_rows(2, 2, &[4.0, 3.0, 2.0, 1.0]);
        let s = &a + &b;
        assert_eq!(s.get(0, 0), 5.0);
        let d = &a - &b;
        assert_eq!(d.get(1, 1), 3.0);
        let n = -&a;
        assert_eq!(n.get(0, 1), -2.0);
        let k = &a * 2.0;
        assert_eq!(k.get(1, 0), 6.0);
    }

    #[test]
    fn map_preserves_storage_forms() {
        let s = Matrix::symmetric_from_fn(2, |i, j| (i + j) as f64).map(|x| x * x);
        assert!(matches!(s.repr, Repr::SymmetricPacked { .. }));
        assert_eq!(s.get(1, 1), 4.0);

        let d = Matrix::diagonal(vec![2.0, 3.0]).map(|x| x * x);
        assert!(matches!(d.repr, Repr::Diagonal { .. }));
        assert_eq!(d.get(1, 1), 9.0);

        // A map that moves zero cannot stay diagonal.
        let shifted = Matrix::diagonal(vec![2.0, 3.0]).map(|x| x + 1.0);
        assert_eq!(shifted.get(0, 1), 1.0);

        let z = Matrix::<f64>::zero(2, 2).map(|x| x + 5.0);
        assert!(matches!(z.repr, Repr::Constant { .. }));
        assert_eq!(z.get(1, 0), 5.0);
    }

    #[test]
    fn sum_and_trace() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.sum(), 10.0);
        assert_eq!(a.trace(), 5.0);
        assert_eq!(Matrix::<f64>::identity(4).trace(), 4.0);
        assert_eq!(Matrix::<f64>::zero(3, 5).sum(), 0.0);
        assert_eq!(Matrix::diagonal(vec![1.0, 2.0, 3.0]).trace(), 6.0);
    }

    #[test]
    #[should_panic(expected = "trace requires a square matrix")]
    fn trace_needs_square() {
        let _ = Matrix::<f64>::zero(2, 3).trace();
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn add_shape_mismatch_panics() {
        let _ = Matrix::<f64>::zero(2, 2).add(&Matrix::zero(2, 3));
    }
}
