//! The logical matrix: a tagged variant over array-backed and
//! closed-form shapes.
//!
//! Array-backed shapes (dense, symmetric packed) own a flat `Vec<T>` plus
//! the [`Layout`](crate::Layout) that maps indices into it. Closed-form
//! shapes (zero, constant, diagonal, identity, permutation) carry only
//! the fields they need and never allocate `O(n²)` storage; their
//! arithmetic and multiplication override the dense paths in
//! [`ops`](self) and [`mul`](self).

mod mul;
mod ops;
mod view;

pub use view::MatrixView;

use alloc::vec::Vec;

use crate::layout::{Layout, PackedLayout};
use crate::perm::Perm;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Internal representation. Each variant carries only what it needs.
#[derive(Debug, Clone)]
pub(crate) enum Repr<T> {
    /// Strided dense storage.
    Dense { data: Vec<T>, layout: Layout },
    /// Packed triangle, mirrored across the diagonal.
    SymmetricPacked { data: Vec<T>, layout: PackedLayout },
    /// Square matrix with the given diagonal, zero elsewhere.
    Diagonal { diag: Vec<T> },
    /// The n×n identity.
    Identity { n: usize },
    /// All elements zero.
    Zero { rows: usize, cols: usize },
    /// All elements equal.
    Constant { rows: usize, cols: usize, value: T },
    /// Row-permutation matrix: `P·B` reorders the rows of `B`.
    Permutation { n: usize, perm: Perm },
}

/// A 2D numeric entity, dense or closed-form.
///
/// Element access is pure and total over `[0, rows) × [0, cols)`. Shape
/// transforms ([`transpose`](Matrix::transpose),
/// [`sub_matrix`](Matrix::sub_matrix), [`permute_rows`](Matrix::permute_rows))
/// return non-owning [`MatrixView`]s; factorization dispatches on the
/// variant via [`factorize`](Matrix::factorize).
///
/// # Example
///
/// ```
/// use lamina::Matrix;
///
/// let a = Matrix::from_nested(&[
///     &[2.0_f64, 1.0, -1.0],
///     &[-3.0, -1.0, 2.0],
///     &[-2.0, 1.0, 2.0],
/// ]);
/// let b = Matrix::from_nested(&[&[8.0], &[-11.0], &[-3.0]]);
///
/// let x = a.factorize(1e-12).unwrap().left_solve(&b);
/// assert!((x.get(0, 0) - 2.0).abs() < 1e-12);
/// assert!((x.get(1, 0) - 3.0).abs() < 1e-12);
/// assert!((x.get(2, 0) + 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix<T> {
    pub(crate) repr: Repr<T>,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Dense matrix over a raw backing array and an explicit layout.
    ///
    /// Panics if the array is shorter than the layout requires.
    ///
    /// ```
    /// use lamina::{Layout, Matrix};
    /// let m = Matrix::from_parts(vec![1.0, 2.0, 3.0, 4.0], Layout::row_major(2, 2));
    /// assert_eq!(m.get(0, 1), 2.0);
    /// assert_eq!(m.get(1, 0), 3.0);
    /// ```
    pub fn from_parts(data: Vec<T>, layout: Layout) -> Self {
        assert!(
            data.len() >= layout.required_len(),
            "backing array of length {} too short for layout requiring {}",
            data.len(),
            layout.required_len(),
        );
        Self { repr: Repr::Dense { data, layout } }
    }

    /// Dense matrix from a flat slice in row-major order.
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self::from_parts(row_major.to_vec(), Layout::row_major(nrows, ncols))
    }

    /// Dense matrix from nested rows.
    ///
    /// Panics if the rows are ragged.
    ///
    /// ```
    /// use lamina::Matrix;
    /// let m = Matrix::from_nested(&[&[1.0, 2.0][..], &[3.0, 4.0]]);
    /// assert_eq!(m.get(1, 1), 4.0);
    /// ```
    pub fn from_nested(rows: &[&[T]]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), ncols, "row {} has length {}, expected {}", i, row.len(), ncols);
            data.extend_from_slice(row);
        }
        Self::from_parts(data, Layout::row_major(nrows, ncols))
    }

    /// Dense matrix built by calling `f(row, col)` for each element,
    /// stored in the kernels' preferred order.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let layout = Layout::optimal(nrows, ncols);
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self { repr: Repr::Dense { data, layout } }
    }

    /// The all-zero matrix. Closed form; allocates nothing.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self { repr: Repr::Zero { rows, cols } }
    }

    /// Matrix with every element equal to `value`. Closed form.
    pub fn constant(rows: usize, cols: usize, value: T) -> Self {
        Self { repr: Repr::Constant { rows, cols, value } }
    }

    /// The n×n identity. Closed form.
    pub fn identity(n: usize) -> Self {
        Self { repr: Repr::Identity { n } }
    }

    /// Square matrix with the given diagonal. Stores only the diagonal.
    pub fn diagonal(diag: Vec<T>) -> Self {
        Self { repr: Repr::Diagonal { diag } }
    }

    /// Row-permutation matrix: multiplying `P·B` yields
    /// `B'[i] = B[perm[i]]`.
    ///
    /// Panics if the permutation length disagrees with `n`.
    pub fn permutation(n: usize, perm: Perm) -> Self {
        if let Some(len) = perm.len() {
            assert_eq!(len, n, "permutation length {} does not match matrix size {}", len, n);
        }
        Self { repr: Repr::Permutation { n, perm } }
    }

    /// Symmetric matrix built by calling `f(row, col)` over the lower
    /// triangle, stored packed.
    pub fn symmetric_from_fn(n: usize, f: impl Fn(usize, usize) -> T) -> Self {
        Self::symmetric_from_fn_padded(n, 0, f)
    }

    /// As [`symmetric_from_fn`](Matrix::symmetric_from_fn) with explicit
    /// per-row padding in the packed storage.
    pub fn symmetric_from_fn_padded(n: usize, padding: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let layout = PackedLayout::with_padding(n, padding);
        let mut data = alloc::vec![T::zero(); layout.required_len()];
        for i in 0..n {
            for j in 0..=i {
                data[layout.index(i, j)] = f(i, j);
            }
        }
        Self { repr: Repr::SymmetricPacked { data, layout } }
    }

    /// Symmetric matrix from a full dense row-major slice.
    ///
    /// Panics if the slice is not `n·n` long or not symmetric.
    pub fn symmetric_from_rows(n: usize, row_major: &[T]) -> Self {
        assert_eq!(row_major.len(), n * n, "slice length {} does not match {}x{} matrix", row_major.len(), n, n);
        for i in 0..n {
            for j in 0..i {
                assert!(
                    row_major[i * n + j] == row_major[j * n + i],
                    "matrix is not symmetric at ({}, {})",
                    i,
                    j,
                );
            }
        }
        Self::symmetric_from_fn(n, |i, j| row_major[i * n + j])
    }
}

// ── Shape and element access ────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Number of rows.
    pub fn nrows(&self) -> usize {
        match &self.repr {
            Repr::Dense { layout, .. } => layout.rows(),
            Repr::SymmetricPacked { layout, .. } => layout.size(),
            Repr::Diagonal { diag } => diag.len(),
            Repr::Identity { n } | Repr::Permutation { n, .. } => *n,
            Repr::Zero { rows, .. } | Repr::Constant { rows, .. } => *rows,
        }
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        match &self.repr {
            Repr::Dense { layout, .. } => layout.cols(),
            Repr::SymmetricPacked { layout, .. } => layout.size(),
            Repr::Diagonal { diag } => diag.len(),
            Repr::Identity { n } | Repr::Permutation { n, .. } => *n,
            Repr::Zero { cols, .. } | Repr::Constant { cols, .. } => *cols,
        }
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// Whether the shape guarantees `A == Aᵀ` structurally.
    pub fn is_symmetric(&self) -> bool {
        match &self.repr {
            Repr::SymmetricPacked { .. } | Repr::Diagonal { .. } | Repr::Identity { .. } => true,
            Repr::Zero { rows, cols } | Repr::Constant { rows, cols, .. } => rows == cols,
            Repr::Dense { .. } | Repr::Permutation { .. } => false,
        }
    }

    /// Bounds-checked element read.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.nrows() && col < self.ncols(),
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.nrows(),
            self.ncols(),
        );
        match &self.repr {
            Repr::Dense { data, layout } => data[layout.index(row, col)],
            Repr::SymmetricPacked { data, layout } => data[layout.index(row, col)],
            Repr::Diagonal { diag } => {
                if row == col {
                    diag[row]
                } else {
                    T::zero()
                }
            }
            Repr::Identity { .. } => {
                if row == col {
                    T::one()
                } else {
                    T::zero()
                }
            }
            Repr::Zero { .. } => T::zero(),
            Repr::Constant { value, .. } => *value,
            Repr::Permutation { perm, .. } => {
                if col == perm.apply(row) {
                    T::one()
                } else {
                    T::zero()
                }
            }
        }
    }

    /// Bounds-checked element write through the backing storage.
    ///
    /// Writing to a symmetric matrix updates the mirrored element too,
    /// since both share a packed position. Panics on closed-form shapes,
    /// which have no storage to write.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.nrows() && col < self.ncols(),
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.nrows(),
            self.ncols(),
        );
        match &mut self.repr {
            Repr::Dense { data, layout } => data[layout.index(row, col)] = value,
            Repr::SymmetricPacked { data, layout } => data[layout.index(row, col)] = value,
            other => panic!("cannot write to a {} matrix", repr_name(other)),
        }
    }

    /// Swap two rows in place. Only dense matrices support this: a
    /// symmetric swap would have to move the matching columns too.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        assert!(
            a < self.nrows() && b < self.nrows(),
            "rows ({}, {}) out of range for {}x{} matrix",
            a,
            b,
            self.nrows(),
            self.ncols(),
        );
        if a == b {
            return;
        }
        match &mut self.repr {
            Repr::Dense { data, layout } => {
                for j in 0..layout.cols() {
                    data.swap(layout.index(a, j), layout.index(b, j));
                }
            }
            other => panic!("cannot swap rows of a {} matrix", repr_name(other)),
        }
    }

    /// Materialize any shape as a dense matrix in the kernels' preferred
    /// storage order.
    pub fn to_dense(&self) -> Matrix<T> {
        match &self.repr {
            Repr::Dense { .. } => self.clone(),
            _ => Matrix::from_fn(self.nrows(), self.ncols(), |i, j| self.get(i, j)),
        }
    }
}

impl<T: crate::FloatScalar> Matrix<T> {
    /// Element-wise comparison within a tolerance. Shapes must match
    /// exactly; representations need not.
    pub fn eq_within(&self, other: &Matrix<T>, eps: T) -> bool {
        if self.nrows() != other.nrows() || self.ncols() != other.ncols() {
            return false;
        }
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                if (self.get(i, j) - other.get(i, j)).abs() > eps {
                    return false;
                }
            }
        }
        true
    }
}

pub(crate) fn repr_name<T>(repr: &Repr<T>) -> &'static str {
    match repr {
        Repr::Dense { .. } => "dense",
        Repr::SymmetricPacked { .. } => "symmetric packed",
        Repr::Diagonal { .. } => "diagonal",
        Repr::Identity { .. } => "identity",
        Repr::Zero { .. } => "zero",
        Repr::Constant { .. } => "constant",
        Repr::Permutation { .. } => "permutation",
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T: Scalar> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        Matrix::nrows(self)
    }

    #[inline]
    fn ncols(&self) -> usize {
        Matrix::ncols(self)
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        Matrix::get(self, row, col)
    }
}

impl<T: Scalar> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn set(&mut self, row: usize, col: usize, value: T) {
        Matrix::set(self, row, col, value)
    }
}
