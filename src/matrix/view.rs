//! Lazy views: transpose, sub-range, and permutation without copying.
//!
//! A [`MatrixView`] holds a reference to its delegate matrix plus a
//! per-axis transform (a narrowing offset or an index map) and a
//! transposition flag. Further transforms compose into the same view
//! rather than nesting, so element access is always one indirection away
//! from the delegate.

use alloc::vec::Vec;

use crate::perm::Perm;
use crate::traits::{MatrixRef, Scalar};

use super::{Matrix, Repr};

/// One view axis: maps a view index into delegate coordinates.
///
/// Plain narrowing keeps the cheap `offset + i` form; a permutation (or a
/// narrowing of one) materializes an index map.
#[derive(Debug, Clone)]
struct Axis {
    len: usize,
    offset: usize,
    map: Option<Vec<usize>>,
}

impl Axis {
    fn full(len: usize) -> Self {
        Axis { len, offset: 0, map: None }
    }

    #[inline]
    fn index(&self, i: usize) -> usize {
        match &self.map {
            Some(map) => map[i],
            None => self.offset + i,
        }
    }

    fn narrow(self, start: usize, len: usize) -> Self {
        assert!(
            start + len <= self.len,
            "sub-range {}..{} exceeds axis of length {}",
            start,
            start + len,
            self.len,
        );
        match self.map {
            Some(map) => Axis { len, offset: 0, map: Some(map[start..start + len].to_vec()) },
            None => Axis { len, offset: self.offset + start, map: None },
        }
    }

    fn permute(self, perm: &Perm) -> Self {
        if perm.is_identity() {
            return self;
        }
        if let Some(n) = perm.len() {
            assert_eq!(n, self.len, "permutation length {} does not match axis length {}", n, self.len);
        }
        let map: Vec<usize> = (0..self.len).map(|i| self.index(perm.apply(i))).collect();
        // A composition that lands back on plain narrowing drops the map.
        if map.windows(2).all(|w| w[1] == w[0] + 1) {
            let offset = map.first().copied().unwrap_or(0);
            return Axis { len: self.len, offset, map: None };
        }
        Axis { len: self.len, offset: 0, map: Some(map) }
    }

    fn same_as(&self, other: &Axis) -> bool {
        self.len == other.len && (0..self.len).all(|i| self.index(i) == other.index(i))
    }

    fn is_full(&self, delegate_len: usize) -> bool {
        self.map.is_none() && self.offset == 0 && self.len == delegate_len
    }
}

/// A read-only window onto a delegate matrix under a composed geometric
/// transform. Created by [`Matrix::transpose`], [`Matrix::sub_matrix`],
/// [`Matrix::permute_rows`], and [`Matrix::permute_cols`].
///
/// # Example
///
/// ```
/// use lamina::{Matrix, MatrixRef};
///
/// let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// let t = a.transpose();
/// assert_eq!((t.nrows(), t.ncols()), (3, 2));
/// assert_eq!(t.get(2, 1), 6.0);
///
/// // Transforms compose instead of nesting.
/// let s = a.transpose().sub_view(1, 0, 2, 2);
/// assert_eq!(s.get(0, 0), 2.0);
/// assert_eq!(s.get(1, 1), 6.0);
/// ```
#[derive(Debug, Clone)]
pub struct MatrixView<'a, T> {
    delegate: &'a Matrix<T>,
    rows: Axis,
    cols: Axis,
    transposed: bool,
}

impl<'a, T: Scalar> MatrixView<'a, T> {
    fn full(delegate: &'a Matrix<T>) -> Self {
        MatrixView {
            delegate,
            rows: Axis::full(delegate.nrows()),
            cols: Axis::full(delegate.ncols()),
            transposed: false,
        }
    }

    /// Number of rows of the view.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows.len
    }

    /// Number of columns of the view.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols.len
    }

    /// Bounds-checked element read through the delegate.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.rows.len && col < self.cols.len,
            "index ({}, {}) out of range for {}x{} view",
            row,
            col,
            self.rows.len,
            self.cols.len,
        );
        let r = self.rows.index(row);
        let c = self.cols.index(col);
        if self.transposed {
            self.delegate.get(c, r)
        } else {
            self.delegate.get(r, c)
        }
    }

    /// Transposed view over the same delegate.
    pub fn transpose(self) -> Self {
        MatrixView {
            delegate: self.delegate,
            rows: self.cols,
            cols: self.rows,
            transposed: !self.transposed,
        }
    }

    /// Rectangular sub-range of this view. Panics unless it fits.
    pub fn sub_view(self, row: usize, col: usize, rows: usize, cols: usize) -> Self {
        MatrixView {
            delegate: self.delegate,
            rows: self.rows.narrow(row, rows),
            cols: self.cols.narrow(col, cols),
            transposed: self.transposed,
        }
    }

    /// Reorder the view's rows: row `i` of the result reads row
    /// `perm[i]` of this view. Composes with any existing transform.
    pub fn permute_rows(self, perm: &Perm) -> Self {
        MatrixView {
            delegate: self.delegate,
            rows: self.rows.permute(perm),
            cols: self.cols,
            transposed: self.transposed,
        }
    }

    /// Reorder the view's columns.
    pub fn permute_cols(self, perm: &Perm) -> Self {
        MatrixView {
            delegate: self.delegate,
            rows: self.rows,
            cols: self.cols.permute(perm),
            transposed: self.transposed,
        }
    }

    /// Whether the viewed values form a symmetric matrix by
    /// construction: a symmetric delegate seen through identical row and
    /// column transforms (a diagonal block, a symmetric permutation).
    pub fn is_symmetric(&self) -> bool {
        self.delegate.is_symmetric() && self.rows.same_as(&self.cols)
    }

    /// Materialize the view.
    ///
    /// An untransformed view clones the delegate, keeping its
    /// specialized form. A symmetric view materializes packed; a
    /// transposed permutation matrix inverts in closed form. Everything
    /// else becomes dense.
    pub fn to_matrix(&self) -> Matrix<T> {
        let full = self.rows.is_full(if self.transposed { self.delegate.ncols() } else { self.delegate.nrows() })
            && self.cols.is_full(if self.transposed { self.delegate.nrows() } else { self.delegate.ncols() });
        if full && (!self.transposed || self.delegate.is_symmetric()) {
            return self.delegate.clone();
        }
        if full && self.transposed {
            if let Repr::Permutation { n, perm } = &self.delegate.repr {
                return Matrix::permutation(*n, perm.invert());
            }
        }
        if self.is_symmetric() {
            return Matrix::symmetric_from_fn(self.nrows(), |i, j| self.get(i, j));
        }
        Matrix::from_fn(self.nrows(), self.ncols(), |i, j| self.get(i, j))
    }
}

impl<T: Scalar> MatrixRef<T> for MatrixView<'_, T> {
    #[inline]
    fn nrows(&self) -> usize {
        MatrixView::nrows(self)
    }

    #[inline]
    fn ncols(&self) -> usize {
        MatrixView::ncols(self)
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        MatrixView::get(self, row, col)
    }
}

// ── Shape transforms on Matrix ──────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Transposed view. For shapes that equal their own transpose
    /// (symmetric packed, diagonal, identity, square zero/constant) the
    /// view carries no transform at all, so materializing it preserves
    /// the specialized form.
    pub fn transpose(&self) -> MatrixView<'_, T> {
        let view = MatrixView::full(self);
        if self.is_symmetric() {
            view
        } else {
            view.transpose()
        }
    }

    /// View of a rectangle of this matrix, sharing its storage.
    ///
    /// A diagonal block of a symmetric matrix re-asserts symmetry:
    /// the returned view reports [`MatrixView::is_symmetric`].
    pub fn sub_matrix(&self, row: usize, col: usize, rows: usize, cols: usize) -> MatrixView<'_, T> {
        MatrixView::full(self).sub_view(row, col, rows, cols)
    }

    /// View with rows reordered: row `i` reads row `perm[i]` of `self`.
    pub fn permute_rows(&self, perm: &Perm) -> MatrixView<'_, T> {
        MatrixView::full(self).permute_rows(perm)
    }

    /// View with columns reordered.
    pub fn permute_cols(&self, perm: &Perm) -> MatrixView<'_, T> {
        MatrixView::full(self).permute_cols(perm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn transpose_view_reads_through() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = a.transpose();
        assert_eq!((t.nrows(), t.ncols()), (3, 2));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t.get(j, i), a.get(i, j));
            }
        }
    }

    #[test]
    fn transpose_twice_is_original() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let tt = a.transpose().transpose();
        assert!(tt.to_matrix().eq_within(&a, 0.0));
    }

    #[test]
    fn transpose_of_symmetric_is_untransformed() {
        let s = Matrix::symmetric_from_fn(3, |i, j| (i * 3 + j) as f64);
        let t = s.transpose();
        assert!(t.is_symmetric());
        let m = t.to_matrix();
        assert!(matches!(m.repr, Repr::SymmetricPacked { .. }));
        assert!(m.eq_within(&s, 0.0));
    }

    #[test]
    fn transposed_permutation_inverts() {
        let perm = Perm::from_vec(vec![2, 0, 1]);
        let p = Matrix::<f64>::permutation(3, perm.clone());
        let t = p.transpose().to_matrix();
        match &t.repr {
            Repr::Permutation { perm: q, .. } => assert_eq!(*q, perm.invert()),
            other => panic!("expected permutation form, got {:?}", other),
        }
        // Pᵀ == P⁻¹ for a permutation matrix.
        assert!(p.multiply(&t).eq_within(&Matrix::identity(3), 0.0));
    }

    #[test]
    fn sub_matrix_shares_values() {
        let a = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let s = a.sub_matrix(1, 1, 2, 2);
        assert_eq!(s.get(0, 0), 5.0);
        assert_eq!(s.get(1, 1), 9.0);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn sub_matrix_bounds_checked() {
        let a = Matrix::<f64>::zero(3, 3);
        let _ = a.sub_matrix(2, 0, 2, 2);
    }

    #[test]
    fn diagonal_block_of_symmetric_stays_symmetric() {
        let s = Matrix::symmetric_from_fn(4, |i, j| (i + j) as f64);
        let block = s.sub_matrix(1, 1, 2, 2);
        assert!(block.is_symmetric());
        let m = block.to_matrix();
        assert!(matches!(m.repr, Repr::SymmetricPacked { .. }));
        assert_eq!(m.get(0, 1), 3.0);
        // An off-diagonal block does not.
        assert!(!s.sub_matrix(0, 1, 2, 2).is_symmetric());
    }

    #[test]
    fn permuted_view_reorders() {
        let a = Matrix::from_rows(3, 1, &[10.0, 20.0, 30.0]);
        let v = a.permute_rows(&Perm::from_vec(vec![2, 0, 1]));
        assert_eq!(v.get(0, 0), 30.0);
        assert_eq!(v.get(1, 0), 10.0);
        assert_eq!(v.get(2, 0), 20.0);
    }

    #[test]
    fn permutations_compose_in_one_view() {
        let a = Matrix::from_rows(3, 1, &[10.0, 20.0, 30.0]);
        let p = Perm::from_vec(vec![2, 0, 1]);
        let composed = a.permute_rows(&p).permute_rows(&p.invert());
        // The two reorderings cancel inside a single view.
        for i in 0..3 {
            assert_eq!(composed.get(i, 0), a.get(i, 0));
        }
    }

    #[test]
    fn sub_of_permuted_view() {
        let a = Matrix::from_rows(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let v = a.permute_rows(&Perm::from_vec(vec![3, 2, 1, 0])).sub_view(1, 0, 2, 1);
        assert_eq!(v.get(0, 0), 3.0);
        assert_eq!(v.get(1, 0), 2.0);
    }

    #[test]
    fn transposed_sub_view() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let s = a.transpose().sub_view(1, 0, 2, 2);
        assert_eq!(s.get(0, 0), 2.0);
        assert_eq!(s.get(0, 1), 5.0);
        assert_eq!(s.get(1, 0), 3.0);
        assert_eq!(s.get(1, 1), 6.0);
    }

    #[test]
    fn untransformed_view_clones_delegate_form() {
        let d = Matrix::diagonal(vec![1.0, 2.0]);
        let m = d.transpose().to_matrix();
        assert!(matches!(m.repr, Repr::Diagonal { .. }));
    }

    #[test]
    fn view_of_closed_form_reads_rule() {
        let id = Matrix::<f64>::identity(3);
        let v = id.sub_matrix(0, 1, 2, 2);
        assert_eq!(v.get(0, 0), 0.0);
        assert_eq!(v.get(1, 0), 1.0);
    }
}
