//! Index geometry: the pure mapping from `(row, col)` to a position in
//! flat backing storage.
//!
//! A [`Layout`] is an immutable value. Derived layouts (transpose,
//! sub-range, single row/column) are computed from a parent layout and
//! never touch the backing array. [`PackedLayout`] is the triangular
//! analogue used by symmetric storage and the LDLᵗ factorization.

/// Strided dense layout: `position = offset + row·row_stride + col·col_stride`.
///
/// Invariant: distinct logical indices map to distinct array positions
/// (trivially true when a dimension is zero). The constructor enforces a
/// sufficient condition: the larger stride must step past everything the
/// smaller stride can address.
///
/// # Example
///
/// ```
/// use lamina::Layout;
///
/// let l = Layout::row_major(2, 3);
/// assert_eq!(l.index(0, 2), 2);
/// assert_eq!(l.index(1, 0), 3);
///
/// let t = l.transpose();
/// assert_eq!(t.index(2, 0), 2);
/// assert_eq!(t.index(0, 1), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    offset: usize,
    row_stride: usize,
    col_stride: usize,
}

impl Layout {
    /// General strided layout. Panics if the strides can alias two
    /// distinct logical indices onto the same position.
    pub fn new(rows: usize, cols: usize, offset: usize, row_stride: usize, col_stride: usize) -> Self {
        if rows > 1 {
            assert!(row_stride != 0, "row stride must be nonzero for {} rows", rows);
        }
        if cols > 1 {
            assert!(col_stride != 0, "column stride must be nonzero for {} columns", cols);
        }
        if rows > 1 && cols > 1 {
            let (big, small, span) = if row_stride >= col_stride {
                (row_stride, col_stride, cols)
            } else {
                (col_stride, row_stride, rows)
            };
            assert!(
                big > small * (span - 1),
                "strides ({}, {}) alias within a {}x{} layout",
                row_stride,
                col_stride,
                rows,
                cols,
            );
        }
        Self { rows, cols, offset, row_stride, col_stride }
    }

    /// Rows stored contiguously: `row_stride = cols`, `col_stride = 1`.
    pub fn row_major(rows: usize, cols: usize) -> Self {
        Self { rows, cols, offset: 0, row_stride: cols.max(1), col_stride: 1 }
    }

    /// Columns stored contiguously: `row_stride = 1`, `col_stride = rows`.
    pub fn column_major(rows: usize, cols: usize) -> Self {
        Self { rows, cols, offset: 0, row_stride: 1, col_stride: rows.max(1) }
    }

    /// The order the dense kernels prefer. Currently column-major.
    pub fn optimal(rows: usize, cols: usize) -> Self {
        Self::column_major(rows, cols)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flat position of a logical index.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        self.offset + row * self.row_stride + col * self.col_stride
    }

    /// Minimum backing-array length this layout can address into.
    pub fn required_len(&self) -> usize {
        if self.rows == 0 || self.cols == 0 {
            return 0;
        }
        self.index(self.rows - 1, self.cols - 1) + 1
    }

    /// Swap row/column stride and dimension. Same offset, same storage.
    pub fn transpose(&self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
            offset: self.offset,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }

    /// Layout of a rectangle within this one. Panics unless it fits.
    pub fn sub_layout(&self, row: usize, col: usize, rows: usize, cols: usize) -> Self {
        assert!(
            row + rows <= self.rows && col + cols <= self.cols,
            "sub-layout {}x{} at ({}, {}) exceeds {}x{} parent",
            rows,
            cols,
            row,
            col,
            self.rows,
            self.cols,
        );
        Self {
            rows,
            cols,
            offset: self.offset + row * self.row_stride + col * self.col_stride,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
        }
    }

    /// One-row layout of row `i`.
    pub fn row(&self, i: usize) -> Self {
        self.sub_layout(i, 0, 1, self.cols)
    }

    /// One-column layout of column `i`.
    pub fn column(&self, i: usize) -> Self {
        self.sub_layout(0, i, self.rows, 1)
    }
}

/// Packed lower-triangular layout for symmetric storage.
///
/// Addresses reflect across the diagonal: `index(r, c)` with `r < c` reads
/// the same position as `index(c, r)`. Row `r` holds `r + 1` entries
/// followed by `padding` unused slots, so row `r` starts at
/// `r·(r + 1 + 2·padding) / 2`.
///
/// The padding exists so a factorization can process a row in
/// hardware-vector-width chunks without reading into the next row. It is
/// a performance property, validated by benchmarking only.
///
/// # Example
///
/// ```
/// use lamina::PackedLayout;
///
/// let p = PackedLayout::packed(3);
/// assert_eq!(p.index(0, 0), 0);
/// assert_eq!(p.index(1, 0), 1);
/// assert_eq!(p.index(2, 1), 4);
/// // Mirrored across the diagonal:
/// assert_eq!(p.index(1, 2), p.index(2, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedLayout {
    size: usize,
    offset: usize,
    padding: usize,
}

impl PackedLayout {
    /// Tightly packed triangle, no padding.
    pub fn packed(size: usize) -> Self {
        Self { size, offset: 0, padding: 0 }
    }

    /// Packed triangle with `padding` spare slots after each row.
    pub fn with_padding(size: usize, padding: usize) -> Self {
        Self { size, offset: 0, padding }
    }

    /// Packed triangle at an offset within a larger backing array.
    pub fn new(size: usize, offset: usize, padding: usize) -> Self {
        Self { size, offset, padding }
    }

    /// Matrix dimension (the layout is square).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Spare slots after each row.
    #[inline]
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Flat position of a logical index, reflected across the diagonal.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        let (r, c) = if row >= col { (row, col) } else { (col, row) };
        self.offset + r * (r + 1 + 2 * self.padding) / 2 + c
    }

    /// Minimum backing-array length, including the final row's padding.
    pub fn required_len(&self) -> usize {
        if self.size == 0 {
            return 0;
        }
        self.offset + self.size * (self.size + 1 + 2 * self.padding) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_index() {
        let l = Layout::row_major(3, 4);
        assert_eq!(l.index(0, 0), 0);
        assert_eq!(l.index(0, 3), 3);
        assert_eq!(l.index(2, 1), 9);
        assert_eq!(l.required_len(), 12);
    }

    #[test]
    fn column_major_index() {
        let l = Layout::column_major(3, 4);
        assert_eq!(l.index(0, 0), 0);
        assert_eq!(l.index(2, 0), 2);
        assert_eq!(l.index(0, 1), 3);
        assert_eq!(l.required_len(), 12);
    }

    #[test]
    fn all_positions_distinct() {
        for l in [Layout::row_major(3, 5), Layout::column_major(3, 5), Layout::new(3, 5, 2, 7, 1)] {
            let mut seen = alloc::vec![false; l.required_len()];
            for i in 0..3 {
                for j in 0..5 {
                    let p = l.index(i, j);
                    assert!(!seen[p], "position {} hit twice", p);
                    seen[p] = true;
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "alias")]
    fn aliasing_strides_rejected() {
        let _ = Layout::new(3, 3, 0, 2, 1);
    }

    #[test]
    fn transpose_swaps() {
        let l = Layout::row_major(2, 3);
        let t = l.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(l.index(i, j), t.index(j, i));
            }
        }
    }

    #[test]
    fn sub_layout_offsets() {
        let l = Layout::row_major(4, 4);
        let s = l.sub_layout(1, 2, 2, 2);
        assert_eq!(s.index(0, 0), l.index(1, 2));
        assert_eq!(s.index(1, 1), l.index(2, 3));
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn sub_layout_out_of_range() {
        let _ = Layout::row_major(4, 4).sub_layout(2, 2, 3, 1);
    }

    #[test]
    fn row_and_column_layouts() {
        let l = Layout::row_major(3, 4);
        let r = l.row(1);
        assert_eq!((r.rows(), r.cols()), (1, 4));
        assert_eq!(r.index(0, 2), l.index(1, 2));
        let c = l.column(3);
        assert_eq!((c.rows(), c.cols()), (3, 1));
        assert_eq!(c.index(2, 0), l.index(2, 3));
    }

    #[test]
    fn packed_index() {
        let p = PackedLayout::packed(4);
        // Rows start at 0, 1, 3, 6.
        assert_eq!(p.index(0, 0), 0);
        assert_eq!(p.index(1, 1), 2);
        assert_eq!(p.index(2, 2), 5);
        assert_eq!(p.index(3, 0), 6);
        assert_eq!(p.required_len(), 10);
    }

    #[test]
    fn packed_reflects() {
        let p = PackedLayout::packed(5);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(p.index(i, j), p.index(j, i));
            }
        }
    }

    #[test]
    fn packed_padding_spacing() {
        let p = PackedLayout::with_padding(3, 2);
        // Row r starts at r*(r+1+4)/2: 0, 3, 7.
        assert_eq!(p.index(0, 0), 0);
        assert_eq!(p.index(1, 0), 3);
        assert_eq!(p.index(2, 0), 7);
        assert_eq!(p.required_len(), 12);
        // Padded rows still never collide.
        let mut seen = alloc::vec![false; p.required_len()];
        for i in 0..3 {
            for j in 0..=i {
                let pos = p.index(i, j);
                assert!(!seen[pos]);
                seen[pos] = true;
            }
        }
    }

    #[test]
    fn empty_layouts() {
        assert_eq!(Layout::row_major(0, 5).required_len(), 0);
        assert_eq!(Layout::column_major(3, 0).required_len(), 0);
        assert_eq!(PackedLayout::packed(0).required_len(), 0);
    }
}
