use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by operations that compare pivot magnitudes against a
/// tolerance (factorizations) or need `sqrt` / `abs` (norms).
pub trait FloatScalar: Scalar + Float {}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Implemented by both [`Matrix`](crate::Matrix) and
/// [`MatrixView`](crate::MatrixView), so algorithms and tests can operate
/// on either without materializing views.
///
/// Elements are returned by value: the closed-form matrix shapes (zero,
/// constant, identity, …) have no backing storage to borrow from.
pub trait MatrixRef<T: Copy> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with element writes, enabling in-place algorithms
/// (LU elimination, row swaps) to work generically. Writes go through the
/// shared backing storage, so aliasing views observe them.
pub trait MatrixMut<T: Copy>: MatrixRef<T> {
    fn set(&mut self, row: usize, col: usize, value: T);
}
