//! # lamina
//!
//! Layout-polymorphic dense matrix engine, no-std compatible. Matrices carry
//! their structural shape (dense, symmetric packed, diagonal, identity, zero,
//! constant, permutation) and every operation exploits it: arithmetic,
//! multiplication, views, and factorization all dispatch on shape before
//! falling back to dense kernels.
//!
//! ## Quick start
//!
//! ```
//! use lamina::Matrix;
//!
//! // Solve a linear system A·X = B
//! let a = Matrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = Matrix::from_rows(3, 1, &[8.0, -11.0, -3.0]);
//! let x = a.factorize(1e-12).unwrap().left_solve(&b); // x = [2, 3, -1]
//! assert!((x.get(0, 0) - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`layout`] — [`Layout`], the pure geometric mapping from (row, column)
//!   to a flat storage position via offset and per-axis strides, and
//!   [`PackedLayout`] for triangular storage with diagonal reflection and
//!   optional per-row padding.
//!
//! - [`perm`] — [`Perm`], a validated permutation with an allocation-free
//!   identity sentinel. Composition, inversion, parity, and materializing
//!   swaps.
//!
//! - [`matrix`] — [`Matrix<T>`], the shape-tagged matrix, and
//!   [`MatrixView`], a borrowed view composing transpose, sub-range, and
//!   row/column permutations without copying. Element-wise arithmetic and
//!   shape-aware multiplication preserve structure where the result allows
//!   it.
//!
//! - [`factor`] — [`Factorization`], the decomposition contract
//!   (`left_solve`, `right_solve`, `det`, `inverse`). Dense matrices factor
//!   as [LU with partial pivoting](factor::LuFactor), symmetric packed
//!   matrices as [LDLᵗ with diagonal pivoting](factor::LdltFactor), and the
//!   structurally simple shapes solve in closed form.
//!
//! - [`traits`] — Element and access traits: [`Scalar`], [`FloatScalar`],
//!   and [`MatrixRef`] / [`MatrixMut`] for algorithms generic over storage.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Hardware FPU via system libm |
//! | `libm`  | baseline | Pure-Rust software float fallback |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod factor;
pub mod layout;
pub mod matrix;
pub mod perm;
pub mod traits;

pub use factor::{Factorization, LdltFactor, LinalgError, LuFactor};
pub use layout::{Layout, PackedLayout};
pub use matrix::{Matrix, MatrixView};
pub use perm::Perm;
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
