//! # Densela Core
//!
//! Shared building blocks for the densela BLAS kernels.
//!
//! This crate provides:
//! - **CBLAS flags**: layout, transpose, triangle, diagonal and side enums.
//! - **Scalars**: the [`Scalar`] trait over f32, f64, Complex<f32>, Complex<f64>.
//! - **Accessors**: strided vector views and dense / packed / banded matrix
//!   views with lazy transpose, conjugate and symmetric completion.
//! - **Validation gateway**: argument checks that report through a single
//!   error handler before any kernel runs.
//! - **Parallel execution**: scoped-thread splitting with a process-wide
//!   [`KernelConfig`].

pub mod config;
pub mod error;
pub mod layout;
pub mod matrix;
pub mod parallel;
pub mod scalar;
pub mod validate;
pub mod vector;

pub use config::KernelConfig;
pub use error::{reset_error_handler, set_error_handler, BlasError, Result};
pub use layout::{Diag, Flag, Layout, Side, Transpose, Uplo};
pub use num_complex::{Complex, Complex32, Complex64};
pub use parallel::parallel_for_chunks;
pub use scalar::{RealScalar, Scalar};
pub use validate::Gate;
pub use vector::{StridedVec, StridedVecMut};
