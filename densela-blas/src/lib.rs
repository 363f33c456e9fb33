// BLAS functions match CBLAS signatures; many parameters are inherent to the API.
// Numeric kernels index matrices by (i, j) where iterators hurt readability.
#![allow(clippy::too_many_arguments, clippy::needless_range_loop)]

//! # Densela BLAS
//!
//! Pure Rust dense BLAS over `f32`, `f64`, `Complex<f32>` and `Complex<f64>`.
//!
//! Every routine is a single generic function over [`Scalar`]; the classic
//! `s`/`d`/`c`/`z` prefixes are replaced by the element type of the slices
//! passed in. Only the mixed-precision dots (`sdsdot`, `dsdot`) are tied to
//! a precision.
//!
//! ## BLAS Levels
//!
//! - **Level 1** (vector-vector): `dot`, `dotu`, `dotc`, `sdsdot`, `dsdot`, `nrm2`,
//!   `asum`, `iamax`, `swap`, `copy`, `axpy`, `scal`, `rscal`, `rot`, `rotg`,
//!   `rotm`, `rotmg`
//! - **Level 2** (matrix-vector): `gemv`, `gbmv`, `symv`, `hemv`, `sbmv`,
//!   `hbmv`, `spmv`, `hpmv`, `trmv`, `tbmv`, `tpmv`, `trsv`, `tbsv`, `tpsv`,
//!   `ger`, `geru`, `gerc`, `syr`, `her`, `spr`, `hpr`, `syr2`, `her2`, `spr2`, `hpr2`
//! - **Level 3** (matrix-matrix): `gemm`, `symm`, `hemm`, `syrk`, `herk`,
//!   `syr2k`, `her2k`, `trmm`, `trsm`
//!
//! ## Memory Layout
//!
//! Both row-major and column-major layouts are supported via the CBLAS-style
//! [`Layout`] parameter. Vector increments are signed; a negative increment
//! walks the slice from its end.
//!
//! ## Errors
//!
//! Arguments are checked before any computation. A rejected call returns a
//! [`BlasError`] naming the routine and the 1-based position of the bad
//! parameter, after passing it to the handler installed with
//! [`set_error_handler`] (by default a `tracing` error event).
//!
//! ```
//! use densela_blas::{level3, Layout, Transpose};
//!
//! let a = [1.0f64, 2.0, 3.0, 4.0];
//! let b = [5.0f64, 6.0, 7.0, 8.0];
//! let mut c = [0.0f64; 4];
//! level3::gemm(Layout::RowMajor, Transpose::NoTrans, Transpose::NoTrans,
//!              2, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2)?;
//! assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
//! # Ok::<(), densela_blas::BlasError>(())
//! ```

pub mod level1;
pub mod level2;
pub mod level3;

// Re-export the shared vocabulary for convenience
pub use densela_core::{
    reset_error_handler, set_error_handler, BlasError, Complex, Complex32, Complex64, Diag, Flag,
    KernelConfig, Layout, RealScalar, Result, Scalar, Side, Transpose, Uplo,
};

pub use level1::{Givens, ModifiedRotation};
