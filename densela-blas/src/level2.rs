//! BLAS Level 2: Matrix-vector operations.
//!
//! All operations support both row-major and column-major layouts via the
//! CBLAS-style `Layout` parameter, and every storage scheme (full, banded,
//! packed) goes through the same handful of kernels: the storage is wrapped
//! in a [`MatrixAccess`] view, `op(A)` and symmetric completion are applied
//! lazily by [`OpView`] / [`SymView`], and the kernel only ever sees logical
//! `(i, j)` indices.

use densela_core::error::Result;
use densela_core::layout::{Diag, Layout, Transpose, Uplo};
use densela_core::matrix::{
    band_span, Banded, Dense, DenseMut, MatrixAccess, MatrixAccessMut, OpView, Packed, PackedMut,
    SymView,
};
use densela_core::scalar::Scalar;
use densela_core::validate::Gate;
use densela_core::vector::{StridedVec, StridedVecMut};
use num_traits::Zero;

use crate::level1::scal_kernel;

/// Bandwidth meaning "no band limit".
const FULL: usize = usize::MAX;

// ============================================================================
// Shared kernels (also used by Level 3)
// ============================================================================

/// `y := beta * y`; `beta = 0` overwrites without reading, so NaN or Inf
/// already in `y` does not survive.
pub(crate) fn scale_output<T: Scalar>(beta: T, y: &mut StridedVecMut<'_, T>) {
    if beta == T::zero() {
        y.for_each_mut(|_, v| *v = T::zero());
    } else if beta != T::one() {
        scal_kernel(beta, y);
    }
}

/// `y := alpha * A * x + beta * y` over a logical `rows x cols` operand whose
/// row `i` is nonzero only inside the band `(kl, ku)`.
fn accumulate_mv<T: Scalar, A: MatrixAccess<T>>(
    a: &A,
    rows: usize,
    cols: usize,
    kl: usize,
    ku: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    if rows == 0 || cols == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }
    let mut y = StridedVecMut::new(y, rows, incy);
    scale_output(beta, &mut y);
    if alpha == T::zero() {
        return;
    }
    let x = StridedVec::new(x, cols, incx);
    for i in 0..rows {
        let (start, end) = band_span(i, kl, ku, cols);
        let mut sum = T::zero();
        for j in start..end {
            sum += a.at(i, j) * x.get(j);
        }
        *y.at_mut(i) += alpha * sum;
    }
}

/// Triangle of `op(A)` given the stored triangle.
#[inline(always)]
pub(crate) fn effective_uplo(uplo: Uplo, trans: Transpose) -> Uplo {
    if trans.swaps() {
        uplo.flip()
    } else {
        uplo
    }
}

/// Columns of row `i` inside a triangle of bandwidth `k`.
#[inline(always)]
fn tri_span(uplo: Uplo, i: usize, n: usize, k: usize) -> (usize, usize) {
    match uplo {
        Uplo::Upper => band_span(i, 0, k, n),
        Uplo::Lower => band_span(i, k, 0, n),
    }
}

/// `x := A * x` for a triangular `A` seen through `a`.
///
/// `uplo` is the triangle of the logical operand (after any transposition).
/// Rows are processed in the order that consumes every `x[j]` before it is
/// overwritten. A unit diagonal is never read.
pub(crate) fn tri_mv_kernel<T: Scalar, A: MatrixAccess<T>>(
    a: &A,
    uplo: Uplo,
    diag: Diag,
    n: usize,
    k: usize,
    x: &mut StridedVecMut<'_, T>,
) {
    let unit = diag.is_unit();
    let row = |i: usize, x: &StridedVecMut<'_, T>| {
        let (start, end) = tri_span(uplo, i, n, k);
        let mut sum = T::zero();
        for j in start..end {
            if j == i {
                sum += if unit { x.get(i) } else { a.at(i, i) * x.get(i) };
            } else {
                sum += a.at(i, j) * x.get(j);
            }
        }
        sum
    };
    match uplo {
        Uplo::Upper => {
            for i in 0..n {
                let v = row(i, &*x);
                x.set(i, v);
            }
        }
        Uplo::Lower => {
            for i in (0..n).rev() {
                let v = row(i, &*x);
                x.set(i, v);
            }
        }
    }
}

/// Solve `A * x = b` in place (`x` holds `b` on entry).
///
/// Upper triangles are solved by back substitution, lower by forward
/// substitution. A unit diagonal is never read.
pub(crate) fn tri_sv_kernel<T: Scalar, A: MatrixAccess<T>>(
    a: &A,
    uplo: Uplo,
    diag: Diag,
    n: usize,
    k: usize,
    x: &mut StridedVecMut<'_, T>,
) {
    let unit = diag.is_unit();
    let mut solve_row = |i: usize| {
        let (start, end) = tri_span(uplo, i, n, k);
        let mut v = x.get(i);
        for j in (start..end).filter(|&j| j != i) {
            v -= a.at(i, j) * x.get(j);
        }
        if !unit {
            v = v / a.at(i, i);
        }
        x.set(i, v);
    };
    match uplo {
        Uplo::Upper => (0..n).rev().for_each(&mut solve_row),
        Uplo::Lower => (0..n).for_each(&mut solve_row),
    }
}

/// Add `term(i, j)` to every element of the `uplo` triangle.
///
/// Elements outside the triangle are never touched; with `hermitian` set the
/// diagonal is stored with its imaginary part dropped.
fn triangle_update<T, M, F>(a: &mut M, uplo: Uplo, n: usize, hermitian: bool, term: F)
where
    T: Scalar,
    M: MatrixAccessMut<T>,
    F: Fn(usize, usize) -> T,
{
    for i in 0..n {
        let (start, end) = uplo.row_span(i, n);
        for j in start..end {
            let v = a.at(i, j) + term(i, j);
            *a.at_mut(i, j) = if hermitian && i == j { v.real_part() } else { v };
        }
    }
}

#[inline]
fn triangular_band(uplo: Uplo, k: usize) -> (usize, usize) {
    match uplo {
        Uplo::Upper => (0, k),
        Uplo::Lower => (k, 0),
    }
}

// ============================================================================
// GEMV / GBMV: General matrix-vector multiply
// y := alpha * op(A) * x + beta * y
// ============================================================================

/// General matrix-vector multiply: `y := alpha * op(A) * x + beta * y`.
///
/// `A` is `m x n`; `x` has `n` elements and `y` has `m` when `trans` is
/// `NoTrans`, the other way round otherwise.
pub fn gemv<T: Scalar>(
    layout: Layout,
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("gemv");
    gate.matrix(6, "a", a, layout, m, n, lda)?;
    let (rows, cols) = trans.apply_dims(m, n);
    gate.vector(8, "x", x, cols, incx)?;
    gate.vector(11, "y", y, rows, incy)?;

    let op_a = OpView::new(Dense::new(a, layout, lda), trans);
    accumulate_mv(&op_a, rows, cols, FULL, FULL, alpha, x, incx, beta, y, incy);
    Ok(())
}

/// Banded matrix-vector multiply: `y := alpha * op(A) * x + beta * y` where
/// `A` is `m x n` with `kl` sub- and `ku` super-diagonals in band storage.
pub fn gbmv<T: Scalar>(
    layout: Layout,
    trans: Transpose,
    m: usize,
    n: usize,
    kl: usize,
    ku: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("gbmv");
    gate.band(8, "a", a, layout, m, n, kl, ku, lda)?;
    let (rows, cols) = trans.apply_dims(m, n);
    gate.vector(10, "x", x, cols, incx)?;
    gate.vector(13, "y", y, rows, incy)?;

    // Transposing a band swaps its lower and upper widths.
    let (op_kl, op_ku) = if trans.swaps() { (ku, kl) } else { (kl, ku) };
    let op_a = OpView::new(Banded::new(a, layout, lda, kl, ku), trans);
    accumulate_mv(
        &op_a,
        rows,
        cols,
        op_kl,
        op_ku,
        alpha,
        x,
        incx,
        beta,
        y,
        incy,
    );
    Ok(())
}

// ============================================================================
// SYMV / HEMV and their banded and packed forms
// y := alpha * A * x + beta * y, A symmetric or Hermitian, one triangle stored
// ============================================================================

/// Symmetric matrix-vector multiply; only the `uplo` triangle of `A` is read.
pub fn symv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("symv");
    gate.matrix(5, "a", a, layout, n, n, lda)?;
    gate.vector(7, "x", x, n, incx)?;
    gate.vector(10, "y", y, n, incy)?;
    let sym = SymView::symmetric(Dense::new(a, layout, lda), uplo);
    accumulate_mv(&sym, n, n, FULL, FULL, alpha, x, incx, beta, y, incy);
    Ok(())
}

/// Hermitian matrix-vector multiply. The imaginary part of the stored
/// diagonal is ignored.
pub fn hemv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("hemv");
    gate.matrix(5, "a", a, layout, n, n, lda)?;
    gate.vector(7, "x", x, n, incx)?;
    gate.vector(10, "y", y, n, incy)?;
    let herm = SymView::hermitian(Dense::new(a, layout, lda), uplo);
    accumulate_mv(&herm, n, n, FULL, FULL, alpha, x, incx, beta, y, incy);
    Ok(())
}

/// Symmetric band matrix-vector multiply with bandwidth `k`.
pub fn sbmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("sbmv");
    let (kl, ku) = triangular_band(uplo, k);
    gate.band(6, "a", a, layout, n, n, kl, ku, lda)?;
    gate.vector(8, "x", x, n, incx)?;
    gate.vector(11, "y", y, n, incy)?;
    let sym = SymView::symmetric(Banded::triangular(a, layout, lda, uplo, k), uplo);
    accumulate_mv(&sym, n, n, k, k, alpha, x, incx, beta, y, incy);
    Ok(())
}

/// Hermitian band matrix-vector multiply with bandwidth `k`.
pub fn hbmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("hbmv");
    let (kl, ku) = triangular_band(uplo, k);
    gate.band(6, "a", a, layout, n, n, kl, ku, lda)?;
    gate.vector(8, "x", x, n, incx)?;
    gate.vector(11, "y", y, n, incy)?;
    let herm = SymView::hermitian(Banded::triangular(a, layout, lda, uplo, k), uplo);
    accumulate_mv(&herm, n, n, k, k, alpha, x, incx, beta, y, incy);
    Ok(())
}

/// Symmetric packed matrix-vector multiply.
pub fn spmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    ap: &[T],
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("spmv");
    gate.packed(5, "ap", ap, n)?;
    gate.vector(6, "x", x, n, incx)?;
    gate.vector(9, "y", y, n, incy)?;
    let sym = SymView::symmetric(Packed::new(ap, layout, uplo, n), uplo);
    accumulate_mv(&sym, n, n, FULL, FULL, alpha, x, incx, beta, y, incy);
    Ok(())
}

/// Hermitian packed matrix-vector multiply.
pub fn hpmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    ap: &[T],
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("hpmv");
    gate.packed(5, "ap", ap, n)?;
    gate.vector(6, "x", x, n, incx)?;
    gate.vector(9, "y", y, n, incy)?;
    let herm = SymView::hermitian(Packed::new(ap, layout, uplo, n), uplo);
    accumulate_mv(&herm, n, n, FULL, FULL, alpha, x, incx, beta, y, incy);
    Ok(())
}

// ============================================================================
// TRMV / TBMV / TPMV: Triangular matrix-vector multiply
// x := op(A) * x
// ============================================================================

/// Triangular matrix-vector multiply: `x := op(A) * x`.
pub fn trmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) -> Result<()> {
    let gate = Gate::new("trmv");
    gate.matrix(6, "a", a, layout, n, n, lda)?;
    gate.vector(8, "x", x, n, incx)?;
    let op_a = OpView::new(Dense::new(a, layout, lda), trans);
    let mut x = StridedVecMut::new(x, n, incx);
    tri_mv_kernel(&op_a, effective_uplo(uplo, trans), diag, n, FULL, &mut x);
    Ok(())
}

/// Triangular band matrix-vector multiply with bandwidth `k`.
pub fn tbmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) -> Result<()> {
    let gate = Gate::new("tbmv");
    let (kl, ku) = triangular_band(uplo, k);
    gate.band(7, "a", a, layout, n, n, kl, ku, lda)?;
    gate.vector(9, "x", x, n, incx)?;
    let op_a = OpView::new(Banded::triangular(a, layout, lda, uplo, k), trans);
    let mut x = StridedVecMut::new(x, n, incx);
    tri_mv_kernel(&op_a, effective_uplo(uplo, trans), diag, n, k, &mut x);
    Ok(())
}

/// Triangular packed matrix-vector multiply.
pub fn tpmv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[T],
    x: &mut [T],
    incx: isize,
) -> Result<()> {
    let gate = Gate::new("tpmv");
    gate.packed(6, "ap", ap, n)?;
    gate.vector(7, "x", x, n, incx)?;
    let op_a = OpView::new(Packed::new(ap, layout, uplo, n), trans);
    let mut x = StridedVecMut::new(x, n, incx);
    tri_mv_kernel(&op_a, effective_uplo(uplo, trans), diag, n, FULL, &mut x);
    Ok(())
}

// ============================================================================
// TRSV / TBSV / TPSV: Triangular solve
// op(A) * x = b, b overwritten by x
// ============================================================================

/// Triangular solve: `x := op(A)^-1 * x`.
///
/// No singularity check is made; a zero on a non-unit diagonal produces
/// Inf or NaN.
pub fn trsv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) -> Result<()> {
    let gate = Gate::new("trsv");
    gate.matrix(6, "a", a, layout, n, n, lda)?;
    gate.vector(8, "x", x, n, incx)?;
    let op_a = OpView::new(Dense::new(a, layout, lda), trans);
    let mut x = StridedVecMut::new(x, n, incx);
    tri_sv_kernel(&op_a, effective_uplo(uplo, trans), diag, n, FULL, &mut x);
    Ok(())
}

/// Triangular band solve with bandwidth `k`.
pub fn tbsv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) -> Result<()> {
    let gate = Gate::new("tbsv");
    let (kl, ku) = triangular_band(uplo, k);
    gate.band(7, "a", a, layout, n, n, kl, ku, lda)?;
    gate.vector(9, "x", x, n, incx)?;
    let op_a = OpView::new(Banded::triangular(a, layout, lda, uplo, k), trans);
    let mut x = StridedVecMut::new(x, n, incx);
    tri_sv_kernel(&op_a, effective_uplo(uplo, trans), diag, n, k, &mut x);
    Ok(())
}

/// Triangular packed solve.
pub fn tpsv<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[T],
    x: &mut [T],
    incx: isize,
) -> Result<()> {
    let gate = Gate::new("tpsv");
    gate.packed(6, "ap", ap, n)?;
    gate.vector(7, "x", x, n, incx)?;
    let op_a = OpView::new(Packed::new(ap, layout, uplo, n), trans);
    let mut x = StridedVecMut::new(x, n, incx);
    tri_sv_kernel(&op_a, effective_uplo(uplo, trans), diag, n, FULL, &mut x);
    Ok(())
}

// ============================================================================
// GER: General rank-1 update
// A := alpha * x * y' + A
// ============================================================================

fn rank1<T: Scalar>(
    gate: Gate,
    layout: Layout,
    m: usize,
    n: usize,
    alpha: T,
    (x, incx): (&[T], isize),
    (y, incy): (&[T], isize),
    (a, lda): (&mut [T], usize),
    conj_y: bool,
) -> Result<()> {
    gate.vector(5, "x", x, m, incx)?;
    gate.vector(7, "y", y, n, incy)?;
    gate.matrix(9, "a", a, layout, m, n, lda)?;
    if m == 0 || n == 0 || alpha == T::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, m, incx);
    let y = StridedVec::new(y, n, incy);
    let mut a = DenseMut::new(a, layout, lda);
    for i in 0..m {
        let axi = alpha * x.get(i);
        for j in 0..n {
            *a.at_mut(i, j) += axi * y.get(j).conj_if(conj_y);
        }
    }
    Ok(())
}

/// General rank-1 update: `A := alpha * x * y^T + A`.
pub fn ger<T: Scalar>(
    layout: Layout,
    m: usize,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    rank1(
        Gate::new("ger"),
        layout,
        m,
        n,
        alpha,
        (x, incx),
        (y, incy),
        (a, lda),
        false,
    )
}

/// Alias of [`ger`] matching the CBLAS complex spelling.
#[inline]
pub fn geru<T: Scalar>(
    layout: Layout,
    m: usize,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    ger(layout, m, n, alpha, x, incx, y, incy, a, lda)
}

/// Conjugated rank-1 update: `A := alpha * x * y^H + A`.
pub fn gerc<T: Scalar>(
    layout: Layout,
    m: usize,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    rank1(
        Gate::new("gerc"),
        layout,
        m,
        n,
        alpha,
        (x, incx),
        (y, incy),
        (a, lda),
        true,
    )
}

// ============================================================================
// SYR / HER / SPR / HPR: Symmetric and Hermitian rank-1 updates
// ============================================================================

/// Symmetric rank-1 update: `A := alpha * x * x^T + A`, `uplo` triangle only.
pub fn syr<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    let gate = Gate::new("syr");
    gate.vector(5, "x", x, n, incx)?;
    gate.matrix(7, "a", a, layout, n, n, lda)?;
    if n == 0 || alpha == T::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let mut a = DenseMut::new(a, layout, lda);
    triangle_update(&mut a, uplo, n, false, |i, j| alpha * x.get(i) * x.get(j));
    Ok(())
}

/// Hermitian rank-1 update: `A := alpha * x * x^H + A` with real `alpha`.
pub fn her<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T::Real,
    x: &[T],
    incx: isize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    let gate = Gate::new("her");
    gate.vector(5, "x", x, n, incx)?;
    gate.matrix(7, "a", a, layout, n, n, lda)?;
    if n == 0 || alpha == T::Real::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let mut a = DenseMut::new(a, layout, lda);
    triangle_update(&mut a, uplo, n, true, |i, j| {
        (x.get(i) * x.get(j).conj()).mul_real(alpha)
    });
    Ok(())
}

/// Symmetric packed rank-1 update.
pub fn spr<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    ap: &mut [T],
) -> Result<()> {
    let gate = Gate::new("spr");
    gate.vector(5, "x", x, n, incx)?;
    gate.packed(7, "ap", ap, n)?;
    if n == 0 || alpha == T::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let mut a = PackedMut::new(ap, layout, uplo, n);
    triangle_update(&mut a, uplo, n, false, |i, j| alpha * x.get(i) * x.get(j));
    Ok(())
}

/// Hermitian packed rank-1 update with real `alpha`.
pub fn hpr<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T::Real,
    x: &[T],
    incx: isize,
    ap: &mut [T],
) -> Result<()> {
    let gate = Gate::new("hpr");
    gate.vector(5, "x", x, n, incx)?;
    gate.packed(7, "ap", ap, n)?;
    if n == 0 || alpha == T::Real::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let mut a = PackedMut::new(ap, layout, uplo, n);
    triangle_update(&mut a, uplo, n, true, |i, j| {
        (x.get(i) * x.get(j).conj()).mul_real(alpha)
    });
    Ok(())
}

// ============================================================================
// SYR2 / HER2 / SPR2 / HPR2: Symmetric and Hermitian rank-2 updates
// ============================================================================

/// Symmetric rank-2 update: `A := alpha * x * y^T + alpha * y * x^T + A`.
pub fn syr2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    let gate = Gate::new("syr2");
    gate.vector(5, "x", x, n, incx)?;
    gate.vector(7, "y", y, n, incy)?;
    gate.matrix(9, "a", a, layout, n, n, lda)?;
    if n == 0 || alpha == T::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let y = StridedVec::new(y, n, incy);
    let mut a = DenseMut::new(a, layout, lda);
    triangle_update(&mut a, uplo, n, false, |i, j| {
        alpha * (x.get(i) * y.get(j) + y.get(i) * x.get(j))
    });
    Ok(())
}

/// Hermitian rank-2 update:
/// `A := alpha * x * y^H + conj(alpha) * y * x^H + A`.
pub fn her2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    let gate = Gate::new("her2");
    gate.vector(5, "x", x, n, incx)?;
    gate.vector(7, "y", y, n, incy)?;
    gate.matrix(9, "a", a, layout, n, n, lda)?;
    if n == 0 || alpha == T::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let y = StridedVec::new(y, n, incy);
    let mut a = DenseMut::new(a, layout, lda);
    triangle_update(&mut a, uplo, n, true, |i, j| {
        alpha * x.get(i) * y.get(j).conj() + alpha.conj() * y.get(i) * x.get(j).conj()
    });
    Ok(())
}

/// Symmetric packed rank-2 update.
pub fn spr2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    ap: &mut [T],
) -> Result<()> {
    let gate = Gate::new("spr2");
    gate.vector(5, "x", x, n, incx)?;
    gate.vector(7, "y", y, n, incy)?;
    gate.packed(9, "ap", ap, n)?;
    if n == 0 || alpha == T::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let y = StridedVec::new(y, n, incy);
    let mut a = PackedMut::new(ap, layout, uplo, n);
    triangle_update(&mut a, uplo, n, false, |i, j| {
        alpha * (x.get(i) * y.get(j) + y.get(i) * x.get(j))
    });
    Ok(())
}

/// Hermitian packed rank-2 update.
pub fn hpr2<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    ap: &mut [T],
) -> Result<()> {
    let gate = Gate::new("hpr2");
    gate.vector(5, "x", x, n, incx)?;
    gate.vector(7, "y", y, n, incy)?;
    gate.packed(9, "ap", ap, n)?;
    if n == 0 || alpha == T::zero() {
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let y = StridedVec::new(y, n, incy);
    let mut a = PackedMut::new(ap, layout, uplo, n);
    triangle_update(&mut a, uplo, n, true, |i, j| {
        alpha * x.get(i) * y.get(j).conj() + alpha.conj() * y.get(i) * x.get(j).conj()
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use densela_core::matrix::{band_index, packed_index, packed_len};
    use num_complex::Complex64;

    const LAYOUTS: [Layout; 2] = [Layout::RowMajor, Layout::ColMajor];
    const UPLOS: [Uplo; 2] = [Uplo::Upper, Uplo::Lower];
    const TRANS: [Transpose; 3] = [Transpose::NoTrans, Transpose::Trans, Transpose::ConjTrans];

    /// Store a logical matrix (given row by row) in `layout` with a tight ld.
    fn store<T: Scalar>(rows: &[Vec<T>], layout: Layout) -> (Vec<T>, usize) {
        let (m, n) = (rows.len(), rows[0].len());
        let ld = layout.leading_dim(m, n);
        let mut data = vec![T::zero(); m * n];
        for i in 0..m {
            for j in 0..n {
                data[layout.index(i, j, ld)] = rows[i][j];
            }
        }
        (data, ld)
    }

    fn store_band<T: Scalar>(
        rows: &[Vec<T>],
        layout: Layout,
        kl: usize,
        ku: usize,
    ) -> (Vec<T>, usize) {
        let (m, n) = (rows.len(), rows[0].len());
        let ld = kl + ku + 1;
        let mut data = vec![T::zero(); ld * layout.major_extent(m, n)];
        for i in 0..m {
            for j in 0..n {
                if j + kl >= i && i + ku >= j {
                    data[band_index(layout, kl, ku, ld, i, j)] = rows[i][j];
                }
            }
        }
        (data, ld)
    }

    fn store_packed<T: Scalar>(rows: &[Vec<T>], layout: Layout, uplo: Uplo) -> Vec<T> {
        let n = rows.len();
        let mut data = vec![T::zero(); packed_len(n)];
        for i in 0..n {
            for j in 0..n {
                if uplo.contains(i, j) {
                    data[packed_index(layout, uplo, n, i, j)] = rows[i][j];
                }
            }
        }
        data
    }

    fn naive_mv<T: Scalar>(rows: &[Vec<T>], trans: Transpose, x: &[T]) -> Vec<T> {
        let (m, n) = (rows.len(), rows[0].len());
        let (r, c) = trans.apply_dims(m, n);
        (0..r)
            .map(|i| {
                (0..c)
                    .map(|j| {
                        let v = if trans.swaps() { rows[j][i] } else { rows[i][j] };
                        v.conj_if(trans.conjugates()) * x[j]
                    })
                    .sum()
            })
            .collect()
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn complex_2x3() -> Vec<Vec<Complex64>> {
        vec![
            vec![c(1.0, 1.0), c(2.0, -1.0), c(0.0, 3.0)],
            vec![c(-1.0, 0.5), c(4.0, 0.0), c(1.0, 2.0)],
        ]
    }

    fn assert_close(got: &[Complex64], want: &[Complex64]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert_relative_eq!(g.re, w.re, epsilon = 1e-12);
            assert_relative_eq!(g.im, w.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sgemv_row_major() {
        // A = [[1, 2], [3, 4]], x = [1, 1]
        let a = vec![1.0f32, 2.0, 3.0, 4.0];
        let x = vec![1.0f32, 1.0];
        let mut y = vec![0.0f32; 2];
        gemv(
            Layout::RowMajor,
            Transpose::NoTrans,
            2,
            2,
            1.0,
            &a,
            2,
            &x,
            1,
            0.0,
            &mut y,
            1,
        )
        .unwrap();
        assert_eq!(y, vec![3.0, 7.0]);
    }

    #[test]
    fn test_dgemv_col_major_trans() {
        // Column-major [[1, 2], [3, 4]] is stored [1, 3, 2, 4]; A^T x with x = [1, 2]
        let a = vec![1.0f64, 3.0, 2.0, 4.0];
        let x = vec![1.0f64, 2.0];
        let mut y = vec![1.0f64, 1.0];
        gemv(
            Layout::ColMajor,
            Transpose::Trans,
            2,
            2,
            1.0,
            &a,
            2,
            &x,
            1,
            2.0,
            &mut y,
            1,
        )
        .unwrap();
        assert_eq!(y, vec![9.0, 12.0]);
    }

    #[test]
    fn test_gemv_complex_all_ops() {
        let rows = complex_2x3();
        for layout in LAYOUTS {
            let (a, lda) = store(&rows, layout);
            for trans in TRANS {
                let (r, cols) = trans.apply_dims(2, 3);
                let x: Vec<Complex64> = (0..cols).map(|j| c(j as f64 + 1.0, -0.5)).collect();
                let mut y = vec![c(f64::NAN, f64::NAN); r];
                gemv(
                    layout,
                    trans,
                    2,
                    3,
                    Complex64::new(1.0, 0.0),
                    &a,
                    lda,
                    &x,
                    1,
                    Complex64::new(0.0, 0.0),
                    &mut y,
                    1,
                )
                .unwrap();
                assert_close(&y, &naive_mv(&rows, trans, &x));
            }
        }
    }

    #[test]
    fn test_gemv_beta_zero_clears_nan() {
        let a = vec![0.0f64; 4];
        let x = vec![1.0f64; 2];
        let mut y = vec![f64::NAN, f64::INFINITY];
        gemv(
            Layout::RowMajor,
            Transpose::NoTrans,
            2,
            2,
            1.0,
            &a,
            2,
            &x,
            1,
            0.0,
            &mut y,
            1,
        )
        .unwrap();
        assert_eq!(y, vec![0.0, 0.0]);
    }

    #[test]
    fn test_gemv_negative_incy() {
        let a = vec![1.0f64, 2.0, 3.0, 4.0];
        let x = vec![1.0f64, 1.0];
        let mut y = vec![0.0f64; 3];
        gemv(
            Layout::RowMajor,
            Transpose::NoTrans,
            2,
            2,
            1.0,
            &a,
            2,
            &x,
            1,
            0.0,
            &mut y,
            -2,
        )
        .unwrap();
        assert_eq!(y, vec![7.0, 0.0, 3.0]);
    }

    #[test]
    fn test_gemv_reports_lda_position() {
        let a = vec![0.0f32; 6];
        let x = vec![0.0f32; 3];
        let mut y = vec![0.0f32; 2];
        let err = gemv(
            Layout::RowMajor,
            Transpose::NoTrans,
            2,
            3,
            1.0,
            &a,
            2,
            &x,
            1,
            0.0,
            &mut y,
            1,
        )
        .unwrap_err();
        assert_eq!(err.routine(), "gemv");
        assert_eq!(err.position(), 7);
    }

    #[test]
    fn test_gbmv_matches_dense() {
        // 4x5 with kl = 1, ku = 2
        let (m, n, kl, ku) = (4usize, 5usize, 1usize, 2usize);
        let rows: Vec<Vec<f64>> = (0..m)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if j + kl >= i && i + ku >= j {
                            (1 + i * n + j) as f64
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();
        for layout in LAYOUTS {
            let (ab, ldab) = store_band(&rows, layout, kl, ku);
            for trans in [Transpose::NoTrans, Transpose::Trans] {
                let (r, cols) = trans.apply_dims(m, n);
                let x: Vec<f64> = (0..cols).map(|j| 0.5 * j as f64 - 1.0).collect();
                let mut y = vec![1.0; r];
                gbmv(
                    layout,
                    trans,
                    m,
                    n,
                    kl,
                    ku,
                    2.0,
                    &ab,
                    ldab,
                    &x,
                    1,
                    1.0,
                    &mut y,
                    1,
                )
                .unwrap();
                let want: Vec<f64> = naive_mv(&rows, trans, &x)
                    .iter()
                    .map(|v| 2.0 * v + 1.0)
                    .collect();
                assert_eq!(y, want, "{layout:?} {trans:?}");
            }
        }
    }

    fn hermitian_3x3() -> Vec<Vec<Complex64>> {
        vec![
            vec![c(2.0, 0.0), c(1.0, 1.0), c(0.0, -2.0)],
            vec![c(1.0, -1.0), c(3.0, 0.0), c(1.5, 0.5)],
            vec![c(0.0, 2.0), c(1.5, -0.5), c(-1.0, 0.0)],
        ]
    }

    /// Keep only the `uplo` triangle, filling the rest with junk that must
    /// never be read.
    fn only_triangle(rows: &[Vec<Complex64>], uplo: Uplo) -> Vec<Vec<Complex64>> {
        let n = rows.len();
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if uplo.contains(i, j) {
                            // junk imaginary part on the diagonal must be ignored
                            if i == j {
                                rows[i][j] + c(0.0, 7.0)
                            } else {
                                rows[i][j]
                            }
                        } else {
                            c(99.0, -99.0)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_hemv_hpmv_hbmv_agree_with_full_product() {
        let full = hermitian_3x3();
        let x = vec![c(1.0, 0.0), c(0.0, 1.0), c(-1.0, 2.0)];
        let want = naive_mv(&full, Transpose::NoTrans, &x);
        let one = c(1.0, 0.0);
        let zero = c(0.0, 0.0);
        for layout in LAYOUTS {
            for uplo in UPLOS {
                let stored = only_triangle(&full, uplo);
                let (a, lda) = store(&stored, layout);
                let mut y = vec![zero; 3];
                hemv(layout, uplo, 3, one, &a, lda, &x, 1, zero, &mut y, 1).unwrap();
                assert_close(&y, &want);

                let ap = store_packed(&stored, layout, uplo);
                let mut y = vec![zero; 3];
                hpmv(layout, uplo, 3, one, &ap, &x, 1, zero, &mut y, 1).unwrap();
                assert_close(&y, &want);

                let (kl, ku) = triangular_band(uplo, 2);
                let (ab, ldab) = store_band(&stored, layout, kl, ku);
                let mut y = vec![zero; 3];
                hbmv(layout, uplo, 3, 2, one, &ab, ldab, &x, 1, zero, &mut y, 1).unwrap();
                assert_close(&y, &want);
            }
        }
    }

    #[test]
    fn test_symv_spmv_sbmv_real() {
        // symmetric tridiagonal
        let full = vec![
            vec![4.0f64, 1.0, 0.0],
            vec![1.0, 5.0, 2.0],
            vec![0.0, 2.0, 6.0],
        ];
        let x = vec![1.0f64, -1.0, 2.0];
        let want = naive_mv(&full, Transpose::NoTrans, &x);
        for layout in LAYOUTS {
            for uplo in UPLOS {
                let (a, lda) = store(&full, layout);
                let mut y = vec![0.0; 3];
                symv(layout, uplo, 3, 1.0, &a, lda, &x, 1, 0.0, &mut y, 1).unwrap();
                assert_eq!(y, want);

                let ap = store_packed(&full, layout, uplo);
                let mut y = vec![0.0; 3];
                spmv(layout, uplo, 3, 1.0, &ap, &x, 1, 0.0, &mut y, 1).unwrap();
                assert_eq!(y, want);

                let (kl, ku) = triangular_band(uplo, 1);
                let (ab, ldab) = store_band(&full, layout, kl, ku);
                let mut y = vec![0.0; 3];
                sbmv(layout, uplo, 3, 1, 1.0, &ab, ldab, &x, 1, 0.0, &mut y, 1).unwrap();
                assert_eq!(y, want);
            }
        }
    }

    fn upper_triangular() -> Vec<Vec<f64>> {
        vec![
            vec![2.0, -1.0, 3.0, 0.5],
            vec![0.0, 4.0, 1.0, -2.0],
            vec![0.0, 0.0, -3.0, 1.0],
            vec![0.0, 0.0, 0.0, 5.0],
        ]
    }

    fn transpose(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        (0..rows[0].len())
            .map(|j| rows.iter().map(|r| r[j]).collect())
            .collect()
    }

    fn with_unit_diag(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let mut out = rows.to_vec();
        for (i, r) in out.iter_mut().enumerate() {
            r[i] = 1.0;
        }
        out
    }

    #[test]
    fn test_trmv_trsv_every_combination() {
        let upper = upper_triangular();
        let lower = transpose(&upper);
        let b = vec![1.0f64, -2.0, 0.5, 3.0];
        for layout in LAYOUTS {
            for uplo in UPLOS {
                let logical = if uplo == Uplo::Upper { &upper } else { &lower };
                let (a, lda) = store(logical, layout);
                for trans in [Transpose::NoTrans, Transpose::Trans] {
                    for diag in [Diag::NonUnit, Diag::Unit] {
                        let effective = if diag.is_unit() {
                            with_unit_diag(logical)
                        } else {
                            logical.clone()
                        };
                        let mut x = b.clone();
                        trmv(layout, uplo, trans, diag, 4, &a, lda, &mut x, 1).unwrap();
                        assert_eq!(x, naive_mv(&effective, trans, &b));

                        trsv(layout, uplo, trans, diag, 4, &a, lda, &mut x, 1).unwrap();
                        for (got, want) in x.iter().zip(&b) {
                            assert_relative_eq!(got, want, epsilon = 1e-12);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_unit_diag_never_reads_diagonal() {
        // NaN on the diagonal must not leak into the result
        let a = vec![f64::NAN, 2.0, 0.0, f64::NAN];
        let mut x = vec![1.0, 1.0];
        trmv(
            Layout::RowMajor,
            Uplo::Upper,
            Transpose::NoTrans,
            Diag::Unit,
            2,
            &a,
            2,
            &mut x,
            1,
        )
        .unwrap();
        assert_eq!(x, vec![3.0, 1.0]);
        trsv(
            Layout::RowMajor,
            Uplo::Upper,
            Transpose::NoTrans,
            Diag::Unit,
            2,
            &a,
            2,
            &mut x,
            1,
        )
        .unwrap();
        assert_eq!(x, vec![1.0, 1.0]);
    }

    #[test]
    fn test_banded_and_packed_triangular() {
        // bandwidth 2 upper triangle: zero out a[0][3]
        let mut upper = upper_triangular();
        upper[0][3] = 0.0;
        let lower = transpose(&upper);
        let b = vec![2.0f64, 1.0, -1.0, 0.25];
        for layout in LAYOUTS {
            for uplo in UPLOS {
                let logical = if uplo == Uplo::Upper { &upper } else { &lower };
                let (kl, ku) = triangular_band(uplo, 2);
                let (ab, ldab) = store_band(logical, layout, kl, ku);
                let ap = store_packed(logical, layout, uplo);
                for trans in [Transpose::NoTrans, Transpose::Trans] {
                    let want = naive_mv(logical, trans, &b);

                    let mut x = b.clone();
                    tbmv(
                        layout,
                        uplo,
                        trans,
                        Diag::NonUnit,
                        4,
                        2,
                        &ab,
                        ldab,
                        &mut x,
                        1,
                    )
                    .unwrap();
                    assert_eq!(x, want);
                    tbsv(
                        layout,
                        uplo,
                        trans,
                        Diag::NonUnit,
                        4,
                        2,
                        &ab,
                        ldab,
                        &mut x,
                        1,
                    )
                    .unwrap();
                    for (got, want) in x.iter().zip(&b) {
                        assert_relative_eq!(got, want, epsilon = 1e-12);
                    }

                    let mut x = b.clone();
                    tpmv(layout, uplo, trans, Diag::NonUnit, 4, &ap, &mut x, 1).unwrap();
                    assert_eq!(x, want);
                    tpsv(layout, uplo, trans, Diag::NonUnit, 4, &ap, &mut x, 1).unwrap();
                    for (got, want) in x.iter().zip(&b) {
                        assert_relative_eq!(got, want, epsilon = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_trsv_conj_trans_complex() {
        let rows = vec![
            vec![c(2.0, 1.0), c(1.0, -1.0)],
            vec![c(0.0, 0.0), c(1.0, 3.0)],
        ];
        let (a, lda) = store(&rows, Layout::ColMajor);
        let b = vec![c(1.0, 0.0), c(0.0, 1.0)];
        let mut x = b.clone();
        trmv(
            Layout::ColMajor,
            Uplo::Upper,
            Transpose::ConjTrans,
            Diag::NonUnit,
            2,
            &a,
            lda,
            &mut x,
            1,
        )
        .unwrap();
        assert_close(&x, &naive_mv(&rows, Transpose::ConjTrans, &b));
        trsv(
            Layout::ColMajor,
            Uplo::Upper,
            Transpose::ConjTrans,
            Diag::NonUnit,
            2,
            &a,
            lda,
            &mut x,
            1,
        )
        .unwrap();
        assert_close(&x, &b);
    }

    #[test]
    fn test_ger_and_gerc() {
        let x = vec![c(1.0, 1.0), c(0.0, 2.0)];
        let y = vec![c(3.0, -1.0), c(1.0, 0.0), c(0.0, 1.0)];
        for layout in LAYOUTS {
            let ld = layout.leading_dim(2, 3);
            let mut a = vec![c(0.0, 0.0); 6];
            geru(layout, 2, 3, c(1.0, 0.0), &x, 1, &y, 1, &mut a, ld).unwrap();
            let mut ah = vec![c(0.0, 0.0); 6];
            gerc(layout, 2, 3, c(1.0, 0.0), &x, 1, &y, 1, &mut ah, ld).unwrap();
            for i in 0..2 {
                for j in 0..3 {
                    assert_eq!(a[layout.index(i, j, ld)], x[i] * y[j]);
                    assert_eq!(ah[layout.index(i, j, ld)], x[i] * y[j].conj());
                }
            }
        }
    }

    #[test]
    fn test_her_touches_only_declared_triangle() {
        let sentinel = c(-7.0, 7.0);
        let x = vec![c(1.0, 2.0), c(3.0, -1.0)];
        for layout in LAYOUTS {
            for uplo in UPLOS {
                let mut a = vec![sentinel; 4];
                // stored diagonal carries an imaginary part that must be dropped
                a[layout.index(0, 0, 2)] = c(1.0, 5.0);
                a[layout.index(1, 1, 2)] = c(1.0, 5.0);
                let off = if uplo == Uplo::Upper { (0, 1) } else { (1, 0) };
                a[layout.index(off.0, off.1, 2)] = c(0.0, 0.0);
                her(layout, uplo, 2, 2.0, &x, 1, &mut a, 2).unwrap();

                assert_eq!(a[layout.index(0, 0, 2)], c(11.0, 0.0));
                assert_eq!(a[layout.index(1, 1, 2)], c(21.0, 0.0));
                let (i, j) = off;
                assert_eq!(a[layout.index(i, j, 2)], (x[i] * x[j].conj()).mul_real(2.0));
                assert_eq!(a[layout.index(j, i, 2)], sentinel);
            }
        }
    }

    #[test]
    fn test_syr_spr_agree() {
        let x = vec![1.0f64, 2.0, -1.0];
        for layout in LAYOUTS {
            for uplo in UPLOS {
                let mut a = vec![0.0f64; 9];
                syr(layout, uplo, 3, 0.5, &x, 1, &mut a, 3).unwrap();
                let mut ap = vec![0.0f64; 6];
                spr(layout, uplo, 3, 0.5, &x, 1, &mut ap).unwrap();
                for i in 0..3 {
                    for j in 0..3 {
                        let v = a[layout.index(i, j, 3)];
                        if uplo.contains(i, j) {
                            assert_eq!(v, 0.5 * x[i] * x[j]);
                            assert_eq!(ap[packed_index(layout, uplo, 3, i, j)], v);
                        } else {
                            assert_eq!(v, 0.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rank2_updates() {
        let x = vec![c(1.0, 0.0), c(0.0, 1.0)];
        let y = vec![c(2.0, 1.0), c(1.0, -1.0)];
        let alpha = c(0.5, 1.0);
        for layout in LAYOUTS {
            for uplo in UPLOS {
                let mut a = vec![c(0.0, 0.0); 4];
                her2(layout, uplo, 2, alpha, &x, 1, &y, 1, &mut a, 2).unwrap();
                let mut ap = vec![c(0.0, 0.0); 3];
                hpr2(layout, uplo, 2, alpha, &x, 1, &y, 1, &mut ap).unwrap();
                let mut s = vec![c(0.0, 0.0); 4];
                syr2(layout, uplo, 2, alpha, &x, 1, &y, 1, &mut s, 2).unwrap();
                let mut sp = vec![c(0.0, 0.0); 3];
                spr2(layout, uplo, 2, alpha, &x, 1, &y, 1, &mut sp).unwrap();
                for i in 0..2 {
                    for j in 0..2 {
                        if !uplo.contains(i, j) {
                            continue;
                        }
                        let mut h = alpha * x[i] * y[j].conj() + alpha.conj() * y[i] * x[j].conj();
                        if i == j {
                            assert_relative_eq!(h.im, 0.0, epsilon = 1e-12);
                            h.im = 0.0;
                        }
                        let k = packed_index(layout, uplo, 2, i, j);
                        assert_eq!(a[layout.index(i, j, 2)], h);
                        assert_eq!(ap[k], h);
                        let sym = alpha * (x[i] * y[j] + y[i] * x[j]);
                        assert_eq!(s[layout.index(i, j, 2)], sym);
                        assert_eq!(sp[k], sym);
                    }
                }
            }
        }
    }

    #[test]
    fn test_packed_buffer_too_small() {
        let ap = vec![0.0f64; 5];
        let x = vec![0.0f64; 3];
        let mut y = vec![0.0f64; 3];
        let err = spmv(
            Layout::ColMajor,
            Uplo::Upper,
            3,
            1.0,
            &ap,
            &x,
            1,
            0.0,
            &mut y,
            1,
        )
        .unwrap_err();
        assert_eq!(err.position(), 5);
    }
}
