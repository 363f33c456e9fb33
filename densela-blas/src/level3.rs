//! BLAS Level 3: Matrix-matrix operations.
//!
//! GEMM is the only routine that splits work across threads: for outputs
//! larger than [`KernelConfig::parallel_threshold`] the rows of C are
//! partitioned across scoped workers. Each worker scales and accumulates its
//! own rows, so no element is ever written by two workers and every worker
//! has joined before the call returns.
//!
//! Triangular products and solves reuse the Level 2 triangular kernels on
//! each column (left side) or row (right side) of B.

use densela_core::config::KernelConfig;
use densela_core::error::Result;
use densela_core::layout::{Diag, Flag, Layout, Side, Transpose, Uplo};
use densela_core::matrix::{Dense, DenseMut, MatrixAccess, MatrixAccessMut, OpView, SymView};
use densela_core::parallel::{parallel_for_chunks, SendMutPtr};
use densela_core::scalar::Scalar;
use densela_core::validate::Gate;
use densela_core::vector::StridedVecMut;
use num_traits::{One, Zero};

use crate::level2::{effective_uplo, tri_mv_kernel, tri_sv_kernel};

// ============================================================================
// Shared product kernel
// ============================================================================

/// `C := alpha * A * B + beta * C` for logical `m x k` and `k x n` operands.
///
/// Rows of C are split across `config` workers. Each element is scaled by
/// `beta` before its own worker adds the product term.
fn product_into<T, A, B>(
    config: &KernelConfig,
    routine: &'static str,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &A,
    b: &B,
    beta: T,
    layout: Layout,
    c: &mut [T],
    ldc: usize,
) where
    T: Scalar,
    A: MatrixAccess<T> + Sync,
    B: MatrixAccess<T> + Sync,
{
    if m == 0 || n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }
    let accumulate = alpha != T::zero() && k != 0;
    let threads = config.threads_for(m * n, m);
    if threads > 1 {
        tracing::trace!(
            routine,
            m,
            n,
            k,
            threads,
            "splitting output rows across workers"
        );
    }

    let c_ptr = SendMutPtr::new(c);
    parallel_for_chunks(0, m, threads, |row_start, row_end| {
        for i in row_start..row_end {
            for j in 0..n {
                let term = if accumulate {
                    let mut sum = T::zero();
                    for p in 0..k {
                        sum += a.at(i, p) * b.at(p, j);
                    }
                    alpha * sum
                } else {
                    T::zero()
                };
                // Safety: this worker is the only one touching rows [row_start, row_end).
                unsafe {
                    c_ptr.update(layout.index(i, j, ldc), |cij| {
                        let scaled = if beta == T::zero() { T::zero() } else { beta * cij };
                        scaled + term
                    });
                }
            }
        }
    });
}

/// Update only the `uplo` triangle of an `n x n` C:
/// `C(i, j) := beta * C(i, j) + term(i, j)`.
///
/// `beta = 0` discards the old contents without reading them; with
/// `hermitian` set the diagonal is stored real.
fn triangle_product<T, F>(
    c: &mut DenseMut<'_, T>,
    uplo: Uplo,
    n: usize,
    beta: T,
    hermitian: bool,
    term: F,
) where
    T: Scalar,
    F: Fn(usize, usize) -> T,
{
    for i in 0..n {
        let (start, end) = uplo.row_span(i, n);
        for j in start..end {
            let scaled = if beta == T::zero() {
                T::zero()
            } else {
                beta * c.at(i, j)
            };
            let v = scaled + term(i, j);
            *c.at_mut(i, j) = if hermitian && i == j { v.real_part() } else { v };
        }
    }
}

/// Column `j` of an `m`-row dense matrix as a strided vector.
fn column_mut<T: Scalar>(
    data: &mut [T],
    layout: Layout,
    ld: usize,
    j: usize,
    m: usize,
) -> StridedVecMut<'_, T> {
    match layout {
        Layout::ColMajor => StridedVecMut::new(&mut data[j * ld..], m, 1),
        Layout::RowMajor => StridedVecMut::new(&mut data[j..], m, ld as isize),
    }
}

/// Row `i` of an `n`-column dense matrix as a strided vector.
fn row_mut<T: Scalar>(
    data: &mut [T],
    layout: Layout,
    ld: usize,
    i: usize,
    n: usize,
) -> StridedVecMut<'_, T> {
    match layout {
        Layout::ColMajor => StridedVecMut::new(&mut data[i..], n, ld as isize),
        Layout::RowMajor => StridedVecMut::new(&mut data[i * ld..], n, 1),
    }
}

/// `B := alpha * B`, clearing instead of reading when `alpha = 0`.
fn scale_matrix<T: Scalar>(b: &mut DenseMut<'_, T>, m: usize, n: usize, alpha: T) {
    if alpha == T::one() {
        return;
    }
    for i in 0..m {
        for j in 0..n {
            let v = b.at_mut(i, j);
            *v = if alpha == T::zero() { T::zero() } else { alpha * *v };
        }
    }
}

// ============================================================================
// GEMM: General Matrix Multiply
// C := alpha * op(A) * op(B) + beta * C
// ============================================================================

/// General matrix multiply using the process-wide [`KernelConfig`].
///
/// `C := alpha * op(A) * op(B) + beta * C` with `op(A)` of shape `m x k`
/// and `op(B)` of shape `k x n`.
pub fn gemm<T: Scalar>(
    layout: Layout,
    transa: Transpose,
    transb: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    gemm_with_config(
        KernelConfig::global(),
        layout,
        transa,
        transb,
        m,
        n,
        k,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    )
}

/// [`gemm`] with an explicit thread-splitting policy.
///
/// Error positions refer to the [`gemm`] signature (`config` is not
/// counted).
pub fn gemm_with_config<T: Scalar>(
    config: &KernelConfig,
    layout: Layout,
    transa: Transpose,
    transb: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    let gate = Gate::new("gemm");
    let (a_rows, a_cols) = transa.apply_dims(m, k);
    gate.matrix(8, "a", a, layout, a_rows, a_cols, lda)?;
    let (b_rows, b_cols) = transb.apply_dims(k, n);
    gate.matrix(10, "b", b, layout, b_rows, b_cols, ldb)?;
    gate.matrix(13, "c", c, layout, m, n, ldc)?;

    let op_a = OpView::new(Dense::new(a, layout, lda), transa);
    let op_b = OpView::new(Dense::new(b, layout, ldb), transb);
    product_into(
        config, "gemm", m, n, k, alpha, &op_a, &op_b, beta, layout, c, ldc,
    );
    Ok(())
}

// ============================================================================
// SYMM / HEMM: Symmetric and Hermitian matrix multiply
// C := alpha * A * B + beta * C  (Left)   or   alpha * B * A + beta * C  (Right)
// ============================================================================

fn structured_product<T: Scalar>(
    gate: Gate,
    hermitian: bool,
    layout: Layout,
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    let order = match side {
        Side::Left => m,
        Side::Right => n,
    };
    gate.matrix(7, "a", a, layout, order, order, lda)?;
    gate.matrix(9, "b", b, layout, m, n, ldb)?;
    gate.matrix(12, "c", c, layout, m, n, ldc)?;

    let stored = Dense::new(a, layout, lda);
    let sym = if hermitian {
        SymView::hermitian(stored, uplo)
    } else {
        SymView::symmetric(stored, uplo)
    };
    let dense_b = Dense::new(b, layout, ldb);
    let config = KernelConfig::global();
    match side {
        Side::Left => product_into(
            config, gate.routine(), m, n, m, alpha, &sym, &dense_b, beta, layout, c, ldc,
        ),
        Side::Right => product_into(
            config, gate.routine(), m, n, n, alpha, &dense_b, &sym, beta, layout, c, ldc,
        ),
    }
    Ok(())
}

/// Symmetric matrix multiply; only the `uplo` triangle of `A` is read.
///
/// `A` is `m x m` for `Side::Left` and `n x n` for `Side::Right`.
pub fn symm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    structured_product(
        Gate::new("symm"),
        false,
        layout,
        side,
        uplo,
        m,
        n,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    )
}

/// Hermitian matrix multiply; the imaginary part of the stored diagonal is
/// ignored.
pub fn hemm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    structured_product(
        Gate::new("hemm"),
        true,
        layout,
        side,
        uplo,
        m,
        n,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    )
}

// ============================================================================
// SYRK / HERK: Rank-k updates
// C := alpha * A * A' + beta * C  or  C := alpha * A' * A + beta * C
// ============================================================================

/// Check a rank-k operand: `op` is `n x k`, so the stored matrix is `n x k`
/// for `NoTrans` and `k x n` otherwise.
fn rank_k_operand<T>(
    gate: &Gate,
    position: usize,
    name: &'static str,
    buf: &[T],
    layout: Layout,
    trans: Transpose,
    n: usize,
    k: usize,
    ld: usize,
) -> Result<()> {
    let (rows, cols) = trans.apply_dims(n, k);
    gate.matrix(position, name, buf, layout, rows, cols, ld)
}

/// Symmetric rank-k update of the `uplo` triangle of C.
///
/// `trans = NoTrans` computes `alpha * A * A^T`, otherwise `alpha * A^T * A`.
/// Complex element types reject `ConjTrans`.
pub fn syrk<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    let gate = Gate::new("syrk");
    if T::IS_COMPLEX && trans == Transpose::ConjTrans {
        return Err(gate.reject_flag(3, "trans", Transpose::NAME, trans.code()));
    }
    rank_k_operand(&gate, 7, "a", a, layout, trans, n, k, lda)?;
    gate.matrix(10, "c", c, layout, n, n, ldc)?;
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return Ok(());
    }

    let live = alpha != T::zero();
    let p = OpView::with_flags(Dense::new(a, layout, lda), trans.swaps(), false);
    let mut c = DenseMut::new(c, layout, ldc);
    triangle_product(&mut c, uplo, n, beta, false, |i, j| {
        if !live {
            return T::zero();
        }
        alpha * (0..k).map(|l| p.at(i, l) * p.at(j, l)).sum::<T>()
    });
    Ok(())
}

/// Hermitian rank-k update of the `uplo` triangle of C with real `alpha`
/// and `beta`.
///
/// `trans = NoTrans` computes `alpha * A * A^H`, otherwise `alpha * A^H * A`.
/// Complex element types reject `Trans`. The diagonal of C is stored real.
pub fn herk<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T::Real,
    a: &[T],
    lda: usize,
    beta: T::Real,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    let gate = Gate::new("herk");
    if T::IS_COMPLEX && trans == Transpose::Trans {
        return Err(gate.reject_flag(3, "trans", Transpose::NAME, trans.code()));
    }
    rank_k_operand(&gate, 7, "a", a, layout, trans, n, k, lda)?;
    gate.matrix(10, "c", c, layout, n, n, ldc)?;
    let zero = T::Real::zero();
    if n == 0 || ((alpha == zero || k == 0) && beta == T::Real::one()) {
        return Ok(());
    }

    let live = alpha != zero;
    // For ConjTrans, p(i, l) = conj(a(l, i)); the product below then
    // yields A^H * A.
    let p = OpView::new(Dense::new(a, layout, lda), trans);
    let mut c = DenseMut::new(c, layout, ldc);
    triangle_product(&mut c, uplo, n, T::from_real(beta), true, |i, j| {
        if !live {
            return T::zero();
        }
        (0..k)
            .map(|l| p.at(i, l) * p.at(j, l).conj())
            .sum::<T>()
            .mul_real(alpha)
    });
    Ok(())
}

// ============================================================================
// SYR2K / HER2K: Rank-2k updates
// ============================================================================

/// Symmetric rank-2k update of the `uplo` triangle of C:
/// `alpha * A * B^T + alpha * B * A^T + beta * C` for `NoTrans`,
/// `alpha * A^T * B + alpha * B^T * A + beta * C` otherwise.
///
/// Complex element types reject `ConjTrans`.
pub fn syr2k<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    let gate = Gate::new("syr2k");
    if T::IS_COMPLEX && trans == Transpose::ConjTrans {
        return Err(gate.reject_flag(3, "trans", Transpose::NAME, trans.code()));
    }
    rank_k_operand(&gate, 7, "a", a, layout, trans, n, k, lda)?;
    rank_k_operand(&gate, 9, "b", b, layout, trans, n, k, ldb)?;
    gate.matrix(12, "c", c, layout, n, n, ldc)?;
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return Ok(());
    }

    let live = alpha != T::zero();
    let p = OpView::with_flags(Dense::new(a, layout, lda), trans.swaps(), false);
    let q = OpView::with_flags(Dense::new(b, layout, ldb), trans.swaps(), false);
    let mut c = DenseMut::new(c, layout, ldc);
    triangle_product(&mut c, uplo, n, beta, false, |i, j| {
        if !live {
            return T::zero();
        }
        alpha
            * (0..k)
                .map(|l| p.at(i, l) * q.at(j, l) + q.at(i, l) * p.at(j, l))
                .sum::<T>()
    });
    Ok(())
}

/// Hermitian rank-2k update of the `uplo` triangle of C with complex
/// `alpha` and real `beta`:
/// `alpha * A * B^H + conj(alpha) * B * A^H + beta * C` for `NoTrans`,
/// `alpha * A^H * B + conj(alpha) * B^H * A + beta * C` for `ConjTrans`.
///
/// Complex element types reject `Trans`. The diagonal of C is stored real.
pub fn her2k<T: Scalar>(
    layout: Layout,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T::Real,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    let gate = Gate::new("her2k");
    if T::IS_COMPLEX && trans == Transpose::Trans {
        return Err(gate.reject_flag(3, "trans", Transpose::NAME, trans.code()));
    }
    rank_k_operand(&gate, 7, "a", a, layout, trans, n, k, lda)?;
    rank_k_operand(&gate, 9, "b", b, layout, trans, n, k, ldb)?;
    gate.matrix(12, "c", c, layout, n, n, ldc)?;
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::Real::one()) {
        return Ok(());
    }

    let live = alpha != T::zero();
    let p = OpView::new(Dense::new(a, layout, lda), trans);
    let q = OpView::new(Dense::new(b, layout, ldb), trans);
    let alpha_conj = alpha.conj();
    let mut c = DenseMut::new(c, layout, ldc);
    triangle_product(&mut c, uplo, n, T::from_real(beta), true, |i, j| {
        if !live {
            return T::zero();
        }
        let pq: T = (0..k).map(|l| p.at(i, l) * q.at(j, l).conj()).sum();
        let qp: T = (0..k).map(|l| q.at(i, l) * p.at(j, l).conj()).sum();
        alpha * pq + alpha_conj * qp
    });
    Ok(())
}

// ============================================================================
// TRMM / TRSM: Triangular multiply and solve
// ============================================================================

/// Validation and setup shared by [`trmm`] and [`trsm`]. Returns `false`
/// when nothing is left to compute.
fn triangular_prologue<T: Scalar>(
    gate: Gate,
    layout: Layout,
    side: Side,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) -> Result<bool> {
    let order = match side {
        Side::Left => m,
        Side::Right => n,
    };
    gate.matrix(9, "a", a, layout, order, order, lda)?;
    gate.matrix(11, "b", b, layout, m, n, ldb)?;
    if m == 0 || n == 0 {
        return Ok(false);
    }
    scale_matrix(&mut DenseMut::new(b, layout, ldb), m, n, alpha);
    Ok(alpha != T::zero())
}

/// Apply `kernel` with `op(A)` (left side) to every column of B, or with
/// `op(A)^T` (right side) to every row of B.
fn for_each_line<'a, T, K>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    transa: Transpose,
    m: usize,
    n: usize,
    a: &'a [T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
    kernel: K,
) where
    T: Scalar,
    K: Fn(&OpView<Dense<'a, T>>, Uplo, usize, &mut StridedVecMut<'_, T>),
{
    let stored = Dense::new(a, layout, lda);
    match side {
        Side::Left => {
            let op_a = OpView::new(stored, transa);
            let op_uplo = effective_uplo(uplo, transa);
            for j in 0..n {
                kernel(&op_a, op_uplo, m, &mut column_mut(b, layout, ldb, j, m));
            }
        }
        Side::Right => {
            // X * op(A) on a row equals op(A)^T applied to that row as a column.
            let swap = !transa.swaps();
            let op_t = OpView::with_flags(stored, swap, transa.conjugates());
            let op_uplo = if swap { uplo.flip() } else { uplo };
            for i in 0..m {
                kernel(&op_t, op_uplo, n, &mut row_mut(b, layout, ldb, i, n));
            }
        }
    }
}

/// Triangular matrix multiply:
/// `B := alpha * op(A) * B` (`Side::Left`) or `B := alpha * B * op(A)`
/// (`Side::Right`).
pub fn trmm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    transa: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) -> Result<()> {
    let gate = Gate::new("trmm");
    if !triangular_prologue(gate, layout, side, m, n, alpha, a, lda, b, ldb)? {
        return Ok(());
    }
    for_each_line(
        layout,
        side,
        uplo,
        transa,
        m,
        n,
        a,
        lda,
        b,
        ldb,
        |op_a, op_uplo, order, line| tri_mv_kernel(op_a, op_uplo, diag, order, order, line),
    );
    Ok(())
}

/// Triangular solve with multiple right-hand sides:
/// `op(A) * X = alpha * B` (`Side::Left`) or `X * op(A) = alpha * B`
/// (`Side::Right`); X overwrites B.
pub fn trsm<T: Scalar>(
    layout: Layout,
    side: Side,
    uplo: Uplo,
    transa: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) -> Result<()> {
    let gate = Gate::new("trsm");
    if !triangular_prologue(gate, layout, side, m, n, alpha, a, lda, b, ldb)? {
        return Ok(());
    }
    for_each_line(
        layout,
        side,
        uplo,
        transa,
        m,
        n,
        a,
        lda,
        b,
        ldb,
        |op_a, op_uplo, order, line| tri_sv_kernel(op_a, op_uplo, diag, order, order, line),
    );
    Ok(())
}
