//! BLAS Level 1: Vector-vector operations.
//!
//! Every routine is generic over the element type and accepts signed
//! increments. A negative increment walks the slice backwards, starting
//! from the element at `(n - 1) * |inc|`; index `i` still denotes the i-th
//! logical element. Zero increments are rejected.

use densela_core::error::Result;
use densela_core::scalar::{RealScalar, Scalar};
use densela_core::validate::Gate;
use densela_core::vector::{StridedVec, StridedVecMut};
use num_traits::{Float, One, Zero};

// ============================================================================
// Shared kernels (also used by Level 2/3)
// ============================================================================

#[inline]
pub(crate) fn dot_kernel<T: Scalar>(x: StridedVec<'_, T>, y: StridedVec<'_, T>, conj: bool) -> T {
    match (x.as_contiguous(), y.as_contiguous()) {
        (Some(xs), Some(ys)) => xs
            .iter()
            .zip(ys)
            .fold(T::zero(), |acc, (&a, &b)| acc + a.conj_if(conj) * b),
        _ => (0..x.len()).fold(T::zero(), |acc, i| acc + x.get(i).conj_if(conj) * y.get(i)),
    }
}

#[inline]
pub(crate) fn axpy_kernel<T: Scalar>(alpha: T, x: StridedVec<'_, T>, y: &mut StridedVecMut<'_, T>) {
    if let (Some(xs), Some(ys)) = (x.as_contiguous(), y.as_contiguous_mut()) {
        for (yi, &xi) in ys.iter_mut().zip(xs) {
            *yi += alpha * xi;
        }
        return;
    }
    for i in 0..x.len() {
        *y.at_mut(i) += alpha * x.get(i);
    }
}

#[inline]
pub(crate) fn scal_kernel<T: Scalar>(alpha: T, x: &mut StridedVecMut<'_, T>) {
    x.for_each_mut(|_, v| *v *= alpha);
}

// ============================================================================
// DOT: inner products
// ============================================================================

/// Unconjugated dot product: `Σ x[i] * y[i]`.
pub fn dot<T: Scalar>(n: usize, x: &[T], incx: isize, y: &[T], incy: isize) -> Result<T> {
    let gate = Gate::new("dot");
    gate.vector(2, "x", x, n, incx)?;
    gate.vector(4, "y", y, n, incy)?;
    Ok(dot_kernel(
        StridedVec::new(x, n, incx),
        StridedVec::new(y, n, incy),
        false,
    ))
}

/// Alias of [`dot`] matching the CBLAS complex spelling.
#[inline]
pub fn dotu<T: Scalar>(n: usize, x: &[T], incx: isize, y: &[T], incy: isize) -> Result<T> {
    dot(n, x, incx, y, incy)
}

/// Conjugated dot product: `Σ conj(x[i]) * y[i]`. Same as [`dot`] for real types.
pub fn dotc<T: Scalar>(n: usize, x: &[T], incx: isize, y: &[T], incy: isize) -> Result<T> {
    let gate = Gate::new("dotc");
    gate.vector(2, "x", x, n, incx)?;
    gate.vector(4, "y", y, n, incy)?;
    Ok(dot_kernel(
        StridedVec::new(x, n, incx),
        StridedVec::new(y, n, incy),
        true,
    ))
}

/// `alpha + Σ x[i] * y[i]` with the running sum carried in f64 and narrowed
/// to f32 once at the end.
pub fn sdsdot(n: usize, alpha: f32, x: &[f32], incx: isize, y: &[f32], incy: isize) -> Result<f32> {
    let gate = Gate::new("sdsdot");
    gate.vector(3, "x", x, n, incx)?;
    gate.vector(5, "y", y, n, incy)?;
    let x = StridedVec::new(x, n, incx);
    let y = StridedVec::new(y, n, incy);
    let sum = (0..n).fold(alpha.widen(), |acc, i| {
        acc + x.get(i).widen() * y.get(i).widen()
    });
    Ok(f32::narrow(sum))
}

/// `Σ x[i] * y[i]` over f32 inputs, accumulated and returned in f64.
pub fn dsdot(n: usize, x: &[f32], incx: isize, y: &[f32], incy: isize) -> Result<f64> {
    let gate = Gate::new("dsdot");
    gate.vector(2, "x", x, n, incx)?;
    gate.vector(4, "y", y, n, incy)?;
    let x = StridedVec::new(x, n, incx);
    let y = StridedVec::new(y, n, incy);
    Ok((0..n).fold(0.0f64, |acc, i| {
        acc + x.get(i).widen() * y.get(i).widen()
    }))
}

// ============================================================================
// NRM2 / ASUM / IAMAX
// ============================================================================

/// Euclidean norm `||x||_2`.
///
/// Uses a running scale so that no intermediate square overflows when the
/// norm itself is representable. Complex elements contribute their real and
/// imaginary parts as separate components.
pub fn nrm2<T: Scalar>(n: usize, x: &[T], incx: isize) -> Result<T::Real> {
    Gate::new("nrm2").vector(2, "x", x, n, incx)?;
    let x = StridedVec::new(x, n, incx);

    let zero = T::Real::zero();
    let one = T::Real::one();
    let mut scale = zero;
    let mut ssq = one;
    let mut accumulate = |component: T::Real| {
        if component != zero {
            let a = component.abs();
            if scale < a {
                let r = scale / a;
                ssq = one + ssq * r * r;
                scale = a;
            } else {
                let r = a / scale;
                ssq += r * r;
            }
        }
    };
    for v in x.iter() {
        accumulate(v.re());
        if T::IS_COMPLEX {
            accumulate(v.im());
        }
    }
    Ok(scale * ssq.sqrt())
}

/// Sum of magnitudes `Σ (|re x[i]| + |im x[i]|)`.
///
/// For complex vectors this is deliberately not the sum of moduli.
pub fn asum<T: Scalar>(n: usize, x: &[T], incx: isize) -> Result<T::Real> {
    Gate::new("asum").vector(2, "x", x, n, incx)?;
    let x = StridedVec::new(x, n, incx);
    Ok(x.iter().fold(T::Real::zero(), |acc, v| acc + v.abs1()))
}

/// Index of the first element with the largest `|re| + |im|`.
///
/// Returns 0 for an empty vector without reading it.
pub fn iamax<T: Scalar>(n: usize, x: &[T], incx: isize) -> Result<usize> {
    Gate::new("iamax").vector(2, "x", x, n, incx)?;
    if n == 0 {
        return Ok(0);
    }
    let x = StridedVec::new(x, n, incx);
    let mut max_idx = 0;
    let mut max_val = x.get(0).abs1();
    for i in 1..n {
        let v = x.get(i).abs1();
        if v > max_val {
            max_val = v;
            max_idx = i;
        }
    }
    Ok(max_idx)
}

// ============================================================================
// SWAP / COPY / SCAL / AXPY
// ============================================================================

/// `x <-> y`.
pub fn swap<T: Scalar>(n: usize, x: &mut [T], incx: isize, y: &mut [T], incy: isize) -> Result<()> {
    let gate = Gate::new("swap");
    gate.vector(2, "x", x, n, incx)?;
    gate.vector(4, "y", y, n, incy)?;
    if incx == 1 && incy == 1 {
        x[..n].swap_with_slice(&mut y[..n]);
        return Ok(());
    }
    let mut x = StridedVecMut::new(x, n, incx);
    let mut y = StridedVecMut::new(y, n, incy);
    for i in 0..n {
        std::mem::swap(x.at_mut(i), y.at_mut(i));
    }
    Ok(())
}

/// `y := x`.
pub fn copy<T: Scalar>(n: usize, x: &[T], incx: isize, y: &mut [T], incy: isize) -> Result<()> {
    let gate = Gate::new("copy");
    gate.vector(2, "x", x, n, incx)?;
    gate.vector(4, "y", y, n, incy)?;
    if incx == 1 && incy == 1 {
        y[..n].copy_from_slice(&x[..n]);
        return Ok(());
    }
    let x = StridedVec::new(x, n, incx);
    let mut y = StridedVecMut::new(y, n, incy);
    y.for_each_mut(|i, v| *v = x.get(i));
    Ok(())
}

/// `x := alpha * x`.
pub fn scal<T: Scalar>(n: usize, alpha: T, x: &mut [T], incx: isize) -> Result<()> {
    Gate::new("scal").vector(3, "x", x, n, incx)?;
    if alpha == T::one() {
        return Ok(());
    }
    scal_kernel(alpha, &mut StridedVecMut::new(x, n, incx));
    Ok(())
}

/// `x := alpha * x` with a real `alpha` (`csscal`, `zdscal`).
pub fn rscal<T: Scalar>(n: usize, alpha: T::Real, x: &mut [T], incx: isize) -> Result<()> {
    Gate::new("rscal").vector(3, "x", x, n, incx)?;
    if alpha == T::Real::one() {
        return Ok(());
    }
    StridedVecMut::new(x, n, incx).for_each_mut(|_, v| *v = v.mul_real(alpha));
    Ok(())
}

/// `y := alpha * x + y`.
pub fn axpy<T: Scalar>(
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &mut [T],
    incy: isize,
) -> Result<()> {
    let gate = Gate::new("axpy");
    gate.vector(3, "x", x, n, incx)?;
    gate.vector(5, "y", y, n, incy)?;
    if alpha == T::zero() {
        return Ok(());
    }
    axpy_kernel(
        alpha,
        StridedVec::new(x, n, incx),
        &mut StridedVecMut::new(y, n, incy),
    );
    Ok(())
}

// ============================================================================
// Plane rotations
// ============================================================================

/// Apply a plane rotation: `x := c*x + s*y`, `y := c*y - s*x`.
pub fn rot<T: Scalar>(
    n: usize,
    x: &mut [T],
    incx: isize,
    y: &mut [T],
    incy: isize,
    c: T::Real,
    s: T::Real,
) -> Result<()> {
    let gate = Gate::new("rot");
    gate.vector(2, "x", x, n, incx)?;
    gate.vector(4, "y", y, n, incy)?;
    let mut x = StridedVecMut::new(x, n, incx);
    let mut y = StridedVecMut::new(y, n, incy);
    for i in 0..n {
        let (xi, yi) = (x.get(i), y.get(i));
        x.set(i, xi.mul_real(c) + yi.mul_real(s));
        y.set(i, yi.mul_real(c) - xi.mul_real(s));
    }
    Ok(())
}

/// Result of [`rotg`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Givens<R> {
    /// `±sqrt(a² + b²)`, signed like the larger of `a`, `b`.
    pub r: R,
    /// Reconstruction value: `s` if `|a| > |b|`, else `1/c` (or 1 when `c = 0`).
    pub z: R,
    pub c: R,
    pub s: R,
}

/// Construct a Givens rotation zeroing `b`:
/// `[c s; -s c] * [a; b] = [r; 0]`.
///
/// `b = 0` gives `c = 1, s = 0`; `a = 0` gives `c = 0, s = 1`.
pub fn rotg<R: RealScalar>(a: R, b: R) -> Givens<R> {
    let zero = R::zero();
    let one = R::one();
    let roe = if a.abs() > b.abs() { a } else { b };
    let scale = a.abs() + b.abs();
    if scale == zero {
        return Givens {
            r: zero,
            z: zero,
            c: one,
            s: zero,
        };
    }
    let (as_, bs) = (a / scale, b / scale);
    let mut r = scale * (as_ * as_ + bs * bs).sqrt();
    if roe < zero {
        r = -r;
    }
    let c = a / r;
    let s = b / r;
    let z = if a.abs() > b.abs() {
        s
    } else if c != zero {
        one / c
    } else {
        one
    };
    Givens { r, z, c, s }
}

/// The modified rotation matrix `H` encoded in a `rotm` parameter array.
///
/// `param = [flag, h11, h21, h12, h22]`; the flag picks which entries are
/// implicit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifiedRotation<R> {
    /// flag = -2: `H = I`.
    Identity,
    /// flag = -1: every entry explicit.
    Full { h11: R, h21: R, h12: R, h22: R },
    /// flag = 0: `h11 = h22 = 1`.
    OffDiagonal { h21: R, h12: R },
    /// flag = 1: `h12 = 1`, `h21 = -1`.
    Diagonal { h11: R, h22: R },
}

impl<R: RealScalar> ModifiedRotation<R> {
    pub fn from_param(param: &[R; 5]) -> Self {
        let flag = param[0];
        let two = R::one() + R::one();
        if flag == -two {
            ModifiedRotation::Identity
        } else if flag < R::zero() {
            ModifiedRotation::Full {
                h11: param[1],
                h21: param[2],
                h12: param[3],
                h22: param[4],
            }
        } else if flag == R::zero() {
            ModifiedRotation::OffDiagonal {
                h21: param[2],
                h12: param[3],
            }
        } else {
            ModifiedRotation::Diagonal {
                h11: param[1],
                h22: param[4],
            }
        }
    }

    /// Apply to one pair `(x, y)`.
    #[inline(always)]
    pub fn apply(self, x: R, y: R) -> (R, R) {
        match self {
            ModifiedRotation::Identity => (x, y),
            ModifiedRotation::Full { h11, h21, h12, h22 } => (x * h11 + y * h12, x * h21 + y * h22),
            ModifiedRotation::OffDiagonal { h21, h12 } => (x + y * h12, x * h21 + y),
            ModifiedRotation::Diagonal { h11, h22 } => (x * h11 + y, -x + y * h22),
        }
    }
}

/// Apply a modified Givens rotation: `[x_i; y_i] := H * [x_i; y_i]`.
pub fn rotm<R: RealScalar>(
    n: usize,
    x: &mut [R],
    incx: isize,
    y: &mut [R],
    incy: isize,
    param: &[R; 5],
) -> Result<()> {
    let gate = Gate::new("rotm");
    gate.vector(2, "x", x, n, incx)?;
    gate.vector(4, "y", y, n, incy)?;
    let h = ModifiedRotation::from_param(param);
    if h == ModifiedRotation::Identity {
        return Ok(());
    }
    let mut x = StridedVecMut::new(x, n, incx);
    let mut y = StridedVecMut::new(y, n, incy);
    for i in 0..n {
        let (xi, yi) = h.apply(x.get(i), y.get(i));
        x.set(i, xi);
        y.set(i, yi);
    }
    Ok(())
}

/// Construct the modified Givens rotation that zeroes the second component
/// of `(sqrt(d1) * x1, sqrt(d2) * y1)`.
///
/// Updates `d1`, `d2`, `x1` in place and returns the `rotm` parameter array.
/// The scale factors are kept within `[1/4096², 4096²]` by rescaling `H`.
pub fn rotmg<R: RealScalar>(d1: &mut R, d2: &mut R, x1: &mut R, y1: R) -> [R; 5] {
    let zero = R::zero();
    let one = R::one();
    let gam = R::narrow(4096.0);
    let gamsq = R::narrow(16_777_216.0);
    let rgamsq = R::narrow(5.960_464_5e-8);

    let mut flag;
    let (mut h11, mut h12, mut h21, mut h22) = (zero, zero, zero, zero);

    if *d1 < zero {
        flag = -one;
        *d1 = zero;
        *d2 = zero;
        *x1 = zero;
    } else {
        let p2 = *d2 * y1;
        if p2 == zero {
            let mut param = [zero; 5];
            param[0] = -(one + one);
            return param;
        }
        let p1 = *d1 * *x1;
        let q2 = p2 * y1;
        let q1 = p1 * *x1;

        if q1.abs() > q2.abs() {
            h21 = -y1 / *x1;
            h12 = p2 / p1;
            let u = one - h12 * h21;
            if u > zero {
                flag = zero;
                *d1 = *d1 / u;
                *d2 = *d2 / u;
                *x1 = *x1 * u;
            } else {
                // Only reachable through rounding.
                flag = -one;
                h11 = zero;
                h12 = zero;
                h21 = zero;
                h22 = zero;
                *d1 = zero;
                *d2 = zero;
                *x1 = zero;
            }
        } else if q2 < zero {
            flag = -one;
            *d1 = zero;
            *d2 = zero;
            *x1 = zero;
        } else {
            flag = one;
            h11 = p1 / p2;
            h22 = *x1 / y1;
            let u = one + h11 * h22;
            let temp = *d2 / u;
            *d2 = *d1 / u;
            *d1 = temp;
            *x1 = y1 * u;
        }

        // Make the implicit entries of H explicit before rescaling it.
        let make_explicit = |flag: &mut R, h11: &mut R, h12: &mut R, h21: &mut R, h22: &mut R| {
            if *flag == zero {
                *h11 = one;
                *h22 = one;
            } else if *flag > zero {
                *h21 = -one;
                *h12 = one;
            }
            *flag = -one;
        };

        if *d1 != zero {
            while *d1 <= rgamsq || *d1 >= gamsq {
                make_explicit(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if *d1 <= rgamsq {
                    *d1 = *d1 * gam * gam;
                    *x1 = *x1 / gam;
                    h11 = h11 / gam;
                    h12 = h12 / gam;
                } else {
                    *d1 = *d1 / (gam * gam);
                    *x1 = *x1 * gam;
                    h11 = h11 * gam;
                    h12 = h12 * gam;
                }
            }
        }

        if *d2 != zero {
            while d2.abs() <= rgamsq || d2.abs() >= gamsq {
                make_explicit(&mut flag, &mut h11, &mut h12, &mut h21, &mut h22);
                if d2.abs() <= rgamsq {
                    *d2 = *d2 * gam * gam;
                    h21 = h21 / gam;
                    h22 = h22 / gam;
                } else {
                    *d2 = *d2 / (gam * gam);
                    h21 = h21 * gam;
                    h22 = h22 * gam;
                }
            }
        }
    }

    let mut param = [zero; 5];
    param[0] = flag;
    if flag < zero {
        param[1] = h11;
        param[2] = h21;
        param[3] = h12;
        param[4] = h22;
    } else if flag == zero {
        param[2] = h21;
        param[3] = h12;
    } else {
        param[1] = h11;
        param[4] = h22;
    }
    param
}
