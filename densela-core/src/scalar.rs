//! Element types the kernels are generic over.
//!
//! The four precision families (f32, f64, Complex<f32>, Complex<f64>) share
//! every algorithm; they differ only in the primitives collected here.

use num_complex::Complex;
use num_traits::{Float, One, Zero};
use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Arithmetic shared by all BLAS element types.
pub trait Scalar:
    Copy
    + Send
    + Sync
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + Sum
    + 'static
{
    /// The underlying real type (`f32` or `f64`).
    type Real: RealScalar;

    /// Whether conjugation is meaningful for this type.
    const IS_COMPLEX: bool;

    fn conj(self) -> Self;

    fn re(self) -> Self::Real;

    fn im(self) -> Self::Real;

    fn from_real(re: Self::Real) -> Self;

    /// `|re| + |im|`, the magnitude used by `asum` and `iamax`.
    fn abs1(self) -> Self::Real;

    /// Multiply by a real factor.
    fn mul_real(self, r: Self::Real) -> Self;

    #[inline(always)]
    fn conj_if(self, conjugate: bool) -> Self {
        if conjugate {
            self.conj()
        } else {
            self
        }
    }

    /// Drop the imaginary part. Used for Hermitian diagonals.
    #[inline(always)]
    fn real_part(self) -> Self {
        Self::from_real(self.re())
    }
}

/// Real element types; `Real = Self`.
pub trait RealScalar: Scalar<Real = Self> + Float + PartialOrd {
    /// Widen to f64 (used by mixed-precision accumulation).
    fn widen(self) -> f64;

    /// Round an f64 to this precision.
    fn narrow(v: f64) -> Self;
}

macro_rules! impl_real {
    ($t:ty) => {
        impl Scalar for $t {
            type Real = $t;
            const IS_COMPLEX: bool = false;

            #[inline(always)]
            fn conj(self) -> Self {
                self
            }

            #[inline(always)]
            fn re(self) -> $t {
                self
            }

            #[inline(always)]
            fn im(self) -> $t {
                0.0
            }

            #[inline(always)]
            fn from_real(re: $t) -> Self {
                re
            }

            #[inline(always)]
            fn abs1(self) -> $t {
                self.abs()
            }

            #[inline(always)]
            fn mul_real(self, r: $t) -> Self {
                self * r
            }
        }

        impl RealScalar for $t {
            #[inline(always)]
            fn widen(self) -> f64 {
                self as f64
            }

            #[inline(always)]
            fn narrow(v: f64) -> Self {
                v as $t
            }
        }
    };
}

macro_rules! impl_complex {
    ($t:ty) => {
        impl Scalar for Complex<$t> {
            type Real = $t;
            const IS_COMPLEX: bool = true;

            #[inline(always)]
            fn conj(self) -> Self {
                Complex::conj(&self)
            }

            #[inline(always)]
            fn re(self) -> $t {
                self.re
            }

            #[inline(always)]
            fn im(self) -> $t {
                self.im
            }

            #[inline(always)]
            fn from_real(re: $t) -> Self {
                Complex::new(re, 0.0)
            }

            #[inline(always)]
            fn abs1(self) -> $t {
                self.re.abs() + self.im.abs()
            }

            #[inline(always)]
            fn mul_real(self, r: $t) -> Self {
                Complex::new(self.re * r, self.im * r)
            }
        }
    };
}

impl_real!(f32);
impl_real!(f64);
impl_complex!(f32);
impl_complex!(f64);
