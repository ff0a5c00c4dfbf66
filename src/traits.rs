use num_traits::{Float, FloatConst, FromPrimitive, Signed, ToPrimitive};
use std::fmt::{Debug, Display};

/// Tolerance used when deciding whether a scalar is integral
pub(crate) const INTEGER_TOLERANCE: f64 = 1e-10;

/// A trait comprising every operation the engine needs from its scalar type.
///
/// This aggregates `num_traits::Float` (sqrt, ln, log10, trig and hyperbolic
/// functions, `powf`, `trunc`/`fract` as modf, `is_nan`), `FloatConst`
/// (π, e, √2) and the usual conversion/debug traits. `f64` and `f32` both
/// qualify; any other float-like type implementing these traits does too.
pub trait MathScalar:
    Float + FloatConst + FromPrimitive + ToPrimitive + Signed + Debug + Display + Copy + 'static
{
    /// Convert an `f64` literal into this scalar, yielding NaN when it is
    /// not representable.
    fn lit(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }
}

// Blanket implementation for any type that satisfies the bounds
impl<T> MathScalar for T where
    T: Float
        + FloatConst
        + FromPrimitive
        + ToPrimitive
        + Signed
        + Debug
        + Display
        + Copy
        + 'static
{
}

// ===== Float tolerance helpers =====

/// Check whether two scalars agree within an absolute tolerance
#[inline]
pub fn approx_eq<T: MathScalar>(a: T, b: T, tolerance: T) -> bool {
    (a - b).abs() <= tolerance
}

/// Check whether a scalar is (numerically) an integer
#[inline]
pub fn is_integer<T: MathScalar>(x: T) -> bool {
    x.is_finite() && (x - x.round()).abs() < T::lit(INTEGER_TOLERANCE)
}

/// Check whether a scalar is (numerically) an even integer
#[inline]
pub fn is_even_integer<T: MathScalar>(x: T) -> bool {
    is_integer(x) && is_integer(x / T::lit(2.0))
}
