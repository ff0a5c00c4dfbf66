//! Rational approximation for display hints
//!
//! A value such as `1.5707963...` is easier to read as `π/2`. The search
//! walks the Stern–Brocot tree with mediants until a fraction matches the
//! fractional part within tolerance, or the iteration budget runs out. It is
//! run against the raw value and against the value divided or multiplied by
//! π, e and √2; the form with the smallest numerator wins.

use std::fmt;

use tracing::trace;

use crate::DEFAULT_PRECISION;
use crate::traits::{MathScalar, approx_eq};

/// Values beyond this magnitude never get a hint
const MAX_MAGNITUDE: f64 = 1e9;

/// Smallest tolerance ever used, whatever the display precision
const MIN_TOLERANCE: f64 = 1e-12;

/// A reduced fraction with a positive denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Which multiple of a constant a hint expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractionForm {
    /// `p/q`
    Rational,
    /// `pπ/q`
    PiMultiple,
    /// `p/(qπ)`
    PiReciprocal,
    /// `pe/q`
    EMultiple,
    /// `p√2/q`
    Sqrt2Multiple,
}

/// A value rewritten as a simple fraction of 1, π, e or √2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsefulFraction {
    pub fraction: Fraction,
    pub form: FractionForm,
}

/// `numerator·symbol`, dropping a unit coefficient
fn scaled(numerator: i64, symbol: &str) -> String {
    match numerator {
        1 => symbol.to_string(),
        -1 => format!("-{symbol}"),
        n => format!("{n}{symbol}"),
    }
}

impl fmt::Display for UsefulFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Fraction {
            numerator: p,
            denominator: q,
        } = self.fraction;
        let symbol = match self.form {
            FractionForm::Rational => return write!(f, "{}", self.fraction),
            FractionForm::PiReciprocal => {
                return if q == 1 {
                    write!(f, "{p}/\u{3c0}")
                } else {
                    write!(f, "{p}/({q}\u{3c0})")
                };
            }
            FractionForm::PiMultiple => "\u{3c0}",
            FractionForm::EMultiple => "e",
            FractionForm::Sqrt2Multiple => "\u{221a}2",
        };
        f.write_str(&scaled(p, symbol))?;
        if q != 1 {
            write!(f, "/{q}")?;
        }
        Ok(())
    }
}

/// Settings for the mediant search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionSearch {
    /// Largest accepted distance between fraction and value
    pub tolerance: f64,
    /// Number of mediants tried before giving up
    pub max_iterations: usize,
    /// Mediants with a larger denominator end the search
    pub max_denominator: i64,
}

impl Default for FractionSearch {
    fn default() -> Self {
        Self::for_precision(DEFAULT_PRECISION)
    }
}

impl FractionSearch {
    /// Settings matching a display of `precision` significant digits
    pub fn for_precision(precision: usize) -> Self {
        let exponent = i32::try_from(precision.saturating_add(5)).unwrap_or(i32::MAX);
        Self {
            tolerance: 10f64.powi(-exponent).max(MIN_TOLERANCE),
            max_iterations: 32,
            max_denominator: 1000,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_denominator(mut self, max_denominator: i64) -> Self {
        self.max_denominator = max_denominator;
        self
    }

    /// Approximate `x` by a fraction. Integral values return `n/1` without
    /// searching; `None` when the budget is exhausted.
    pub fn approximate<T: MathScalar>(&self, x: T) -> Option<Fraction> {
        if !x.is_finite() {
            return None;
        }
        // Never ask for more than the scalar can resolve
        let tolerance = T::lit(self.tolerance).max(T::epsilon() * T::lit(8.0));
        let sign = if x < T::zero() { -1 } else { 1 };
        let magnitude = x.abs();
        let whole = magnitude.trunc();
        let target = magnitude - whole;
        let whole = whole.to_i64()?;

        if target <= tolerance {
            return Some(Fraction::new(sign * whole, 1));
        }
        if T::one() - target <= tolerance {
            return Some(Fraction::new(sign * (whole + 1), 1));
        }

        let (mut lo_n, mut lo_d) = (0_i64, 1_i64);
        let (mut hi_n, mut hi_d) = (1_i64, 1_i64);
        for _ in 0..self.max_iterations {
            let (n, d) = (lo_n + hi_n, lo_d + hi_d);
            if d > self.max_denominator {
                trace!(denominator = d, "fraction search hit the denominator cap");
                return None;
            }
            let mediant = T::from_i64(n)? / T::from_i64(d)?;
            if approx_eq(mediant, target, tolerance) {
                return Some(Fraction::new(sign * (whole * d + n), d));
            }
            if mediant < target {
                (lo_n, lo_d) = (n, d);
            } else {
                (hi_n, hi_d) = (n, d);
            }
        }
        trace!(
            iterations = self.max_iterations,
            "fraction search budget exhausted"
        );
        None
    }

    /// Best hint for `x` across all forms, `None` when `x` is already an
    /// integer, no form matches, or two forms tie for the smallest numerator
    pub fn useful<T: MathScalar>(&self, x: T) -> Option<UsefulFraction> {
        if !x.is_finite() || x.abs() > T::lit(MAX_MAGNITUDE) {
            return None;
        }
        let raw = self.approximate(x);
        if raw.is_some_and(|fraction| fraction.is_integer()) {
            return None;
        }

        let candidates = [
            (FractionForm::Rational, raw),
            (FractionForm::PiMultiple, self.approximate(x / T::PI())),
            (FractionForm::PiReciprocal, self.approximate(x * T::PI())),
            (FractionForm::EMultiple, self.approximate(x / T::E())),
            (FractionForm::Sqrt2Multiple, self.approximate(x / T::SQRT_2())),
        ];

        let mut best: Option<UsefulFraction> = None;
        let mut tied = false;
        for (form, fraction) in candidates {
            let Some(fraction) = fraction else {
                continue;
            };
            if fraction.numerator == 0 {
                continue;
            }
            let size = fraction.numerator.unsigned_abs();
            match best {
                Some(current) if size > current.fraction.numerator.unsigned_abs() => {}
                Some(current) if size == current.fraction.numerator.unsigned_abs() => {
                    tied = true;
                }
                _ => {
                    best = Some(UsefulFraction { fraction, form });
                    tied = false;
                }
            }
        }
        if tied { None } else { best }
    }
}

/// Render `value` as a simple fraction of 1, π, e or √2 when one matches at
/// the given display precision
///
/// # Example
/// ```ignore
/// assert_eq!(useful_fraction(std::f64::consts::FRAC_PI_2, 5).as_deref(), Some("π/2"));
/// ```
pub fn useful_fraction<T: MathScalar>(value: T, precision: usize) -> Option<String> {
    FractionSearch::for_precision(precision)
        .useful(value)
        .map(|hint| hint.to_string())
}
