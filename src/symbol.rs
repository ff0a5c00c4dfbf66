//! Smart constructors and operator overloading for building expressions
//!
//! # Example
//! ```ignore
//! use symcalc::{Expr, Var, sqrt};
//!
//! let x = Var::variable("x", 21.0);
//! let y = sqrt(Expr::pi().pow(&x * (2.0 + Expr::pi())));
//! ```
//!
//! Every constructor takes shared handles and returns a new interior node;
//! the operands themselves are never copied, so leaves stay shared.

use crate::ast::{BinaryOp, Expr, Lambda, UnaryOp, Var};
use crate::traits::MathScalar;
use std::ops::{Add, Div, Mul, Neg, Sub};

// ===== Free smart constructors =====

pub fn add<T: MathScalar>(left: impl Into<Expr<T>>, right: impl Into<Expr<T>>) -> Expr<T> {
    Expr::binary(BinaryOp::Add, left.into(), right.into())
}

pub fn sub<T: MathScalar>(left: impl Into<Expr<T>>, right: impl Into<Expr<T>>) -> Expr<T> {
    Expr::binary(BinaryOp::Sub, left.into(), right.into())
}

pub fn mul<T: MathScalar>(left: impl Into<Expr<T>>, right: impl Into<Expr<T>>) -> Expr<T> {
    Expr::binary(BinaryOp::Mul, left.into(), right.into())
}

pub fn div<T: MathScalar>(left: impl Into<Expr<T>>, right: impl Into<Expr<T>>) -> Expr<T> {
    Expr::binary(BinaryOp::Div, left.into(), right.into())
}

pub fn pow<T: MathScalar>(base: impl Into<Expr<T>>, exponent: impl Into<Expr<T>>) -> Expr<T> {
    Expr::binary(BinaryOp::Pow, base.into(), exponent.into())
}

/// Mutable variable leaf, the usual unknown when solving
pub fn variable<T: MathScalar>(name: impl Into<String>, initial_value: T) -> Var<T> {
    Var::variable(name, initial_value)
}

/// Immutable numeric literal
pub fn constant_value<T: MathScalar>(value: T) -> Expr<T> {
    Expr::constant(value)
}

/// Named, rebindable sub-expression
pub fn named_container<T: MathScalar>(name: impl Into<String>, inner: impl Into<Expr<T>>) -> Lambda<T> {
    Lambda::new(name, inner.into())
}

// ===== Unified macro for generating unary function constructors =====
// One list drives both the free functions and the method-style calls on Expr

macro_rules! unary_function_list {
    ($($fn_name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $fn_name<T: MathScalar>(arg: impl Into<Expr<T>>) -> Expr<T> {
                Expr::unary(UnaryOp::$op, arg.into())
            }
        )*

        impl<T: MathScalar> Expr<T> {
            $(
                pub fn $fn_name(&self) -> Expr<T> {
                    Expr::unary(UnaryOp::$op, self.clone())
                }
            )*
        }
    };
}

pub fn neg<T: MathScalar>(arg: impl Into<Expr<T>>) -> Expr<T> {
    Expr::unary(UnaryOp::Negate, arg.into())
}

unary_function_list!(
    sqrt => Sqrt,
    square => Square,
    log => Log,
    log10 => Log10,
    abs => Abs,
    // Trigonometric functions
    sin => Sin, asin => Asin,
    cos => Cos, acos => Acos,
    tan => Tan, atan => Atan,
    // Hyperbolic functions
    sinh => Sinh, asinh => Asinh,
    cosh => Cosh, acosh => Acosh,
    tanh => Tanh, atanh => Atanh,
);

impl<T: MathScalar> Expr<T> {
    /// Raise to a power (since Rust `^` is XOR, not power)
    pub fn pow(&self, exponent: impl Into<Expr<T>>) -> Expr<T> {
        Expr::binary(BinaryOp::Pow, self.clone(), exponent.into())
    }
}

// Convert f64 to Expr
impl<T: MathScalar> From<f64> for Expr<T> {
    fn from(n: f64) -> Self {
        Expr::number(n)
    }
}

// Convert i32 to Expr
impl<T: MathScalar> From<i32> for Expr<T> {
    fn from(n: i32) -> Self {
        Expr::number(f64::from(n))
    }
}

impl<T: MathScalar> From<&Expr<T>> for Expr<T> {
    fn from(e: &Expr<T>) -> Self {
        e.clone()
    }
}

// ===== Macro for generating operator implementations =====
// Generates arithmetic operator impls for a (lhs, rhs) pair of operand types,
// each side given with the closure that turns it into an Expr

macro_rules! impl_binary_ops {
    ([$($lt:lifetime),*] $lhs:ty, $rhs:ty, $to_lhs:expr, $to_rhs:expr) => {
        impl<$($lt,)* T: MathScalar> Add<$rhs> for $lhs {
            type Output = Expr<T>;
            fn add(self, rhs: $rhs) -> Expr<T> {
                Expr::binary(BinaryOp::Add, $to_lhs(self), $to_rhs(rhs))
            }
        }
        impl<$($lt,)* T: MathScalar> Sub<$rhs> for $lhs {
            type Output = Expr<T>;
            fn sub(self, rhs: $rhs) -> Expr<T> {
                Expr::binary(BinaryOp::Sub, $to_lhs(self), $to_rhs(rhs))
            }
        }
        impl<$($lt,)* T: MathScalar> Mul<$rhs> for $lhs {
            type Output = Expr<T>;
            fn mul(self, rhs: $rhs) -> Expr<T> {
                Expr::binary(BinaryOp::Mul, $to_lhs(self), $to_rhs(rhs))
            }
        }
        impl<$($lt,)* T: MathScalar> Div<$rhs> for $lhs {
            type Output = Expr<T>;
            fn div(self, rhs: $rhs) -> Expr<T> {
                Expr::binary(BinaryOp::Div, $to_lhs(self), $to_rhs(rhs))
            }
        }
    };
}

// Expr operations
impl_binary_ops!([] Expr<T>, Expr<T>, |e: Expr<T>| e, |r: Expr<T>| r);
impl_binary_ops!(['a] Expr<T>, &'a Expr<T>, |e: Expr<T>| e, |r: &Expr<T>| r.clone());
impl_binary_ops!(['a] &'a Expr<T>, Expr<T>, |e: &Expr<T>| e.clone(), |r: Expr<T>| r);
impl_binary_ops!(['a, 'b] &'a Expr<T>, &'b Expr<T>, |e: &Expr<T>| e.clone(), |r: &Expr<T>| r.clone());
impl_binary_ops!([] Expr<T>, f64, |e: Expr<T>| e, |r: f64| Expr::number(r));
impl_binary_ops!(['a] &'a Expr<T>, f64, |e: &Expr<T>| e.clone(), |r: f64| Expr::number(r));

// Var operations
impl_binary_ops!([] Var<T>, Expr<T>, Expr::from, |r: Expr<T>| r);
impl_binary_ops!(['a] Var<T>, &'a Expr<T>, Expr::from, |r: &Expr<T>| r.clone());
impl_binary_ops!([] Var<T>, Var<T>, Expr::from, Expr::from);
impl_binary_ops!(['a] Var<T>, &'a Var<T>, Expr::from, |r: &Var<T>| r.expr().clone());
impl_binary_ops!([] Var<T>, f64, Expr::from, |r: f64| Expr::number(r));
impl_binary_ops!(['a] &'a Var<T>, Expr<T>, |v: &Var<T>| v.expr().clone(), |r: Expr<T>| r);
impl_binary_ops!(['a, 'b] &'a Var<T>, &'b Expr<T>, |v: &Var<T>| v.expr().clone(), |r: &Expr<T>| r.clone());
impl_binary_ops!(['a] &'a Var<T>, Var<T>, |v: &Var<T>| v.expr().clone(), Expr::from);
impl_binary_ops!(['a, 'b] &'a Var<T>, &'b Var<T>, |v: &Var<T>| v.expr().clone(), |r: &Var<T>| r.expr().clone());
impl_binary_ops!(['a] &'a Var<T>, f64, |v: &Var<T>| v.expr().clone(), |r: f64| Expr::number(r));
impl_binary_ops!([] Expr<T>, Var<T>, |e: Expr<T>| e, Expr::from);
impl_binary_ops!(['a] Expr<T>, &'a Var<T>, |e: Expr<T>| e, |r: &Var<T>| r.expr().clone());
impl_binary_ops!(['a] &'a Expr<T>, Var<T>, |e: &Expr<T>| e.clone(), Expr::from);
impl_binary_ops!(['a, 'b] &'a Expr<T>, &'b Var<T>, |e: &Expr<T>| e.clone(), |r: &Var<T>| r.expr().clone());

// f64 on the left side
impl_binary_ops!([] f64, Expr<T>, |l: f64| Expr::number(l), |r: Expr<T>| r);
impl_binary_ops!(['a] f64, &'a Expr<T>, |l: f64| Expr::number(l), |r: &Expr<T>| r.clone());
impl_binary_ops!([] f64, Var<T>, |l: f64| Expr::number(l), Expr::from);
impl_binary_ops!(['a] f64, &'a Var<T>, |l: f64| Expr::number(l), |r: &Var<T>| r.expr().clone());

// Negation
impl<T: MathScalar> Neg for Expr<T> {
    type Output = Expr<T>;
    fn neg(self) -> Expr<T> {
        Expr::unary(UnaryOp::Negate, self)
    }
}

impl<T: MathScalar> Neg for &Expr<T> {
    type Output = Expr<T>;
    fn neg(self) -> Expr<T> {
        Expr::unary(UnaryOp::Negate, self.clone())
    }
}

impl<T: MathScalar> Neg for Var<T> {
    type Output = Expr<T>;
    fn neg(self) -> Expr<T> {
        Expr::unary(UnaryOp::Negate, self.into())
    }
}

impl<T: MathScalar> Neg for &Var<T> {
    type Output = Expr<T>;
    fn neg(self) -> Expr<T> {
        Expr::unary(UnaryOp::Negate, self.expr().clone())
    }
}
