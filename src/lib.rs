//! Symbolic Expression Engine
//!
//! The engine behind an algebraic calculator: it builds expression trees
//! from arithmetic and transcendental operators, evaluates them, renders
//! them as text or markup, folds trivial identities, and rearranges an
//! equation to isolate one unknown.
//!
//! # Features
//! - Shared expression trees: leaves such as `x` are referenced from many
//!   expressions and a value stored in them is seen everywhere
//! - Identity-based search and substitution (never structural equality)
//! - Precedence-aware formatting in plain text, LaTeX and Unicode
//! - Constant folding of identity and zero elements
//! - **Equation solving** by inverting the operator chain around the unknown,
//!   single- or multi-valued
//! - Rational hints such as `π/2` for numeric results
//! - Generic over the scalar type (`f64` by default, `f32` works too)
//!
//! # Usage Examples
//!
//! ```ignore
//! use symcalc::{Expr, Var, solve, sqrt};
//!
//! let x = Var::variable("x", 21.0);
//! let y = sqrt(Expr::pi().pow(&x * (2.0 + Expr::pi())));
//! let value = Expr::number(y.result());
//!
//! let solved = solve(&y, &value, &x).unwrap();
//! assert!((solved.result() - 21.0).abs() < 1e-9);
//! println!("x = {solved}");
//! ```
//!
//! ## Builder API
//! ```ignore
//! use symcalc::{Expr, Solve, Var};
//!
//! let x = Var::variable("x", 0.0);
//! let roots = Solve::new().assign(true).solve_all(&x.pow(2.0), &Expr::number(9.0), &x)?;
//! assert_eq!(x.get(), 3.0);
//! ```

mod ast;
mod builder;
mod display;
mod error;
pub mod fraction;
mod simplification;
pub mod solve;
mod symbol;
pub mod traits;
pub mod visitor;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{BinaryOp, Expr, ExprKind, Lambda, Leaf, NodeId, Precedence, UnaryOp, Var};
pub use builder::Solve;
pub use display::{Format, Notation, format_general};
pub use error::SolveError;
pub use fraction::{Fraction, FractionForm, FractionSearch, UsefulFraction, useful_fraction};
pub use simplification::{Simplifier, simplify};
pub use solve::{solve, solve_all};
pub use symbol::{
    abs, acos, acosh, add, asin, asinh, atan, atanh, constant_value, cos, cosh, div, log, log10,
    mul, named_container, neg, pow, sin, sinh, sqrt, square, sub, tan, tanh, variable,
};
pub use traits::MathScalar;

/// Default number of significant digits when rendering numbers
pub const DEFAULT_PRECISION: usize = 6;
