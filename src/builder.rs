//! Builder pattern API for solving equations
//!
//! Provides a fluent interface for configuring and running equation
//! rearrangement.
//!
//! # Example
//! ```ignore
//! use symcalc::{Expr, Solve, Var};
//!
//! let x = Var::variable("x", 0.0);
//! let lhs = x.pow(2.0);
//!
//! let roots = Solve::new()
//!     .assign(true)
//!     .solve_all(&lhs, &Expr::number(9.0), &x)?;  // x now holds 3
//! ```

use tracing::debug;

use crate::ast::{Expr, Var};
use crate::error::SolveError;
use crate::simplification::simplify;
use crate::solve::{isolate, isolate_all};
use crate::traits::MathScalar;

/// Builder for solve operations
#[derive(Debug, Clone, Copy)]
pub struct Solve {
    simplify: bool,
    assign: bool,
    max_depth: Option<usize>,
}

impl Default for Solve {
    fn default() -> Self {
        Self {
            simplify: true,
            assign: false,
            max_depth: None,
        }
    }
}

impl Solve {
    /// Create a new solve builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant-fold each solution before returning it (default: on)
    pub fn simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    /// Store the solved value into the target once the solve has completed
    /// (default: off). With several candidates the first one is stored.
    pub fn assign(mut self, assign: bool) -> Self {
        self.assign = assign;
        self
    }

    /// Reject equations whose sides nest deeper than `depth`
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    fn check_depth<T: MathScalar>(&self, lhs: &Expr<T>, rhs: &Expr<T>) -> Result<(), SolveError> {
        if let Some(limit) = self.max_depth {
            let depth = lhs.expand().max_depth().max(rhs.expand().max_depth());
            if depth > limit {
                return Err(SolveError::MaxDepthExceeded { depth, limit });
            }
        }
        Ok(())
    }

    fn finish<T: MathScalar>(&self, solution: Expr<T>) -> Expr<T> {
        if self.simplify {
            simplify(&solution)
        } else {
            solution
        }
    }

    fn store<T: MathScalar>(&self, target: &Var<T>, solution: &Expr<T>) {
        if self.assign {
            let value = solution.result();
            debug!(value = ?value, "assigning solved value");
            target.set(value);
        }
    }

    /// Rearrange `lhs = rhs` for `target`
    pub fn solve<T: MathScalar>(
        &self,
        lhs: &Expr<T>,
        rhs: &Expr<T>,
        target: &Var<T>,
    ) -> Result<Expr<T>, SolveError> {
        self.check_depth(lhs, rhs)?;
        let solution = self.finish(isolate(lhs, rhs, target.expr())?);
        self.store(target, &solution);
        Ok(solution)
    }

    /// Rearrange `lhs = rhs` for `target`, keeping every candidate
    pub fn solve_all<T: MathScalar>(
        &self,
        lhs: &Expr<T>,
        rhs: &Expr<T>,
        target: &Var<T>,
    ) -> Result<Vec<Expr<T>>, SolveError> {
        self.check_depth(lhs, rhs)?;
        let solutions: Vec<Expr<T>> = isolate_all(lhs, rhs, target.expr())?
            .into_iter()
            .map(|solution| self.finish(solution))
            .collect();
        if let Some(first) = solutions.first() {
            self.store(target, first);
        }
        Ok(solutions)
    }
}
