//! Equation rearrangement - isolate one unknown leaf
//!
//! Solving `lhs = rhs` for a leaf `x` works in three steps:
//!
//! 1. Both sides are expanded so that containers expose their real operator
//!    chain.
//! 2. `x` must occur exactly once (by identity) across both sides.
//! 3. The side holding `x` is unwound operator by operator, applying each
//!    inverse to the other side, until `x` itself is reached.
//!
//! # Example
//! ```ignore
//! let x = Var::variable("x", 0.0);
//! let solved = solve(&(2.0 * &x + 1.0), &Expr::number(7.0), &x);
//! assert_eq!(solved.map(|e| e.result()), Some(3.0));
//! ```

pub mod inverse;
mod rearrange;

use tracing::debug;

use crate::ast::{Expr, Var};
use crate::error::SolveError;
use crate::traits::MathScalar;

use rearrange::{rearrange, rearrange_all};

/// Display name of the unknown in errors and logs
fn unknown_name<T: MathScalar>(unknown: &Expr<T>) -> String {
    unknown
        .name()
        .map_or_else(|| unknown.id().to_string(), str::to_string)
}

/// Expanded equation split into the side holding the unknown and the other
struct Isolation<T: MathScalar> {
    solve_side: Expr<T>,
    from: Expr<T>,
    name: String,
}

/// Expand both sides and check that the unknown occurs exactly once
fn prepare<T: MathScalar>(
    lhs: &Expr<T>,
    rhs: &Expr<T>,
    unknown: &Expr<T>,
) -> Result<Isolation<T>, SolveError> {
    let lhs = lhs.expand();
    let rhs = rhs.expand();
    let name = unknown_name(unknown);
    let in_lhs = lhs.count_occurrences(unknown);
    let in_rhs = rhs.count_occurrences(unknown);
    let count = in_lhs + in_rhs;
    debug!(unknown = %name, count, "checking solve precondition");

    match count {
        0 => Err(SolveError::TargetAbsent { name }),
        1 if in_lhs == 1 => Ok(Isolation {
            solve_side: lhs,
            from: rhs,
            name,
        }),
        1 => Ok(Isolation {
            solve_side: rhs,
            from: lhs,
            name,
        }),
        count => Err(SolveError::TargetRepeated { name, count }),
    }
}

/// Single-valued isolation with typed errors
pub(crate) fn isolate<T: MathScalar>(
    lhs: &Expr<T>,
    rhs: &Expr<T>,
    unknown: &Expr<T>,
) -> Result<Expr<T>, SolveError> {
    let Isolation {
        solve_side,
        from,
        name,
    } = prepare(lhs, rhs, unknown)?;
    rearrange(&solve_side, unknown, from).ok_or_else(|| {
        debug!(unknown = %name, "no inverse along the path to the unknown");
        SolveError::NoIsolation { name }
    })
}

/// Multi-valued isolation with typed errors
pub(crate) fn isolate_all<T: MathScalar>(
    lhs: &Expr<T>,
    rhs: &Expr<T>,
    unknown: &Expr<T>,
) -> Result<Vec<Expr<T>>, SolveError> {
    let Isolation {
        solve_side,
        from,
        name,
    } = prepare(lhs, rhs, unknown)?;
    let candidates = rearrange_all(&solve_side, unknown, from);
    if candidates.is_empty() {
        debug!(unknown = %name, "no inverse along the path to the unknown");
        return Err(SolveError::NoIsolation { name });
    }
    debug!(unknown = %name, candidates = candidates.len(), "solved");
    Ok(candidates)
}

/// Rearrange `lhs = rhs` for `target`, returning the expression its value
/// must equal. `None` when `target` is absent, repeated or cannot be
/// isolated. The target itself is not modified.
pub fn solve<T: MathScalar>(lhs: &Expr<T>, rhs: &Expr<T>, target: &Var<T>) -> Option<Expr<T>> {
    isolate(lhs, rhs, target.expr()).ok()
}

/// Multi-valued variant of [`solve`]: every candidate solution, empty when
/// the equation cannot be rearranged
pub fn solve_all<T: MathScalar>(lhs: &Expr<T>, rhs: &Expr<T>, target: &Var<T>) -> Vec<Expr<T>> {
    isolate_all(lhs, rhs, target.expr()).unwrap_or_default()
}
