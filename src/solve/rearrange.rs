//! Recursive unwinding of the operator chain around the unknown.
//!
//! Starting from the side that holds the unknown, each operator on the path
//! is inverted and applied to the accumulated target `from`, until the
//! unknown itself is reached. Both functions assume the unknown occurs
//! exactly once; that is checked by the caller.

use tracing::trace;

use super::inverse::{Side, invert_binary, invert_binary_all, invert_unary, invert_unary_all};
use crate::ast::{Expr, ExprKind};
use crate::traits::MathScalar;

/// Single-valued rearrangement. `None` when the unknown is not below `node`
/// or an operator on its path has no inverse.
pub(crate) fn rearrange<T: MathScalar>(
    node: &Expr<T>,
    unknown: &Expr<T>,
    from: Expr<T>,
) -> Option<Expr<T>> {
    if node.is(unknown) {
        return Some(from);
    }
    match node.kind() {
        ExprKind::Leaf(_) => None,
        ExprKind::Unary(op, child) => {
            trace!(op = op.name(), "unwinding unary operator");
            let from = invert_unary(*op, &from)?;
            rearrange(child, unknown, from)
        }
        ExprKind::Binary(op, left, right) => {
            for (side, child, other) in [(Side::Left, left, right), (Side::Right, right, left)] {
                if !child.contains(unknown) {
                    continue;
                }
                trace!(op = op.symbol(), ?side, "unwinding binary operator");
                let from = invert_binary(*op, side, other, &from);
                if let Some(found) = rearrange(child, unknown, from) {
                    return Some(found);
                }
            }
            None
        }
        ExprKind::Container { inner, .. } => {
            let inner = inner.borrow().clone();
            rearrange(&inner, unknown, from)
        }
    }
}

/// Multi-valued rearrangement: the Cartesian product of every step's
/// candidates, in order with the positive branch first
pub(crate) fn rearrange_all<T: MathScalar>(
    node: &Expr<T>,
    unknown: &Expr<T>,
    from: Expr<T>,
) -> Vec<Expr<T>> {
    if node.is(unknown) {
        return vec![from];
    }
    match node.kind() {
        ExprKind::Leaf(_) => Vec::new(),
        ExprKind::Unary(op, child) => {
            trace!(op = op.name(), "unwinding unary operator");
            invert_unary_all(*op, &from)
                .into_iter()
                .flat_map(|candidate| rearrange_all(child, unknown, candidate))
                .collect()
        }
        ExprKind::Binary(op, left, right) => {
            for (side, child, other) in [(Side::Left, left, right), (Side::Right, right, left)] {
                if !child.contains(unknown) {
                    continue;
                }
                trace!(op = op.symbol(), ?side, "unwinding binary operator");
                let found: Vec<Expr<T>> = invert_binary_all(*op, side, other, &from)
                    .into_iter()
                    .flat_map(|candidate| rearrange_all(child, unknown, candidate))
                    .collect();
                if !found.is_empty() {
                    return found;
                }
            }
            Vec::new()
        }
        ExprKind::Container { inner, .. } => {
            let inner = inner.borrow().clone();
            rearrange_all(&inner, unknown, from)
        }
    }
}
