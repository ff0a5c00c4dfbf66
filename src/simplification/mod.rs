//! Simplification framework - constant folding of algebraic identities
//!
//! The [`Simplifier`] is a [`Transformer`] applied bottom-up in a single
//! pass: children are simplified first, then the folding rules are tried on
//! the rebuilt node. Every rule strictly shrinks the tree, so one pass reaches
//! the fixed point.
//!
//! Containers are opaque to simplification unless the simplifier is built
//! with [`Simplifier::with_expand`].

mod rules;

use tracing::trace;

use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::traits::MathScalar;
use crate::visitor::{Transformer, walk_binary};

use rules::{Rule, all_rules};

/// Constant-folding transformer
pub struct Simplifier<T: MathScalar> {
    rules: Vec<Box<dyn Rule<T>>>,
    expand: bool,
    /// Number of rules applied since construction
    applied: usize,
}

impl<T: MathScalar> Default for Simplifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MathScalar> Simplifier<T> {
    pub fn new() -> Self {
        Self {
            rules: all_rules(),
            expand: false,
            applied: 0,
        }
    }

    /// Fold through containers by replacing them with their inner expressions
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Main simplification entry point
    pub fn simplify(&mut self, expr: &Expr<T>) -> Expr<T> {
        if self.expand {
            expr.expand().transform(self)
        } else {
            expr.transform(self)
        }
    }

    /// Number of rules applied so far
    pub fn applied(&self) -> usize {
        self.applied
    }

    fn apply_rules(&mut self, op: BinaryOp, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        for rule in self.rules.iter().filter(|r| r.applies_to().contains(&op)) {
            if let Some(result) = rule.apply(left, right) {
                trace!(rule = rule.name(), "applied simplification rule");
                self.applied += 1;
                return Some(result);
            }
        }
        None
    }
}

impl<T: MathScalar> Transformer<T> for Simplifier<T> {
    fn transform_binary(
        &mut self,
        expr: &Expr<T>,
        op: BinaryOp,
        left: &Expr<T>,
        right: &Expr<T>,
    ) -> Expr<T> {
        let rebuilt = walk_binary(self, expr, op, left, right);
        let folded = match rebuilt.kind() {
            ExprKind::Binary(op, l, r) => self.apply_rules(*op, l, r),
            _ => None,
        };
        folded.unwrap_or(rebuilt)
    }
}

/// Simplify an expression by folding identity and zero elements
///
/// # Example
/// ```ignore
/// let x = Var::variable("x", 3.0);
/// let e = simplify(&(&x * 1.0 + 0.0));
/// assert!(e.is(&x));
/// ```
pub fn simplify<T: MathScalar>(expr: &Expr<T>) -> Expr<T> {
    Simplifier::new().simplify(expr)
}
