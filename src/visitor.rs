//! Expression visitor and transformer patterns for tree traversal
//!
//! Two traversal contracts cover every tree-walking operation in the engine:
//!
//! - [`ExprVisitor`] observes nodes (counting, searching, collecting) and is
//!   driven by [`walk_expr`].
//! - [`Transformer`] produces a possibly-new tree (simplification, expansion,
//!   substitution). Its default methods rebuild a node only when one of its
//!   children changed, so untouched subtrees keep their identity.
//!
//! Both are dispatched by matching on [`ExprKind`]; a concrete visitor
//! overrides only the node kinds it cares about.

use rustc_hash::FxHashSet;

use crate::ast::{BinaryOp, Expr, ExprKind, Leaf, NodeId, UnaryOp};
use crate::traits::MathScalar;

/// Trait for visiting expression nodes.
///
/// Each method returns a boolean indicating whether to continue into the
/// node's children. The defaults descend everywhere, including into the
/// inner expression of containers.
///
/// # Example
/// ```ignore
/// use symcalc::visitor::{ExprVisitor, walk_expr};
///
/// struct LeafCounter { count: usize }
///
/// impl ExprVisitor<f64> for LeafCounter {
///     fn visit_leaf(&mut self, _expr: &Expr, _leaf: &Leaf<f64>) { self.count += 1; }
/// }
/// ```
pub trait ExprVisitor<T: MathScalar> {
    /// Visit a leaf value
    fn visit_leaf(&mut self, _expr: &Expr<T>, _leaf: &Leaf<T>) {}

    /// Visit a unary operator, returns true to visit its operand
    fn visit_unary(&mut self, _expr: &Expr<T>, _op: UnaryOp, _child: &Expr<T>) -> bool {
        true
    }

    /// Visit a binary operator, returns true to visit both operands
    fn visit_binary(
        &mut self,
        _expr: &Expr<T>,
        _op: BinaryOp,
        _left: &Expr<T>,
        _right: &Expr<T>,
    ) -> bool {
        true
    }

    /// Visit a container, returns true to visit its inner expression
    fn visit_container(&mut self, _expr: &Expr<T>, _name: &str, _inner: &Expr<T>) -> bool {
        true
    }
}

/// Walk an expression tree with a visitor
///
/// Visits nodes in pre-order (parent before children, left before right).
pub fn walk_expr<T: MathScalar, V: ExprVisitor<T> + ?Sized>(expr: &Expr<T>, visitor: &mut V) {
    match expr.kind() {
        ExprKind::Leaf(leaf) => visitor.visit_leaf(expr, leaf),
        ExprKind::Unary(op, child) => {
            if visitor.visit_unary(expr, *op, child) {
                walk_expr(child, visitor);
            }
        }
        ExprKind::Binary(op, left, right) => {
            if visitor.visit_binary(expr, *op, left, right) {
                walk_expr(left, visitor);
                walk_expr(right, visitor);
            }
        }
        ExprKind::Container { name, inner } => {
            let inner = inner.borrow().clone();
            if visitor.visit_container(expr, name, &inner) {
                walk_expr(&inner, visitor);
            }
        }
    }
}

/// Trait for tree-to-tree transformations.
///
/// Leaves and containers are returned unchanged by default; operators are
/// rebuilt from their transformed children through [`walk_unary`] and
/// [`walk_binary`].
pub trait Transformer<T: MathScalar> {
    fn transform_leaf(&mut self, expr: &Expr<T>, _leaf: &Leaf<T>) -> Expr<T> {
        expr.clone()
    }

    fn transform_unary(&mut self, expr: &Expr<T>, op: UnaryOp, child: &Expr<T>) -> Expr<T> {
        walk_unary(self, expr, op, child)
    }

    fn transform_binary(
        &mut self,
        expr: &Expr<T>,
        op: BinaryOp,
        left: &Expr<T>,
        right: &Expr<T>,
    ) -> Expr<T> {
        walk_binary(self, expr, op, left, right)
    }

    fn transform_container(&mut self, expr: &Expr<T>, _name: &str, _inner: &Expr<T>) -> Expr<T> {
        expr.clone()
    }
}

/// Default unary handling: transform the operand, rebuild only if it changed
pub fn walk_unary<T: MathScalar, X: Transformer<T> + ?Sized>(
    transformer: &mut X,
    expr: &Expr<T>,
    op: UnaryOp,
    child: &Expr<T>,
) -> Expr<T> {
    let new_child = child.transform(transformer);
    if new_child.is(child) {
        expr.clone()
    } else {
        Expr::unary(op, new_child)
    }
}

/// Default binary handling: transform both operands, rebuild only if either changed
pub fn walk_binary<T: MathScalar, X: Transformer<T> + ?Sized>(
    transformer: &mut X,
    expr: &Expr<T>,
    op: BinaryOp,
    left: &Expr<T>,
    right: &Expr<T>,
) -> Expr<T> {
    let new_left = left.transform(transformer);
    let new_right = right.transform(transformer);
    if new_left.is(left) && new_right.is(right) {
        expr.clone()
    } else {
        Expr::binary(op, new_left, new_right)
    }
}

impl<T: MathScalar> Expr<T> {
    /// Dispatch a transformer over this node
    pub fn transform<X: Transformer<T> + ?Sized>(&self, transformer: &mut X) -> Expr<T> {
        match self.kind() {
            ExprKind::Leaf(leaf) => transformer.transform_leaf(self, leaf),
            ExprKind::Unary(op, child) => transformer.transform_unary(self, *op, child),
            ExprKind::Binary(op, left, right) => {
                transformer.transform_binary(self, *op, left, right)
            }
            ExprKind::Container { name, inner } => {
                let inner = inner.borrow().clone();
                transformer.transform_container(self, name, &inner)
            }
        }
    }

    // ===== Search utilities =====

    /// Count the nodes of the tree, looking through containers
    pub fn node_count(&self) -> usize {
        let mut counter = NodeCounter::default();
        walk_expr(self, &mut counter);
        counter.count
    }

    /// Number of times `target` (by identity) occurs in this tree,
    /// looking through containers
    pub fn count_occurrences(&self, target: &Expr<T>) -> usize {
        let mut counter = IdentityCounter::new(target.id());
        walk_expr(self, &mut counter);
        counter.count
    }

    /// True if `target` (by identity) occurs anywhere in this tree
    pub fn contains(&self, target: &Expr<T>) -> bool {
        self.count_occurrences(target) > 0
    }

    /// First named leaf or container called `name`, in pre-order
    pub fn find_named(&self, name: &str) -> Option<Expr<T>> {
        let mut finder = NameFinder::new(name);
        walk_expr(self, &mut finder);
        finder.found
    }

    /// True if a leaf or container called `name` is reachable from this tree.
    /// Binding a container to an expression that references the container's
    /// own name would make it cyclic.
    pub fn references_name(&self, name: &str) -> bool {
        self.find_named(name).is_some()
    }

    /// Every leaf and container name reachable from this tree
    pub fn names(&self) -> FxHashSet<String> {
        let mut collector = NameCollector::default();
        walk_expr(self, &mut collector);
        collector.names
    }

    /// Replace every container by its inner expression, recursively
    pub fn expand(&self) -> Expr<T> {
        self.transform(&mut Expander)
    }

    /// Replace every occurrence of `target` (by identity) with `replacement`
    pub fn substitute(&self, target: &Expr<T>, replacement: &Expr<T>) -> Expr<T> {
        self.transform(&mut Replacer::new(target.id(), replacement.clone()))
    }
}

/// A simple visitor that counts nodes
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub count: usize,
}

impl<T: MathScalar> ExprVisitor<T> for NodeCounter {
    fn visit_leaf(&mut self, _expr: &Expr<T>, _leaf: &Leaf<T>) {
        self.count += 1;
    }

    fn visit_unary(&mut self, _expr: &Expr<T>, _op: UnaryOp, _child: &Expr<T>) -> bool {
        self.count += 1;
        true
    }

    fn visit_binary(
        &mut self,
        _expr: &Expr<T>,
        _op: BinaryOp,
        _left: &Expr<T>,
        _right: &Expr<T>,
    ) -> bool {
        self.count += 1;
        true
    }

    fn visit_container(&mut self, _expr: &Expr<T>, _name: &str, _inner: &Expr<T>) -> bool {
        self.count += 1;
        true
    }
}

/// Counts occurrences of one node by identity
#[derive(Debug)]
pub struct IdentityCounter {
    target: NodeId,
    pub count: usize,
}

impl IdentityCounter {
    pub fn new(target: NodeId) -> Self {
        Self { target, count: 0 }
    }

    fn check(&mut self, id: NodeId) {
        if id == self.target {
            self.count += 1;
        }
    }
}

impl<T: MathScalar> ExprVisitor<T> for IdentityCounter {
    fn visit_leaf(&mut self, expr: &Expr<T>, _leaf: &Leaf<T>) {
        self.check(expr.id());
    }

    fn visit_unary(&mut self, expr: &Expr<T>, _op: UnaryOp, _child: &Expr<T>) -> bool {
        self.check(expr.id());
        true
    }

    fn visit_binary(
        &mut self,
        expr: &Expr<T>,
        _op: BinaryOp,
        _left: &Expr<T>,
        _right: &Expr<T>,
    ) -> bool {
        self.check(expr.id());
        true
    }

    fn visit_container(&mut self, expr: &Expr<T>, _name: &str, _inner: &Expr<T>) -> bool {
        self.check(expr.id());
        true
    }
}

/// Finds the first leaf or container carrying a given name.
/// Both operands of every binary node are searched.
#[derive(Debug)]
pub struct NameFinder<'n, T: MathScalar> {
    name: &'n str,
    pub found: Option<Expr<T>>,
}

impl<'n, T: MathScalar> NameFinder<'n, T> {
    pub fn new(name: &'n str) -> Self {
        Self { name, found: None }
    }
}

impl<T: MathScalar> ExprVisitor<T> for NameFinder<'_, T> {
    fn visit_leaf(&mut self, expr: &Expr<T>, leaf: &Leaf<T>) {
        if self.found.is_none() && leaf.name() == Some(self.name) {
            self.found = Some(expr.clone());
        }
    }

    fn visit_unary(&mut self, _expr: &Expr<T>, _op: UnaryOp, _child: &Expr<T>) -> bool {
        self.found.is_none()
    }

    fn visit_binary(
        &mut self,
        _expr: &Expr<T>,
        _op: BinaryOp,
        _left: &Expr<T>,
        _right: &Expr<T>,
    ) -> bool {
        self.found.is_none()
    }

    fn visit_container(&mut self, expr: &Expr<T>, name: &str, _inner: &Expr<T>) -> bool {
        if self.found.is_some() {
            return false;
        }
        if name == self.name {
            self.found = Some(expr.clone());
            return false;
        }
        true
    }
}

/// Collects every leaf and container name
#[derive(Debug, Default)]
pub struct NameCollector {
    pub names: FxHashSet<String>,
}

impl<T: MathScalar> ExprVisitor<T> for NameCollector {
    fn visit_leaf(&mut self, _expr: &Expr<T>, leaf: &Leaf<T>) {
        if let Some(name) = leaf.name() {
            self.names.insert(name.to_string());
        }
    }

    fn visit_container(&mut self, _expr: &Expr<T>, name: &str, _inner: &Expr<T>) -> bool {
        self.names.insert(name.to_string());
        true
    }
}

/// Replaces containers with their (recursively expanded) inner expressions
#[derive(Debug, Default)]
pub struct Expander;

impl<T: MathScalar> Transformer<T> for Expander {
    fn transform_container(&mut self, _expr: &Expr<T>, _name: &str, inner: &Expr<T>) -> Expr<T> {
        inner.transform(self)
    }
}

/// Substitutes one node (by identity) with another tree
#[derive(Debug)]
pub struct Replacer<T: MathScalar> {
    target: NodeId,
    replacement: Expr<T>,
}

impl<T: MathScalar> Replacer<T> {
    pub fn new(target: NodeId, replacement: Expr<T>) -> Self {
        Self {
            target,
            replacement,
        }
    }
}

impl<T: MathScalar> Transformer<T> for Replacer<T> {
    fn transform_leaf(&mut self, expr: &Expr<T>, _leaf: &Leaf<T>) -> Expr<T> {
        if expr.id() == self.target {
            self.replacement.clone()
        } else {
            expr.clone()
        }
    }

    fn transform_unary(&mut self, expr: &Expr<T>, op: UnaryOp, child: &Expr<T>) -> Expr<T> {
        if expr.id() == self.target {
            return self.replacement.clone();
        }
        walk_unary(self, expr, op, child)
    }

    fn transform_binary(
        &mut self,
        expr: &Expr<T>,
        op: BinaryOp,
        left: &Expr<T>,
        right: &Expr<T>,
    ) -> Expr<T> {
        if expr.id() == self.target {
            return self.replacement.clone();
        }
        walk_binary(self, expr, op, left, right)
    }

    fn transform_container(&mut self, expr: &Expr<T>, _name: &str, _inner: &Expr<T>) -> Expr<T> {
        if expr.id() == self.target {
            self.replacement.clone()
        } else {
            expr.clone()
        }
    }
}
