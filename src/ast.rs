//! Expression tree for the calculator engine
//!
//! Nodes are shared through reference-counted [`Expr`] handles: the same leaf
//! (for example the variable `x`) is referenced from many expressions at once
//! and a new value stored in it is seen by all of them. Every node receives a
//! process-unique [`NodeId`] at construction and all searching, counting and
//! solving compares nodes by that id, never by structure.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::traits::MathScalar;

/// Global counter for node ids
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> NodeId {
    NodeId(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Identity of a node. Two handles denote the same node iff their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Raw numeric value of the id
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// BODMAS binding classes. Lower variants bind tighter; the formatter compares
/// these by declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Parentheses,
    Exponents,
    MultiplicationDivision,
    AdditionSubtraction,
}

/// Single-operand operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Sqrt,
    Square,
    /// Natural logarithm
    Log,
    Log10,
    Abs,
    Sin,
    Asin,
    Cos,
    Acos,
    Tan,
    Atan,
    Sinh,
    Asinh,
    Cosh,
    Acosh,
    Tanh,
    Atanh,
}

impl UnaryOp {
    /// Every unary operator, in declaration order
    pub const ALL: [UnaryOp; 18] = [
        UnaryOp::Negate,
        UnaryOp::Sqrt,
        UnaryOp::Square,
        UnaryOp::Log,
        UnaryOp::Log10,
        UnaryOp::Abs,
        UnaryOp::Sin,
        UnaryOp::Asin,
        UnaryOp::Cos,
        UnaryOp::Acos,
        UnaryOp::Tan,
        UnaryOp::Atan,
        UnaryOp::Sinh,
        UnaryOp::Asinh,
        UnaryOp::Cosh,
        UnaryOp::Acosh,
        UnaryOp::Tanh,
        UnaryOp::Atanh,
    ];

    /// Evaluate the operator on a scalar
    pub fn apply<T: MathScalar>(self, x: T) -> T {
        match self {
            UnaryOp::Negate => -x,
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Square => x * x,
            UnaryOp::Log => x.ln(),
            UnaryOp::Log10 => x.log10(),
            UnaryOp::Abs => x.abs(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Asin => x.asin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Acos => x.acos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Atan => x.atan(),
            UnaryOp::Sinh => x.sinh(),
            UnaryOp::Asinh => x.asinh(),
            UnaryOp::Cosh => x.cosh(),
            UnaryOp::Acosh => x.acosh(),
            UnaryOp::Tanh => x.tanh(),
            UnaryOp::Atanh => x.atanh(),
        }
    }

    /// Function name used by the plain-text notation
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Square => "sqr",
            UnaryOp::Log => "log",
            UnaryOp::Log10 => "log10",
            UnaryOp::Abs => "abs",
            UnaryOp::Sin => "sin",
            UnaryOp::Asin => "asin",
            UnaryOp::Cos => "cos",
            UnaryOp::Acos => "acos",
            UnaryOp::Tan => "tan",
            UnaryOp::Atan => "atan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Asinh => "asinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Acosh => "acosh",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Atanh => "atanh",
        }
    }
}

/// Two-operand operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Pow,
    Mul,
    Div,
    Add,
    Sub,
}

impl BinaryOp {
    /// Evaluate the operator on two scalars
    pub fn apply<T: MathScalar>(self, left: T, right: T) -> T {
        match self {
            BinaryOp::Pow => left.powf(right),
            BinaryOp::Mul => left * right,
            BinaryOp::Div => left / right,
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Pow => Precedence::Exponents,
            BinaryOp::Mul | BinaryOp::Div => Precedence::MultiplicationDivision,
            BinaryOp::Add | BinaryOp::Sub => Precedence::AdditionSubtraction,
        }
    }

    pub fn is_commutative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, BinaryOp::Pow)
    }

    /// Operator symbol used by the plain-text notation
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Pow => "^",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
        }
    }
}

/// Leaf values. Mutable kinds keep their value in a `Cell` and can only be
/// written through a [`Var`] handle.
pub enum Leaf<T> {
    /// Mutable named symbol
    Symbol { name: String, value: Cell<T> },
    /// Name permanently bound to a value, e.g. `pi`
    ConstSymbol { name: String, value: T },
    /// Mutable variable, the usual unknown when solving
    Variable { name: String, value: Cell<T> },
    /// Mutable variable rendered as its current value
    ValueVariable { name: String, value: Cell<T> },
    /// Immutable user-named constant
    NamedConstant { name: String, value: T },
    /// Mutable numeric literal
    Literal(Cell<T>),
    /// Immutable numeric literal
    ConstLiteral(T),
}

impl<T: MathScalar> Leaf<T> {
    /// Current numeric value
    pub fn value(&self) -> T {
        match self {
            Leaf::Symbol { value, .. }
            | Leaf::Variable { value, .. }
            | Leaf::ValueVariable { value, .. }
            | Leaf::Literal(value) => value.get(),
            Leaf::ConstSymbol { value, .. }
            | Leaf::NamedConstant { value, .. }
            | Leaf::ConstLiteral(value) => *value,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Leaf::Symbol { name, .. }
            | Leaf::ConstSymbol { name, .. }
            | Leaf::Variable { name, .. }
            | Leaf::ValueVariable { name, .. }
            | Leaf::NamedConstant { name, .. } => Some(name),
            Leaf::Literal(_) | Leaf::ConstLiteral(_) => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Leaf::ConstSymbol { .. } | Leaf::NamedConstant { .. } | Leaf::ConstLiteral(_)
        )
    }

    /// True for leaves rendered as their numeric value rather than a name
    pub fn displays_value(&self) -> bool {
        matches!(
            self,
            Leaf::ValueVariable { .. } | Leaf::Literal(_) | Leaf::ConstLiteral(_)
        )
    }

    fn cell(&self) -> Option<&Cell<T>> {
        match self {
            Leaf::Symbol { value, .. }
            | Leaf::Variable { value, .. }
            | Leaf::ValueVariable { value, .. }
            | Leaf::Literal(value) => Some(value),
            _ => None,
        }
    }
}

/// Node payload
pub enum ExprKind<T> {
    Leaf(Leaf<T>),
    Unary(UnaryOp, Expr<T>),
    Binary(BinaryOp, Expr<T>, Expr<T>),
    /// Named, rebindable sub-expression ("lambda"). Evaluation forwards to the
    /// inner expression; formatting shows the name unless expanded.
    Container {
        name: String,
        inner: RefCell<Expr<T>>,
    },
}

/// A node: identity plus payload
pub struct Node<T> {
    id: NodeId,
    kind: ExprKind<T>,
}

/// Shared handle to an expression node
pub struct Expr<T = f64>(Rc<Node<T>>);

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Expr(Rc::clone(&self.0))
    }
}

impl<T> Deref for Expr<T> {
    type Target = ExprKind<T>;

    fn deref(&self) -> &Self::Target {
        &self.0.kind
    }
}

impl<T: MathScalar> fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self}){}", self.id())
    }
}

impl<T: MathScalar> Expr<T> {
    pub(crate) fn new(kind: ExprKind<T>) -> Self {
        Expr(Rc::new(Node {
            id: next_id(),
            kind,
        }))
    }

    // Accessor methods

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn kind(&self) -> &ExprKind<T> {
        &self.0.kind
    }

    /// Identity comparison: true iff both handles denote the same node
    #[inline]
    pub fn is(&self, other: &Expr<T>) -> bool {
        self.id() == other.id()
    }

    pub fn as_leaf(&self) -> Option<&Leaf<T>> {
        match self.kind() {
            ExprKind::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Inner expression of a container, `None` for every other node
    pub fn container_inner(&self) -> Option<Expr<T>> {
        match self.kind() {
            ExprKind::Container { inner, .. } => Some(inner.borrow().clone()),
            _ => None,
        }
    }

    /// Name of a named leaf or container
    pub fn name(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::Leaf(leaf) => leaf.name(),
            ExprKind::Container { name, .. } => Some(name),
            ExprKind::Unary(..) | ExprKind::Binary(..) => None,
        }
    }

    // Immutable leaf factories

    /// Immutable numeric literal
    pub fn constant(value: T) -> Self {
        Expr::new(ExprKind::Leaf(Leaf::ConstLiteral(value)))
    }

    /// Immutable numeric literal from an `f64`
    pub fn number(value: f64) -> Self {
        Expr::constant(T::lit(value))
    }

    /// Name permanently bound to a value
    pub fn const_symbol(name: impl Into<String>, value: T) -> Self {
        Expr::new(ExprKind::Leaf(Leaf::ConstSymbol {
            name: name.into(),
            value,
        }))
    }

    /// Immutable user-named constant
    pub fn named_constant(name: impl Into<String>, value: T) -> Self {
        Expr::new(ExprKind::Leaf(Leaf::NamedConstant {
            name: name.into(),
            value,
        }))
    }

    /// The constant π
    pub fn pi() -> Self {
        Expr::const_symbol("pi", T::PI())
    }

    /// Euler's number
    pub fn e() -> Self {
        Expr::const_symbol("e", T::E())
    }

    // Operator factories

    pub fn unary(op: UnaryOp, child: Expr<T>) -> Self {
        Expr::new(ExprKind::Unary(op, child))
    }

    pub fn binary(op: BinaryOp, left: Expr<T>, right: Expr<T>) -> Self {
        Expr::new(ExprKind::Binary(op, left, right))
    }

    // Node properties

    /// Evaluate the expression with the current leaf values
    pub fn result(&self) -> T {
        match self.kind() {
            ExprKind::Leaf(leaf) => leaf.value(),
            ExprKind::Unary(op, child) => op.apply(child.result()),
            ExprKind::Binary(op, left, right) => op.apply(left.result(), right.result()),
            ExprKind::Container { inner, .. } => {
                let inner = inner.borrow().clone();
                inner.result()
            }
        }
    }

    /// Binding class of the node as rendered. Value-displaying leaves holding a
    /// negative number render with a leading sign and so bind like a sum.
    pub fn precedence(&self) -> Precedence {
        match self.kind() {
            ExprKind::Leaf(leaf) if leaf.displays_value() && leaf.value() < T::zero() => {
                Precedence::AdditionSubtraction
            }
            ExprKind::Binary(op, ..) => op.precedence(),
            ExprKind::Leaf(_) | ExprKind::Unary(..) | ExprKind::Container { .. } => {
                Precedence::Parentheses
            }
        }
    }

    pub fn is_commutative(&self) -> bool {
        match self.kind() {
            ExprKind::Binary(op, ..) => op.is_commutative(),
            _ => false,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        match self.kind() {
            ExprKind::Binary(op, ..) => op.is_right_associative(),
            _ => false,
        }
    }

    /// True only for leaves whose value can never change
    pub fn is_constant(&self) -> bool {
        match self.kind() {
            ExprKind::Leaf(leaf) => leaf.is_constant(),
            _ => false,
        }
    }

    // Analysis methods

    /// Maximum nesting depth, looking through containers
    pub fn max_depth(&self) -> usize {
        match self.kind() {
            ExprKind::Leaf(_) => 1,
            ExprKind::Unary(_, child) => 1 + child.max_depth(),
            ExprKind::Binary(_, l, r) => 1 + l.max_depth().max(r.max_depth()),
            ExprKind::Container { inner, .. } => 1 + inner.borrow().max_depth(),
        }
    }
}

/// Handle to a mutable leaf. Only the mutable-leaf factories produce one, so
/// writing into a constant node cannot be expressed.
pub struct Var<T = f64>(Expr<T>);

impl<T> Clone for Var<T> {
    fn clone(&self) -> Self {
        Var(self.0.clone())
    }
}

impl<T: MathScalar> Var<T> {
    /// Mutable variable (the usual solve target)
    pub fn variable(name: impl Into<String>, value: T) -> Self {
        Var(Expr::new(ExprKind::Leaf(Leaf::Variable {
            name: name.into(),
            value: Cell::new(value),
        })))
    }

    /// Mutable named symbol
    pub fn symbol(name: impl Into<String>, value: T) -> Self {
        Var(Expr::new(ExprKind::Leaf(Leaf::Symbol {
            name: name.into(),
            value: Cell::new(value),
        })))
    }

    /// Mutable variable that renders as its current value
    pub fn value_variable(name: impl Into<String>, value: T) -> Self {
        Var(Expr::new(ExprKind::Leaf(Leaf::ValueVariable {
            name: name.into(),
            value: Cell::new(value),
        })))
    }

    /// Mutable numeric literal
    pub fn literal(value: T) -> Self {
        Var(Expr::new(ExprKind::Leaf(Leaf::Literal(Cell::new(value)))))
    }

    pub fn get(&self) -> T {
        self.0.result()
    }

    /// Store a new value; every expression sharing this leaf sees it
    pub fn set(&self, value: T) {
        if let Some(cell) = self.0.as_leaf().and_then(Leaf::cell) {
            cell.set(value);
        }
    }

    pub fn expr(&self) -> &Expr<T> {
        &self.0
    }
}

impl<T> Deref for Var<T> {
    type Target = Expr<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: MathScalar> fmt::Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({:?})", self.0)
    }
}

impl<T> From<Var<T>> for Expr<T> {
    fn from(var: Var<T>) -> Self {
        var.0
    }
}

impl<T> From<&Var<T>> for Expr<T> {
    fn from(var: &Var<T>) -> Self {
        var.0.clone()
    }
}

/// Handle to a container node that allows rebinding its inner expression.
///
/// Rebinding to an expression that mentions the container's own name would
/// create a cycle; callers check [`Expr::references_name`] before rebinding.
pub struct Lambda<T = f64>(Expr<T>);

impl<T> Clone for Lambda<T> {
    fn clone(&self) -> Self {
        Lambda(self.0.clone())
    }
}

impl<T: MathScalar> Lambda<T> {
    pub fn new(name: impl Into<String>, inner: Expr<T>) -> Self {
        Lambda(Expr::new(ExprKind::Container {
            name: name.into(),
            inner: RefCell::new(inner),
        }))
    }

    pub fn inner(&self) -> Expr<T> {
        self.0
            .container_inner()
            .unwrap_or_else(|| self.0.clone())
    }

    /// Bind a new inner expression; every expression sharing the container
    /// sees the new binding
    pub fn rebind(&self, expr: Expr<T>) {
        if let ExprKind::Container { inner, .. } = self.0.kind() {
            *inner.borrow_mut() = expr;
        }
    }

    pub fn expr(&self) -> &Expr<T> {
        &self.0
    }
}

impl<T> Deref for Lambda<T> {
    type Target = Expr<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: MathScalar> fmt::Debug for Lambda<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lambda({:?})", self.0)
    }
}

impl<T> From<Lambda<T>> for Expr<T> {
    fn from(lambda: Lambda<T>) -> Self {
        lambda.0
    }
}

impl<T> From<&Lambda<T>> for Expr<T> {
    fn from(lambda: &Lambda<T>) -> Self {
        lambda.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let num: Expr = Expr::number(2.75);
        match num.kind() {
            ExprKind::Leaf(Leaf::ConstLiteral(n)) => assert_eq!(*n, 2.75),
            _ => panic!("Expected ConstLiteral"),
        }

        let x = Var::variable("x", 1.0);
        assert_eq!(x.name(), Some("x"));

        let add = Expr::binary(BinaryOp::Add, x.expr().clone(), num);
        assert!(matches!(add.kind(), ExprKind::Binary(BinaryOp::Add, _, _)));
    }

    #[test]
    fn test_ids_are_identity() {
        let a: Expr = Expr::number(1.0);
        let b: Expr = Expr::number(1.0);
        assert_ne!(a.id(), b.id());
        assert!(!a.is(&b));
        assert!(a.is(&a.clone()));
    }

    #[test]
    fn test_result() {
        let x = Var::variable("x", 3.0);
        let expr = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(BinaryOp::Add, x.expr().clone(), Expr::number(1.0)),
            Expr::unary(UnaryOp::Sqrt, Expr::number(4.0)),
        );
        assert_eq!(expr.result(), 8.0);
        x.set(5.0);
        assert_eq!(expr.result(), 12.0);
    }

    #[test]
    fn test_flags() {
        let pi: Expr = Expr::pi();
        assert!(pi.is_constant());
        assert_eq!(pi.name(), Some("pi"));
        assert!(!Var::<f64>::literal(2.0).is_constant());

        let pow: Expr = Expr::binary(BinaryOp::Pow, Expr::number(2.0), Expr::number(3.0));
        assert!(pow.is_right_associative());
        assert!(!pow.is_commutative());
        assert!(!pow.is_constant());
        assert_eq!(pow.precedence(), Precedence::Exponents);

        let sum: Expr = Expr::binary(BinaryOp::Add, Expr::number(1.0), Expr::number(2.0));
        assert!(sum.is_commutative());
        assert_eq!(sum.precedence(), Precedence::AdditionSubtraction);
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence::Parentheses < Precedence::Exponents);
        assert!(Precedence::Exponents < Precedence::MultiplicationDivision);
        assert!(Precedence::MultiplicationDivision < Precedence::AdditionSubtraction);
    }

    #[test]
    fn test_negative_literal_binds_like_sum() {
        let neg: Expr = Expr::number(-3.0);
        assert_eq!(neg.precedence(), Precedence::AdditionSubtraction);
        let named: Expr = Expr::named_constant("k", -3.0);
        assert_eq!(named.precedence(), Precedence::Parentheses);
    }

    #[test]
    fn test_container_forwards_evaluation() {
        let x = Var::variable("x", 2.0);
        let f = Lambda::new("f", Expr::binary(BinaryOp::Mul, x.expr().clone(), x.expr().clone()));
        assert_eq!(f.result(), 4.0);
        f.rebind(Expr::binary(BinaryOp::Add, x.expr().clone(), Expr::number(10.0)));
        assert_eq!(f.result(), 12.0);
        assert_eq!(f.name(), Some("f"));
        assert!(f.container_inner().is_some());
    }

    #[test]
    fn test_lambda_inner_is_the_bound_expression() {
        let x = Var::variable("x", 2.0);
        let square = Expr::binary(BinaryOp::Mul, x.expr().clone(), x.expr().clone());
        let f = Lambda::new("f", square.clone());
        assert!(f.inner().is(&square));

        let sum = Expr::binary(BinaryOp::Add, x.expr().clone(), Expr::number(1.0));
        f.rebind(sum.clone());
        assert!(f.inner().is(&sum));
        assert!(f.container_inner().is_some_and(|inner| inner.is(&sum)));
    }

    #[test]
    fn test_node_count_and_depth() {
        let x = Var::variable("x", 1.0);
        let expr = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(BinaryOp::Add, x.expr().clone(), Expr::number(1.0)),
            Expr::unary(UnaryOp::Sin, x.expr().clone()),
        );
        assert_eq!(expr.node_count(), 6);
        assert_eq!(expr.max_depth(), 3);
    }
}
