use crate::ast::{BinaryOp, Expr};
use crate::traits::MathScalar;

/// Core trait for all folding rules.
///
/// A rule inspects the operands of a binary node whose children have already
/// been simplified and returns the replacement node, if any. Rules never look
/// at symbolic structure: only `is_constant` and the numeric value of a
/// constant operand decide whether they fire.
pub(crate) trait Rule<T: MathScalar> {
    fn name(&self) -> &'static str;

    /// Which operators this rule can apply to
    fn applies_to(&self) -> &'static [BinaryOp];

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>>;
}

/// True for a constant node holding exactly `value`
#[inline]
fn is_constant_value<T: MathScalar>(expr: &Expr<T>, value: f64) -> bool {
    expr.is_constant() && expr.result() == T::lit(value)
}

fn one<T: MathScalar>() -> Expr<T> {
    Expr::constant(T::one())
}

fn zero<T: MathScalar>() -> Expr<T> {
    Expr::constant(T::zero())
}

/// Rule for zero exponent: x^0 = 1
pub(crate) struct PowZeroRule;

impl<T: MathScalar> Rule<T> for PowZeroRule {
    fn name(&self) -> &'static str {
        "pow_zero"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Pow]
    }

    fn apply(&self, _left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        is_constant_value(right, 0.0).then(one::<T>)
    }
}

/// Rule for zero base: 0^x = 0, unless x is a non-positive constant
pub(crate) struct ZeroPowRule;

impl<T: MathScalar> Rule<T> for ZeroPowRule {
    fn name(&self) -> &'static str {
        "zero_pow"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Pow]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        if !is_constant_value(left, 0.0) {
            return None;
        }
        if right.is_constant() && right.result() <= T::zero() {
            return None;
        }
        Some(left.clone())
    }
}

/// Rule for unit exponent: x^1 = x
pub(crate) struct PowOneRule;

impl<T: MathScalar> Rule<T> for PowOneRule {
    fn name(&self) -> &'static str {
        "pow_one"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Pow]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        is_constant_value(right, 1.0).then(|| left.clone())
    }
}

/// Rule for multiplying by one: 1 * x = x, x * 1 = x
pub(crate) struct MulOneRule;

impl<T: MathScalar> Rule<T> for MulOneRule {
    fn name(&self) -> &'static str {
        "mul_one"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Mul]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        if is_constant_value(left, 1.0) {
            return Some(right.clone());
        }
        if is_constant_value(right, 1.0) {
            return Some(left.clone());
        }
        None
    }
}

/// Rule for multiplying by zero: 0 * x = 0, x * 0 = 0
pub(crate) struct MulZeroRule;

impl<T: MathScalar> Rule<T> for MulZeroRule {
    fn name(&self) -> &'static str {
        "mul_zero"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Mul]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        if is_constant_value(left, 0.0) {
            return Some(left.clone());
        }
        if is_constant_value(right, 0.0) {
            return Some(right.clone());
        }
        None
    }
}

/// Rule for dividing equal constants: c / c = 1 (c nonzero)
pub(crate) struct DivSelfRule;

impl<T: MathScalar> Rule<T> for DivSelfRule {
    fn name(&self) -> &'static str {
        "div_self"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Div]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        if !(left.is_constant() && right.is_constant()) {
            return None;
        }
        let value = left.result();
        (value == right.result() && value != T::zero() && value.is_finite()).then(one::<T>)
    }
}

/// Rule for dividing by one: x / 1 = x
pub(crate) struct DivOneRule;

impl<T: MathScalar> Rule<T> for DivOneRule {
    fn name(&self) -> &'static str {
        "div_one"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Div]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        is_constant_value(right, 1.0).then(|| left.clone())
    }
}

/// Rule for zero numerator: 0 / x = 0, unless x is the constant zero
pub(crate) struct ZeroDivRule;

impl<T: MathScalar> Rule<T> for ZeroDivRule {
    fn name(&self) -> &'static str {
        "zero_div"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Div]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        (is_constant_value(left, 0.0) && !is_constant_value(right, 0.0)).then(zero::<T>)
    }
}

/// Rule for adding zero: x + 0 = x, 0 + x = x
pub(crate) struct AddZeroRule;

impl<T: MathScalar> Rule<T> for AddZeroRule {
    fn name(&self) -> &'static str {
        "add_zero"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Add]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        if is_constant_value(left, 0.0) {
            return Some(right.clone());
        }
        if is_constant_value(right, 0.0) {
            return Some(left.clone());
        }
        None
    }
}

/// Rule for subtracting zero: x - 0 = x
pub(crate) struct SubZeroRule;

impl<T: MathScalar> Rule<T> for SubZeroRule {
    fn name(&self) -> &'static str {
        "sub_zero"
    }

    fn applies_to(&self) -> &'static [BinaryOp] {
        &[BinaryOp::Sub]
    }

    fn apply(&self, left: &Expr<T>, right: &Expr<T>) -> Option<Expr<T>> {
        is_constant_value(right, 0.0).then(|| left.clone())
    }
}

/// Every folding rule, in application order
pub(crate) fn all_rules<T: MathScalar>() -> Vec<Box<dyn Rule<T>>> {
    vec![
        Box::new(PowZeroRule),
        Box::new(ZeroPowRule),
        Box::new(PowOneRule),
        Box::new(MulOneRule),
        Box::new(MulZeroRule),
        Box::new(DivSelfRule),
        Box::new(DivOneRule),
        Box::new(ZeroDivRule),
        Box::new(AddZeroRule),
        Box::new(SubZeroRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Var;

    #[test]
    fn test_variable_holding_zero_is_not_constant_zero() {
        let x = Var::variable("x", 0.0);
        let y: Expr = Expr::number(5.0);
        assert!(AddZeroRule.apply(x.expr(), &y).is_none());
        assert!(MulZeroRule.apply(&y, x.expr()).is_none());
    }

    #[test]
    fn test_div_self_requires_nonzero() {
        let zero: Expr = Expr::number(0.0);
        let other_zero: Expr = Expr::number(0.0);
        assert!(DivSelfRule.apply(&zero, &other_zero).is_none());
        let three: Expr = Expr::number(3.0);
        let other_three: Expr = Expr::number(3.0);
        let folded = DivSelfRule.apply(&three, &other_three).expect("3/3 folds");
        assert_eq!(folded.result(), 1.0);
    }

    #[test]
    fn test_zero_pow_guards_nonpositive_exponent() {
        let zero: Expr = Expr::number(0.0);
        assert!(ZeroPowRule.apply(&zero, &Expr::number(-1.0)).is_none());
        assert!(ZeroPowRule.apply(&zero, &Expr::number(2.0)).is_some());
    }
}
