//! Per-operator inverse tables used by equation isolation.
//!
//! Each function takes the accumulated target `from` (the value the current
//! node must take) and returns the value its operand must take instead.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::symbol::{
    acos, acosh, asin, asinh, atan, atanh, cos, cosh, div, log, neg, pow, sin, sinh, sqrt, tan,
    tanh,
};
use crate::traits::{MathScalar, is_even_integer};

/// Which operand of a binary node contains the unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Invert `op(x) = from` for `x`, `None` when `op` has no inverse
pub fn invert_unary<T: MathScalar>(op: UnaryOp, from: &Expr<T>) -> Option<Expr<T>> {
    let from = from.clone();
    let inverted = match op {
        UnaryOp::Negate => neg(from),
        UnaryOp::Sqrt => pow(from, 2.0),
        UnaryOp::Square => sqrt(from),
        UnaryOp::Log => pow(Expr::e(), from),
        UnaryOp::Log10 => pow(10.0, from),
        UnaryOp::Abs => return None,
        UnaryOp::Sin => asin(from),
        UnaryOp::Asin => sin(from),
        UnaryOp::Cos => acos(from),
        UnaryOp::Acos => cos(from),
        UnaryOp::Tan => atan(from),
        UnaryOp::Atan => tan(from),
        UnaryOp::Sinh => asinh(from),
        UnaryOp::Asinh => sinh(from),
        UnaryOp::Cosh => acosh(from),
        UnaryOp::Acosh => cosh(from),
        UnaryOp::Tanh => atanh(from),
        UnaryOp::Atanh => tanh(from),
    };
    Some(inverted)
}

/// Every candidate for `x` in `op(x) = from`. Squares yield both signs;
/// trigonometric functions yield only the principal value.
pub fn invert_unary_all<T: MathScalar>(op: UnaryOp, from: &Expr<T>) -> Vec<Expr<T>> {
    match op {
        UnaryOp::Square => {
            let root = sqrt(from.clone());
            vec![root.clone(), neg(root)]
        }
        _ => invert_unary(op, from).into_iter().collect(),
    }
}

/// Invert a binary node for the operand on `side`, with `other` the
/// remaining operand
pub fn invert_binary<T: MathScalar>(
    op: BinaryOp,
    side: Side,
    other: &Expr<T>,
    from: &Expr<T>,
) -> Expr<T> {
    let (from, other) = (from.clone(), other.clone());
    match (op, side) {
        (BinaryOp::Pow, Side::Left) => {
            if other.is_constant() && other.result() == T::lit(2.0) {
                sqrt(from)
            } else {
                pow(from, div(1.0, other))
            }
        }
        (BinaryOp::Pow, Side::Right) => div(log(from), log(other)),
        (BinaryOp::Mul, _) => from / other,
        (BinaryOp::Div, Side::Left) => from * other,
        (BinaryOp::Div, Side::Right) => other / from,
        (BinaryOp::Add, _) => from - other,
        (BinaryOp::Sub, Side::Left) => from + other,
        (BinaryOp::Sub, Side::Right) => other - from,
    }
}

/// Every candidate for the operand on `side`. A base raised to a constant
/// even integer yields both signs of the root, positive first.
pub fn invert_binary_all<T: MathScalar>(
    op: BinaryOp,
    side: Side,
    other: &Expr<T>,
    from: &Expr<T>,
) -> Vec<Expr<T>> {
    let root = invert_binary(op, side, other, from);
    if op == BinaryOp::Pow
        && side == Side::Left
        && other.is_constant()
        && is_even_integer(other.result())
        && other.result() != T::zero()
    {
        vec![root.clone(), neg(root)]
    } else {
        vec![root]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Var};

    #[test]
    fn test_every_unary_except_abs_inverts() {
        let y = Var::variable("y", 0.5_f64);
        for op in UnaryOp::ALL {
            let inverse = invert_unary(op, y.expr());
            assert_eq!(inverse.is_none(), op == UnaryOp::Abs, "{op:?}");
        }
    }

    #[test]
    fn test_unary_inverse_roundtrip_values() {
        let y = Var::variable("y", 0.5_f64);
        for op in UnaryOp::ALL {
            let Some(inverse) = invert_unary(op, y.expr()) else {
                continue;
            };
            // acosh(0.5) is outside the real domain
            if inverse.result().is_nan() {
                continue;
            }
            let back = op.apply(inverse.result());
            assert!((back - 0.5).abs() < 1e-12, "{op:?}: {back}");
        }
    }

    #[test]
    fn test_square_inverse_has_both_signs() {
        let nine: Expr = Expr::number(9.0);
        let roots = invert_unary_all(UnaryOp::Square, &nine);
        let values: Vec<f64> = roots.iter().map(Expr::result).collect();
        assert_eq!(values, vec![3.0, -3.0]);
        assert!(matches!(roots[1].kind(), ExprKind::Unary(UnaryOp::Negate, _)));
    }

    #[test]
    fn test_pow_left_uses_sqrt_for_constant_two() {
        let two: Expr = Expr::number(2.0);
        let from: Expr = Expr::number(16.0);
        let root = invert_binary(BinaryOp::Pow, Side::Left, &two, &from);
        assert!(matches!(root.kind(), ExprKind::Unary(UnaryOp::Sqrt, _)));
        assert_eq!(root.result(), 4.0);

        let three: Expr = Expr::number(3.0);
        let cube = invert_binary(BinaryOp::Pow, Side::Left, &three, &Expr::number(27.0));
        assert!((cube.result() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_power_multi_valued() {
        let four: Expr = Expr::number(4.0);
        let from: Expr = Expr::number(16.0);
        let roots = invert_binary_all(BinaryOp::Pow, Side::Left, &four, &from);
        assert_eq!(roots.len(), 2);
        assert!((roots[0].result() - 2.0).abs() < 1e-12);
        assert!((roots[1].result() + 2.0).abs() < 1e-12);

        let three: Expr = Expr::number(3.0);
        assert_eq!(invert_binary_all(BinaryOp::Pow, Side::Left, &three, &from).len(), 1);
    }

    #[test]
    fn test_non_commutative_right_side() {
        let ten: Expr = Expr::number(10.0);
        let two: Expr = Expr::number(2.0);
        // 10 - x = 2 -> x = 8
        assert_eq!(invert_binary(BinaryOp::Sub, Side::Right, &ten, &two).result(), 8.0);
        // 10 / x = 2 -> x = 5
        assert_eq!(invert_binary(BinaryOp::Div, Side::Right, &ten, &two).result(), 5.0);
        // 2 ^ x = 8 -> x = 3
        let base: Expr = Expr::number(2.0);
        let exponent = invert_binary(BinaryOp::Pow, Side::Right, &base, &Expr::number(8.0));
        assert!((exponent.result() - 3.0).abs() < 1e-12);
    }
}
