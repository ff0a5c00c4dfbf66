use crate::{Expr, Lambda, Solve, SolveError, Var, solve, solve_all, sqrt};

const TOLERANCE: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

/// Solve `lhs = rhs` for `x`, store the answer and check both sides agree
fn check_by_substitution(lhs: &Expr, rhs: &Expr, x: &Var, expected: f64) {
    let solved = solve(lhs, rhs, x).unwrap_or_else(|| panic!("{lhs} = {rhs} should be solvable"));
    let value = solved.result();
    assert_close(value, expected);
    x.set(value);
    assert_close(lhs.result(), rhs.result());
}

#[test]
fn test_concrete_scenario_pi_power() {
    let x = Var::variable("x", 21.0);
    let y: Expr = sqrt(Expr::pi().pow(&x * (2.0 + Expr::pi())));
    let value = Expr::number(y.result());

    x.set(0.0);
    let solved = solve(&y, &value, &x).expect("x occurs once");
    assert_close(solved.result(), 21.0);
    // Pure: the target keeps its value
    assert_eq!(x.get(), 0.0);
}

#[test]
fn test_every_binary_operator_left_operand() {
    let x = Var::variable("x", 0.0);
    let seven = || Expr::number(7.0);
    check_by_substitution(&(&x + 3.0), &seven(), &x, 4.0);
    check_by_substitution(&(&x - 3.0), &seven(), &x, 10.0);
    check_by_substitution(&(&x * 2.0), &seven(), &x, 3.5);
    check_by_substitution(&(&x / 2.0), &seven(), &x, 14.0);
    check_by_substitution(&x.pow(3.0), &Expr::number(8.0), &x, 2.0);
}

#[test]
fn test_every_binary_operator_right_operand() {
    let x = Var::variable("x", 0.0);
    let seven = || Expr::number(7.0);
    check_by_substitution(&(3.0 + x.expr().clone()), &seven(), &x, 4.0);
    check_by_substitution(&(3.0 - x.expr().clone()), &seven(), &x, -4.0);
    check_by_substitution(&(2.0 * &x), &seven(), &x, 3.5);
    check_by_substitution(&(14.0 / x.expr().clone()), &seven(), &x, 2.0);
    check_by_substitution(&Expr::number(2.0).pow(&x), &Expr::number(8.0), &x, 3.0);
}

#[test]
fn test_unary_operators() {
    let x = Var::variable("x", 0.0);
    let half = || Expr::number(0.5);
    check_by_substitution(&(-&x), &half(), &x, -0.5);
    check_by_substitution(&x.sqrt(), &Expr::number(3.0), &x, 9.0);
    check_by_substitution(&x.square(), &Expr::number(9.0), &x, 3.0);
    check_by_substitution(&x.log(), &Expr::number(1.0), &x, std::f64::consts::E);
    check_by_substitution(&x.log10(), &Expr::number(2.0), &x, 100.0);
    check_by_substitution(&x.sin(), &half(), &x, 0.5_f64.asin());
    check_by_substitution(&x.cos(), &half(), &x, 0.5_f64.acos());
    check_by_substitution(&x.tan(), &half(), &x, 0.5_f64.atan());
    check_by_substitution(&x.asin(), &half(), &x, 0.5_f64.sin());
    check_by_substitution(&x.acos(), &half(), &x, 0.5_f64.cos());
    check_by_substitution(&x.atan(), &half(), &x, 0.5_f64.tan());
    check_by_substitution(&x.sinh(), &half(), &x, 0.5_f64.asinh());
    check_by_substitution(&x.cosh(), &Expr::number(2.0), &x, 2.0_f64.acosh());
    check_by_substitution(&x.tanh(), &half(), &x, 0.5_f64.atanh());
    check_by_substitution(&x.asinh(), &half(), &x, 0.5_f64.sinh());
    check_by_substitution(&x.acosh(), &half(), &x, 0.5_f64.cosh());
    check_by_substitution(&x.atanh(), &half(), &x, 0.5_f64.tanh());
}

#[test]
fn test_nested_chain() {
    // log10(3 * (x + 1)^2 / 4) - 1 = 2 -> (x + 1)^2 = 4000/3
    let x = Var::variable("x", 0.0);
    let lhs = (3.0 * (&x + 1.0).pow(2.0) / 4.0).log10() - 1.0;
    let expected = (4000.0_f64 / 3.0).sqrt() - 1.0;
    check_by_substitution(&lhs, &Expr::number(2.0), &x, expected);
}

#[test]
fn test_unknown_on_right_hand_side() {
    let x = Var::variable("x", 0.0);
    let y = Var::variable("y", 5.0);
    let solved = solve(&(&y * 2.0), &(&x / 3.0), &x).expect("solvable");
    assert_close(solved.result(), 30.0);
    // The other side stays live: changing y changes the solution
    y.set(1.0);
    assert_close(solved.result(), 6.0);
}

#[test]
fn test_precondition_absent() {
    let x = Var::variable("x", 0.0);
    let y = Var::variable("y", 1.0);
    assert!(solve(&(&y + 1.0), &Expr::number(2.0), &x).is_none());
    assert!(solve_all(&(&y + 1.0), &Expr::number(2.0), &x).is_empty());
    let err = Solve::new()
        .solve(&(&y + 1.0), &Expr::number(2.0), &x)
        .unwrap_err();
    assert_eq!(err, SolveError::TargetAbsent { name: "x".into() });
}

#[test]
fn test_precondition_both_sides() {
    let x = Var::variable("x", 0.0);
    assert!(solve(&(&x + 1.0), &(&x * 2.0), &x).is_none());
    let err = Solve::new()
        .solve(&(&x + 1.0), &(&x * 2.0), &x)
        .unwrap_err();
    assert_eq!(
        err,
        SolveError::TargetRepeated {
            name: "x".into(),
            count: 2
        }
    );
}

#[test]
fn test_precondition_twice_on_one_side() {
    let x = Var::variable("x", 0.0);
    assert!(solve(&(&x + &x), &Expr::number(4.0), &x).is_none());
    assert!(solve(&(x.sin() * x.cos()), &Expr::number(0.25), &x).is_none());
}

#[test]
fn test_same_name_different_leaf_is_not_an_occurrence() {
    let x = Var::variable("x", 0.0);
    let other_x = Var::variable("x", 2.0);
    // x + x' = 5 has exactly one occurrence of the leaf x
    let solved = solve(&(&x + &other_x), &Expr::number(5.0), &x).expect("solvable");
    assert_close(solved.result(), 3.0);
}

#[test]
fn test_abs_blocks_isolation() {
    let x = Var::variable("x", 0.0);
    assert!(solve(&x.abs(), &Expr::number(2.0), &x).is_none());
    let err = Solve::new()
        .solve(&(x.abs() + 1.0), &Expr::number(2.0), &x)
        .unwrap_err();
    assert_eq!(err, SolveError::NoIsolation { name: "x".into() });
}

#[test]
fn test_multi_valued_square() {
    let x = Var::variable("x", 0.0);
    let roots = solve_all(&x.pow(2.0), &Expr::number(9.0), &x);
    let values: Vec<f64> = roots.iter().map(Expr::result).collect();
    assert_eq!(values.len(), 2);
    assert_close(values[0], 3.0);
    assert_close(values[1], -3.0);

    let roots = solve_all(&x.square(), &Expr::number(9.0), &x);
    assert_eq!(roots.len(), 2);
}

#[test]
fn test_multi_valued_even_and_odd_powers() {
    let x = Var::variable("x", 0.0);
    let roots = solve_all(&x.pow(4.0), &Expr::number(16.0), &x);
    assert_eq!(roots.len(), 2);
    assert_close(roots[0].result(), 2.0);
    assert_close(roots[1].result(), -2.0);

    let roots = solve_all(&x.pow(3.0), &Expr::number(8.0), &x);
    assert_eq!(roots.len(), 1);
    assert_close(roots[0].result(), 2.0);
}

#[test]
fn test_multi_valued_every_candidate_satisfies_equation() {
    // (x - 1)^2 * 2 = 18 -> x in {4, -2}
    let x = Var::variable("x", 0.0);
    let lhs = (&x - 1.0).pow(2.0) * 2.0;
    let rhs = Expr::number(18.0);
    let roots = solve_all(&lhs, &rhs, &x);
    let values: Vec<f64> = roots.iter().map(Expr::result).collect();
    assert_eq!(values.len(), 2);
    assert_close(values[0], 4.0);
    assert_close(values[1], -2.0);
    for value in values {
        x.set(value);
        assert_close(lhs.result(), rhs.result());
    }
}

#[test]
fn test_multi_valued_single_for_other_operators() {
    let x = Var::variable("x", 0.0);
    let roots = solve_all(&(&x * 2.0 + 1.0), &Expr::number(5.0), &x);
    assert_eq!(roots.len(), 1);
    assert_close(roots[0].result(), 2.0);
}

#[test]
fn test_solve_through_containers() {
    let x = Var::variable("x", 0.0);
    let f = Lambda::new("f", x.pow(2.0) + 1.0);
    let solved = solve(&(f.expr() * 2.0), &Expr::number(20.0), &x).expect("solvable");
    assert_close(solved.result(), 3.0);

    // Rebinding the container changes what is solved
    f.rebind(&x - 1.0);
    let solved = solve(&(f.expr() * 2.0), &Expr::number(20.0), &x).expect("solvable");
    assert_close(solved.result(), 11.0);
}

#[test]
fn test_assign_is_deferred_and_single() {
    let x = Var::variable("x", 100.0);
    let lhs = &x * 2.0;
    let solved = Solve::new()
        .assign(true)
        .solve(&lhs, &Expr::number(8.0), &x)
        .expect("solvable");
    assert_eq!(x.get(), 4.0);
    // The solution does not reference x, so it is unaffected by the write
    assert_eq!(solved.result(), 4.0);
    assert_eq!(solved.count_occurrences(&x), 0);
}

#[test]
fn test_builder_simplifies_by_default() {
    let x = Var::variable("x", 0.0);
    let y = Var::variable("y", 6.0);
    let solved = Solve::new()
        .solve(&(&x + 0.0), &(&y * 1.0), &x)
        .expect("solvable");
    assert!(solved.is(&y));
}
