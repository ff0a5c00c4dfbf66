//! Engine Benchmark
//!
//! Solving, formatting, simplification and rational hints over long
//! operator chains.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symcalc::{Expr, Format, Solve, Var, simplify, solve, solve_all, useful_fraction};

// =============================================================================
// Expression Generators
// =============================================================================

/// A chain of `n` invertible steps around `x`, mixing every operator class
fn generate_chain(x: &Var, n: usize) -> Expr {
    let mut expr = x.expr().clone();
    for i in 1..=n {
        #[allow(clippy::cast_precision_loss)]
        let k = (i % 7 + 2) as f64;
        expr = match i % 6 {
            0 => expr + k,
            1 => expr * k,
            2 => k - expr,
            3 => expr / k,
            4 => expr.atan(),
            _ => expr.sinh(),
        };
    }
    expr
}

/// A sum of `n` terms that each carry a foldable identity
fn generate_foldable(x: &Var, y: &Var, n: usize) -> Expr {
    let mut expr = x.expr() * 1.0;
    for i in 1..=n {
        let term = match i % 4 {
            0 => (x.expr() + 0.0).pow(1.0),
            1 => y.expr() * 0.0,
            2 => y.pow(0.0) / 1.0,
            _ => x.sin() - 0.0,
        };
        expr = expr + term;
    }
    expr
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let x = Var::variable("x", 0.5);
    for n in [10, 100] {
        let lhs = generate_chain(&x, n);
        let rhs = Expr::number(lhs.result());

        group.bench_function(format!("solve_chain_{n}"), |b| {
            b.iter(|| solve(black_box(&lhs), black_box(&rhs), &x))
        });
        group.bench_function(format!("solve_all_chain_{n}"), |b| {
            b.iter(|| solve_all(black_box(&lhs), black_box(&rhs), &x))
        });
        group.bench_function(format!("builder_chain_{n}"), |b| {
            b.iter(|| Solve::new().solve(black_box(&lhs), black_box(&rhs), &x))
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    let x = Var::variable("x", 0.5);
    let expr = generate_chain(&x, 200);

    group.bench_function("standard_200", |b| b.iter(|| black_box(&expr).to_string()));
    group.bench_function("latex_200", |b| b.iter(|| black_box(&expr).to_latex()));
    group.bench_function("unicode_200", |b| b.iter(|| black_box(&expr).to_unicode()));
    group.bench_function("precision_12_200", |b| {
        let format = Format::new(12);
        b.iter(|| format.render(black_box(&expr)))
    });
    group.finish();
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify");
    let x = Var::variable("x", 0.5);
    let y = Var::variable("y", 2.0);
    let foldable = generate_foldable(&x, &y, 300);
    let clean = generate_chain(&x, 300);

    group.bench_function("foldable_300", |b| b.iter(|| simplify(black_box(&foldable))));
    group.bench_function("nothing_to_fold_300", |b| b.iter(|| simplify(black_box(&clean))));
    group.finish();
}

fn bench_fraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("useful_fraction");
    let values = [
        0.5,
        std::f64::consts::FRAC_PI_2,
        std::f64::consts::E / 3.0,
        5.0_f64.sqrt() / 7.0,
    ];
    group.bench_function("mixed_values", |b| {
        b.iter(|| {
            for value in values {
                black_box(useful_fraction(black_box(value), 6));
            }
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_solve,
    bench_format,
    bench_simplify,
    bench_fraction
);

criterion_main!(benches);
