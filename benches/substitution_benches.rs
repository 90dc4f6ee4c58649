use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use RustedParams::parameters::standard_parameters::{default_dimensional_current, ln, lp, ls};
use RustedParams::symbolic::parameter_table::ParameterTable;
use RustedParams::symbolic::symbolic_engine::Expr;

fn geometry_table() -> ParameterTable {
    let mut table = ParameterTable::with_defaults();
    table.update("Ln", 0.05);
    table.update("Ls", 0.02);
    table.update("Lp", 0.21);
    table
}

// sum of n copies of the fractions times the current: shared subtrees everywhere
fn wide_expression(n: usize) -> Expr {
    let mut expr = Expr::Const(0.0);
    for _ in 0..n {
        expr += (ln() + ls() + lp()) * default_dimensional_current(&Expr::t());
    }
    expr
}

fn bench_process_symbol(c: &mut Criterion) {
    let table = geometry_table();
    let expr = wide_expression(100);
    c.bench_function("process 100 current terms", |b| {
        b.iter(|| table.process_symbol(black_box(&expr)).unwrap())
    });
}

fn bench_identity(c: &mut Criterion) {
    c.bench_function("identity of fresh tree", |b| {
        b.iter(|| wide_expression(black_box(20)).identity())
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let table = geometry_table();
    let processed = table.process_symbol(&wide_expression(100)).unwrap();
    let times = (0..1000).map(|i| i as f64 * 1e-3).collect::<Vec<_>>();
    c.bench_function("evaluate at one time", |b| {
        b.iter(|| processed.evaluate_at(black_box(0.5)).unwrap())
    });
    c.bench_function("evaluate at 1000 times in parallel", |b| {
        b.iter(|| processed.evaluate_many(black_box(&times)).unwrap())
    });
}

criterion_group!(benches, bench_process_symbol, bench_identity, bench_evaluate);
criterion_main!(benches);
