//! Benchmarks comparing the descent drivers
//!
//! Run with: cargo bench -p descentopt-optim

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use descentopt_core::{
    prelude::*,
    test_utils::{ill_conditioned_quadratic, logistic_problem},
};
use descentopt_optim::{
    ForcingSequence, GradientDescent, HessianFreeConfig, HessianFreeNewton, Newton, TruncatedCg,
};

fn benchmark_drivers_on_quadratics(c: &mut Criterion) {
    let mut group = c.benchmark_group("drivers_quadratic");
    group.sample_size(20);

    for &dim in &[10, 50, 100] {
        let oracle = ill_conditioned_quadratic::<f64>(dim, 100.0);
        let start = DVector::from_element(dim, 1.0);
        let criterion = StoppingCriterion::new().with_max_iterations(10_000);

        group.bench_with_input(BenchmarkId::new("gradient_descent", dim), &dim, |b, _| {
            b.iter(|| {
                let mut gd = GradientDescent::default();
                gd.run(black_box(&oracle), black_box(&start), &mut ArmijoStep::new(), &criterion)
            });
        });

        group.bench_with_input(BenchmarkId::new("newton", dim), &dim, |b, _| {
            b.iter(|| {
                let mut newton = Newton::default();
                newton.run(black_box(&oracle), black_box(&start), &mut ArmijoStep::new(), &criterion)
            });
        });

        group.bench_with_input(BenchmarkId::new("hessian_free", dim), &dim, |b, _| {
            b.iter(|| {
                let mut hfn = HessianFreeNewton::default();
                hfn.run(black_box(&oracle), black_box(&start), &mut ArmijoStep::new(), &criterion)
            });
        });
    }

    group.finish();
}

fn benchmark_step_sizes_on_logistic(c: &mut Criterion) {
    let mut group = c.benchmark_group("gd_logistic_step_sizes");
    let oracle = logistic_problem::<f64>();
    let start = DVector::zeros(3);
    let criterion = GradientDescent::<f64>::default_criterion();

    let rules = [
        ("armijo", StepSizeRule::armijo()),
        ("wolfe", StepSizeRule::wolfe()),
        ("nesterov", StepSizeRule::nesterov()),
        ("brent", StepSizeRule::brent()),
        ("golden", StepSizeRule::golden_section()),
    ];

    for (name, rule) in rules {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut gd = GradientDescent::default();
                let mut rule = rule.clone();
                gd.run(black_box(&oracle), black_box(&start), &mut rule, &criterion)
            });
        });
    }

    group.finish();
}

fn benchmark_forcing_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("hessian_free_forcing");
    let oracle = ill_conditioned_quadratic::<f64>(50, 1000.0);
    let start = DVector::from_element(50, 1.0);
    let criterion = HessianFreeNewton::<f64>::default_criterion();

    let sequences = [
        ("superlinear", ForcingSequence::Superlinear),
        ("quadratic", ForcingSequence::Quadratic),
        ("tight", ForcingSequence::tight()),
        ("moderate", ForcingSequence::moderate()),
        ("loose", ForcingSequence::loose()),
    ];

    for (name, forcing) in sequences {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut hfn = HessianFreeNewton::new(HessianFreeConfig::new().with_forcing(forcing));
                hfn.run(black_box(&oracle), black_box(&start), &mut WolfeStep::new(), &criterion)
            });
        });
    }

    group.finish();
}

fn benchmark_truncated_cg(c: &mut Criterion) {
    let mut group = c.benchmark_group("truncated_cg");

    for &dim in &[10, 100, 500] {
        let matrix = ill_conditioned_quadratic::<f64>(dim, 1e4).a;
        let gradient = DVector::from_fn(dim, |i, _| (i as f64 * 0.37).sin());
        let solver = TruncatedCg::new().with_forcing(ForcingSequence::tight());

        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| solver.solve(black_box(&gradient), |v| Ok(&matrix * v)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_drivers_on_quadratics,
    benchmark_step_sizes_on_logistic,
    benchmark_forcing_sequences,
    benchmark_truncated_cg
);
criterion_main!(benches);
