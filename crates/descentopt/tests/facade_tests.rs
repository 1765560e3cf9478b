//! End-to-end tests through the facade prelude.

use approx::assert_relative_eq;
use descentopt::prelude::*;
use descentopt_core::test_utils::{logistic_problem, LOGISTIC_MINIMIZER};
use pretty_assertions::assert_eq;

#[test]
fn test_every_driver_with_every_rule() {
    let oracle = logistic_problem::<f64>();
    let start = DVector::zeros(3);
    let expected = DVector::from_row_slice(&LOGISTIC_MINIMIZER);
    let criterion = StoppingCriterion::new().with_tolerance(1e-12);

    let rules = [
        StepSizeRule::golden_section(),
        StepSizeRule::brent(),
        StepSizeRule::wolfe(),
        StepSizeRule::armijo(),
    ];

    for rule in rules {
        let name = rule.name().to_string();

        let mut strategy = rule.clone();
        let newton = Newton::default()
            .run(&oracle, &start, &mut strategy, &criterion)
            .unwrap();
        assert!(newton.converged, "Newton with {name}");
        assert_relative_eq!(newton.point, expected, epsilon = 1e-4);

        let mut strategy = rule;
        let hfn = HessianFreeNewton::default()
            .run(&oracle, &start, &mut strategy, &criterion)
            .unwrap();
        assert!(hfn.converged, "Hessian-free Newton with {name}");
        assert_relative_eq!(hfn.point, expected, epsilon = 1e-4);
    }
}

#[test]
fn test_progress_is_reported_per_iteration() {
    let oracle = QuadraticOracle::diagonal(&[1.0, 2.0, 3.0]);
    let start = DVector::from_element(3, 1.0);
    let mut gd = GradientDescent::default();
    let mut callback = RecordingCallback::<f64>::new();

    let result = gd
        .run_with_callback(
            &oracle,
            &start,
            &mut WolfeStep::new(),
            &StoppingCriterion::new(),
            &mut callback,
        )
        .unwrap();

    let iterations: Vec<usize> = callback.records.iter().map(|r| r.iteration).collect();
    assert_eq!(iterations, (0..=result.iterations).collect::<Vec<_>>());
    assert_eq!(
        gd.trajectory().gradient_ratios().last().copied(),
        Some(result.gradient_ratio)
    );
}

#[test]
fn test_interval_search_through_prelude() {
    let objective = |x: f64| Ok((x - 0.3).powi(2) + 1.0);
    for minimum in [
        GoldenSection::new()
            .with_max_iterations(100)
            .minimize(-1.0, 1.0, objective, 1e-8, false)
            .unwrap(),
        Brent::new().minimize(-1.0, 1.0, objective, 1e-8, false).unwrap(),
        Parabolic::new().minimize(-1.0, 1.0, objective, 1e-8, false).unwrap(),
    ] {
        assert_relative_eq!(minimum.x_min, 0.3, epsilon = 1e-6);
        assert_relative_eq!(minimum.f_min, 1.0, epsilon = 1e-10);
    }
}
