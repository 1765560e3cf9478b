//! Tests for the step-size strategies.
//!
//! Checks the acceptance conditions each strategy promises and that the
//! reported oracle calls match what the oracle actually served.

use descentopt_core::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn logistic() -> LogisticRegressionOracle<f64> {
    let features = DMatrix::from_row_slice(
        6,
        2,
        &[
            -1.5, 0.3, //
            -0.7, -1.1, //
            -0.2, 0.8, //
            0.4, -0.6, //
            0.9, 1.4, //
            1.6, -0.2,
        ],
    );
    let labels = DVector::from_vec(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    LogisticRegressionOracle::new(features, labels)
        .unwrap()
        .with_intercept()
}

fn all_rules() -> Vec<StepSizeRule<f64>> {
    vec![
        StepSizeRule::golden_section(),
        StepSizeRule::brent(),
        StepSizeRule::wolfe(),
        StepSizeRule::armijo(),
        StepSizeRule::nesterov(),
        StepSizeRule::constant(0.5),
    ]
}

#[test]
fn test_reported_calls_match_oracle_counts() {
    let oracle = CountingOracle::new(logistic());
    let x = DVector::from_vec(vec![0.5, -0.3, 0.1]);
    let d = -oracle.gradient(&x).unwrap();

    for mut rule in all_rules() {
        oracle.reset_counts();
        let step = rule.compute(&oracle, &x, &d).unwrap();
        assert_eq!(
            step.oracle_calls,
            oracle.counts().calls,
            "{} misreported its oracle calls",
            rule.name()
        );
    }
}

#[test]
fn test_rules_decrease_logistic_loss() {
    let oracle = logistic();
    let x = DVector::from_vec(vec![1.0, 1.0, -1.0]);
    let d = -oracle.gradient(&x).unwrap();
    let f0 = oracle.value(&x).unwrap();

    for mut rule in all_rules() {
        let step = rule.compute(&oracle, &x, &d).unwrap();
        let f1 = oracle.value(&(&x + &d * step.alpha)).unwrap();
        assert!(f1 < f0, "{}: {f1} >= {f0}", rule.name());
        assert!(step.success, "{} reported failure", rule.name());
    }
}

#[test]
fn test_shared_nesterov_state_survives_rule_clone() {
    let oracle = QuadraticOracle::diagonal(&[10.0]);
    let x = DVector::from_vec(vec![1.0]);
    let d = DVector::from_vec(vec![-10.0]);

    let mut shared = SharedStepSize::new(StepSizeRule::nesterov());
    let mut other = shared.clone();
    let first = shared.compute(&oracle, &x, &d).unwrap();
    let second = other.compute(&oracle, &x, &d).unwrap();

    assert_eq!(first.alpha, second.alpha);
    assert!(second.oracle_calls < first.oracle_calls);
}

#[test]
fn test_mismatched_direction_is_rejected() {
    let oracle = QuadraticOracle::<f64>::simple(2);
    let x = DVector::from_vec(vec![1.0, 1.0]);
    let d = DVector::from_vec(vec![-1.0]);

    for mut rule in all_rules() {
        assert!(matches!(
            rule.compute(&oracle, &x, &d),
            Err(OptimizerError::Oracle(OracleError::DimensionMismatch { .. }))
        ));
    }
}

/// f(x) = −x up to x = `edge`, NaN beyond.
#[derive(Debug)]
struct Cliff {
    edge: f64,
}

impl Oracle<f64> for Cliff {
    fn dimension(&self) -> usize {
        1
    }

    fn value(&self, point: &DVector<f64>) -> OracleResult<f64> {
        Ok(if point[0] <= self.edge {
            -point[0]
        } else {
            f64::NAN
        })
    }

    fn gradient(&self, _point: &DVector<f64>) -> OracleResult<DVector<f64>> {
        Ok(DVector::from_element(1, -1.0))
    }
}

fn along_cliff<S: StepSizeStrategy<f64>>(
    strategy: &mut S,
    edge: f64,
) -> OptimizerResult<StepSize<f64>> {
    let x = DVector::from_element(1, 0.0);
    let d = DVector::from_element(1, 1.0);
    strategy.compute(&Cliff { edge }, &x, &d)
}

fn is_non_finite(result: &OptimizerResult<StepSize<f64>>) -> bool {
    matches!(
        result,
        Err(OptimizerError::Oracle(OracleError::NonFinite { .. }))
    )
}

#[test]
fn test_backtracking_rules_step_short_of_non_finite_values() {
    let mut armijo = ArmijoStep::new();
    let mut wolfe = WolfeStep::new();
    let mut nesterov = NesterovStep::new().with_initial_lipschitz(0.125);

    for (name, step) in [
        ("armijo", along_cliff(&mut armijo, 3.0)),
        ("wolfe", along_cliff(&mut wolfe, 3.0)),
        ("nesterov", along_cliff(&mut nesterov, 3.0)),
    ] {
        let step = step.unwrap();
        assert_eq!(step.alpha, 2.0, "{name}");
        assert!(step.success, "{name}");

        let value = Cliff { edge: 3.0 }
            .value(&DVector::from_element(1, step.alpha))
            .unwrap();
        assert!(value.is_finite() && value < 0.0, "{name}: φ(α) = {value}");
    }
    // 8 and 4 overshoot, 2 is accepted, then L is halved
    assert_eq!(nesterov.lipschitz(), 0.25);
}

#[test]
fn test_backtracking_rules_fail_without_finite_trials() {
    assert!(is_non_finite(&along_cliff(&mut ArmijoStep::new(), 0.0)));
    assert!(is_non_finite(&along_cliff(
        &mut NesterovStep::new().with_max_iterations(5),
        0.0
    )));
    // Wolfe hands over to Armijo, which runs out of finite trials
    assert!(is_non_finite(&along_cliff(&mut WolfeStep::new(), 0.0)));
}

#[test]
fn test_exact_searches_reject_non_finite_values() {
    assert!(is_non_finite(&along_cliff(&mut GoldenSectionStep::new(), 3.0)));
    assert!(is_non_finite(&along_cliff(&mut BrentStep::new(), 3.0)));
    assert!(is_non_finite(&along_cliff(&mut StepSizeRule::brent(), 3.0)));
}

#[test]
fn test_constant_step_does_not_evaluate() {
    let step = along_cliff(&mut ConstantStep::new(5.0), 3.0).unwrap();
    assert_eq!(step, StepSize::new(5.0, 0, true));
}

fn diagonal_setup(
    diag: &[f64],
    point: &[f64],
) -> (QuadraticOracle<f64>, DVector<f64>, DVector<f64>) {
    let oracle = QuadraticOracle::diagonal(diag);
    let x = DVector::from_column_slice(point);
    let d = -oracle.gradient(&x).unwrap();
    (oracle, x, d)
}

proptest! {
    #[test]
    fn prop_armijo_sufficient_decrease(
        diag in prop::collection::vec(0.1_f64..10.0, 3),
        point in prop::collection::vec(-5.0_f64..5.0, 3),
    ) {
        let (oracle, x, d) = diagonal_setup(&diag, &point);
        prop_assume!(d.norm() > 1e-3);

        let step = ArmijoStep::new().compute(&oracle, &x, &d).unwrap();
        let phi0 = oracle.value(&x).unwrap();
        let slope = -d.norm_squared();
        let phi = oracle.value(&(&x + &d * step.alpha)).unwrap();

        prop_assert!(step.success);
        prop_assert!(phi <= phi0 + 0.4 * step.alpha * slope + 1e-12);
    }

    #[test]
    fn prop_wolfe_strong_conditions(
        diag in prop::collection::vec(0.1_f64..10.0, 3),
        point in prop::collection::vec(-5.0_f64..5.0, 3),
    ) {
        let (oracle, x, d) = diagonal_setup(&diag, &point);
        prop_assume!(d.norm() > 1e-3);

        let step = WolfeStep::new().compute(&oracle, &x, &d).unwrap();
        let phi0 = oracle.value(&x).unwrap();
        let slope0 = -d.norm_squared();
        let next = &x + &d * step.alpha;
        let phi = oracle.value(&next).unwrap();
        let slope = oracle.gradient(&next).unwrap().dot(&d);

        prop_assert!(step.success);
        prop_assert!(phi <= phi0 + 1e-4 * step.alpha * slope0 + 1e-12);
        prop_assert!(slope.abs() <= 0.9 * slope0.abs() + 1e-12);
    }

    #[test]
    fn prop_exact_searches_agree(
        diag in prop::collection::vec(0.5_f64..4.0, 2),
        point in prop::collection::vec(-3.0_f64..3.0, 2),
    ) {
        let (oracle, x, d) = diagonal_setup(&diag, &point);
        prop_assume!(d.norm() > 1e-2);

        // exact minimizer along the line of a quadratic
        let hd = &oracle.a * &d;
        let exact = d.norm_squared() / d.dot(&hd);
        prop_assume!(exact < 10.0);

        let brent = BrentStep::new().compute(&oracle, &x, &d).unwrap();
        prop_assert!((brent.alpha - exact).abs() < 1e-6 * exact.max(1.0));

        let golden = GoldenSectionStep::new()
            .with_max_iterations(100)
            .compute(&oracle, &x, &d)
            .unwrap();
        prop_assert!((golden.alpha - exact).abs() < 1e-4);
    }
}
