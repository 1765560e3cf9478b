use super::{
    ArmijoStep, BrentStep, ConstantStep, GoldenSectionStep, NesterovStep, StepSize,
    StepSizeStrategy, WolfeStep,
};
use crate::{
    error::OptimizerResult,
    oracle::Oracle,
    types::{DVector, Scalar},
};

/// Any of the built-in step-size strategies, selected at runtime.
///
/// ```rust
/// # use descentopt_core::line_search::{StepSizeRule, StepSizeStrategy};
/// let rules: Vec<StepSizeRule<f64>> = vec![
///     StepSizeRule::armijo(),
///     StepSizeRule::wolfe(),
///     StepSizeRule::nesterov(),
/// ];
/// let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
/// assert_eq!(names, ["Armijo", "Strong Wolfe", "Nesterov"]);
/// ```
#[derive(Debug, Clone)]
pub enum StepSizeRule<T: Scalar> {
    /// Golden-section search over a fixed interval
    GoldenSection(GoldenSectionStep<T>),
    /// Bracketing and Brent's method
    Brent(BrentStep<T>),
    /// Strong Wolfe with Armijo fallback
    Wolfe(WolfeStep<T>),
    /// Armijo expansion/backtracking
    Armijo(ArmijoStep<T>),
    /// Adaptive Lipschitz estimate
    Nesterov(NesterovStep<T>),
    /// Fixed step
    Constant(ConstantStep<T>),
}

impl<T: Scalar> StepSizeRule<T> {
    /// Golden-section rule with default settings.
    pub fn golden_section() -> Self {
        Self::GoldenSection(GoldenSectionStep::new())
    }

    /// Brent rule with default settings.
    pub fn brent() -> Self {
        Self::Brent(BrentStep::new())
    }

    /// Strong Wolfe rule with default settings.
    pub fn wolfe() -> Self {
        Self::Wolfe(WolfeStep::new())
    }

    /// Armijo rule with default settings.
    pub fn armijo() -> Self {
        Self::Armijo(ArmijoStep::new())
    }

    /// Nesterov rule starting from L = 1.
    pub fn nesterov() -> Self {
        Self::Nesterov(NesterovStep::new())
    }

    /// Constant rule.
    pub fn constant(alpha: T) -> Self {
        Self::Constant(ConstantStep::new(alpha))
    }
}

impl<T: Scalar> StepSizeStrategy<T> for StepSizeRule<T> {
    fn compute<O>(
        &mut self,
        oracle: &O,
        point: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<StepSize<T>>
    where
        O: Oracle<T> + ?Sized,
    {
        match self {
            Self::GoldenSection(s) => s.compute(oracle, point, direction),
            Self::Brent(s) => s.compute(oracle, point, direction),
            Self::Wolfe(s) => s.compute(oracle, point, direction),
            Self::Armijo(s) => s.compute(oracle, point, direction),
            Self::Nesterov(s) => s.compute(oracle, point, direction),
            Self::Constant(s) => s.compute(oracle, point, direction),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::GoldenSection(s) => s.name(),
            Self::Brent(s) => s.name(),
            Self::Wolfe(s) => s.name(),
            Self::Armijo(s) => s.name(),
            Self::Nesterov(s) => s.name(),
            Self::Constant(s) => s.name(),
        }
    }
}

impl<T: Scalar> From<GoldenSectionStep<T>> for StepSizeRule<T> {
    fn from(s: GoldenSectionStep<T>) -> Self {
        Self::GoldenSection(s)
    }
}

impl<T: Scalar> From<BrentStep<T>> for StepSizeRule<T> {
    fn from(s: BrentStep<T>) -> Self {
        Self::Brent(s)
    }
}

impl<T: Scalar> From<WolfeStep<T>> for StepSizeRule<T> {
    fn from(s: WolfeStep<T>) -> Self {
        Self::Wolfe(s)
    }
}

impl<T: Scalar> From<ArmijoStep<T>> for StepSizeRule<T> {
    fn from(s: ArmijoStep<T>) -> Self {
        Self::Armijo(s)
    }
}

impl<T: Scalar> From<NesterovStep<T>> for StepSizeRule<T> {
    fn from(s: NesterovStep<T>) -> Self {
        Self::Nesterov(s)
    }
}

impl<T: Scalar> From<ConstantStep<T>> for StepSizeRule<T> {
    fn from(s: ConstantStep<T>) -> Self {
        Self::Constant(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::QuadraticOracle;

    #[test]
    fn test_rule_dispatches_to_strategy() {
        let oracle = QuadraticOracle::<f64>::diagonal(&[2.0]);
        let x = DVector::from_vec(vec![3.0]);
        let d = DVector::from_vec(vec![-6.0]);

        let mut direct = ArmijoStep::new();
        let mut rule: StepSizeRule<f64> = ArmijoStep::new().into();

        assert_eq!(
            direct.compute(&oracle, &x, &d).unwrap(),
            rule.compute(&oracle, &x, &d).unwrap()
        );
        assert_eq!(rule.name(), "Armijo");
    }

    #[test]
    fn test_every_rule_produces_descent() {
        let oracle = QuadraticOracle::<f64>::diagonal(&[1.0, 3.0]);
        let x = DVector::from_vec(vec![2.0, -1.0]);
        let d = -oracle.gradient(&x).unwrap();
        let f0 = oracle.value(&x).unwrap();

        let rules = vec![
            StepSizeRule::golden_section(),
            StepSizeRule::brent(),
            StepSizeRule::wolfe(),
            StepSizeRule::armijo(),
            StepSizeRule::nesterov(),
            StepSizeRule::constant(0.1),
        ];

        for mut rule in rules {
            let step = rule.compute(&oracle, &x, &d).unwrap();
            let next = &x + &d * step.alpha;
            assert!(
                oracle.value(&next).unwrap() < f0,
                "{} did not decrease the objective",
                rule.name()
            );
        }
    }
}
