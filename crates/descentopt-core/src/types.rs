//! Type definitions and aliases for descent methods.
//!
//! This module provides the scalar trait shared by every algorithm, the
//! vector/matrix aliases used for points and directions, and the numerical
//! constants of the interval searches.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in optimization (f32 or f64).
///
/// This trait combines all the necessary numeric traits required
/// by the line searches and descent drivers.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default tolerance for the squared gradient norm ratio.
    const DEFAULT_GRADIENT_TOLERANCE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails, which cannot happen for `f32` and `f64`.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Convert from usize (for sample counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails, which cannot happen for `f32` and `f64`.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_GRADIENT_TOLERANCE: Self = 1e-5;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_GRADIENT_TOLERANCE: Self = 1e-8;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

/// Numerical constants shared by the searches and drivers.
pub mod constants {
    use super::Scalar;

    /// Get machine epsilon for the given scalar type.
    pub fn epsilon<T: Scalar>() -> T {
        T::EPSILON
    }

    /// Get default squared-gradient-ratio tolerance.
    pub fn gradient_tolerance<T: Scalar>() -> T {
        T::DEFAULT_GRADIENT_TOLERANCE
    }

    /// Golden ratio φ = (1 + √5) / 2.
    pub fn golden_ratio<T: Scalar>() -> T {
        <T as Scalar>::from_f64(1.618033988749895)
    }

    /// Golden-section shrink factor K = (√5 − 1) / 2 = 1/φ.
    pub fn golden_section<T: Scalar>() -> T {
        <T as Scalar>::from_f64(0.618033988749895)
    }

    /// Golden fraction (3 − √5) / 2 = 1 − 1/φ used by Brent's method.
    pub fn golden_fraction<T: Scalar>() -> T {
        <T as Scalar>::from_f64(0.3819660112501051)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_trait_f32() {
        assert_eq!(constants::epsilon::<f32>(), f32::EPSILON);
        assert_eq!(constants::gradient_tolerance::<f32>(), 1e-5);
    }

    #[test]
    fn test_scalar_trait_f64() {
        assert_eq!(constants::epsilon::<f64>(), f64::EPSILON);
        assert_eq!(constants::gradient_tolerance::<f64>(), 1e-8);
    }

    #[test]
    fn test_scalar_conversions() {
        let val_f64 = 3.14159;
        let val_f32 = <f32 as Scalar>::from_f64(val_f64);
        assert_relative_eq!(val_f32 as f64, val_f64, epsilon = 1e-6);
        assert_eq!(<f64 as Scalar>::from_usize(7), 7.0);
    }

    #[test]
    fn test_golden_constants() {
        let phi = constants::golden_ratio::<f64>();
        let k = constants::golden_section::<f64>();
        let c = constants::golden_fraction::<f64>();

        assert_relative_eq!(k, (5.0_f64.sqrt() - 1.0) / 2.0, epsilon = 1e-15);
        assert_relative_eq!(c, (3.0 - 5.0_f64.sqrt()) / 2.0, epsilon = 1e-15);
        assert_relative_eq!(phi * k, 1.0, epsilon = 1e-14);
        // K² = 1 − K is what lets golden-section reuse one probe per iteration
        assert_relative_eq!(k * k, 1.0 - k, epsilon = 1e-14);
        assert_relative_eq!(k + c, 1.0, epsilon = 1e-15);
    }
}
