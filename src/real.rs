//! Floating-point abstraction shared by every generic routine.

use num_traits::Float;
use std::fmt::Debug;
use std::iter::Sum;

/// Real scalar type the engine is generic over (`f32` or `f64`).
pub trait Real: Float + Sum + Send + Sync + Debug + Default + 'static {
    /// Relative tolerance used by symmetry checks.
    const SYMMETRY_EPS: Self;

    /// Converts from `f64`, rounding if the target is narrower.
    fn from_f64(v: f64) -> Self;

    /// Widens to `f64`.
    fn as_f64(self) -> f64;

    /// Converts a spin or bit value.
    fn from_i8(v: i8) -> Self;
}

impl Real for f32 {
    const SYMMETRY_EPS: Self = 1e-5;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_i8(v: i8) -> Self {
        v as f32
    }
}

impl Real for f64 {
    const SYMMETRY_EPS: Self = 1e-12;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_i8(v: i8) -> Self {
        v as f64
    }
}
