//! Annealing schedules.
//!
//! A schedule is a finite sequence of `(field, temperature)` steps. The
//! transverse field `Γ` drives tunnelling between Trotter replicas and is
//! lowered over the run; the temperature sets the Metropolis acceptance
//! scale. One schedule step is one sweep over every replica.

use crate::error::{AnnealError, AnnealResult};
use crate::real::Real;

/// One point of an annealing schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleStep<T: Real> {
    /// Transverse field strength `Γ`.
    pub field: T,
    /// Temperature `T = 1/β`.
    pub temperature: T,
}

impl<T: Real> ScheduleStep<T> {
    pub fn new(field: T, temperature: T) -> Self {
        Self { field, temperature }
    }
}

/// A validated, monotonic annealing schedule.
///
/// Both the field and the temperature are non-increasing from step to step.
///
/// # Examples
///
/// ```
/// use u_anneal::sqa::Schedule;
///
/// // Γ: 5.0 → 0.02, multiplied by 0.9 each step, at fixed kT = 0.05
/// let schedule = Schedule::geometric(5.0, 0.02, 0.9, 0.05).unwrap();
/// assert!(schedule.len() > 50);
/// assert!(schedule.steps().windows(2).all(|w| w[1].field < w[0].field));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule<T: Real> {
    pub(crate) steps: Vec<ScheduleStep<T>>,
}

impl<T: Real> Schedule<T> {
    /// Wraps explicit steps.
    ///
    /// # Errors
    /// [`AnnealError::InvalidSchedule`] if the steps are empty, non-finite,
    /// negative or not monotonic.
    pub fn new(steps: Vec<ScheduleStep<T>>) -> AnnealResult<Self> {
        let schedule = Self { steps };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Geometric field decay: `Γ_{k+1} = ratio · Γ_k` while `Γ_k > g_final`.
    pub fn geometric(g_init: T, g_final: T, ratio: T, temperature: T) -> AnnealResult<Self> {
        if !(ratio > T::zero() && ratio < T::one()) {
            return Err(AnnealError::InvalidSchedule(format!(
                "geometric ratio must be in (0, 1), got {ratio:?}"
            )));
        }
        if !(g_final > T::zero()) {
            return Err(AnnealError::InvalidSchedule(format!(
                "final field must be positive, got {g_final:?}"
            )));
        }
        let mut steps = Vec::new();
        let mut g = g_init;
        while g > g_final {
            steps.push(ScheduleStep::new(g, temperature));
            g = g * ratio;
        }
        Self::new(steps)
    }

    /// Linear field ramp from `g_init` to `g_final` over `n_steps` steps,
    /// both endpoints included.
    pub fn linear(g_init: T, g_final: T, n_steps: usize, temperature: T) -> AnnealResult<Self> {
        let steps = match n_steps {
            0 => Vec::new(),
            1 => vec![ScheduleStep::new(g_init, temperature)],
            n => {
                let span = T::from_f64((n - 1) as f64);
                (0..n)
                    .map(|k| {
                        let frac = T::from_f64(k as f64) / span;
                        ScheduleStep::new(g_init + (g_final - g_init) * frac, temperature)
                    })
                    .collect()
            }
        };
        Self::new(steps)
    }

    /// Checks that the schedule can drive an anneal.
    pub fn validate(&self) -> AnnealResult<()> {
        if self.steps.is_empty() {
            return Err(AnnealError::InvalidSchedule("schedule is empty".into()));
        }
        for (k, step) in self.steps.iter().enumerate() {
            if !step.field.is_finite() || step.field < T::zero() {
                return Err(AnnealError::InvalidSchedule(format!(
                    "step {k}: field must be finite and non-negative, got {:?}",
                    step.field
                )));
            }
            if !step.temperature.is_finite() || step.temperature < T::zero() {
                return Err(AnnealError::InvalidSchedule(format!(
                    "step {k}: temperature must be finite and non-negative, got {:?}",
                    step.temperature
                )));
            }
        }
        for (k, w) in self.steps.windows(2).enumerate() {
            if w[1].field > w[0].field {
                return Err(AnnealError::InvalidSchedule(format!(
                    "field increases at step {}",
                    k + 1
                )));
            }
            if w[1].temperature > w[0].temperature {
                return Err(AnnealError::InvalidSchedule(format!(
                    "temperature increases at step {}",
                    k + 1
                )));
            }
        }
        Ok(())
    }

    pub fn steps(&self) -> &[ScheduleStep<T>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleStep<T>> {
        self.steps.iter()
    }
}

impl<'a, T: Real> IntoIterator for &'a Schedule<T> {
    type Item = &'a ScheduleStep<T>;
    type IntoIter = std::slice::Iter<'a, ScheduleStep<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
