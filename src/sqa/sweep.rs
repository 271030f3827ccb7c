//! Single-replica Monte Carlo sweeps.
//!
//! For replica `k` of `m` and spin `i` the flip cost is
//!
//! ```text
//! ΔE = sign · ΔE_classical(q_k, i) / m  +  2 · J⊥ · q_ki · (q_{k-1,i} + q_{k+1,i})
//! J⊥ = -(T / 2) · ln tanh(Γ / (m · T))
//! ```
//!
//! with periodic boundary along the Trotter axis. A flip is accepted when
//! `ΔE <= 0`, and otherwise with probability `exp(-ΔE / T)`; at `T = 0` only
//! non-positive deltas are accepted.

use crate::bits::SpinMatrix;
use crate::graph::IsingGraph;
use crate::real::Real;
use ndarray::ArrayView2;
use rand::Rng;
use rayon::prelude::*;

use super::schedule::ScheduleStep;

/// Per-step constants shared by every spin update.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepParams<T: Real> {
    /// `sign / m`, scaling the classical delta.
    pub classical_scale: T,
    /// Inter-replica coupling `J⊥`.
    pub coupling: T,
    pub temperature: T,
}

impl<T: Real> SweepParams<T> {
    pub fn new(step: &ScheduleStep<T>, sign: T, n_trotters: usize) -> Self {
        let m = T::from_f64(n_trotters as f64);
        Self {
            classical_scale: sign / m,
            coupling: trotter_coupling(step.field, step.temperature, n_trotters),
            temperature: step.temperature,
        }
    }
}

/// Ferromagnetic coupling between neighbouring Trotter replicas.
pub(crate) fn trotter_coupling<T: Real>(field: T, temperature: T, n_trotters: usize) -> T {
    if n_trotters < 2 || temperature <= T::zero() {
        return T::zero();
    }
    let m = T::from_f64(n_trotters as f64);
    let arg = (field / (m * temperature)).max(T::min_positive_value());
    let half = T::from_f64(0.5);
    -half * temperature * arg.tanh().ln()
}

/// Metropolis test; `u` is uniform in `[0, 1)`.
#[inline]
pub(crate) fn accept<T: Real>(delta: T, temperature: T, u: f64) -> bool {
    if delta <= T::zero() {
        return true;
    }
    if temperature <= T::zero() {
        return false;
    }
    u < (-(delta / temperature)).as_f64().exp()
}

/// Cost of flipping spin `i` of replica `k`.
#[inline]
pub(crate) fn flip_delta<T: Real, G: IsingGraph<T> + ?Sized>(
    graph: &G,
    q: ArrayView2<'_, i8>,
    k: usize,
    i: usize,
    params: &SweepParams<T>,
) -> T {
    let m = q.nrows();
    let classical = params.classical_scale * graph.delta_energy(q.row(k), i);
    if m < 2 || params.coupling == T::zero() {
        return classical;
    }
    let up = q[[(k + m - 1) % m, i]];
    let down = q[[(k + 1) % m, i]];
    let aligned = q[[k, i]] * (up + down);
    if aligned == 0 {
        return classical;
    }
    let two = T::one() + T::one();
    classical + two * params.coupling * T::from_i8(aligned)
}

/// Sequential sweep over the spins of replica `k` in index order.
///
/// Each decision sees every flip committed before it. Returns the number
/// of accepted flips.
pub(crate) fn naive_sweep<T, G, R>(
    graph: &G,
    q: &mut SpinMatrix,
    k: usize,
    params: &SweepParams<T>,
    rng: &mut R,
) -> usize
where
    T: Real,
    G: IsingGraph<T> + ?Sized,
    R: Rng,
{
    let mut accepted = 0;
    for i in 0..q.ncols() {
        let delta = flip_delta(graph, q.view(), k, i, params);
        let u: f64 = rng.random();
        if accept(delta, params.temperature, u) {
            q[[k, i]] = -q[[k, i]];
            accepted += 1;
        }
    }
    accepted
}

/// Color-class sweep over replica `k`.
///
/// Within one class every decision reads the snapshot taken before the
/// class pass; accepted flips are committed together once the pass ends.
/// Uniforms are drawn from `rng` in class order before evaluation, so the
/// outcome does not depend on `parallel` or on the thread count.
pub(crate) fn coloring_sweep<T, G, R>(
    graph: &G,
    q: &mut SpinMatrix,
    k: usize,
    classes: &[Vec<usize>],
    params: &SweepParams<T>,
    rng: &mut R,
    parallel: bool,
) -> usize
where
    T: Real,
    G: IsingGraph<T> + ?Sized,
    R: Rng,
{
    let mut accepted = 0;
    for class in classes {
        let draws: Vec<f64> = (0..class.len()).map(|_| rng.random()).collect();
        let snapshot = q.view();
        let decide = |(&i, &u): (&usize, &f64)| {
            let delta = flip_delta(graph, snapshot, k, i, params);
            accept(delta, params.temperature, u).then_some(i)
        };
        let flips: Vec<usize> = if parallel {
            class.par_iter().zip(draws.par_iter()).filter_map(decide).collect()
        } else {
            class.iter().zip(draws.iter()).filter_map(decide).collect()
        };

        for &i in &flips {
            q[[k, i]] = -q[[k, i]];
        }
        accepted += flips.len();
    }
    accepted
}
