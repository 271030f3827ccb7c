//! Exhaustive search over packed bit ranges.

use super::config::SearchConfig;
use crate::bits::{
    create_bits_sequence, q_from_x, unpack_bits, Bits, PackedBits, MAX_PACKED_BITS,
};
use crate::error::{AnnealError, AnnealResult};
use crate::graph::{IsingGraph, OptimizeMethod};
use crate::real::Real;
use rayon::prelude::*;
use tracing::{debug, info};

/// Result of an exhaustive search.
#[derive(Debug, Clone)]
pub struct SearchOutcome<T: Real> {
    /// Optimal raw energy.
    pub best_energy: T,

    /// Every configuration within rounding tolerance of the optimum, in
    /// ascending packed order.
    pub ground_states: Vec<Bits>,

    /// `ground_states` in packed form.
    pub packed: Vec<PackedBits>,

    /// Number of configurations evaluated.
    pub evaluated: u64,
}

/// Best energy of a slice of the search space and the configurations
/// attaining it.
#[derive(Debug, Clone)]
struct Partial<T> {
    best: T,
    hits: Vec<(PackedBits, T)>,
}

/// Enumerates every configuration of a small problem.
pub struct BruteForceSearcher;

impl BruteForceSearcher {
    /// Searches all `2^n` configurations.
    ///
    /// # Errors
    /// - [`AnnealError::InvalidConfig`] if `config` is invalid
    /// - [`AnnealError::InvalidLength`] if the problem has more than
    ///   `config.max_spins` spins
    pub fn run<T: Real, G: IsingGraph<T> + ?Sized>(
        graph: &G,
        method: OptimizeMethod,
        config: &SearchConfig,
    ) -> AnnealResult<SearchOutcome<T>> {
        config.validate()?;
        let n = graph.n_spins();
        if n > config.max_spins {
            return Err(AnnealError::InvalidLength {
                n_bits: n,
                max: config.max_spins,
            });
        }
        Self::run_range(graph, method, config, 0, 1u64 << n)
    }

    /// Searches packed values in `[begin, end)` only.
    ///
    /// Splitting the space into ranges lets callers distribute or resume a
    /// search.
    pub fn run_range<T: Real, G: IsingGraph<T> + ?Sized>(
        graph: &G,
        method: OptimizeMethod,
        config: &SearchConfig,
        begin: PackedBits,
        end: PackedBits,
    ) -> AnnealResult<SearchOutcome<T>> {
        config.validate()?;
        let n = graph.n_spins();
        if n >= MAX_PACKED_BITS {
            return Err(AnnealError::InvalidLength {
                n_bits: n,
                max: MAX_PACKED_BITS - 1,
            });
        }
        if begin >= end || end > (1u64 << n) {
            return Err(AnnealError::InvalidRange { begin, end });
        }

        let batch = 1u64 << config.batch_bits.min(n.max(1));
        let step = usize::try_from(batch).map_err(|_| {
            AnnealError::InvalidConfig(format!(
                "batch of 2^{} values exceeds the address width",
                config.batch_bits
            ))
        })?;
        let starts: Vec<PackedBits> = (begin..end).step_by(step).collect();
        debug!(
            n_spins = n,
            begin,
            end,
            n_batches = starts.len(),
            "exhaustive search started"
        );

        let evaluate = |&b: &PackedBits| {
            evaluate_batch(graph, method, n, b, end.min(b.saturating_add(batch)))
        };
        let partials: Vec<Partial<T>> = if config.parallel {
            starts.par_iter().map(evaluate).collect::<AnnealResult<_>>()?
        } else {
            starts.iter().map(evaluate).collect::<AnnealResult<_>>()?
        };

        let merged = partials
            .into_iter()
            .reduce(|acc, p| merge(method, acc, p))
            .ok_or(AnnealError::InvalidRange { begin, end })?;

        let packed: Vec<PackedBits> = merged.hits.iter().map(|&(p, _)| p).collect();
        let ground_states = packed
            .iter()
            .map(|&p| unpack_bits(p, n))
            .collect::<AnnealResult<Vec<_>>>()?;

        info!(
            evaluated = end - begin,
            best_energy = ?merged.best,
            degeneracy = packed.len(),
            "exhaustive search finished"
        );
        Ok(SearchOutcome {
            best_energy: merged.best,
            ground_states,
            packed,
            evaluated: end - begin,
        })
    }
}

fn tolerance<T: Real>(e: T) -> T {
    T::epsilon() * T::from_f64(1024.0) * e.abs().max(T::one())
}

fn within<T: Real>(method: OptimizeMethod, e: T, best: T) -> bool {
    let tol = tolerance(best);
    match method {
        OptimizeMethod::Minimize => e <= best + tol,
        OptimizeMethod::Maximize => e >= best - tol,
    }
}

fn evaluate_batch<T: Real, G: IsingGraph<T> + ?Sized>(
    graph: &G,
    method: OptimizeMethod,
    n: usize,
    begin: PackedBits,
    end: PackedBits,
) -> AnnealResult<Partial<T>> {
    let xs = create_bits_sequence(n, begin, end)?;
    let qs = q_from_x(&xs);
    let energies = graph.energies(qs.view());

    let best = energies
        .iter()
        .fold(method.worst::<T>(), |b, &e| if method.is_better(e, b) { e } else { b });
    let hits = (begin..end)
        .zip(energies.iter())
        .filter(|&(_, &e)| within(method, e, best))
        .map(|(p, &e)| (p, e))
        .collect();
    Ok(Partial { best, hits })
}

fn merge<T: Real>(method: OptimizeMethod, a: Partial<T>, b: Partial<T>) -> Partial<T> {
    let best = if method.is_better(b.best, a.best) {
        b.best
    } else {
        a.best
    };
    let hits = a
        .hits
        .into_iter()
        .chain(b.hits)
        .filter(|&(_, e)| within(method, e, best))
        .collect();
    Partial { best, hits }
}
