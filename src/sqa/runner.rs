//! Simulated quantum annealing driver.

use super::coloring::{resolve_algorithm, Coloring};
use super::config::{Algorithm, AnnealerConfig};
use super::schedule::{Schedule, ScheduleStep};
use super::state::AnnealerState;
use super::sweep::{coloring_sweep, naive_sweep, SweepParams};
use crate::bits::{q_from_x, validate_spins, x_from_q, BitMatrix, Bits, SpinMatrix, Spins};
use crate::error::{AnnealError, AnnealResult};
use crate::graph::{IsingGraph, OptimizeMethod};
use crate::real::Real;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::marker::PhantomData;
use tracing::{debug, info};

/// Result of an [`Annealer::anneal`] run.
#[derive(Debug, Clone)]
pub struct AnnealOutcome<T: Real> {
    /// Best replica configuration observed across all steps.
    pub best_q: Spins,

    /// `best_q` in bit form.
    pub best_x: Bits,

    /// Raw energy of `best_q` (lowest when minimizing, highest when maximizing).
    pub best_energy: T,

    /// Energy of every replica after the last step.
    pub final_energies: Array1<T>,

    /// Number of schedule steps executed; each step sweeps every replica.
    pub sweeps: usize,

    /// Total accepted spin flips.
    pub accepted_flips: usize,

    /// Update strategy that actually ran.
    pub algorithm: Algorithm,

    /// Best energy after each step.
    pub energy_history: Vec<T>,
}

/// Trotter-replica annealer over an [`IsingGraph`].
///
/// Setup goes through a small state machine: a seed, a Trotter count and
/// initial spins must all be given before [`anneal`](Self::anneal) runs.
/// Loading a new problem discards all three.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use u_anneal::graph::{DenseGraph, OptimizeMethod};
/// use u_anneal::sqa::{Annealer, Schedule};
///
/// let w = array![[-1.0, 2.0, 0.0], [2.0, -1.0, 2.0], [0.0, 2.0, -1.0]];
/// let graph = DenseGraph::from_qubo(w).unwrap();
///
/// let mut annealer = Annealer::new(graph, OptimizeMethod::Minimize);
/// annealer.set_seed(42);
/// annealer.set_trotters(8).unwrap();
/// annealer.randomize_q().unwrap();
///
/// let schedule = Schedule::geometric(3.0, 0.01, 0.95, 0.02).unwrap();
/// let outcome = annealer.anneal(&schedule).unwrap();
/// assert_eq!(outcome.best_energy, -2.0);
/// assert_eq!(outcome.best_x, array![1i8, 0, 1]);
/// ```
#[derive(Debug)]
pub struct Annealer<T: Real, G: IsingGraph<T>> {
    graph: G,
    method: OptimizeMethod,
    config: AnnealerConfig,
    coloring: Coloring,
    algorithm: Algorithm,
    state: AnnealerState,
    seed: u64,
    n_trotters: usize,
    q: SpinMatrix,
    rngs: Vec<StdRng>,
    _real: PhantomData<fn() -> T>,
}

impl<T: Real, G: IsingGraph<T>> Annealer<T, G> {
    /// Creates an annealer with the default configuration.
    pub fn new(graph: G, method: OptimizeMethod) -> Self {
        let coloring = Coloring::for_graph(&graph);
        let config = AnnealerConfig::default();
        let algorithm = resolve_algorithm(config.algorithm, &coloring);
        Self {
            graph,
            method,
            config,
            coloring,
            algorithm,
            state: AnnealerState::empty(),
            seed: 0,
            n_trotters: 0,
            q: SpinMatrix::zeros((0, 0)),
            rngs: Vec::new(),
            _real: PhantomData,
        }
    }

    /// Creates an annealer and applies `config`.
    ///
    /// # Errors
    /// Whatever [`AnnealerConfig::validate`] or [`set_trotters`](Self::set_trotters)
    /// reports.
    pub fn with_config(graph: G, method: OptimizeMethod, config: AnnealerConfig) -> AnnealResult<Self> {
        config.validate()?;
        let mut annealer = Self::new(graph, method);
        annealer.set_algorithm(config.algorithm);
        annealer.config = config.clone();
        if let Some(seed) = config.seed {
            annealer.set_seed(seed);
        }
        if let Some(m) = config.n_trotters {
            annealer.set_trotters(m)?;
        }
        Ok(annealer)
    }

    /// Replaces the problem and resets every setup step.
    ///
    /// The algorithm request and the `parallel` flag are kept; seed,
    /// Trotter count and spins must be given again.
    pub fn load_problem(&mut self, graph: G, method: OptimizeMethod) {
        self.coloring = Coloring::for_graph(&graph);
        self.algorithm = resolve_algorithm(self.config.algorithm, &self.coloring);
        self.graph = graph;
        self.method = method;
        self.state = AnnealerState::empty();
        self.seed = 0;
        self.n_trotters = 0;
        self.q = SpinMatrix::zeros((0, 0));
        self.rngs.clear();
        debug!(
            n_spins = self.graph.n_spins(),
            algorithm = %self.algorithm,
            "problem loaded, setup reset"
        );
    }

    /// Requests an update strategy; [`Algorithm::Default`] is resolved
    /// against the problem's coloring.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.config.algorithm = algorithm;
        self.algorithm = resolve_algorithm(algorithm, &self.coloring);
        debug!(requested = %algorithm, resolved = %self.algorithm, "algorithm selected");
    }

    /// Enables or disables rayon evaluation of color classes.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.config.parallel = parallel;
    }

    /// Sets the random seed. Replica random streams restart from it.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.state = self.state.with(AnnealerState::RAND_SEED_GIVEN);
        self.reseed();
        debug!(seed, state = ?self.state, "seed set");
    }

    /// Sets the number of Trotter replicas.
    ///
    /// Changing the count discards spins set for the previous count.
    ///
    /// # Errors
    /// [`AnnealError::InvalidTrotters`] if `m == 0`.
    pub fn set_trotters(&mut self, m: usize) -> AnnealResult<()> {
        if m == 0 {
            return Err(AnnealError::InvalidTrotters(m));
        }
        if self.state.has(AnnealerState::N_TROTTERS_GIVEN) && m != self.n_trotters {
            self.state = self.state.without(AnnealerState::Q_SET);
            self.q = SpinMatrix::zeros((0, 0));
            debug!(old = self.n_trotters, new = m, "trotter count changed, spins discarded");
        }
        self.n_trotters = m;
        self.state = self.state.with(AnnealerState::N_TROTTERS_GIVEN);
        self.reseed();
        debug!(n_trotters = m, state = ?self.state, "trotter count set");
        Ok(())
    }

    fn reseed(&mut self) {
        let required = AnnealerState::RAND_SEED_GIVEN | AnnealerState::N_TROTTERS_GIVEN;
        if self.state.has(required) {
            self.rngs = (0..self.n_trotters)
                .map(|k| StdRng::seed_from_u64(self.seed.wrapping_add(k as u64)))
                .collect();
        }
    }

    fn require(&self, required: AnnealerState) -> AnnealResult<()> {
        let missing = self.state.missing(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AnnealError::NotConfigured {
                missing: missing.join(", "),
            })
        }
    }

    /// Sets the spins of every replica; `q` is `n_trotters × n_spins`.
    ///
    /// # Errors
    /// - [`AnnealError::NotConfigured`] if the Trotter count is not set
    /// - [`AnnealError::DimensionMismatch`] on a wrong shape
    /// - [`AnnealError::InvalidSpin`] on values other than ±1
    pub fn set_q(&mut self, q: ArrayView2<'_, i8>) -> AnnealResult<()> {
        self.require(AnnealerState::N_TROTTERS_GIVEN)?;
        let (rows, cols) = q.dim();
        if rows != self.n_trotters {
            return Err(AnnealError::dim("spin matrix rows", self.n_trotters, rows));
        }
        if cols != self.graph.n_spins() {
            return Err(AnnealError::dim("spin matrix columns", self.graph.n_spins(), cols));
        }
        validate_spins(&q)?;
        self.q = q.to_owned();
        self.state = self.state.with(AnnealerState::Q_SET);
        debug!(state = ?self.state, "spins set");
        Ok(())
    }

    /// Sets every replica to the same spin vector.
    pub fn set_q_broadcast(&mut self, q: ArrayView1<'_, i8>) -> AnnealResult<()> {
        self.require(AnnealerState::N_TROTTERS_GIVEN)?;
        let n = self.graph.n_spins();
        if q.len() != n {
            return Err(AnnealError::dim("spin vector", n, q.len()));
        }
        let tiled = q.broadcast((self.n_trotters, n)).ok_or(AnnealError::dim(
            "spin vector",
            n,
            q.len(),
        ))?;
        self.set_q(tiled)
    }

    /// Sets replica spins from bits; `x` is `n_trotters × n_spins` of 0/1.
    pub fn set_x(&mut self, x: ArrayView2<'_, i8>) -> AnnealResult<()> {
        let q = q_from_x(&x);
        self.set_q(q.view())
    }

    /// Sets every replica from the same bit vector.
    pub fn set_x_broadcast(&mut self, x: ArrayView1<'_, i8>) -> AnnealResult<()> {
        let q = q_from_x(&x);
        self.set_q_broadcast(q.view())
    }

    /// Draws uniformly random spins for every replica from its stream.
    ///
    /// # Errors
    /// [`AnnealError::NotConfigured`] without a seed and a Trotter count.
    pub fn randomize_q(&mut self) -> AnnealResult<()> {
        self.require(AnnealerState::RAND_SEED_GIVEN | AnnealerState::N_TROTTERS_GIVEN)?;
        let n = self.graph.n_spins();
        let mut q = SpinMatrix::zeros((self.n_trotters, n));
        for (mut row, rng) in q.rows_mut().into_iter().zip(self.rngs.iter_mut()) {
            row.mapv_inplace(|_| if rng.random::<bool>() { 1 } else { -1 });
        }
        self.q = q;
        self.state = self.state.with(AnnealerState::Q_SET);
        debug!(state = ?self.state, "spins randomized");
        Ok(())
    }

    /// Runs one schedule step: one sweep over every replica, in replica
    /// order. Returns the number of accepted flips.
    ///
    /// # Errors
    /// [`AnnealError::NotConfigured`] unless the annealer is ready, and
    /// [`AnnealError::InvalidSchedule`] for a non-finite or negative step.
    pub fn anneal_one_step(&mut self, step: ScheduleStep<T>) -> AnnealResult<usize> {
        self.require(AnnealerState::READY)?;
        Schedule::new(vec![step])?;
        Ok(self.sweep(&step))
    }

    fn sweep(&mut self, step: &ScheduleStep<T>) -> usize {
        let params = SweepParams::new(step, self.method.sign::<T>(), self.n_trotters);
        let mut accepted = 0;
        for k in 0..self.n_trotters {
            let rng = &mut self.rngs[k];
            accepted += match self.algorithm {
                Algorithm::Coloring => coloring_sweep(
                    &self.graph,
                    &mut self.q,
                    k,
                    self.coloring.classes(),
                    &params,
                    rng,
                    self.config.parallel,
                ),
                Algorithm::Naive | Algorithm::Default => {
                    naive_sweep(&self.graph, &mut self.q, k, &params, rng)
                }
            };
        }
        accepted
    }

    /// Runs the whole schedule.
    ///
    /// Readiness and the schedule are checked before any sweep; on error
    /// the annealer is left untouched. Each schedule step is one sweep over
    /// every replica.
    ///
    /// # Errors
    /// - [`AnnealError::NotConfigured`] unless seed, Trotter count and spins
    ///   are all set
    /// - [`AnnealError::InvalidSchedule`] for an empty or non-monotonic
    ///   schedule
    pub fn anneal(&mut self, schedule: &Schedule<T>) -> AnnealResult<AnnealOutcome<T>> {
        self.require(AnnealerState::READY)?;
        schedule.validate()?;

        info!(
            n_spins = self.graph.n_spins(),
            n_trotters = self.n_trotters,
            n_steps = schedule.len(),
            algorithm = %self.algorithm,
            "annealing started"
        );

        let mut energies = self.replica_energies();
        let (mut best_k, mut best_energy) = self.best_replica(&energies);
        let mut best_q = self.q.row(best_k).to_owned();
        let mut energy_history = Vec::with_capacity(schedule.len());
        let mut accepted_flips = 0;
        let mut sweeps = 0;

        for step in schedule {
            accepted_flips += self.sweep(step);
            sweeps += 1;

            energies = self.replica_energies();
            let (k, e) = self.best_replica(&energies);
            if self.method.is_better(e, best_energy) {
                best_k = k;
                best_energy = e;
                best_q = self.q.row(best_k).to_owned();
            }
            energy_history.push(best_energy);
        }

        info!(
            sweeps,
            accepted_flips,
            best_energy = ?best_energy,
            "annealing finished"
        );

        Ok(AnnealOutcome {
            best_x: x_from_q(&best_q),
            best_q,
            best_energy,
            final_energies: energies,
            sweeps,
            accepted_flips,
            algorithm: self.algorithm,
            energy_history,
        })
    }

    fn replica_energies(&self) -> Array1<T> {
        if self.config.parallel && self.n_trotters > 1 {
            let graph = &self.graph;
            let q = self.q.view();
            let values: Vec<T> = (0..self.n_trotters)
                .into_par_iter()
                .map(|k| graph.energy(q.row(k)))
                .collect();
            Array1::from(values)
        } else {
            self.graph.energies(self.q.view())
        }
    }

    fn best_replica(&self, energies: &Array1<T>) -> (usize, T) {
        energies
            .iter()
            .enumerate()
            .fold((0, self.method.worst::<T>()), |(bk, be), (k, &e)| {
                if self.method.is_better(e, be) {
                    (k, e)
                } else {
                    (bk, be)
                }
            })
    }

    /// Current setup state.
    pub fn state(&self) -> AnnealerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Update strategy in effect after resolving [`Algorithm::Default`].
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn method(&self) -> OptimizeMethod {
        self.method
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn coloring(&self) -> &Coloring {
        &self.coloring
    }

    pub fn config(&self) -> &AnnealerConfig {
        &self.config
    }

    /// The seed, once given.
    pub fn seed(&self) -> Option<u64> {
        self.state
            .has(AnnealerState::RAND_SEED_GIVEN)
            .then_some(self.seed)
    }

    /// The Trotter count, once given.
    pub fn n_trotters(&self) -> Option<usize> {
        self.state
            .has(AnnealerState::N_TROTTERS_GIVEN)
            .then_some(self.n_trotters)
    }

    /// Spins of every replica (`n_trotters × n_spins`).
    ///
    /// # Errors
    /// [`AnnealError::NotConfigured`] before spins are set.
    pub fn q(&self) -> AnnealResult<&SpinMatrix> {
        self.require(AnnealerState::Q_SET)?;
        Ok(&self.q)
    }

    /// Bits of every replica.
    pub fn x(&self) -> AnnealResult<BitMatrix> {
        self.q().map(x_from_q)
    }

    /// Raw energy of every replica.
    pub fn energies(&self) -> AnnealResult<Array1<T>> {
        self.require(AnnealerState::Q_SET)?;
        Ok(self.replica_energies())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BipartiteGraph, DenseGraph};
    use crate::search::{BruteForceSearcher, SearchConfig};
    use ndarray::{array, Array2};

    fn ferromagnet_pair() -> DenseGraph<f64> {
        let j = array![[0.0, -1.0], [-1.0, 0.0]];
        DenseGraph::from_ising(Array1::zeros(2), j, 0.0).unwrap()
    }

    fn dense_qubo4() -> DenseGraph<f64> {
        let w = array![
            [-3.0, 1.0, 2.0, -1.0],
            [1.0, -2.0, 1.5, 0.5],
            [2.0, 1.5, -1.0, -2.0],
            [-1.0, 0.5, -2.0, 1.0],
        ];
        DenseGraph::from_qubo(w).unwrap()
    }

    fn short_schedule() -> Schedule<f64> {
        Schedule::geometric(3.0, 0.01, 0.9, 0.05).unwrap()
    }

    fn ready<G: IsingGraph<f64>>(graph: G, method: OptimizeMethod) -> Annealer<f64, G> {
        let mut annealer = Annealer::new(graph, method);
        annealer.set_seed(17);
        annealer.set_trotters(6).unwrap();
        annealer.randomize_q().unwrap();
        annealer
    }

    #[test]
    fn test_two_spin_ferromagnet_ground_state() {
        let mut annealer = ready(ferromagnet_pair(), OptimizeMethod::Minimize);
        let outcome = annealer.anneal(&short_schedule()).unwrap();
        assert_eq!(outcome.best_energy, -2.0);
        assert!(outcome.best_q == array![1i8, 1] || outcome.best_q == array![-1i8, -1]);
        assert_eq!(outcome.algorithm, Algorithm::Naive);
    }

    #[test]
    fn test_anneal_requires_ready_for_every_reachable_mask() {
        let schedule = short_schedule();
        // (seed, trotters, spins) combinations reachable through the setters
        for (seed, trotters, spins) in [
            (false, false, false),
            (true, false, false),
            (false, true, false),
            (true, true, false),
            (false, true, true),
        ] {
            let mut annealer = Annealer::new(ferromagnet_pair(), OptimizeMethod::Minimize);
            if seed {
                annealer.set_seed(1);
            }
            if trotters {
                annealer.set_trotters(2).unwrap();
            }
            if spins {
                annealer.set_q_broadcast(array![1i8, -1].view()).unwrap();
            }
            assert!(!annealer.is_ready());
            let err = annealer.anneal(&schedule).unwrap_err();
            assert!(matches!(err, AnnealError::NotConfigured { .. }), "{err}");
        }

        let mut annealer = ready(ferromagnet_pair(), OptimizeMethod::Minimize);
        assert!(annealer.is_ready());
        assert!(annealer.anneal(&schedule).is_ok());
    }

    #[test]
    fn test_not_configured_names_missing_steps() {
        let mut annealer = Annealer::new(ferromagnet_pair(), OptimizeMethod::Minimize);
        annealer.set_trotters(2).unwrap();
        let err = annealer.anneal(&short_schedule()).unwrap_err();
        assert_eq!(
            err,
            AnnealError::NotConfigured {
                missing: "seed, initial spins".into()
            }
        );
    }

    #[test]
    fn test_setters_idempotent() {
        let mut annealer = Annealer::new(ferromagnet_pair(), OptimizeMethod::Minimize);
        annealer.set_seed(5);
        annealer.set_trotters(3).unwrap();
        annealer.set_q_broadcast(array![1i8, 1].view()).unwrap();
        let state = annealer.state();
        let q = annealer.q().unwrap().clone();

        annealer.set_seed(5);
        annealer.set_trotters(3).unwrap();
        annealer.set_q_broadcast(array![1i8, 1].view()).unwrap();
        assert_eq!(annealer.state(), state);
        assert_eq!(annealer.seed(), Some(5));
        assert_eq!(annealer.n_trotters(), Some(3));
        assert_eq!(annealer.q().unwrap(), &q);
    }

    #[test]
    fn test_changing_trotters_discards_spins() {
        let mut annealer = ready(ferromagnet_pair(), OptimizeMethod::Minimize);
        annealer.set_trotters(4).unwrap();
        assert!(!annealer.state().has(AnnealerState::Q_SET));
        assert!(annealer.q().is_err());
    }

    #[test]
    fn test_reload_resets_state() {
        let mut annealer = ready(ferromagnet_pair(), OptimizeMethod::Minimize);
        annealer.anneal(&short_schedule()).unwrap();

        annealer.load_problem(dense_qubo4(), OptimizeMethod::Minimize);
        assert_eq!(annealer.state(), AnnealerState::empty());
        let err = annealer.anneal(&short_schedule()).unwrap_err();
        assert!(matches!(err, AnnealError::NotConfigured { .. }));
        assert_eq!(annealer.seed(), None);
    }

    #[test]
    fn test_config_error_leaves_state_untouched() {
        let mut annealer = ready(dense_qubo4(), OptimizeMethod::Minimize);
        let before = annealer.q().unwrap().clone();
        let bad = Schedule {
            steps: Vec::<ScheduleStep<f64>>::new(),
        };
        let err = annealer.anneal(&bad).unwrap_err();
        assert!(matches!(err, AnnealError::InvalidSchedule(_)));
        assert_eq!(annealer.q().unwrap(), &before);
    }

    #[test]
    fn test_set_q_shape_and_value_errors() {
        let mut annealer = Annealer::new(ferromagnet_pair(), OptimizeMethod::Minimize);
        let q = Array2::from_elem((2, 2), 1i8);
        assert!(matches!(
            annealer.set_q(q.view()),
            Err(AnnealError::NotConfigured { .. })
        ));

        annealer.set_trotters(3).unwrap();
        let err = annealer.set_q(q.view()).unwrap_err();
        assert!(err.is_contract_violation());

        let bad = Array2::from_elem((3, 2), 0i8);
        assert_eq!(annealer.set_q(bad.view()), Err(AnnealError::InvalidSpin { value: 0 }));
    }

    #[test]
    fn test_set_x_converts() {
        let mut annealer = Annealer::new(ferromagnet_pair(), OptimizeMethod::Minimize);
        annealer.set_trotters(2).unwrap();
        annealer.set_x_broadcast(array![1i8, 0].view()).unwrap();
        assert_eq!(annealer.q().unwrap(), &array![[1i8, -1], [1, -1]]);
        assert_eq!(annealer.x().unwrap(), array![[1i8, 0], [1, 0]]);
    }

    #[test]
    fn test_schedule_exhaustion() {
        let mut annealer = ready(dense_qubo4(), OptimizeMethod::Minimize);
        let schedule = Schedule::linear(2.0, 0.1, 37, 0.1).unwrap();
        let outcome = annealer.anneal(&schedule).unwrap();
        assert_eq!(outcome.sweeps, 37);
        assert_eq!(outcome.energy_history.len(), 37);
        assert_eq!(outcome.final_energies.len(), 6);
    }

    #[test]
    fn test_history_monotone_for_minimize_and_maximize() {
        for method in [OptimizeMethod::Minimize, OptimizeMethod::Maximize] {
            let mut annealer = ready(dense_qubo4(), method);
            let outcome = annealer.anneal(&short_schedule()).unwrap();
            for w in outcome.energy_history.windows(2) {
                assert!(!method.is_better(w[0], w[1]), "{method:?}: {w:?}");
            }
        }
    }

    #[test]
    fn test_naive_and_coloring_reach_brute_force_optimum() {
        for method in [OptimizeMethod::Minimize, OptimizeMethod::Maximize] {
            let exact = BruteForceSearcher::run(&dense_qubo4(), method, &SearchConfig::default())
                .unwrap()
                .best_energy;
            for algorithm in [Algorithm::Naive, Algorithm::Coloring] {
                for seed in 0..5 {
                    let config = AnnealerConfig::default()
                        .with_algorithm(algorithm)
                        .with_seed(seed)
                        .with_n_trotters(8);
                    let mut annealer = Annealer::with_config(dense_qubo4(), method, config).unwrap();
                    annealer.randomize_q().unwrap();
                    let outcome = annealer.anneal(&short_schedule()).unwrap();
                    assert_eq!(outcome.algorithm, algorithm);
                    assert!(
                        (outcome.best_energy - exact).abs() < 1e-9,
                        "{method:?} {algorithm} seed {seed}: {} vs {exact}",
                        outcome.best_energy
                    );
                }
            }
        }
    }

    #[test]
    fn test_same_seed_reproducible_regardless_of_parallel() {
        let run = |parallel: bool| {
            let config = AnnealerConfig::default()
                .with_algorithm(Algorithm::Coloring)
                .with_parallel(parallel)
                .with_seed(123)
                .with_n_trotters(4);
            let mut annealer = Annealer::with_config(dense_qubo4(), OptimizeMethod::Minimize, config).unwrap();
            annealer.randomize_q().unwrap();
            let outcome = annealer.anneal(&short_schedule()).unwrap();
            (annealer.q().unwrap().clone(), outcome.accepted_flips)
        };
        assert_eq!(run(true), run(false));
        assert_eq!(run(true), run(true));
    }

    #[test]
    fn test_bipartite_anneal_uses_coloring() {
        let b0 = array![-1.0, 0.5, -0.5];
        let b1 = array![0.25, -2.0];
        let w = array![[1.0, -1.0], [-2.0, 0.5], [0.0, 1.5]];
        let graph = BipartiteGraph::from_qubo(b0, b1, w).unwrap();
        let exact = BruteForceSearcher::run(&graph, OptimizeMethod::Minimize, &SearchConfig::default())
            .unwrap()
            .best_energy;

        let mut annealer = ready(graph, OptimizeMethod::Minimize);
        assert_eq!(annealer.algorithm(), Algorithm::Coloring);
        let outcome = annealer.anneal(&short_schedule()).unwrap();
        assert!((outcome.best_energy - exact).abs() < 1e-9);
        let qubo = annealer.graph().qubo_energy(outcome.best_x.view());
        assert!((qubo - outcome.best_energy).abs() < 1e-9);
    }

    #[test]
    fn test_anneal_one_step() {
        let mut annealer = Annealer::new(dense_qubo4(), OptimizeMethod::Minimize);
        assert!(annealer.anneal_one_step(ScheduleStep::new(1.0, 0.1)).is_err());
        annealer.set_seed(3);
        annealer.set_trotters(2).unwrap();
        annealer.randomize_q().unwrap();
        assert!(annealer.anneal_one_step(ScheduleStep::new(1.0, 0.1)).is_ok());
        assert!(annealer.anneal_one_step(ScheduleStep::new(-1.0, 0.1)).is_err());
    }

    #[test]
    fn test_f32_ferromagnet_with_zero_field_tail() {
        let j: Array2<f32> = array![[0.0, -1.0], [-1.0, 0.0]];
        let graph = DenseGraph::from_ising(Array1::zeros(2), j, 0.0f32).unwrap();
        let mut annealer: Annealer<f32, DenseGraph<f32>> =
            Annealer::new(graph, OptimizeMethod::Minimize);
        annealer.set_seed(21);
        annealer.set_trotters(4).unwrap();
        annealer.randomize_q().unwrap();

        // the final step has no transverse field, so the replica coupling
        // is computed from the clamped tanh argument
        let mut steps = Schedule::geometric(3.0f32, 0.01, 0.9, 0.05)
            .unwrap()
            .steps()
            .to_vec();
        steps.push(ScheduleStep::new(0.0, 0.05));
        let schedule = Schedule::new(steps).unwrap();

        let outcome = annealer.anneal(&schedule).unwrap();
        assert_eq!(outcome.best_energy, -2.0f32);
        assert!(outcome.best_q == array![1i8, 1] || outcome.best_q == array![-1i8, -1]);
        assert!(outcome.final_energies.iter().all(|e| e.is_finite()));
        assert!(outcome.energy_history.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn test_single_replica_zero_temperature_is_greedy_descent() {
        let mut annealer = Annealer::new(dense_qubo4(), OptimizeMethod::Minimize);
        annealer.set_seed(8);
        annealer.set_trotters(1).unwrap();
        annealer.randomize_q().unwrap();
        let before = annealer.energies().unwrap()[0];
        let schedule = Schedule::new(vec![ScheduleStep::new(0.0, 0.0); 5]).unwrap();
        let outcome = annealer.anneal(&schedule).unwrap();
        assert!(outcome.final_energies[0] <= before);
    }
}
