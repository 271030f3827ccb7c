//! Simulated Quantum Annealing (SQA).
//!
//! Path-integral Monte Carlo over `m` Trotter replicas of the spin system.
//! Replicas share the problem Hamiltonian (scaled by `1/m`) and are tied to
//! their neighbours along the imaginary-time axis by a ferromagnetic
//! coupling that grows as the transverse field is lowered, so the ensemble
//! tunnels through barriers early on and freezes into a classical state at
//! the end of the schedule.
//!
//! Spin updates run either as a sequential sweep ([`Algorithm::Naive`]) or
//! color class by color class ([`Algorithm::Coloring`]), where each class
//! is an independent set of the coupling graph and is evaluated on the
//! rayon pool.
//!
//! # References
//!
//! - Suzuki (1976), "Relationship between d-Dimensional Quantal Spin Systems
//!   and (d+1)-Dimensional Ising Systems"
//! - Martoňák, Santoro & Tosatti (2002), "Quantum annealing by the path-integral
//!   Monte Carlo method: The two-dimensional random Ising model"
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph"

mod coloring;
mod config;
mod runner;
mod schedule;
mod state;
mod sweep;

pub use coloring::{resolve_algorithm, Coloring};
pub use config::{Algorithm, AnnealerConfig};
pub use runner::{AnnealOutcome, Annealer};
pub use schedule::{Schedule, ScheduleStep};
pub use state::AnnealerState;
