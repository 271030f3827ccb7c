//! Simulated quantum annealing for QUBO and Ising problems.
//!
//! Provides:
//!
//! - **Energy models**: dense and bipartite problems, each accepted in QUBO
//!   form (`xᵀWx` over bits) or Ising form (`c + hᵀq + qᵀJq` over spins)
//!   and evaluated through the common [`graph::IsingGraph`] trait.
//! - **Simulated Quantum Annealing (SQA)**: Suzuki–Trotter replicas of the
//!   spin system coupled along a periodic replica axis, swept by Metropolis
//!   updates under a decreasing transverse field. Spins are visited either
//!   in index order or color class by color class, with classes evaluated
//!   concurrently.
//! - **Exhaustive search**: batched enumeration of every configuration of
//!   a small problem, used as ground truth for annealer results.
//! - **Bit codecs**: conversions between packed integers, 0/1 bits and
//!   ±1 spins.
//!
//! # Architecture
//!
//! Problems are built once and handed to an [`sqa::Annealer`], whose setup
//! (seed, Trotter count, initial spins) is tracked by an explicit state
//! machine. Every fallible operation returns [`AnnealResult`]; nothing in
//! the crate aborts on bad input.

pub mod bits;
pub mod error;
pub mod graph;
pub mod real;
pub mod search;
pub mod sqa;

pub use error::{AnnealError, AnnealResult, ErrorKind};
pub use real::Real;
