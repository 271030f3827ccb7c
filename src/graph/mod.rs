//! Coupling matrix model.
//!
//! Problems are accepted in QUBO form (binary variables, `E(x) = xᵀWx`) or
//! directly in Ising form, and are held internally as an Ising Hamiltonian
//! `E(q) = c + hᵀq + qᵀJq` over spins `q ∈ {-1,+1}ⁿ`. Two layouts exist:
//!
//! - [`DenseGraph`]: one variable set with a dense symmetric coupling matrix.
//! - [`BipartiteGraph`]: two variable sets, each with its own bias vector,
//!   joined by a dense interconnection matrix.
//!
//! Both implement [`IsingGraph`], the seam the annealer and the exhaustive
//! searcher are written against.

mod bipartite;
mod dense;
mod types;

pub use bipartite::BipartiteGraph;
pub use dense::DenseGraph;
pub use types::{find_asymmetry, is_symmetric, IsingGraph, OptimizeMethod};
