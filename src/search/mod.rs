//! Exhaustive (brute-force) search.
//!
//! Enumerates every bit vector of a small problem in packed order and
//! reports the optimal energy together with all degenerate optima. Serves
//! as ground truth for the annealer on problems up to a few dozen spins.

mod config;
mod runner;

pub use config::SearchConfig;
pub use runner::{BruteForceSearcher, SearchOutcome};
