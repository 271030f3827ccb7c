//! Annealer configuration and algorithm selection.

use crate::error::{AnnealError, AnnealResult};
use std::fmt;

/// Spin-update strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Coloring when the coupling graph has an independent set of two or
    /// more spins, Naive otherwise.
    #[default]
    Default,

    /// Sequential single-spin sweep in index order.
    Naive,

    /// Color-class sweep; spins of one color are updated concurrently.
    Coloring,
}

impl Algorithm {
    /// Stable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Default => "default",
            Algorithm::Naive => "naive",
            Algorithm::Coloring => "coloring",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the [`Annealer`](super::Annealer).
///
/// `seed` and `n_trotters`, when present, are applied through the same
/// setters a caller would use, so they count toward readiness.
///
/// # Examples
///
/// ```
/// use u_anneal::sqa::{Algorithm, AnnealerConfig};
///
/// let config = AnnealerConfig::default()
///     .with_algorithm(Algorithm::Coloring)
///     .with_seed(7)
///     .with_n_trotters(16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AnnealerConfig {
    /// Requested update strategy.
    pub algorithm: Algorithm,

    /// Evaluate a color class on the rayon pool.
    ///
    /// Only affects the Coloring algorithm; results are identical either way.
    pub parallel: bool,

    /// Random seed applied at construction.
    pub seed: Option<u64>,

    /// Trotter replica count applied at construction.
    pub n_trotters: Option<usize>,
}

impl Default for AnnealerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Default,
            parallel: true,
            seed: None,
            n_trotters: None,
        }
    }
}

impl AnnealerConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_n_trotters(mut self, m: usize) -> Self {
        self.n_trotters = Some(m);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AnnealResult<()> {
        if let Some(0) = self.n_trotters {
            return Err(AnnealError::InvalidTrotters(0));
        }
        Ok(())
    }
}
