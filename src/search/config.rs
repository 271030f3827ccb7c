//! Exhaustive search configuration.

use crate::bits::MAX_PACKED_BITS;
use crate::error::{AnnealError, AnnealResult};

/// Configuration for [`BruteForceSearcher`](super::BruteForceSearcher).
///
/// # Examples
///
/// ```
/// use u_anneal::search::SearchConfig;
///
/// let config = SearchConfig::default().with_batch_bits(8).with_max_spins(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Each batch covers `2^batch_bits` consecutive packed values.
    pub batch_bits: usize,

    /// Evaluate batches on the rayon pool.
    pub parallel: bool,

    /// Largest problem accepted. Enumeration is `O(2^n)`.
    pub max_spins: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_bits: 12,
            parallel: true,
            max_spins: 24,
        }
    }
}

impl SearchConfig {
    pub fn with_batch_bits(mut self, bits: usize) -> Self {
        self.batch_bits = bits;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_spins(mut self, n: usize) -> Self {
        self.max_spins = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AnnealResult<()> {
        if self.batch_bits == 0 || self.batch_bits > 32 {
            return Err(AnnealError::InvalidConfig(format!(
                "batch_bits must be in 1..=32, got {}",
                self.batch_bits
            )));
        }
        if self.max_spins >= MAX_PACKED_BITS {
            return Err(AnnealError::InvalidConfig(format!(
                "max_spins must be below {MAX_PACKED_BITS}, got {}",
                self.max_spins
            )));
        }
        Ok(())
    }
}
