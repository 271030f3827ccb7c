//! Error types for the annealing engine.

use thiserror::Error;

/// Broad classification of an [`AnnealError`].
///
/// Contract violations are programmer errors (shape mismatches, packed
/// widths out of range) and are not expected to be retried. Configuration
/// errors can be fixed by the caller and the call retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Programming / contract violation.
    Contract,
    /// Recoverable configuration error.
    Configuration,
}

/// Errors produced by the codec, the problem model and the annealer.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnnealError {
    /// An array does not have the shape the operation requires.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which argument was malformed.
        what: &'static str,
        /// Expected extent (or element count).
        expected: usize,
        /// Actual extent.
        actual: usize,
    },

    /// A bit width does not fit in a packed integer.
    #[error("bit length {n_bits} exceeds the packed width of {max} bits")]
    InvalidLength {
        /// Requested number of bits.
        n_bits: usize,
        /// Largest supported number of bits.
        max: usize,
    },

    /// A packed bit range is empty-reversed or exceeds the bit width.
    #[error("invalid packed range [{begin}, {end})")]
    InvalidRange {
        /// Range start (inclusive).
        begin: u64,
        /// Range end (exclusive).
        end: u64,
    },

    /// A spin value other than -1 or +1.
    #[error("spin values must be -1 or +1, got {value}")]
    InvalidSpin {
        /// The offending value.
        value: i8,
    },

    /// `anneal()` (or a dependent setter) was called before setup finished.
    #[error("annealer is not configured: missing {missing}")]
    NotConfigured {
        /// Human-readable list of missing setup steps.
        missing: String,
    },

    /// The coupling matrix is not symmetric.
    #[error("coupling matrix is not symmetric at ({row}, {col})")]
    AsymmetricMatrix {
        /// Row of the first mismatching entry.
        row: usize,
        /// Column of the first mismatching entry.
        col: usize,
    },

    /// A problem coefficient is NaN or infinite.
    ///
    /// Vector and scalar coefficients report `col == 0`.
    #[error("coefficient {what}[{row}, {col}] is not finite")]
    NonFiniteCoefficient {
        /// Which coefficient array holds the entry.
        what: &'static str,
        /// Row (or vector index) of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
    },

    /// The annealing schedule is empty, non-finite or non-monotonic.
    #[error("invalid annealing schedule: {0}")]
    InvalidSchedule(String),

    /// Trotter count must be at least 1.
    #[error("number of Trotter replicas must be at least 1, got {0}")]
    InvalidTrotters(usize),

    /// Any other rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnnealError {
    /// Returns the taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnnealError::DimensionMismatch { .. }
            | AnnealError::InvalidLength { .. }
            | AnnealError::InvalidRange { .. }
            | AnnealError::InvalidSpin { .. } => ErrorKind::Contract,
            AnnealError::NotConfigured { .. }
            | AnnealError::AsymmetricMatrix { .. }
            | AnnealError::NonFiniteCoefficient { .. }
            | AnnealError::InvalidSchedule(_)
            | AnnealError::InvalidTrotters(_)
            | AnnealError::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }

    /// Whether this error is a programmer error rather than bad configuration.
    pub fn is_contract_violation(&self) -> bool {
        self.kind() == ErrorKind::Contract
    }

    pub(crate) fn dim(what: &'static str, expected: usize, actual: usize) -> Self {
        AnnealError::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Result type for annealing operations.
pub type AnnealResult<T> = Result<T, AnnealError>;
