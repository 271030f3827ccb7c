//! Setup-readiness flags.

use bitflags::bitflags;

bitflags! {
    /// Which setup steps an annealer has completed.
    ///
    /// The empty set is the initial state after a problem is loaded; annealing
    /// requires [`AnnealerState::READY`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AnnealerState: u8 {
        /// A random seed has been given.
        const RAND_SEED_GIVEN = 1 << 0;
        /// The Trotter replica count has been given.
        const N_TROTTERS_GIVEN = 1 << 1;
        /// Initial spins have been set.
        const Q_SET = 1 << 2;
        /// Every setup step is done.
        const READY = Self::RAND_SEED_GIVEN.bits()
            | Self::N_TROTTERS_GIVEN.bits()
            | Self::Q_SET.bits();
    }
}

impl Default for AnnealerState {
    fn default() -> Self {
        AnnealerState::empty()
    }
}

impl AnnealerState {
    /// Whether every bit of `flag` is set.
    pub fn has(self, flag: AnnealerState) -> bool {
        self.contains(flag)
    }

    /// This state with `flag` added.
    #[must_use]
    pub fn with(self, flag: AnnealerState) -> AnnealerState {
        self.union(flag)
    }

    /// This state with `flag` removed.
    #[must_use]
    pub fn without(self, flag: AnnealerState) -> AnnealerState {
        self.difference(flag)
    }

    /// Whether annealing may run.
    pub fn is_ready(self) -> bool {
        self.has(AnnealerState::READY)
    }

    /// Names of the setup steps still missing for `required`.
    pub fn missing(self, required: AnnealerState) -> Vec<&'static str> {
        let mut out = Vec::new();
        let lacking = required.difference(self);
        if lacking.contains(AnnealerState::RAND_SEED_GIVEN) {
            out.push("seed");
        }
        if lacking.contains(AnnealerState::N_TROTTERS_GIVEN) {
            out.push("trotter count");
        }
        if lacking.contains(AnnealerState::Q_SET) {
            out.push("initial spins");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_is_idempotent() {
        let s = AnnealerState::empty().with(AnnealerState::RAND_SEED_GIVEN);
        assert_eq!(s.with(AnnealerState::RAND_SEED_GIVEN), s);
    }

    #[test]
    fn test_ready_only_when_all_flags() {
        let all = [
            AnnealerState::RAND_SEED_GIVEN,
            AnnealerState::N_TROTTERS_GIVEN,
            AnnealerState::Q_SET,
        ];
        for mask in 0u8..8 {
            let state = all
                .iter()
                .enumerate()
                .filter(|&(bit, _)| mask & (1 << bit) != 0)
                .fold(AnnealerState::empty(), |s, (_, &f)| s.with(f));
            assert_eq!(state.is_ready(), mask == 7, "mask {mask:03b}");
        }
    }

    #[test]
    fn test_missing_names() {
        let s = AnnealerState::N_TROTTERS_GIVEN;
        assert_eq!(s.missing(AnnealerState::READY), vec!["seed", "initial spins"]);
        assert!(AnnealerState::READY.missing(AnnealerState::READY).is_empty());
    }

    #[test]
    fn test_without() {
        let s = AnnealerState::READY.without(AnnealerState::Q_SET);
        assert!(!s.is_ready());
        assert!(s.has(AnnealerState::RAND_SEED_GIVEN | AnnealerState::N_TROTTERS_GIVEN));
    }
}
