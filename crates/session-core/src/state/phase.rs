/// Deterministic execution-phase machine for the stepping session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SessionPhase {
    /// Ready to accept a step or a reset.
    #[default]
    Ready,
    /// Stepping would move past the last instruction; only reset makes progress.
    Halted,
}

impl SessionPhase {
    /// Returns `true` when the session can no longer step forward.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionPhase;

    #[test]
    fn default_phase_is_ready() {
        assert_eq!(SessionPhase::default(), SessionPhase::Ready);
    }

    #[test]
    fn only_halted_reports_halted() {
        assert!(!SessionPhase::Ready.is_halted());
        assert!(SessionPhase::Halted.is_halted());
    }
}
