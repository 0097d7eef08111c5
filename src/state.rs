// state.rs - Phase outcome management

/// The result of running one phase over a linked table.
///
/// Phases never unwind on an unsolvable table; they report it here and the
/// solver stops the pipeline at the first `NoStableSolution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
    /// The phase finished and the table still holds more than one candidate somewhere
    Reduced,
    /// Every participant has exactly one remaining preference
    Complete,
    /// Some preference list was exhausted; no stable matching exists
    NoStableSolution,
}

impl PhaseOutcome {
    /// Returns true if no later phase needs to run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PhaseOutcome::Complete | PhaseOutcome::NoStableSolution)
    }
}

impl Default for PhaseOutcome {
    fn default() -> Self {
        PhaseOutcome::Reduced
    }
}
