//resource_limits.rs
//! Resource limits for a single solve call

/// Ceilings that bound the work one solve call may perform.
///
/// Both algorithms terminate on their own; these limits turn pathological
/// input sizes into an error instead of an unbounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverLimits {
    /// Maximum number of participants across all tables of one call
    pub max_participants: usize,
    /// Maximum loop iterations any single phase may run
    pub max_iterations: usize,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_participants: 100_000,
            max_iterations: 100_000_000,
        }
    }
}

impl SolverLimits {
    /// Create conservative limits for small interactive inputs
    pub fn conservative() -> Self {
        Self {
            max_participants: 1_000,
            max_iterations: 1_000_000,
        }
    }

    /// Create aggressive limits for large batch inputs
    pub fn aggressive() -> Self {
        Self {
            max_participants: 10_000_000,
            max_iterations: usize::MAX,
        }
    }

    /// Check if the participant count would exceed limits
    pub fn check_participant_limit(&self, participants: usize) -> crate::error::Result<()> {
        if participants > self.max_participants {
            return Err(crate::error::MatchingError::resource_limit(
                "max_participants",
                format!("Current: {}, Limit: {}", participants, self.max_participants),
            ));
        }
        Ok(())
    }

    /// Check if a phase loop has run for too long
    #[inline]
    pub fn check_iteration_limit(&self, iterations: usize) -> crate::error::Result<()> {
        if iterations > self.max_iterations {
            return Err(crate::error::MatchingError::iteration_limit(self.max_iterations));
        }
        Ok(())
    }
}
