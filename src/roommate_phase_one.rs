// roommate_phase_one.rs - Irving (1985), phase I
//!
//! The first participant (table order) whose proposal nobody holds proposes to
//! its top remaining preference. This repeats until every proposal is held,
//! or until some list is exhausted, which means no stable matching exists.
//!
//! With the preferences
//!
//! ```text
//!   A => [B, D, F, C, E]      D => [F, C, A, E, B]
//!   B => [D, E, F, A, C]      E => [F, C, D, B, A]
//!   C => [D, E, F, A, B]      F => [A, B, D, C, E]
//! ```
//!
//! the phase ends with B holding A, D holding C, E holding B, F holding D,
//! C holding E and A holding F, after D rejected B and F rejected E.

use crate::arena::{MatchingArena, TableId};
use crate::error::{MatchingError, Result};
use crate::phase::PhaseRunner;
use crate::proposal::propose;
use crate::resource_limits::SolverLimits;
use crate::state::PhaseOutcome;
use crate::trace::Tracer;

#[derive(Debug, Clone)]
pub struct RoommatePhaseOne {
    table: TableId,
    limits: SolverLimits,
}

impl RoommatePhaseOne {
    pub fn new(table: TableId, limits: SolverLimits) -> Self {
        Self { table, limits }
    }
}

impl PhaseRunner for RoommatePhaseOne {
    fn name(&self) -> &'static str {
        "phase I"
    }

    fn run(&mut self, arena: &mut MatchingArena, tracer: &mut Tracer<'_>) -> Result<PhaseOutcome> {
        let mut iterations = 0;
        while let Some(&proposer) = arena.unmatched(self.table)?.first() {
            iterations += 1;
            self.limits.check_iteration_limit(iterations)?;

            if !arena.is_stable(self.table)? {
                return Ok(PhaseOutcome::NoStableSolution);
            }

            let top = arena.preferences(proposer)?.first().ok_or_else(|| {
                MatchingError::consistency_violation("unmatched participant without preferences")
            })?;
            propose(arena, proposer, top, tracer)?;

            if !arena.is_stable(self.table)? {
                return Ok(PhaseOutcome::NoStableSolution);
            }
        }

        // The last transition may have emptied a list.
        if !arena.is_stable(self.table)? {
            return Ok(PhaseOutcome::NoStableSolution);
        }
        Ok(PhaseOutcome::Reduced)
    }
}
