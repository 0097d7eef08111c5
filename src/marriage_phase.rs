// marriage_phase.rs - Gale-Shapley (1962)
//!
//! Every proposer whose proposal is not currently held proposes to its top
//! remaining preference, until every proposer is held. Each rejection removes
//! a pair for good, so the loop performs at most n² rejections, and complete
//! reciprocal lists always leave every proposer matched.

use crate::arena::{MatchingArena, TableId};
use crate::error::{MatchingError, Result};
use crate::phase::PhaseRunner;
use crate::proposal::propose;
use crate::resource_limits::SolverLimits;
use crate::state::PhaseOutcome;
use crate::trace::Tracer;

#[derive(Debug, Clone)]
pub struct MarriagePhase {
    proposers: TableId,
    limits: SolverLimits,
}

impl MarriagePhase {
    /// `proposers` must be linked to its acceptor table.
    pub fn new(proposers: TableId, limits: SolverLimits) -> Self {
        Self { proposers, limits }
    }
}

impl PhaseRunner for MarriagePhase {
    fn name(&self) -> &'static str {
        "gale-shapley"
    }

    fn run(&mut self, arena: &mut MatchingArena, tracer: &mut Tracer<'_>) -> Result<PhaseOutcome> {
        let mut iterations = 0;
        loop {
            let unmatched = arena.unmatched(self.proposers)?;
            if unmatched.is_empty() {
                return Ok(PhaseOutcome::Complete);
            }

            for proposer in unmatched {
                iterations += 1;
                self.limits.check_iteration_limit(iterations)?;

                let top = arena.preferences(proposer)?.first().ok_or_else(|| {
                    MatchingError::consistency_violation(format!(
                        "{} exhausted its preferences",
                        arena.key(proposer)
                    ))
                })?;
                propose(arena, proposer, top, tracer)?;
            }
        }
    }
}
