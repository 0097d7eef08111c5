// roommate_phase_two.rs - Irving (1985), phase II
//!
//! After phase I every participant `p` has its proposal held by some `a`.
//! Nobody `a` ranks below `p` can end up matched with `a`, so those pairs are
//! rejected. One pass over the table suffices.

use crate::arena::{MatchingArena, TableId};
use crate::error::{MatchingError, Result};
use crate::phase::PhaseRunner;
use crate::state::PhaseOutcome;
use crate::trace::{TraceEvent, Tracer};

#[derive(Debug, Clone)]
pub struct RoommatePhaseTwo {
    table: TableId,
}

impl RoommatePhaseTwo {
    pub fn new(table: TableId) -> Self {
        Self { table }
    }
}

impl PhaseRunner for RoommatePhaseTwo {
    fn name(&self) -> &'static str {
        "phase II"
    }

    fn run(&mut self, arena: &mut MatchingArena, tracer: &mut Tracer<'_>) -> Result<PhaseOutcome> {
        let members = arena.linked_table(self.table)?.members().to_vec();

        for proposer in members {
            let acceptor = arena.current_acceptor(proposer)?.ok_or_else(|| {
                MatchingError::consistency_violation(format!(
                    "proposal of {} is not held after phase I",
                    arena.key(proposer)
                ))
            })?;
            let rejections = arena.preferences(acceptor)?.ranked_below(proposer);

            tracer.emit(|| TraceEvent::Reduce {
                proposer: arena.key(proposer),
                acceptor: arena.key(acceptor),
                rejected: rejections.iter().map(|&r| arena.key(r)).collect(),
            });

            for rejected in rejections {
                arena.reject_mutually(acceptor, rejected)?;
            }
        }

        if !arena.is_stable(self.table)? {
            return Ok(PhaseOutcome::NoStableSolution);
        }
        if arena.is_complete(self.table)? {
            return Ok(PhaseOutcome::Complete);
        }
        Ok(PhaseOutcome::Reduced)
    }
}
