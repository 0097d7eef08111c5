// proposal.rs - The accept/reject transition shared by every proposal phase
use crate::arena::{MatchingArena, ParticipantId};
use crate::error::Result;
use crate::trace::{TraceEvent, Tracer};

/// What a single proposal did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalOutcome {
    /// The proposed participant held nothing and accepted.
    Accepted,
    /// The proposed participant traded up; the carried participant was rejected.
    AcceptedReplacing(ParticipantId),
    /// The proposed participant kept its current proposal.
    Rejected,
}

/// `proposer` proposes to `proposed`.
///
/// This is the only place where acceptance state changes. Every rejection it
/// performs is mutual.
pub fn propose(
    arena: &mut MatchingArena,
    proposer: ParticipantId,
    proposed: ParticipantId,
    tracer: &mut Tracer<'_>,
) -> Result<ProposalOutcome> {
    tracer.emit(|| TraceEvent::Propose {
        proposer: arena.key(proposer),
        proposed: arena.key(proposed),
    });

    let target = arena.participant(proposed)?;
    let outcome = match target.accepted_from() {
        None => {
            arena.accept(proposed, proposer)?;
            tracer.emit(|| TraceEvent::Accept {
                acceptor: arena.key(proposed),
                proposer: arena.key(proposer),
            });
            ProposalOutcome::Accepted
        }
        Some(holder) if target.preferences().prefers(proposer, holder) => {
            tracer.emit(|| TraceEvent::AcceptReplacing {
                acceptor: arena.key(proposed),
                proposer: arena.key(proposer),
                rejected: arena.key(holder),
            });
            arena.reject_mutually(proposed, holder)?;
            arena.accept(proposed, proposer)?;
            ProposalOutcome::AcceptedReplacing(holder)
        }
        Some(_) => {
            tracer.emit(|| TraceEvent::Reject {
                rejector: arena.key(proposed),
                rejected: arena.key(proposer),
            });
            arena.reject_mutually(proposed, proposer)?;
            ProposalOutcome::Rejected
        }
    };
    Ok(outcome)
}
