// rotation.rs - Irving (1985), phase III: rotation elimination
//!
//! Starting from the first participant `x[0]` (table order) with more than one
//! remaining preference, build
//!
//! ```text
//!   y[i+1] = second preference of x[i]
//!   x[i+1] = last preference of y[i+1]
//! ```
//!
//! until some `x[n]` equals an earlier `x[f]`. The rotation is the closed cycle
//! `(x[j], y[j])` for `j` in `f+1..=n`; any tail before `x[f]` is not part of it.
//!
//! Eliminating the rotation makes every `y[j]` reject each entry it ranks below
//! `x[j-1]`, which always includes its last entry `x[j]`. The removals are
//! computed against the table as it stood when the rotation was found. If a
//! list runs empty there is no stable matching; otherwise the search repeats
//! until every list holds exactly one entry.

use crate::arena::{MatchingArena, ParticipantId, TableId};
use crate::error::{MatchingError, Result};
use crate::phase::PhaseRunner;
use crate::resource_limits::SolverLimits;
use crate::state::PhaseOutcome;
use crate::trace::{TraceEvent, Tracer};
use rustc_hash::FxHashMap as HashMap;
use smallvec::SmallVec;

/// A rotation exposed in a reduced table, as its `(x, y)` pairs together with
/// the participant `x` preceding each pair in the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// `(x[j-1], x[j], y[j])` for every pair of the cycle.
    links: SmallVec<[(ParticipantId, ParticipantId, ParticipantId); 8]>,
}

impl Rotation {
    /// The `(x, y)` pairs of the rotation.
    pub fn pairs(&self) -> impl Iterator<Item = (ParticipantId, ParticipantId)> + '_ {
        self.links.iter().map(|&(_, x, y)| (x, y))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Finds the rotation reached from `start`, which must have at least two
    /// remaining preferences.
    pub fn find(arena: &MatchingArena, start: ParticipantId) -> Result<Self> {
        let mut xs: Vec<ParticipantId> = vec![start];
        let mut ys: Vec<Option<ParticipantId>> = vec![None];
        let mut seen: HashMap<ParticipantId, usize> = HashMap::default();
        seen.insert(start, 0);

        let first_repeat = loop {
            let x = xs[xs.len() - 1];
            let y = arena.preferences(x)?.second().ok_or_else(|| {
                MatchingError::consistency_violation(format!(
                    "{} has no second preference while tracing a rotation",
                    arena.key(x)
                ))
            })?;
            let next = arena.preferences(y)?.last().ok_or_else(|| {
                MatchingError::consistency_violation(format!(
                    "{} has no preferences while tracing a rotation",
                    arena.key(y)
                ))
            })?;

            ys.push(Some(y));
            xs.push(next);
            if let Some(&f) = seen.get(&next) {
                break f;
            }
            seen.insert(next, xs.len() - 1);
        };

        let mut links = SmallVec::new();
        for j in first_repeat + 1..xs.len() {
            if let Some(y) = ys[j] {
                links.push((xs[j - 1], xs[j], y));
            }
        }
        Ok(Self { links })
    }

    /// Every pair removed when this rotation is eliminated: each `y[j]`
    /// against every entry it ranks below `x[j-1]`.
    pub fn eliminations(&self, arena: &MatchingArena) -> Result<Vec<(ParticipantId, ParticipantId)>> {
        let mut removals = Vec::new();
        for &(previous, _, y) in &self.links {
            for rejected in arena.preferences(y)?.ranked_below(previous) {
                removals.push((y, rejected));
            }
        }
        Ok(removals)
    }
}

#[derive(Debug, Clone)]
pub struct RoommatePhaseThree {
    table: TableId,
    limits: SolverLimits,
}

impl RoommatePhaseThree {
    pub fn new(table: TableId, limits: SolverLimits) -> Self {
        Self { table, limits }
    }

    fn first_undecided(&self, arena: &MatchingArena) -> Result<Option<ParticipantId>> {
        for &id in arena.linked_table(self.table)?.members() {
            if arena.preferences(id)?.len() > 1 {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}

impl PhaseRunner for RoommatePhaseThree {
    fn name(&self) -> &'static str {
        "phase III"
    }

    fn run(&mut self, arena: &mut MatchingArena, tracer: &mut Tracer<'_>) -> Result<PhaseOutcome> {
        let mut iterations = 0;
        loop {
            if !arena.is_stable(self.table)? {
                return Ok(PhaseOutcome::NoStableSolution);
            }
            let start = match self.first_undecided(arena)? {
                Some(start) => start,
                None => return Ok(PhaseOutcome::Complete),
            };

            iterations += 1;
            self.limits.check_iteration_limit(iterations)?;

            let rotation = Rotation::find(arena, start)?;
            tracer.emit(|| TraceEvent::RotationFound {
                pairs: rotation
                    .pairs()
                    .map(|(x, y)| (arena.key(x), arena.key(y)))
                    .collect(),
            });

            for (y, rejected) in rotation.eliminations(arena)? {
                tracer.emit(|| TraceEvent::Reject {
                    rejector: arena.key(y),
                    rejected: arena.key(rejected),
                });
                arena.reject_mutually(y, rejected)?;
            }
        }
    }
}
