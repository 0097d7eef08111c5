// solver.rs - Entry points: validate, build and link tables, run the phases
use crate::arena::{MatchingArena, TableId};
use crate::error::{MatchingError, Result};
use crate::marriage_phase::MarriagePhase;
use crate::matching::Matching;
use crate::phase::PhaseRunner;
use crate::preferences::RawPreferences;
use crate::resource_limits::SolverLimits;
use crate::roommate_phase_one::RoommatePhaseOne;
use crate::roommate_phase_two::RoommatePhaseTwo;
use crate::rotation::RoommatePhaseThree;
use crate::state::PhaseOutcome;
use crate::trace::{TraceEvent, TraceSink, Tracer};
use tracing::debug;

/// Runs one phase with its boundary logged and narrated.
fn run_phase(
    phase: &mut dyn PhaseRunner,
    arena: &mut MatchingArena,
    tracer: &mut Tracer<'_>,
) -> Result<PhaseOutcome> {
    let name = phase.name();
    debug!(phase = name, "Phase started");
    tracer.emit(|| TraceEvent::Phase { name });

    let outcome = phase.run(arena, tracer)?;
    debug!(phase = name, outcome = ?outcome, "Phase finished");
    Ok(outcome)
}

/// Stable marriage between two disjoint sides. `alpha` proposes.
///
/// ```ignore
/// let matching = Marriage::new(alpha, beta)
///     .with_limits(SolverLimits::conservative())
///     .solve()?;
/// ```
pub struct Marriage<'t> {
    alpha: RawPreferences,
    beta: RawPreferences,
    limits: SolverLimits,
    sink: Option<&'t mut dyn TraceSink>,
}

impl<'t> Marriage<'t> {
    pub fn new(alpha: impl Into<RawPreferences>, beta: impl Into<RawPreferences>) -> Self {
        Self {
            alpha: alpha.into(),
            beta: beta.into(),
            limits: SolverLimits::default(),
            sink: None,
        }
    }

    pub fn with_limits(mut self, limits: SolverLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_trace(mut self, sink: &'t mut dyn TraceSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Matches every participant on both sides. Alpha entries map to the
    /// acceptor holding their proposal, beta entries to the proposer they hold.
    pub fn solve(self) -> Result<Matching> {
        let (alpha, beta) = crate::validator::Validator::validate_marriage(&self.alpha, &self.beta)?;
        self.limits.check_participant_limit(alpha.len() + beta.len())?;
        debug!(
            alpha = alpha.len(),
            beta = beta.len(),
            "Solving stable marriage"
        );

        let mut arena = MatchingArena::new();
        let alpha_table = arena.create_table(alpha.keys().cloned());
        let beta_table = arena.create_table(beta.keys().cloned());
        arena.link_pair(alpha_table, beta_table, &alpha, &beta)?;

        let mut tracer = Tracer::new(self.sink);
        let mut phase = MarriagePhase::new(alpha_table, self.limits);
        match run_phase(&mut phase, &mut arena, &mut tracer)? {
            PhaseOutcome::Complete => {}
            other => {
                return Err(MatchingError::consistency_violation(format!(
                    "marriage phase ended with {:?}",
                    other
                )))
            }
        }

        let mut matching = Matching::new();
        for &id in arena.linked_table(alpha_table)?.members() {
            let partner = arena.current_acceptor(id)?.ok_or_else(|| {
                MatchingError::consistency_violation(format!("{} is unmatched", arena.key(id)))
            })?;
            matching.push(arena.key(id), arena.key(partner));
        }
        for &id in arena.linked_table(beta_table)?.members() {
            let partner = arena.participant(id)?.accepted_from().ok_or_else(|| {
                MatchingError::consistency_violation(format!("{} holds no proposal", arena.key(id)))
            })?;
            matching.push(arena.key(id), arena.key(partner));
        }

        debug!(pairs = matching.len() / 2, "Stable marriage found");
        Ok(matching)
    }
}

/// Stable roommates over a single even-sized group (Irving's algorithm).
pub struct Roommate<'t> {
    prefs: RawPreferences,
    limits: SolverLimits,
    sink: Option<&'t mut dyn TraceSink>,
}

impl<'t> Roommate<'t> {
    pub fn new(prefs: impl Into<RawPreferences>) -> Self {
        Self {
            prefs: prefs.into(),
            limits: SolverLimits::default(),
            sink: None,
        }
    }

    pub fn with_limits(mut self, limits: SolverLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_trace(mut self, sink: &'t mut dyn TraceSink) -> Self {
        self.sink = Some(sink);
        self
    }

    fn phases(table: TableId, limits: SolverLimits) -> Vec<Box<dyn PhaseRunner>> {
        vec![
            Box::new(RoommatePhaseOne::new(table, limits)),
            Box::new(RoommatePhaseTwo::new(table)),
            Box::new(RoommatePhaseThree::new(table, limits)),
        ]
    }

    /// Runs the three phases in order, stopping at the first that completes
    /// the table or finds it unsolvable.
    pub fn solve(self) -> Result<Matching> {
        let prefs = crate::validator::Validator::validate_roommates(&self.prefs)?;
        self.limits.check_participant_limit(prefs.len())?;
        debug!(participants = prefs.len(), "Solving stable roommates");

        let mut arena = MatchingArena::new();
        let table = arena.create_table(prefs.keys().cloned());
        arena.link_self(table, &prefs)?;

        let mut tracer = Tracer::new(self.sink);
        let mut outcome = PhaseOutcome::Reduced;
        for mut phase in Self::phases(table, self.limits) {
            outcome = run_phase(phase.as_mut(), &mut arena, &mut tracer)?;
            if outcome.is_terminal() {
                break;
            }
        }

        match outcome {
            PhaseOutcome::Complete => {}
            PhaseOutcome::NoStableSolution => {
                debug!("No stable roommates matching exists");
                return Err(MatchingError::NoStableSolution);
            }
            PhaseOutcome::Reduced => {
                return Err(MatchingError::consistency_violation(
                    "table still reducible after phase III",
                ))
            }
        }

        let mut matching = Matching::new();
        for &id in arena.linked_table(table)?.members() {
            let partner = arena.preferences(id)?.first().ok_or_else(|| {
                MatchingError::consistency_violation(format!("{} has no partner", arena.key(id)))
            })?;
            matching.push(arena.key(id), arena.key(partner));
        }

        debug!(pairs = matching.len() / 2, "Stable roommates found");
        Ok(matching)
    }
}

/// Solves a stable marriage with default limits and no trace.
pub fn solve_marriage(alpha: impl Into<RawPreferences>, beta: impl Into<RawPreferences>) -> Result<Matching> {
    Marriage::new(alpha, beta).solve()
}

/// Solves a stable roommates problem with default limits and no trace.
pub fn solve_roommates(prefs: impl Into<RawPreferences>) -> Result<Matching> {
    Roommate::new(prefs).solve()
}
