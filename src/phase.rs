// phase.rs - Common interface of the matching phases
use crate::arena::MatchingArena;
use crate::error::Result;
use crate::state::PhaseOutcome;
use crate::trace::Tracer;

/// One phase of a matching algorithm, run over tables linked in `arena`.
pub trait PhaseRunner {
    /// Short name used in logs and narration.
    fn name(&self) -> &'static str;

    /// Mutates the tables and reports how far the algorithm got.
    ///
    /// `Err` is reserved for broken engine invariants and exceeded limits; an
    /// unsolvable table is the `PhaseOutcome::NoStableSolution` outcome.
    fn run(&mut self, arena: &mut MatchingArena, tracer: &mut Tracer<'_>) -> Result<PhaseOutcome>;
}
