// lib.rs - Main library file
//!
//! Stable matching solvers: Gale-Shapley for stable marriage between two
//! sides, and Irving's three-phase algorithm for stable roommates within one
//! group.
//!
//! Participants live in a slotmap-backed [`MatchingArena`] and refer to each
//! other by handle. Every phase shares one proposal transition, and a phase
//! reports an unsolvable table as a [`PhaseOutcome`] rather than unwinding.

pub mod analysis;
pub mod arena;
pub mod error;
pub mod key;
pub mod marriage_phase;
pub mod matching;
pub mod participant;
pub mod phase;
pub mod preferences;
pub mod proposal;
pub mod resource_limits;
pub mod roommate_phase_one;
pub mod roommate_phase_two;
pub mod rotation;
pub mod solver;
pub mod state;
pub mod table;
pub mod trace;
pub mod validator;

// Re-export core types for easier access from outside the crate.
pub use analysis::{BlockingPair, MatchingAnalysis};
pub use arena::{MatchingArena, ParticipantId, TableId};
pub use error::{MatchingError, Result};
pub use key::{Key, KeyKind};
pub use matching::Matching;
pub use phase::PhaseRunner;
pub use preferences::{Preferences, RawPreferences, RawValue};
pub use resource_limits::SolverLimits;
pub use solver::{solve_marriage, solve_roommates, Marriage, Roommate};
pub use state::PhaseOutcome;
pub use table::{PartnerResolution, PreferenceTable};
pub use trace::{RecordingSink, TraceEvent, TraceSink, Tracer, TracingSink};
pub use validator::Validator;

/// Builds a [`Preferences`] table in insertion order.
///
/// ```ignore
/// let prefs = preferences! {
///     "A" => ["B", "C"],
///     "B" => ["A", "C"],
/// };
/// ```
#[macro_export]
macro_rules! preferences {
    ($($key:expr => [$($pref:expr),* $(,)?]),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut prefs = $crate::preferences::Preferences::new();
        $(
            prefs.insert($crate::key::Key::from($key), {
                let list: Vec<$crate::key::Key> = vec![$($crate::key::Key::from($pref)),*];
                list
            });
        )*
        prefs
    }};
}

/// A "prelude" module for easily importing the most commonly used types.
pub mod prelude {
    pub use crate::{
        preferences, solve_marriage, solve_roommates, Key, Marriage, Matching, MatchingAnalysis,
        MatchingError, Preferences, RawPreferences, RecordingSink, Result, Roommate, SolverLimits,
        TraceEvent, TraceSink, TracingSink,
    };
}
