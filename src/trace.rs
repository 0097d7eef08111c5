// trace.rs - Step narration for diagnostics
//!
//! A solve call narrates its steps to an optional caller-supplied sink. The
//! narration is purely observational and never influences the outcome.

use crate::key::{format_keys, Key};
use std::fmt;

/// One narrated step of a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A phase is starting.
    Phase { name: &'static str },
    Propose { proposer: Key, proposed: Key },
    Accept { acceptor: Key, proposer: Key },
    /// The acceptor trades its held proposal for a better one.
    AcceptReplacing {
        acceptor: Key,
        proposer: Key,
        rejected: Key,
    },
    Reject { rejector: Key, rejected: Key },
    /// Clean-up after anchoring: `acceptor` holds `proposer` and drops everything ranked below it.
    Reduce {
        proposer: Key,
        acceptor: Key,
        rejected: Vec<Key>,
    },
    /// A rotation as its `(x, y)` pairs.
    RotationFound { pairs: Vec<(Key, Key)> },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Phase { name } => write!(f, "running {}", name),
            TraceEvent::Propose { proposer, proposed } => {
                write!(f, "{} proposes to {}", proposer, proposed)
            }
            TraceEvent::Accept { acceptor, proposer } => write!(f, "{} accepts {}", acceptor, proposer),
            TraceEvent::AcceptReplacing {
                acceptor,
                proposer,
                rejected,
            } => write!(f, "{} accepts {}, rejects {}", acceptor, proposer, rejected),
            TraceEvent::Reject { rejector, rejected } => write!(f, "{} rejects {}", rejector, rejected),
            TraceEvent::Reduce {
                proposer,
                acceptor,
                rejected,
            } => write!(
                f,
                "{} accepted by {}. {} rejecting members less preferred than {}: {}",
                proposer,
                acceptor,
                acceptor,
                proposer,
                format_keys(rejected)
            ),
            TraceEvent::RotationFound { pairs } => {
                f.write_str("found rotation:")?;
                for (x, y) in pairs {
                    write!(f, " ({}, {})", x, y)?;
                }
                Ok(())
            }
        }
    }
}

/// Receives narrated steps from a solve call.
pub trait TraceSink {
    fn record(&mut self, event: &TraceEvent);
}

/// Forwards every step to `tracing` at TRACE level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, event: &TraceEvent) {
        tracing::trace!(target: "stable_matching::steps", "{}", event);
    }
}

/// Keeps every step, both as the event and as its rendered line.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<TraceEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|e| e.to_string()).collect()
    }
}

impl TraceSink for RecordingSink {
    fn record(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}

/// Handle the phases narrate through. Events are only built when a sink is attached.
#[derive(Default)]
pub struct Tracer<'s> {
    sink: Option<&'s mut dyn TraceSink>,
}

impl<'s> Tracer<'s> {
    pub fn new(sink: Option<&'s mut dyn TraceSink>) -> Self {
        Self { sink }
    }

    pub fn silent() -> Self {
        Self { sink: None }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    #[inline]
    pub fn emit(&mut self, event: impl FnOnce() -> TraceEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.record(&event());
        }
    }
}

impl fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
