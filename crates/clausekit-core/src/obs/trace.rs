use crate::{
    clause::{Clause, ClauseFingerprint, Operator},
    error::{ErrorClass, ErrorOrigin},
};

///
/// CompileTraceSink
///

pub trait CompileTraceSink: Send + Sync {
    fn on_event(&self, event: CompileTraceEvent);
}

///
/// TerminalOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TerminalOutcome {
    Query,
    False,
    Unregistered,
}

///
/// CompileOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompileOutcome {
    Query,
    False,
    TooComplex { limit: usize, count: usize },
    Error { class: ErrorClass, origin: ErrorOrigin },
}

///
/// CompileTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompileTraceEvent {
    Start {
        fingerprint: ClauseFingerprint,
    },
    Terminal {
        field: String,
        operator: Operator,
        outcome: TerminalOutcome,
    },
    History {
        field: String,
        operator: Operator,
        entities: u64,
    },
    Finish {
        fingerprint: ClauseFingerprint,
        outcome: CompileOutcome,
    },
}

///
/// TraceScope
///
/// One compilation's worth of events, all tagged with the root clause's
/// fingerprint.
///

pub struct TraceScope<'a> {
    sink: &'a dyn CompileTraceSink,
    fingerprint: ClauseFingerprint,
}

impl<'a> TraceScope<'a> {
    /// Emit `Start` and open a scope; `None` when no sink is installed.
    #[must_use]
    pub fn start(sink: Option<&'a dyn CompileTraceSink>, clause: &Clause) -> Option<Self> {
        let sink = sink?;
        let fingerprint = clause.fingerprint();
        sink.on_event(CompileTraceEvent::Start { fingerprint });

        Some(Self { sink, fingerprint })
    }

    pub fn terminal(&self, field: &str, operator: Operator, outcome: TerminalOutcome) {
        self.sink.on_event(CompileTraceEvent::Terminal {
            field: field.to_string(),
            operator,
            outcome,
        });
    }

    pub fn history(&self, field: &str, operator: Operator, entities: usize) {
        self.sink.on_event(CompileTraceEvent::History {
            field: field.to_string(),
            operator,
            entities: u64::try_from(entities).unwrap_or(u64::MAX),
        });
    }

    pub fn finish(self, outcome: CompileOutcome) {
        self.sink.on_event(CompileTraceEvent::Finish {
            fingerprint: self.fingerprint,
            outcome,
        });
    }
}
