//! Compile tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! compilation results.

mod trace;

// re-exports
pub use trace::{CompileOutcome, CompileTraceEvent, CompileTraceSink, TerminalOutcome, TraceScope};
