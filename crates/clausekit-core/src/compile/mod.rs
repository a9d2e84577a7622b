//! Module: compile
//! Responsibility: lower an immutable clause tree into one backend query.
//! Does not own: per-operator query shape or history resolution.
//! Boundary: every collaborator is passed in; nothing is looked up ambiently.

mod compiler;


use crate::{DEFAULT_MAX_CLAUSE_FAN_OUT, clause::Clause, error::InternalError};
use thiserror::Error as ThisError;

// re-exports
pub use compiler::QueryCompiler;

///
/// CompileOptions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompileOptions {
    /// Largest boolean group the backend accepts.
    pub max_clause_fan_out: usize,
}

impl CompileOptions {
    #[must_use]
    pub const fn new(max_clause_fan_out: usize) -> Self {
        Self { max_clause_fan_out }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CLAUSE_FAN_OUT)
    }
}

///
/// CompileError
///

#[derive(Debug, ThisError)]
pub enum CompileError {
    /// Not retryable; the same clause always exceeds the same limit.
    #[error("clause too complex: {count} clauses in one group, limit is {limit}: {clause}")]
    TooComplex {
        clause: Box<Clause>,
        limit: usize,
        count: usize,
    },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CompileError {
    #[must_use]
    pub const fn is_too_complex(&self) -> bool {
        matches!(self, Self::TooComplex { .. })
    }
}
