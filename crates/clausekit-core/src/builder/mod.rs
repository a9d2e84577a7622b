//! Module: builder
//! Responsibility: incremental, precedence-correct construction of clause trees.
//! Does not own: clause semantics or compilation.
//! Boundary: user-facing fluent builder layer.

mod condition;
mod field;
mod mutable;
mod operator;
mod precedence;

#[cfg(test)]
mod tests;

use thiserror::Error as ThisError;

// re-exports
pub use condition::ConditionBuilder;
pub use field::FieldRef;
pub use mutable::{MultiClause, MutableClause};
pub use operator::BuilderOperator;
pub use precedence::{BuildState, PrecedenceBuilder};

///
/// BuilderError
///
/// `IllegalState` reports a protocol violation together with the condition
/// accepted so far. `Argument` reports a bad value at the call that
/// introduced it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BuilderError {
    #[error("{message} (condition so far: '{partial}')")]
    IllegalState { message: String, partial: String },

    #[error("invalid argument: {0}")]
    Argument(String),
}
