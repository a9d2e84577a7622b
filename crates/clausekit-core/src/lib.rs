//! Core runtime for clausekit: the clause algebra, the precedence builder,
//! operator query factories, the history resolver, and the compiler that
//! lowers clause trees onto an inverted-index query contract.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod builder;
pub mod clause;
pub mod compile;
pub mod error;
pub mod factory;
pub mod history;
pub mod index;
pub mod obs;
pub mod query;
pub mod registry;
pub mod resolve;

///
/// CONSTANTS
///

/// Default upper bound on the number of clauses in one boolean group.
///
/// Matches the conventional fan-out limit of inverted-index backends; a
/// composed group above this size aborts compilation.
pub const DEFAULT_MAX_CLAUSE_FAN_OUT: usize = 1024;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No collaborators, factories, or backends are re-exported here.
///

pub mod prelude {
    pub use crate::{
        builder::{ConditionBuilder, FieldRef},
        clause::{Clause, HistoryPredicate, Operand, Operator, TerminalClause, Value},
        query::SearchQuery,
    };
}
