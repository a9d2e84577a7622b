//! Module: resolve
//! Responsibility: collaborators that turn operands into indexable terms.
//! Does not own: query shape (see `factory`) or the history index.
//! Boundary: passed explicitly into the compiler; never looked up ambiently.

mod date;
mod function;
mod index_info;
mod operand;

#[cfg(test)]
mod tests;

use chrono::NaiveDateTime;

// re-exports
pub use date::{DateRange, DateSupport, DefaultDateSupport, INDEX_DATE_FORMAT};
pub use function::{ClauseFunction, CurrentUserFunction, FunctionRegistry, NowFunction};
pub use index_info::{
    DateIndexInfoResolver, IndexInfoResolver, NameIdIndexInfoResolver, NumberIndexInfoResolver,
    TextIndexInfoResolver,
};
pub use operand::{DefaultOperandResolver, OperandResolver};

///
/// SearchContext
///
/// Per-search inputs consulted during resolution: the searching user (if
/// any) and the instant the search is evaluated at.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchContext {
    pub user: Option<String>,
    pub now: NaiveDateTime,
}

impl SearchContext {
    #[must_use]
    pub const fn new(user: Option<String>, now: NaiveDateTime) -> Self {
        Self { user, now }
    }

    /// Anonymous search evaluated at `now`.
    #[must_use]
    pub const fn anonymous(now: NaiveDateTime) -> Self {
        Self { user: None, now }
    }
}
