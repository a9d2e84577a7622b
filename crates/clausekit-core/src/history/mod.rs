//! Module: history
//! Responsibility: resolve WAS / CHANGED clauses through a change-history index.
//! Does not own: the primary index or clause composition.
//! Boundary: a history clause compiles to a membership filter on entity ids.

mod resolver;

#[cfg(test)]
mod tests;

use crate::{
    error::InternalError,
    query::{EMPTY_TERM, QueryFactoryResult, SearchQuery},
};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

// re-exports
pub use resolver::HistoryResolver;

///
/// CONSTANTS
///
/// Fields of a change document. One document records one transition of
/// one field on one entity.
///

pub const CHANGE_FIELD: &str = "ch_field";
pub const CHANGE_FROM: &str = "ch_from";
pub const CHANGE_TO: &str = "ch_to";
pub const CHANGE_ACTOR: &str = "ch_who";
pub const CHANGE_DATE: &str = "ch_date";
pub const CHANGE_ENTITY: &str = "ch_entity";

///
/// ChangeHistoryIndex
///
/// Secondary index of change documents. Searches are blocking and return
/// the distinct entity ids of every matching change.
///

pub trait ChangeHistoryIndex: Send + Sync {
    fn matching_entities(&self, query: &SearchQuery) -> Result<BTreeSet<String>, InternalError>;
}

///
/// ChangeRecord
///
/// One recorded transition, as stored in the change-history index. Values
/// are in their indexed form; `None` stands for an empty field.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChangeRecord {
    pub entity: String,
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub actor: String,
    pub at: NaiveDateTime,
}

impl ChangeRecord {
    #[must_use]
    pub fn new(
        entity: impl Into<String>,
        field: impl Into<String>,
        from: Option<&str>,
        to: Option<&str>,
        actor: impl Into<String>,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            actor: actor.into(),
            at,
        }
    }

    /// Indexed term for the old value.
    #[must_use]
    pub fn from_term(&self) -> &str {
        self.from.as_deref().unwrap_or(EMPTY_TERM)
    }

    /// Indexed term for the new value.
    #[must_use]
    pub fn to_term(&self) -> &str {
        self.to.as_deref().unwrap_or(EMPTY_TERM)
    }
}

///
/// HistoryMatch
///
/// Entities found by one history sub-search. `negated` marks a WAS NOT
/// family clause, whose result is the complement of `entities`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HistoryMatch {
    pub entities: BTreeSet<String>,
    pub negated: bool,
}

impl HistoryMatch {
    /// Membership filter for the primary search.
    ///
    /// An empty set matches nothing for WAS and restricts nothing for
    /// WAS NOT.
    #[must_use]
    pub fn into_result(self) -> QueryFactoryResult {
        match (self.negated, self.entities.is_empty()) {
            (false, true) => QueryFactoryResult::create_false(),
            (false, false) => QueryFactoryResult::new(SearchQuery::IdSet(self.entities)),
            (true, true) => QueryFactoryResult::new(SearchQuery::MatchAll),
            (true, false) => QueryFactoryResult::negated(SearchQuery::IdSet(self.entities)),
        }
    }
}
