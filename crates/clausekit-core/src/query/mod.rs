//! Module: query
//! Responsibility: the backend query contract produced by compilation.
//! Does not own: evaluation (see `index`) or clause semantics.
//! Boundary: the only shape handed to a search backend.

mod result;

use std::{collections::BTreeSet, fmt, ops::Bound};

// re-exports
pub use result::QueryFactoryResult;

///
/// CONSTANTS
///

/// Term indexed for a field that carries no value.
pub const EMPTY_TERM: &str = "<empty>";

/// Document field listing the fields visible on a document.
pub const VISIBLE_FIELD_IDS: &str = "visiblefieldids";

///
/// Occur
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Must => "+",
            Self::Should => "",
            Self::MustNot => "-",
        };
        f.write_str(label)
    }
}

///
/// BoolQuery
///
/// Ordered boolean group. A group with only `MustNot` clauses matches
/// nothing on a conventional backend; the compiler always pairs negations
/// with a positive clause.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct BoolQuery {
    pub clauses: Vec<(Occur, SearchQuery)>,
}

impl BoolQuery {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, occur: Occur, query: SearchQuery) -> Self {
        self.clauses.push((occur, query));
        self
    }

    pub fn push(&mut self, occur: Occur, query: SearchQuery) {
        self.clauses.push((occur, query));
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when no clause is `Must` or `Should`.
    #[must_use]
    pub fn is_all_negative(&self) -> bool {
        self.clauses
            .iter()
            .all(|(occur, _)| *occur == Occur::MustNot)
    }
}

///
/// SearchQuery
///
/// Backend query contract: boolean composition, term and range lookups,
/// prefix lookups, and constant-score filtering on an explicit id set.
/// Range bounds are over the field's indexed string form.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SearchQuery {
    MatchAll,
    MatchNone,
    Term {
        field: String,
        value: String,
    },
    Range {
        field: String,
        lower: Bound<String>,
        upper: Bound<String>,
    },
    Prefix {
        field: String,
        prefix: String,
    },
    Bool(BoolQuery),
    IdSet(BTreeSet<String>),
}

impl SearchQuery {
    #[must_use]
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn range(field: impl Into<String>, lower: Bound<String>, upper: Bound<String>) -> Self {
        Self::Range {
            field: field.into(),
            lower,
            upper,
        }
    }

    #[must_use]
    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Prefix {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    /// Every query ANDed; a single query is returned unwrapped.
    #[must_use]
    pub fn all_of(mut queries: Vec<Self>) -> Self {
        if queries.len() == 1 {
            return queries.remove(0);
        }
        Self::Bool(BoolQuery {
            clauses: queries.into_iter().map(|q| (Occur::Must, q)).collect(),
        })
    }

    /// Every query ORed; a single query is returned unwrapped.
    #[must_use]
    pub fn any_of(mut queries: Vec<Self>) -> Self {
        if queries.len() == 1 {
            return queries.remove(0);
        }
        Self::Bool(BoolQuery {
            clauses: queries.into_iter().map(|q| (Occur::Should, q)).collect(),
        })
    }

    /// Documents matching `guard` but not `excluded`.
    #[must_use]
    pub fn excluding(guard: Self, excluded: Self) -> Self {
        Self::Bool(
            BoolQuery::new()
                .with(Occur::Must, guard)
                .with(Occur::MustNot, excluded),
        )
    }

    /// Number of clauses in this query's own boolean group (0 for leaves).
    #[must_use]
    pub const fn fan_out(&self) -> usize {
        match self {
            Self::Bool(group) => group.len(),
            _ => 0,
        }
    }

    /// Largest boolean group anywhere in this query (0 for leaves).
    #[must_use]
    pub fn widest_group(&self) -> usize {
        match self {
            Self::Bool(group) => group
                .clauses
                .iter()
                .map(|(_, query)| query.widest_group())
                .fold(group.len(), usize::max),
            _ => 0,
        }
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchAll => f.write_str("*:*"),
            Self::MatchNone => f.write_str("-*:*"),
            Self::Term { field, value } => write!(f, "{field}:{value}"),
            Self::Range {
                field,
                lower,
                upper,
            } => {
                let (open, low) = match lower {
                    Bound::Included(v) => ("[", v.as_str()),
                    Bound::Excluded(v) => ("{", v.as_str()),
                    Bound::Unbounded => ("{", "*"),
                };
                let (high, close) = match upper {
                    Bound::Included(v) => (v.as_str(), "]"),
                    Bound::Excluded(v) => (v.as_str(), "}"),
                    Bound::Unbounded => ("*", "}"),
                };
                write!(f, "{field}:{open}{low} TO {high}{close}")
            }
            Self::Prefix { field, prefix } => write!(f, "{field}:{prefix}*"),
            Self::Bool(group) => {
                f.write_str("(")?;
                for (i, (occur, query)) in group.clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{occur}{query}")?;
                }
                f.write_str(")")
            }
            Self::IdSet(ids) => write!(f, "ids:[{}]", ids.iter().cloned().collect::<Vec<_>>().join(",")),
        }
    }
}
