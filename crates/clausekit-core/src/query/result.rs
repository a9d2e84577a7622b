use crate::query::SearchQuery;

///
/// QueryFactoryResult
///
/// One compiled fragment. `must_not_occur` asks the composer to place the
/// query in a MUST_NOT slot. A false result ("matches nothing") is kept
/// distinct from an ordinary query so composition can short-circuit.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryFactoryResult {
    query: SearchQuery,
    must_not_occur: bool,
}

impl QueryFactoryResult {
    #[must_use]
    pub const fn new(query: SearchQuery) -> Self {
        Self {
            query,
            must_not_occur: false,
        }
    }

    /// A query whose matches are to be excluded.
    #[must_use]
    pub const fn negated(query: SearchQuery) -> Self {
        Self {
            query,
            must_not_occur: true,
        }
    }

    #[must_use]
    pub const fn create_false() -> Self {
        Self::new(SearchQuery::MatchNone)
    }

    #[must_use]
    pub const fn is_false(&self) -> bool {
        matches!(self.query, SearchQuery::MatchNone) && !self.must_not_occur
    }

    /// Matches everything (a negated false, or an explicit match-all).
    #[must_use]
    pub const fn is_true(&self) -> bool {
        match self.query {
            SearchQuery::MatchNone => self.must_not_occur,
            SearchQuery::MatchAll => !self.must_not_occur,
            _ => false,
        }
    }

    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    #[must_use]
    pub const fn must_not_occur(&self) -> bool {
        self.must_not_occur
    }

    /// Flip the occurrence flag; double negation cancels.
    #[must_use]
    pub fn negate(self) -> Self {
        if self.is_false() {
            return Self::new(SearchQuery::MatchAll);
        }
        if self.is_true() {
            return Self::create_false();
        }

        Self {
            query: self.query,
            must_not_occur: !self.must_not_occur,
        }
    }

    /// Standalone positive query; a negated result is paired with
    /// `MatchAll` so it never reaches the backend as an all-negative group.
    #[must_use]
    pub fn into_positive(self) -> SearchQuery {
        if self.must_not_occur {
            SearchQuery::excluding(SearchQuery::MatchAll, self.query)
        } else {
            self.query
        }
    }
}
