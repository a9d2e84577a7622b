//! Module: factory
//! Responsibility: per-operator translation of terminal clauses into backend queries.
//! Does not own: field lookup (see `registry`) or history operators.
//! Boundary: consumes resolved literals, produces `QueryFactoryResult`.

mod equality;
mod like;
mod relational;


use crate::{
    clause::{Operator, QueryLiteral},
    query::{BoolQuery, EMPTY_TERM, Occur, QueryFactoryResult, SearchQuery, VISIBLE_FIELD_IDS},
};
use tracing::trace;

// re-exports
pub use equality::EqualityQueryFactory;
pub use like::LikeQueryFactory;
pub use relational::RelationalQueryFactory;

///
/// OperatorQueryFactory
///
/// Translates one terminal clause for the operators it declares. The three
/// entry points mirror how many literals the operand resolved to.
///

pub trait OperatorQueryFactory: Send + Sync {
    fn handles_operator(&self, operator: Operator) -> bool;

    fn create_for_single(&self, operator: Operator, literal: &QueryLiteral) -> QueryFactoryResult;

    fn create_for_multiple(
        &self,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult;

    fn create_for_empty(&self, operator: Operator) -> QueryFactoryResult;
}

/// Route resolved literals to the matching factory entry point.
///
/// A lone `Empty` literal takes the empty-operand path; zero literals (an
/// operand that resolved to nothing) match nothing.
pub fn create_query(
    factory: &dyn OperatorQueryFactory,
    operator: Operator,
    literals: &[QueryLiteral],
) -> QueryFactoryResult {
    match literals {
        [] => {
            trace!(%operator, "operand resolved to no literals");
            QueryFactoryResult::create_false()
        }
        [QueryLiteral::Empty] => factory.create_for_empty(operator),
        [literal] => factory.create_for_single(operator, literal),
        _ => factory.create_for_multiple(operator, literals),
    }
}

// ----------------------------------------------------------------------
// Shared query shapes
// ----------------------------------------------------------------------

/// Documents whose `field` carries the empty sentinel.
pub(crate) fn empty_query(field: &str) -> SearchQuery {
    SearchQuery::term(field, EMPTY_TERM)
}

/// Documents on which `field` is visible at all.
pub(crate) fn visibility_guard(field: &str) -> SearchQuery {
    SearchQuery::term(VISIBLE_FIELD_IDS, field)
}

/// Documents where `field` is visible, non-empty, and not matched by
/// `excluded` (when given).
pub(crate) fn guarded_negation(field: &str, excluded: Option<SearchQuery>) -> SearchQuery {
    let mut group = BoolQuery::new()
        .with(Occur::Must, visibility_guard(field))
        .with(Occur::MustNot, empty_query(field));
    if let Some(excluded) = excluded {
        group.push(Occur::MustNot, excluded);
    }

    SearchQuery::Bool(group)
}

/// OR the non-false results together; all false stays false.
pub(crate) fn union_of(results: impl IntoIterator<Item = QueryFactoryResult>) -> QueryFactoryResult {
    let queries: Vec<SearchQuery> = results
        .into_iter()
        .filter(|result| !result.is_false())
        .map(QueryFactoryResult::into_positive)
        .collect();
    if queries.is_empty() {
        return QueryFactoryResult::create_false();
    }

    QueryFactoryResult::new(SearchQuery::any_of(queries))
}
