use crate::{
    clause::{Operator, QueryLiteral},
    factory::OperatorQueryFactory,
    query::{QueryFactoryResult, SearchQuery},
    resolve::IndexInfoResolver,
};
use std::{ops::Bound, sync::Arc};
use tracing::debug;

///
/// RelationalQueryFactory
///
/// `<`, `<=`, `>`, `>=` as one-sided ranges over the indexed form. A list
/// or `EMPTY` operand has no ordering and matches nothing.
///

#[derive(Clone)]
pub struct RelationalQueryFactory {
    field: String,
    resolver: Arc<dyn IndexInfoResolver>,
}

impl RelationalQueryFactory {
    #[must_use]
    pub fn new(field: impl Into<String>, resolver: Arc<dyn IndexInfoResolver>) -> Self {
        Self {
            field: field.into(),
            resolver,
        }
    }

    fn range(&self, operator: Operator, indexed: String) -> Option<SearchQuery> {
        let (lower, upper) = match operator {
            Operator::GreaterThan => (Bound::Excluded(indexed), Bound::Unbounded),
            Operator::GreaterThanEquals => (Bound::Included(indexed), Bound::Unbounded),
            Operator::LessThan => (Bound::Unbounded, Bound::Excluded(indexed)),
            Operator::LessThanEquals => (Bound::Unbounded, Bound::Included(indexed)),
            _ => return None,
        };

        Some(SearchQuery::range(&self.field, lower, upper))
    }
}

impl OperatorQueryFactory for RelationalQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        operator.is_relational()
    }

    fn create_for_single(&self, operator: Operator, literal: &QueryLiteral) -> QueryFactoryResult {
        let Some(value) = literal.value() else {
            return QueryFactoryResult::create_false();
        };

        // A name shared by several ids yields one range per id.
        let ranges: Vec<SearchQuery> = self
            .resolver
            .indexed_values(value)
            .into_iter()
            .filter_map(|indexed| self.range(operator, indexed))
            .collect();
        if ranges.is_empty() {
            return QueryFactoryResult::create_false();
        }

        QueryFactoryResult::new(SearchQuery::any_of(ranges))
    }

    fn create_for_multiple(
        &self,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        debug!(
            field = %self.field,
            %operator,
            count = literals.len(),
            "relational operator over multiple values matches nothing"
        );
        QueryFactoryResult::create_false()
    }

    fn create_for_empty(&self, operator: Operator) -> QueryFactoryResult {
        debug!(field = %self.field, %operator, "relational operator over EMPTY matches nothing");
        QueryFactoryResult::create_false()
    }
}
