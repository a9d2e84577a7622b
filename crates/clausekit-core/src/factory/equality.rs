use crate::{
    clause::{Operator, QueryLiteral},
    factory::{OperatorQueryFactory, empty_query, guarded_negation, union_of},
    query::{QueryFactoryResult, SearchQuery},
    resolve::IndexInfoResolver,
};
use std::sync::Arc;

///
/// EqualityQueryFactory
///
/// `=`, `!=`, `is`, `is not`, `in`, `not in` over one indexed field.
/// Negations carry the visibility guard so documents without the field
/// never match an inequality.
///

#[derive(Clone)]
pub struct EqualityQueryFactory {
    field: String,
    resolver: Arc<dyn IndexInfoResolver>,
}

impl EqualityQueryFactory {
    #[must_use]
    pub fn new(field: impl Into<String>, resolver: Arc<dyn IndexInfoResolver>) -> Self {
        Self {
            field: field.into(),
            resolver,
        }
    }

    // Terms matching `literal`; `None` when it indexes to nothing.
    fn positive(&self, literal: &QueryLiteral) -> Option<SearchQuery> {
        match literal {
            QueryLiteral::Empty => Some(empty_query(&self.field)),
            QueryLiteral::Value(value) => {
                let terms: Vec<SearchQuery> = self
                    .resolver
                    .indexed_values(value)
                    .into_iter()
                    .map(|term| SearchQuery::term(&self.field, term))
                    .collect();
                if terms.is_empty() {
                    None
                } else {
                    Some(SearchQuery::any_of(terms))
                }
            }
        }
    }

    fn negative(&self, literal: &QueryLiteral) -> SearchQuery {
        match literal {
            QueryLiteral::Empty => guarded_negation(&self.field, None),
            QueryLiteral::Value(_) => guarded_negation(&self.field, self.positive(literal)),
        }
    }
}

impl OperatorQueryFactory for EqualityQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        operator.is_equality()
    }

    fn create_for_single(&self, operator: Operator, literal: &QueryLiteral) -> QueryFactoryResult {
        if operator.is_negating() {
            return QueryFactoryResult::new(self.negative(literal));
        }

        self.positive(literal)
            .map_or_else(QueryFactoryResult::create_false, QueryFactoryResult::new)
    }

    fn create_for_multiple(
        &self,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        if operator.is_negating() {
            let negations = literals.iter().map(|literal| self.negative(literal)).collect();
            return QueryFactoryResult::new(SearchQuery::all_of(negations));
        }

        union_of(
            literals
                .iter()
                .map(|literal| self.create_for_single(operator, literal)),
        )
    }

    fn create_for_empty(&self, operator: Operator) -> QueryFactoryResult {
        if operator.is_negating() {
            QueryFactoryResult::new(guarded_negation(&self.field, None))
        } else {
            QueryFactoryResult::new(empty_query(&self.field))
        }
    }
}
