use crate::{
    clause::{Operator, QueryLiteral},
    factory::{OperatorQueryFactory, empty_query, guarded_negation},
    query::{QueryFactoryResult, SearchQuery},
};

///
/// LikeQueryFactory
///
/// `~` and `!~` over a tokenized text field. Each literal is split on
/// whitespace and lower-cased; every token must match, and a trailing `*`
/// turns a token into a prefix lookup. Several literals are alternatives.
///

#[derive(Clone, Debug)]
pub struct LikeQueryFactory {
    field: String,
}

impl LikeQueryFactory {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Tokenized query for one literal; `None` if it holds no tokens.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<SearchQuery> {
        let tokens: Vec<SearchQuery> = text
            .split_whitespace()
            .map(str::to_lowercase)
            .filter_map(|token| match token.strip_suffix('*') {
                Some("") => None,
                Some(prefix) => Some(SearchQuery::prefix(&self.field, prefix)),
                None => Some(SearchQuery::term(&self.field, token)),
            })
            .collect();
        if tokens.is_empty() {
            return None;
        }

        Some(SearchQuery::all_of(tokens))
    }

    fn positive(&self, literal: &QueryLiteral) -> Option<SearchQuery> {
        match literal {
            QueryLiteral::Empty => Some(empty_query(&self.field)),
            QueryLiteral::Value(value) => self.parse(&value.as_text()),
        }
    }
}

impl OperatorQueryFactory for LikeQueryFactory {
    fn handles_operator(&self, operator: Operator) -> bool {
        operator.is_like()
    }

    fn create_for_single(&self, operator: Operator, literal: &QueryLiteral) -> QueryFactoryResult {
        self.create_for_multiple(operator, std::slice::from_ref(literal))
    }

    fn create_for_multiple(
        &self,
        operator: Operator,
        literals: &[QueryLiteral],
    ) -> QueryFactoryResult {
        let alternatives: Vec<SearchQuery> =
            literals.iter().filter_map(|literal| self.positive(literal)).collect();

        match (operator, alternatives.is_empty()) {
            (Operator::NotLike, true) => {
                QueryFactoryResult::new(guarded_negation(&self.field, None))
            }
            (Operator::NotLike, false) => QueryFactoryResult::new(guarded_negation(
                &self.field,
                Some(SearchQuery::any_of(alternatives)),
            )),
            (_, true) => QueryFactoryResult::create_false(),
            (_, false) => QueryFactoryResult::new(SearchQuery::any_of(alternatives)),
        }
    }

    fn create_for_empty(&self, operator: Operator) -> QueryFactoryResult {
        if operator.is_negating() {
            QueryFactoryResult::new(guarded_negation(&self.field, None))
        } else {
            QueryFactoryResult::new(empty_query(&self.field))
        }
    }
}
