//! Module: registry
//! Responsibility: field name → operator factories and history configuration.
//! Does not own: query shape; factories decide that.
//! Boundary: a missing field or operator is a lookup miss, never an error.

use crate::{
    clause::Operator,
    factory::{EqualityQueryFactory, LikeQueryFactory, OperatorQueryFactory, RelationalQueryFactory},
    resolve::IndexInfoResolver,
};
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// HistoryField
///
/// How one field is recorded in the change-history index: the value stored
/// in the change field, and how literals map to the ids stored as old/new
/// values.
///

#[derive(Clone)]
pub struct HistoryField {
    pub change_field: String,
    pub resolver: Arc<dyn IndexInfoResolver>,
}

impl HistoryField {
    #[must_use]
    pub fn new(change_field: impl Into<String>, resolver: Arc<dyn IndexInfoResolver>) -> Self {
        Self {
            change_field: change_field.into(),
            resolver,
        }
    }
}

impl fmt::Debug for HistoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryField")
            .field("change_field", &self.change_field)
            .finish_non_exhaustive()
    }
}

///
/// FieldRegistry
///
/// Several factories may share a field; the first one that handles the
/// operator wins, in registration order.
///

#[derive(Clone, Default)]
pub struct FieldRegistry {
    factories: BTreeMap<String, Vec<Arc<dyn OperatorQueryFactory>>>,
    history: BTreeMap<String, HistoryField>,
}

impl FieldRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- registration ----

    pub fn register(&mut self, field: &str, factory: Arc<dyn OperatorQueryFactory>) -> &mut Self {
        self.factories
            .entry(normalize(field))
            .or_default()
            .push(factory);
        self
    }

    pub fn register_history(&mut self, field: &str, history: HistoryField) -> &mut Self {
        self.history.insert(normalize(field), history);
        self
    }

    /// Equality and relational operators over `index_field`.
    pub fn register_ordered(
        &mut self,
        field: &str,
        index_field: &str,
        resolver: Arc<dyn IndexInfoResolver>,
    ) -> &mut Self {
        self.register(
            field,
            Arc::new(EqualityQueryFactory::new(index_field, Arc::clone(&resolver))),
        )
        .register(field, Arc::new(RelationalQueryFactory::new(index_field, resolver)))
    }

    /// LIKE operators over the tokenized `index_field`, plus exact matches
    /// over `exact_field`.
    pub fn register_text(
        &mut self,
        field: &str,
        index_field: &str,
        exact_field: &str,
        resolver: Arc<dyn IndexInfoResolver>,
    ) -> &mut Self {
        self.register(field, Arc::new(LikeQueryFactory::new(index_field)))
            .register(field, Arc::new(EqualityQueryFactory::new(exact_field, resolver)))
    }

    // ---- lookup ----

    /// First factory registered for `field` that handles `operator`.
    #[must_use]
    pub fn factory_for(&self, field: &str, operator: Operator) -> Option<&dyn OperatorQueryFactory> {
        self.factories
            .get(&normalize(field))?
            .iter()
            .find(|factory| factory.handles_operator(operator))
            .map(|factory| &**factory)
    }

    #[must_use]
    pub fn history_field(&self, field: &str) -> Option<&HistoryField> {
        self.history.get(&normalize(field))
    }

    #[must_use]
    pub fn is_registered(&self, field: &str) -> bool {
        let key = normalize(field);
        self.factories.contains_key(&key) || self.history.contains_key(&key)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self
            .factories
            .keys()
            .chain(self.history.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter()
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("fields", &self.fields().collect::<Vec<_>>())
            .finish()
    }
}

fn normalize(field: &str) -> String {
    field.trim().to_lowercase()
}

///
/// TESTS
///
