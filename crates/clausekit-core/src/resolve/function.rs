use crate::{
    clause::{FunctionCall, QueryLiteral, Value},
    resolve::SearchContext,
};
use std::{collections::BTreeMap, sync::Arc};

///
/// ClauseFunction
///
/// Late-bound operand such as `currentUser()`; evaluated per search.
///

pub trait ClauseFunction: Send + Sync {
    /// Lower-case name the function is registered under.
    fn name(&self) -> &'static str;

    /// Literals the call resolves to; may be empty.
    fn values(&self, ctx: &SearchContext, call: &FunctionCall) -> Vec<QueryLiteral>;
}

///
/// CurrentUserFunction
///
/// Resolves to the searching user; nothing for anonymous searches.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentUserFunction;

impl ClauseFunction for CurrentUserFunction {
    fn name(&self) -> &'static str {
        "currentuser"
    }

    fn values(&self, ctx: &SearchContext, _call: &FunctionCall) -> Vec<QueryLiteral> {
        ctx.user
            .iter()
            .map(|user| QueryLiteral::Value(Value::Text(user.clone())))
            .collect()
    }
}

///
/// NowFunction
///
/// Resolves to the search instant.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NowFunction;

impl ClauseFunction for NowFunction {
    fn name(&self) -> &'static str {
        "now"
    }

    fn values(&self, ctx: &SearchContext, _call: &FunctionCall) -> Vec<QueryLiteral> {
        vec![QueryLiteral::Value(Value::Date(ctx.now))]
    }
}

///
/// FunctionRegistry
///
/// Case-insensitive name → function lookup.
///

#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Arc<dyn ClauseFunction>>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `currentUser()` and `now()`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CurrentUserFunction));
        registry.register(Arc::new(NowFunction));
        registry
    }

    pub fn register(&mut self, function: Arc<dyn ClauseFunction>) {
        self.functions
            .insert(function.name().to_ascii_lowercase(), function);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ClauseFunction>> {
        self.functions.get(&name.to_ascii_lowercase())
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}
