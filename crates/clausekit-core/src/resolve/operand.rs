use crate::{
    clause::{Operand, QueryLiteral},
    resolve::{FunctionRegistry, SearchContext},
};
use tracing::debug;

///
/// OperandResolver
///
/// Evaluates any operand into concrete literals for one search.
///

pub trait OperandResolver: Send + Sync {
    /// Literals behind `operand`. `Empty` yields one `QueryLiteral::Empty`;
    /// an unresolvable function yields nothing.
    fn values(&self, ctx: &SearchContext, operand: &Operand) -> Vec<QueryLiteral>;

    fn is_empty_operand(&self, operand: &Operand) -> bool {
        operand.is_empty_operand()
    }
}

///
/// DefaultOperandResolver
///

#[derive(Clone, Debug, Default)]
pub struct DefaultOperandResolver {
    functions: FunctionRegistry,
}

impl DefaultOperandResolver {
    #[must_use]
    pub const fn new(functions: FunctionRegistry) -> Self {
        Self { functions }
    }

    /// Resolver with the built-in functions registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new(FunctionRegistry::with_builtins())
    }

    fn collect(&self, ctx: &SearchContext, operand: &Operand, out: &mut Vec<QueryLiteral>) {
        match operand {
            Operand::Value(value) => out.push(QueryLiteral::Value(value.clone())),
            Operand::Empty => out.push(QueryLiteral::Empty),
            Operand::List(items) => {
                for item in items {
                    self.collect(ctx, item, out);
                }
            }
            Operand::Function(call) => match self.functions.get(&call.name) {
                Some(function) => out.extend(function.values(ctx, call)),
                None => debug!(function = %call.name, "unknown function resolves to no values"),
            },
        }
    }
}

impl OperandResolver for DefaultOperandResolver {
    fn values(&self, ctx: &SearchContext, operand: &Operand) -> Vec<QueryLiteral> {
        let mut out = Vec::new();
        self.collect(ctx, operand, &mut out);
        out
    }
}
