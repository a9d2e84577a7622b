use crate::{
    builder::{BuilderError, FieldRef, PrecedenceBuilder},
    clause::{Clause, FunctionCall, HistoryPredicate, Operand, Operator, TerminalClause, Value},
};
use std::fmt;

///
/// ConditionBuilder
///
/// Fluent surface over `PrecedenceBuilder`.
///
/// Every call either succeeds and returns the builder for chaining, or
/// fails without touching builder state:
///
/// ```ignore
/// let mut builder = ConditionBuilder::new();
/// builder.eq("project", "CK")?.and()?.in_list("status", ["open", "review"])?;
/// let clause = builder.build()?;
/// ```
///
/// Argument validation happens at the primitive that introduced the bad
/// value; protocol validation is delegated to the precedence builder.
///

#[derive(Clone, Debug, Default)]
pub struct ConditionBuilder {
    inner: PrecedenceBuilder,
}

impl ConditionBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: PrecedenceBuilder::new(),
        }
    }

    /// Read-only view of the underlying state machine.
    #[must_use]
    pub const fn precedence(&self) -> &PrecedenceBuilder {
        &self.inner
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn clause(&mut self, clause: impl Into<Clause>) -> Result<&mut Self, BuilderError> {
        self.inner.clause(clause)?;
        Ok(self)
    }

    pub fn and(&mut self) -> Result<&mut Self, BuilderError> {
        self.inner.and()?;
        Ok(self)
    }

    pub fn or(&mut self) -> Result<&mut Self, BuilderError> {
        self.inner.or()?;
        Ok(self)
    }

    pub fn not(&mut self) -> Result<&mut Self, BuilderError> {
        self.inner.not()?;
        Ok(self)
    }

    pub fn sub(&mut self) -> Result<&mut Self, BuilderError> {
        self.inner.sub()?;
        Ok(self)
    }

    pub fn endsub(&mut self) -> Result<&mut Self, BuilderError> {
        self.inner.endsub()?;
        Ok(self)
    }

    /// Join adjacent clauses with AND when no connective is given.
    pub const fn default_and(&mut self) -> &mut Self {
        self.inner.default_and();
        self
    }

    /// Join adjacent clauses with OR when no connective is given.
    pub const fn default_or(&mut self) -> &mut Self {
        self.inner.default_or();
        self
    }

    /// Require explicit connectives between clauses.
    pub const fn default_none(&mut self) -> &mut Self {
        self.inner.default_none();
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.inner.clear();
        self
    }

    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            inner: self.inner.copy(),
        }
    }

    /// Non-destructive build; `Ok(None)` when nothing has been added.
    pub fn build(&self) -> Result<Option<Clause>, BuilderError> {
        self.inner.build()
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    pub fn eq(&mut self, field: &str, value: impl Into<Operand>) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.eq(value);
        self.clause(terminal)
    }

    pub fn ne(&mut self, field: &str, value: impl Into<Operand>) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.ne(value);
        self.clause(terminal)
    }

    pub fn lt(&mut self, field: &str, value: impl Into<Operand>) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.lt(value);
        self.clause(terminal)
    }

    pub fn lte(&mut self, field: &str, value: impl Into<Operand>) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.lte(value);
        self.clause(terminal)
    }

    pub fn gt(&mut self, field: &str, value: impl Into<Operand>) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.gt(value);
        self.clause(terminal)
    }

    pub fn gte(&mut self, field: &str, value: impl Into<Operand>) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.gte(value);
        self.clause(terminal)
    }

    pub fn like(&mut self, field: &str, text: impl Into<String>) -> Result<&mut Self, BuilderError> {
        let text = checked_text(field, text.into())?;
        let terminal = checked_field(field)?.like(text);
        self.clause(terminal)
    }

    pub fn not_like(
        &mut self,
        field: &str,
        text: impl Into<String>,
    ) -> Result<&mut Self, BuilderError> {
        let text = checked_text(field, text.into())?;
        let terminal = checked_field(field)?.not_like(text);
        self.clause(terminal)
    }

    pub fn in_list<I, V>(&mut self, field: &str, values: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = checked_values(field, values)?;
        let terminal = checked_field(field)?.in_list(values);
        self.clause(terminal)
    }

    pub fn not_in<I, V>(&mut self, field: &str, values: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = checked_values(field, values)?;
        let terminal = checked_field(field)?.not_in(values);
        self.clause(terminal)
    }

    pub fn is_empty(&mut self, field: &str) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.is_empty();
        self.clause(terminal)
    }

    pub fn is_not_empty(&mut self, field: &str) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.is_not_empty();
        self.clause(terminal)
    }

    /// Inclusive range. One bound yields a single `>=` / `<=` clause; two
    /// bounds yield `(field >= lower AND field <= upper)`.
    pub fn range<V: Into<Value>>(
        &mut self,
        field: &str,
        lower: Option<V>,
        upper: Option<V>,
    ) -> Result<&mut Self, BuilderError> {
        let field_ref = checked_field(field)?;
        let lower: Option<Value> = lower.map(Into::into);
        let upper: Option<Value> = upper.map(Into::into);
        match (lower, upper) {
            (None, None) => Err(BuilderError::Argument(format!(
                "range on '{field}' requires at least one bound"
            ))),
            (Some(lower), None) => self.clause(field_ref.gte(lower)),
            (None, Some(upper)) => self.clause(field_ref.lte(upper)),
            (Some(lower), Some(upper)) => {
                self.sub()?;
                self.inner.clause(field_ref.gte(lower))?;
                self.inner.and()?;
                self.inner.clause(field_ref.lte(upper))?;
                self.endsub()
            }
        }
    }

    pub fn was(
        &mut self,
        field: &str,
        value: impl Into<Operand>,
        predicate: Option<HistoryPredicate>,
    ) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.was(value);
        self.clause(with_predicate(terminal, predicate))
    }

    pub fn was_not(
        &mut self,
        field: &str,
        value: impl Into<Operand>,
        predicate: Option<HistoryPredicate>,
    ) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.was_not(value);
        self.clause(with_predicate(terminal, predicate))
    }

    pub fn was_in<I, V>(
        &mut self,
        field: &str,
        values: I,
        predicate: Option<HistoryPredicate>,
    ) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = checked_values(field, values)?;
        let terminal = checked_field(field)?.was_in(values);
        self.clause(with_predicate(terminal, predicate))
    }

    pub fn was_not_in<I, V>(
        &mut self,
        field: &str,
        values: I,
        predicate: Option<HistoryPredicate>,
    ) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = checked_values(field, values)?;
        let terminal = checked_field(field)?.was_not_in(values);
        self.clause(with_predicate(terminal, predicate))
    }

    pub fn changed(
        &mut self,
        field: &str,
        predicate: Option<HistoryPredicate>,
    ) -> Result<&mut Self, BuilderError> {
        let terminal = checked_field(field)?.changed(predicate);
        self.clause(terminal)
    }

    pub fn function(
        &mut self,
        field: &str,
        operator: Operator,
        name: &str,
        args: Vec<String>,
    ) -> Result<&mut Self, BuilderError> {
        if name.trim().is_empty() {
            return Err(BuilderError::Argument(format!(
                "function name for '{field}' must not be blank"
            )));
        }
        let terminal = checked_field(field)?.function(operator, FunctionCall::new(name, args));
        self.clause(terminal)
    }
}

impl fmt::Display for ConditionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.partial())
    }
}

// ----------------------------------------------------------------------
// Internal helpers (not public API)
// ----------------------------------------------------------------------

fn checked_field(field: &str) -> Result<FieldRef<'_>, BuilderError> {
    if field.trim().is_empty() {
        return Err(BuilderError::Argument(
            "field name must not be blank".to_string(),
        ));
    }

    Ok(FieldRef::new(field))
}

fn checked_text(field: &str, text: String) -> Result<String, BuilderError> {
    if text.trim().is_empty() {
        return Err(BuilderError::Argument(format!(
            "text for '{field}' must not be blank"
        )));
    }

    Ok(text)
}

fn checked_values<I, V>(field: &str, values: I) -> Result<Vec<Value>, BuilderError>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(BuilderError::Argument(format!(
            "'{field}' requires at least one value"
        )));
    }

    Ok(values)
}

fn with_predicate(terminal: TerminalClause, predicate: Option<HistoryPredicate>) -> TerminalClause {
    match predicate {
        Some(predicate) => terminal.with_predicate(predicate),
        None => terminal,
    }
}
