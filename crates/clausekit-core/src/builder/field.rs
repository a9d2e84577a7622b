use crate::clause::{FunctionCall, HistoryPredicate, Operand, Operator, TerminalClause, Value};

///
/// FieldRef
///
/// Zero-cost wrapper around a field name used to build terminal clauses.
/// Enables method-based clause construction without going through the
/// precedence builder. Carries only a `&str` and derefs to `str`.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FieldRef<'a>(&'a str);

impl<'a> FieldRef<'a> {
    /// Create a new field reference.
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self(name)
    }

    /// Return the underlying field name.
    #[must_use]
    pub const fn as_str(self) -> &'a str {
        self.0
    }

    // ------------------------------------------------------------------
    // Equality
    // ------------------------------------------------------------------

    #[must_use]
    pub fn eq(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::Equals, value)
    }

    #[must_use]
    pub fn ne(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::NotEquals, value)
    }

    #[must_use]
    pub fn in_list<I, V>(self, values: I) -> TerminalClause
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.terminal(Operator::In, Operand::list(values))
    }

    #[must_use]
    pub fn not_in<I, V>(self, values: I) -> TerminalClause
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.terminal(Operator::NotIn, Operand::list(values))
    }

    /// Field carries no value.
    #[must_use]
    pub fn is_empty(self) -> TerminalClause {
        self.terminal(Operator::Is, Operand::Empty)
    }

    /// Field carries some value.
    #[must_use]
    pub fn is_not_empty(self) -> TerminalClause {
        self.terminal(Operator::IsNot, Operand::Empty)
    }

    // ------------------------------------------------------------------
    // Relational
    // ------------------------------------------------------------------

    #[must_use]
    pub fn lt(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::LessThan, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::LessThanEquals, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::GreaterThan, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::GreaterThanEquals, value)
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    #[must_use]
    pub fn like(self, text: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::Like, text)
    }

    #[must_use]
    pub fn not_like(self, text: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::NotLike, text)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    #[must_use]
    pub fn was(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::Was, value)
    }

    #[must_use]
    pub fn was_not(self, value: impl Into<Operand>) -> TerminalClause {
        self.terminal(Operator::WasNot, value)
    }

    #[must_use]
    pub fn was_in<I, V>(self, values: I) -> TerminalClause
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.terminal(Operator::WasIn, Operand::list(values))
    }

    #[must_use]
    pub fn was_not_in<I, V>(self, values: I) -> TerminalClause
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.terminal(Operator::WasNotIn, Operand::list(values))
    }

    /// Field changed at some point, optionally narrowed by `predicate`.
    #[must_use]
    pub fn changed(self, predicate: Option<HistoryPredicate>) -> TerminalClause {
        let terminal = self.terminal(Operator::Changed, Operand::Empty);
        match predicate {
            Some(predicate) => terminal.with_predicate(predicate),
            None => terminal,
        }
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    /// Compare against a late-resolved function, e.g. `currentUser()`.
    #[must_use]
    pub fn function(self, operator: Operator, call: FunctionCall) -> TerminalClause {
        self.terminal(operator, Operand::Function(call))
    }

    fn terminal(self, operator: Operator, operand: impl Into<Operand>) -> TerminalClause {
        TerminalClause::new(self.0, operator, operand)
    }
}

// ----------------------------------------------------------------------
// Boundary traits
// ----------------------------------------------------------------------

impl AsRef<str> for FieldRef<'_> {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl std::ops::Deref for FieldRef<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}
