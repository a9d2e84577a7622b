//! Module: clause
//! Responsibility: the immutable condition tree and its rendering.
//! Does not own: construction order or precedence (see `builder`).
//! Boundary: every compiled query starts from a `Clause`.

mod fingerprint;
mod history;
mod operand;
mod operator;


use serde::Serialize;
use std::fmt;

// re-exports
pub use fingerprint::ClauseFingerprint;
pub use history::{HistoryPredicate, PredicateOperator};
pub use operand::{DATE_DISPLAY_FORMAT, FunctionCall, Operand, QueryLiteral, Value};
pub use operator::Operator;

///
/// TerminalClause
///
/// Leaf condition `field operator operand`, optionally narrowed by a
/// history predicate when the operator is a history operator.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct TerminalClause {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
    pub predicate: Option<HistoryPredicate>,
}

impl TerminalClause {
    #[must_use]
    pub fn new(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            field: field.into(),
            operator,
            operand: operand.into(),
            predicate: None,
        }
    }

    /// Attach (or replace) a history predicate.
    #[must_use]
    pub fn with_predicate(mut self, predicate: HistoryPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }
}

impl fmt::Display for TerminalClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}", self.field, self.operator)?;
        if self.operator != Operator::Changed {
            write!(f, " {}", self.operand)?;
        }
        if let Some(predicate) = &self.predicate {
            write!(f, " {predicate}")?;
        }
        f.write_str("}")
    }
}

///
/// Clause
///
/// Immutable boolean condition tree. `And` / `Or` always carry at least two
/// children when produced by the builder; a single survivor is returned
/// directly instead of being wrapped.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Clause {
    Terminal(TerminalClause),
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
}

impl Clause {
    #[must_use]
    pub fn terminal(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self::Terminal(TerminalClause::new(field, operator, operand))
    }

    #[must_use]
    pub fn not(clause: Self) -> Self {
        Self::Not(Box::new(clause))
    }

    /// Binding strength used when rendering; higher binds tighter.
    const fn precedence(&self) -> u8 {
        match self {
            Self::Or(_) => 1,
            Self::And(_) => 2,
            Self::Not(_) => 3,
            Self::Terminal(_) => 4,
        }
    }

    /// Number of nodes in the tree, terminals and connectives alike.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Terminal(_) => 1,
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(Self::node_count).sum::<usize>()
            }
            Self::Not(inner) => 1 + inner.node_count(),
        }
    }

    /// Terminal clauses in left-to-right order.
    #[must_use]
    pub fn terminals(&self) -> Vec<&TerminalClause> {
        let mut out = Vec::new();
        collect_terminals(self, &mut out);
        out
    }

    // Render `child` inside a context of `outer` precedence, adding parens
    // only when the child binds strictly looser.
    fn fmt_child(f: &mut fmt::Formatter<'_>, outer: u8, child: &Self) -> fmt::Result {
        if child.precedence() < outer {
            write!(f, "({child})")
        } else {
            write!(f, "{child}")
        }
    }
}

fn collect_terminals<'a>(clause: &'a Clause, out: &mut Vec<&'a TerminalClause>) {
    match clause {
        Clause::Terminal(terminal) => out.push(terminal),
        Clause::And(children) | Clause::Or(children) => {
            for child in children {
                collect_terminals(child, out);
            }
        }
        Clause::Not(inner) => collect_terminals(inner, out),
    }
}

impl From<TerminalClause> for Clause {
    fn from(terminal: TerminalClause) -> Self {
        Self::Terminal(terminal)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outer = self.precedence();
        match self {
            Self::Terminal(terminal) => write!(f, "{terminal}"),
            Self::And(children) | Self::Or(children) => {
                let joiner = if matches!(self, Self::And(_)) {
                    " AND "
                } else {
                    " OR "
                };
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    Self::fmt_child(f, outer, child)?;
                }
                Ok(())
            }
            Self::Not(inner) => {
                f.write_str("NOT ")?;
                Self::fmt_child(f, outer, inner)
            }
        }
    }
}
