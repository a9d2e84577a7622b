use crate::clause::Operand;
use serde::Serialize;
use std::fmt;

///
/// PredicateOperator
///
/// Narrowing operators attached to WAS / CHANGED clauses.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[repr(u8)]
pub enum PredicateOperator {
    By = 0x01,
    To = 0x02,
    From = 0x03,
    Before = 0x04,
    After = 0x05,
    On = 0x06,
    During = 0x07,
}

impl PredicateOperator {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::By => "by",
            Self::To => "to",
            Self::From => "from",
            Self::Before => "before",
            Self::After => "after",
            Self::On => "on",
            Self::During => "during",
        }
    }

    /// Operators whose operand is a point or range in time.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Before | Self::After | Self::On | Self::During)
    }
}

impl fmt::Display for PredicateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// HistoryPredicate
///
/// Actor / transition / time constraints narrowing a history clause.
/// Conjunction is the only combinator.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum HistoryPredicate {
    Terminal {
        op: PredicateOperator,
        operand: Operand,
    },
    And(Vec<Self>),
}

impl HistoryPredicate {
    #[must_use]
    pub fn new(op: PredicateOperator, operand: impl Into<Operand>) -> Self {
        Self::Terminal {
            op,
            operand: operand.into(),
        }
    }

    #[must_use]
    pub fn by(actor: impl Into<Operand>) -> Self {
        Self::new(PredicateOperator::By, actor)
    }

    #[must_use]
    pub fn to(value: impl Into<Operand>) -> Self {
        Self::new(PredicateOperator::To, value)
    }

    #[must_use]
    pub fn from_value(value: impl Into<Operand>) -> Self {
        Self::new(PredicateOperator::From, value)
    }

    #[must_use]
    pub fn before(date: impl Into<Operand>) -> Self {
        Self::new(PredicateOperator::Before, date)
    }

    #[must_use]
    pub fn after(date: impl Into<Operand>) -> Self {
        Self::new(PredicateOperator::After, date)
    }

    #[must_use]
    pub fn on(date: impl Into<Operand>) -> Self {
        Self::new(PredicateOperator::On, date)
    }

    #[must_use]
    pub fn during(start: impl Into<Operand>, end: impl Into<Operand>) -> Self {
        Self::Terminal {
            op: PredicateOperator::During,
            operand: Operand::List(vec![start.into(), end.into()]),
        }
    }

    /// Conjoin another predicate, flattening nested conjunctions.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut parts = match self {
            Self::And(parts) => parts,
            terminal @ Self::Terminal { .. } => vec![terminal],
        };
        match other {
            Self::And(more) => parts.extend(more),
            terminal @ Self::Terminal { .. } => parts.push(terminal),
        }

        Self::And(parts)
    }

    /// Terminal predicates in declaration order.
    #[must_use]
    pub fn terminals(&self) -> Vec<(PredicateOperator, &Operand)> {
        let mut out = Vec::new();
        collect_terminals(self, &mut out);
        out
    }
}

fn collect_terminals<'a>(
    predicate: &'a HistoryPredicate,
    out: &mut Vec<(PredicateOperator, &'a Operand)>,
) {
    match predicate {
        HistoryPredicate::Terminal { op, operand } => out.push((*op, operand)),
        HistoryPredicate::And(parts) => {
            for part in parts {
                collect_terminals(part, out);
            }
        }
    }
}

impl fmt::Display for HistoryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal { op, operand } => write!(f, "{op} {operand}"),
            Self::And(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}
