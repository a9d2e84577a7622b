use crate::{
    builder::{BuilderError, BuilderOperator},
    clause::Clause,
};
use std::{fmt, sync::Arc};

///
/// MutableClause
///
/// Transient algebra node used while a condition is being assembled.
/// `Single` leaves are shared between copies; `Multi` and `Not` nodes are
/// owned and deep-copied. Equality is structural.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MutableClause {
    Single(Arc<Clause>),
    Multi(MultiClause),
    Not(Box<Self>),
}

///
/// MultiClause
///
/// AND / OR node with at least one child. Only [`MutableClause::multi`]
/// and [`MutableClause::combine`] construct one.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MultiClause {
    op: BuilderOperator,
    children: Vec<MutableClause>,
}

impl MultiClause {
    #[must_use]
    pub const fn op(&self) -> BuilderOperator {
        self.op
    }

    #[must_use]
    pub fn children(&self) -> &[MutableClause] {
        &self.children
    }
}

impl MutableClause {
    #[must_use]
    pub fn single(clause: impl Into<Clause>) -> Self {
        Self::Single(Arc::new(clause.into()))
    }

    /// Construct a connective node; `op` must be AND/OR and `children`
    /// must be non-empty.
    pub fn multi(op: BuilderOperator, children: Vec<Self>) -> Result<Self, BuilderError> {
        if !op.is_connective() {
            return Err(BuilderError::Argument(format!(
                "'{op}' cannot head a multi clause; expected AND or OR"
            )));
        }
        if children.is_empty() {
            return Err(BuilderError::Argument(
                "multi clause requires at least one child".to_string(),
            ));
        }

        Ok(Self::Multi(MultiClause { op, children }))
    }

    /// Combine `self` with `other` under `op`.
    ///
    /// `NOT` ignores `other` and negates `self`. A `Multi` node combined
    /// under its own operator appends `other`; any other combination wraps
    /// both sides in a new node.
    pub fn combine(self, op: BuilderOperator, other: Option<Self>) -> Result<Self, BuilderError> {
        match op {
            BuilderOperator::Not => Ok(Self::Not(Box::new(self))),
            BuilderOperator::And | BuilderOperator::Or => {
                let Some(other) = other else {
                    return Err(BuilderError::Argument(format!(
                        "'{op}' requires a right-hand clause"
                    )));
                };

                match self {
                    Self::Multi(mut multi) if multi.op == op => {
                        multi.children.push(other);
                        Ok(Self::Multi(multi))
                    }
                    left => Self::multi(op, vec![left, other]),
                }
            }
            BuilderOperator::None | BuilderOperator::LParen | BuilderOperator::RParen => Err(
                BuilderError::Argument(format!("'{op}' cannot combine clauses")),
            ),
        }
    }

    /// Convert into an immutable clause, dropping children that convert to
    /// nothing and unwrapping single-survivor connectives.
    #[must_use]
    pub fn as_clause(&self) -> Option<Clause> {
        match self {
            Self::Single(clause) => Some(clause.as_ref().clone()),
            Self::Multi(multi) => {
                let mut survivors: Vec<Clause> =
                    multi.children.iter().filter_map(Self::as_clause).collect();
                match survivors.len() {
                    0 => None,
                    1 => survivors.pop(),
                    _ if multi.op == BuilderOperator::And => Some(Clause::And(survivors)),
                    _ => Some(Clause::Or(survivors)),
                }
            }
            Self::Not(inner) => inner.as_clause().map(Clause::not),
        }
    }

    /// Independent copy; `Single` leaves stay shared.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl fmt::Display for MutableClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_clause() {
            Some(clause) => write!(f, "{clause}"),
            None => Ok(()),
        }
    }
}
