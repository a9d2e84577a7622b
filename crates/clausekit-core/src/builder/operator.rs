use std::{cmp::Ordering, fmt};

///
/// BuilderOperator
///
/// Operators seen by the precedence builder. Declaration order is the
/// precedence table: a lower rank binds more loosely and `Not` binds
/// tightest. Ordering goes through `rank` only.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BuilderOperator {
    None,
    LParen,
    RParen,
    Or,
    And,
    Not,
}

impl BuilderOperator {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::LParen => 1,
            Self::RParen => 2,
            Self::Or => 3,
            Self::And => 4,
            Self::Not => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Not => "NOT",
        }
    }

    /// Binary connectives that can head a `Multi` node.
    #[must_use]
    pub const fn is_connective(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl Ord for BuilderOperator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for BuilderOperator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BuilderOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
