use serde::Serialize;
use std::fmt;

///
/// Operator
///
/// Terminal clause operators. The set is closed; each operator belongs to
/// exactly one family (equality, relational, like, history) that decides
/// which factory or resolver compiles it.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[repr(u8)]
pub enum Operator {
    Equals = 0x01,
    NotEquals = 0x02,
    Like = 0x03,
    NotLike = 0x04,
    GreaterThan = 0x05,
    GreaterThanEquals = 0x06,
    LessThan = 0x07,
    LessThanEquals = 0x08,
    In = 0x09,
    NotIn = 0x0a,
    Is = 0x0b,
    IsNot = 0x0c,
    Was = 0x0d,
    WasNot = 0x0e,
    WasIn = 0x0f,
    WasNotIn = 0x10,
    Changed = 0x11,
}

impl Operator {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Like => "~",
            Self::NotLike => "!~",
            Self::GreaterThan => ">",
            Self::GreaterThanEquals => ">=",
            Self::LessThan => "<",
            Self::LessThanEquals => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Was => "was",
            Self::WasNot => "was not",
            Self::WasIn => "was in",
            Self::WasNotIn => "was not in",
            Self::Changed => "changed",
        }
    }

    /// Operators answered from the change-history index.
    #[must_use]
    pub const fn is_history(self) -> bool {
        matches!(
            self,
            Self::Was | Self::WasNot | Self::WasIn | Self::WasNotIn | Self::Changed
        )
    }

    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(
            self,
            Self::Equals | Self::NotEquals | Self::In | Self::NotIn | Self::Is | Self::IsNot
        )
    }

    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterThanEquals | Self::LessThan | Self::LessThanEquals
        )
    }

    #[must_use]
    pub const fn is_like(self) -> bool {
        matches!(self, Self::Like | Self::NotLike)
    }

    /// Operators that exclude the values they name.
    #[must_use]
    pub const fn is_negating(self) -> bool {
        matches!(
            self,
            Self::NotEquals | Self::NotLike | Self::NotIn | Self::IsNot | Self::WasNot | Self::WasNotIn
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
