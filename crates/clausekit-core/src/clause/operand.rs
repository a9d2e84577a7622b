use chrono::NaiveDateTime;
use derive_more::From;
use serde::Serialize;
use std::fmt;

/// Display form used for date literals.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

///
/// Value
///
/// A single literal as written by the caller. Strings stay raw here;
/// interpretation (dates, ids, numbers) happens during resolution.
///

#[derive(Clone, Debug, Eq, From, Hash, PartialEq, Serialize)]
pub enum Value {
    Text(String),
    Number(i64),
    Date(NaiveDateTime),
}

impl Value {
    /// Raw textual form, without display quoting.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(n) => n.to_string(),
            Self::Date(date) => date.format(DATE_DISPLAY_FORMAT).to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "\"{}\"", text.replace('"', "\\\"")),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(date) => write!(f, "\"{}\"", date.format(DATE_DISPLAY_FORMAT)),
        }
    }
}

///
/// FunctionCall
///
/// A function operand awaiting late resolution, e.g. `currentUser()`.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<String>,
}

impl FunctionCall {
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

///
/// Operand
///
/// Right-hand side of a terminal clause. May resolve to zero, one or many
/// literals once evaluated against a search context.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Operand {
    Value(Value),
    List(Vec<Self>),
    Empty,
    Function(FunctionCall),
}

impl Operand {
    #[must_use]
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::List(values.into_iter().map(|v| Self::Value(v.into())).collect())
    }

    #[must_use]
    pub const fn is_empty_operand(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

macro_rules! operand_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

operand_from_value!(Value, &str, String, i32, i64, NaiveDateTime);

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Self::Empty => f.write_str("EMPTY"),
            Self::Function(call) => write!(f, "{call}"),
        }
    }
}

///
/// QueryLiteral
///
/// Concrete literal produced by operand resolution. `Empty` is the explicit
/// "no value" marker and is distinct from resolving to zero literals.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum QueryLiteral {
    Value(Value),
    Empty,
}

impl QueryLiteral {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Empty => None,
        }
    }
}

impl From<Value> for QueryLiteral {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}
