use clausekit_config::ConfigError;
use clausekit_core::{
    builder::BuilderError,
    compile::CompileError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<BuilderError> for Error {
    fn from(err: BuilderError) -> Self {
        let kind = match err {
            BuilderError::IllegalState { .. } => ConditionErrorKind::IllegalState,
            BuilderError::Argument(_) => ConditionErrorKind::Argument,
        };

        Self::new(ErrorKind::Condition(kind), ErrorOrigin::Builder, err.to_string())
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::TooComplex { .. } => Self::new(
                ErrorKind::Compile(CompileErrorKind::TooComplex),
                ErrorOrigin::Compile,
                err.to_string(),
            ),
            CompileError::Internal(err) => err.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::Internal => ErrorKind::Internal,
            ErrorClass::Unsupported => ErrorKind::Unsupported,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Condition(ConditionErrorKind),
    Compile(CompileErrorKind),
    Config,

    /// A collaborator cannot serve this request.
    Unsupported,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ConditionErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ConditionErrorKind {
    /// Builder calls arrived in an order the grammar does not allow.
    IllegalState,

    /// A builder call carried an unusable value.
    Argument,
}

///
/// CompileErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompileErrorKind {
    /// Not retryable; the condition must be narrowed.
    TooComplex,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Builder,
    Compile,
    Config,
    History,
    Index,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::History => Self::History,
            CoreErrorOrigin::Index => Self::Index,
        }
    }
}
