//! TOML configuration for clausekit.
//!
//! Every key is optional; a missing file section falls back to the same
//! defaults the core types use. Unknown keys are rejected so a typo never
//! silently reverts a limit to its default.
//!
//! ```toml
//! [builder]
//! default_operator = "and"
//!
//! [compiler]
//! max_clause_fan_out = 512
//! ```


use clausekit_core::{
    DEFAULT_MAX_CLAUSE_FAN_OUT, builder::ConditionBuilder, compile::CompileOptions,
};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// ClausekitConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClausekitConfig {
    pub builder: BuilderConfig,
    pub compiler: CompilerConfig,
}

impl ClausekitConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse, and validate the TOML file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading clausekit config");

        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compiler.validate()
    }

    #[must_use]
    pub const fn compile_options(&self) -> CompileOptions {
        self.compiler.options()
    }

    /// Install the configured default operator on `builder`.
    pub fn apply_to(&self, builder: &mut ConditionBuilder) {
        self.builder.apply_to(builder);
    }

    /// Fresh builder with this configuration applied.
    #[must_use]
    pub fn condition_builder(&self) -> ConditionBuilder {
        let mut builder = ConditionBuilder::new();
        self.apply_to(&mut builder);

        builder
    }
}

///
/// BuilderConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Connective inserted between two adjacent clauses.
    pub default_operator: DefaultOperator,
}

impl BuilderConfig {
    pub fn apply_to(&self, builder: &mut ConditionBuilder) {
        match self.default_operator {
            DefaultOperator::None => builder.default_none(),
            DefaultOperator::And => builder.default_and(),
            DefaultOperator::Or => builder.default_or(),
        };
    }
}

///
/// DefaultOperator
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DefaultOperator {
    /// Adjacent clauses are a protocol error.
    #[default]
    None,
    And,
    Or,
}

///
/// CompilerConfig
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Largest boolean group handed to the backend.
    pub max_clause_fan_out: usize,
}

impl CompilerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_clause_fan_out == 0 {
            return Err(ConfigError::Invalid(
                "compiler.max_clause_fan_out must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub const fn options(&self) -> CompileOptions {
        CompileOptions::new(self.max_clause_fan_out)
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_clause_fan_out: DEFAULT_MAX_CLAUSE_FAN_OUT,
        }
    }
}
