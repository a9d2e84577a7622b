//! ## Crate layout
//! - `core`: clause algebra, precedence builder, operator factories, history
//!   resolver, and the compiler onto the inverted-index query contract.
//! - `config`: TOML configuration mapped onto core option types.
//! - `error`: public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module mirrors the surface used by callers that build and
//! compile conditions.

pub use clausekit_config as config;
pub use clausekit_core as core;

pub mod error;


use crate::core::{
    builder::ConditionBuilder, compile::QueryCompiler, query::SearchQuery, resolve::SearchContext,
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;

/// Build `builder`'s condition and compile it for one search.
///
/// Returns `Ok(None)` when nothing has been added to the builder.
pub fn compile_condition(
    compiler: &QueryCompiler<'_>,
    ctx: &SearchContext,
    builder: &ConditionBuilder,
) -> Result<Option<SearchQuery>, Error> {
    let Some(clause) = builder.build()? else {
        return Ok(None);
    };

    Ok(Some(compiler.compile(ctx, &clause)?))
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        compile_condition,
        config::ClausekitConfig,
        core::{
            compile::{CompileOptions, QueryCompiler},
            prelude::*,
            registry::FieldRegistry,
            resolve::SearchContext,
        },
        error::Error,
    };
}
