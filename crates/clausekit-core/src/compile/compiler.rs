use crate::{
    clause::{Clause, TerminalClause},
    compile::{CompileError, CompileOptions},
    factory::create_query,
    history::HistoryResolver,
    obs::{CompileOutcome, CompileTraceSink, TerminalOutcome, TraceScope},
    query::{BoolQuery, Occur, QueryFactoryResult, SearchQuery},
    registry::FieldRegistry,
    resolve::{OperandResolver, SearchContext},
};
use std::ops::Bound;
use tracing::debug;

///
/// QueryCompiler
///
/// Walks a clause tree bottom-up. Terminals go to the field's factory or,
/// for WAS / CHANGED, to the history resolver; AND / OR become MUST /
/// SHOULD groups; NOT flips the child's occurrence.
///

#[derive(Clone, Copy)]
pub struct QueryCompiler<'a> {
    registry: &'a FieldRegistry,
    operands: &'a dyn OperandResolver,
    history: Option<HistoryResolver<'a>>,
    trace: Option<&'a dyn CompileTraceSink>,
    options: CompileOptions,
}

impl<'a> QueryCompiler<'a> {
    #[must_use]
    pub const fn new(
        registry: &'a FieldRegistry,
        operands: &'a dyn OperandResolver,
        options: CompileOptions,
    ) -> Self {
        Self {
            registry,
            operands,
            history: None,
            trace: None,
            options,
        }
    }

    #[must_use]
    pub const fn with_history(mut self, history: HistoryResolver<'a>) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub const fn with_trace_sink(mut self, sink: &'a dyn CompileTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compile `clause` into a standalone query.
    ///
    /// A clause that can match nothing compiles to `MatchNone`; a top-level
    /// negation is anchored on `MatchAll`.
    pub fn compile(&self, ctx: &SearchContext, clause: &Clause) -> Result<SearchQuery, CompileError> {
        let scope = TraceScope::start(self.trace, clause);
        let compiled = self.compile_clause(ctx, clause, scope.as_ref());

        match compiled {
            Ok(result) => {
                let outcome = if result.is_false() {
                    CompileOutcome::False
                } else {
                    CompileOutcome::Query
                };
                if let Some(scope) = scope {
                    scope.finish(outcome);
                }

                Ok(result.into_positive())
            }
            Err(err) => {
                if let Some(scope) = scope {
                    scope.finish(error_outcome(&err));
                }

                Err(err)
            }
        }
    }

    /// Compile without anchoring: negated results keep their flag.
    pub fn compile_fragment(
        &self,
        ctx: &SearchContext,
        clause: &Clause,
    ) -> Result<QueryFactoryResult, CompileError> {
        self.compile_clause(ctx, clause, None)
    }

    fn compile_clause(
        &self,
        ctx: &SearchContext,
        clause: &Clause,
        scope: Option<&TraceScope<'_>>,
    ) -> Result<QueryFactoryResult, CompileError> {
        match clause {
            Clause::Terminal(terminal) => self.compile_terminal(ctx, terminal, scope),
            Clause::And(children) => {
                let mut results = Vec::with_capacity(children.len());
                for child in children {
                    let result = self.compile_clause(ctx, child, scope)?;
                    if result.is_false() {
                        return Ok(QueryFactoryResult::create_false());
                    }
                    results.push(result);
                }
                self.conjunction(clause, results)
            }
            Clause::Or(children) => {
                let mut results = Vec::with_capacity(children.len());
                for child in children {
                    let result = self.compile_clause(ctx, child, scope)?;
                    if result.is_true() {
                        return Ok(QueryFactoryResult::new(SearchQuery::MatchAll));
                    }
                    results.push(result);
                }
                self.disjunction(clause, results)
            }
            Clause::Not(child) => Ok(self.compile_clause(ctx, child, scope)?.negate()),
        }
    }

    // ---- terminals ----

    fn compile_terminal(
        &self,
        ctx: &SearchContext,
        terminal: &TerminalClause,
        scope: Option<&TraceScope<'_>>,
    ) -> Result<QueryFactoryResult, CompileError> {
        let field = terminal.field.as_str();
        let operator = terminal.operator;

        let result = if operator.is_history() {
            let history = self.registry.history_field(field).zip(self.history);
            let Some((history_field, resolver)) = history else {
                return Ok(unregistered(terminal, scope));
            };
            // Checked before the change index is searched.
            let query = resolver.change_query(ctx, history_field, terminal);
            let count = query.as_ref().map_or(0, SearchQuery::widest_group);
            if count > self.options.max_clause_fan_out {
                return Err(self.too_complex(&Clause::Terminal(terminal.clone()), count));
            }
            let matched = resolver.search(terminal, query.as_ref())?;
            if let Some(scope) = scope {
                scope.history(field, operator, matched.entities.len());
            }
            matched.into_result()
        } else {
            let Some(factory) = self.registry.factory_for(field, operator) else {
                return Ok(unregistered(terminal, scope));
            };
            let literals = self.operands.values(ctx, &terminal.operand);
            create_query(factory, operator, &literals)
        };

        let count = result.query().widest_group();
        if count > self.options.max_clause_fan_out {
            return Err(self.too_complex(&Clause::Terminal(terminal.clone()), count));
        }
        if let Some(scope) = scope {
            let outcome = if result.is_false() {
                TerminalOutcome::False
            } else {
                TerminalOutcome::Query
            };
            scope.terminal(field, operator, outcome);
        }

        Ok(result)
    }

    // ---- composition ----

    fn conjunction(
        &self,
        clause: &Clause,
        results: Vec<QueryFactoryResult>,
    ) -> Result<QueryFactoryResult, CompileError> {
        let mut positives = Vec::new();
        let mut negatives = Vec::new();
        for result in results {
            if result.is_true() {
                continue;
            }
            if result.must_not_occur() {
                negatives.push(result);
            } else {
                positives.push(result.into_positive());
            }
        }

        match (positives.len(), negatives.len()) {
            (0, 0) => return Ok(QueryFactoryResult::new(SearchQuery::MatchAll)),
            // A lone negation stays negated for the parent to place.
            (0, 1) => return Ok(negatives.remove(0)),
            _ => {}
        }

        let mut positives = merge_one_sided_ranges(positives);
        if positives.len() == 1 && negatives.is_empty() {
            return Ok(QueryFactoryResult::new(positives.remove(0)));
        }
        if positives.is_empty() {
            positives.push(SearchQuery::MatchAll);
        }

        let mut group = BoolQuery::new();
        for query in positives {
            group.push(Occur::Must, query);
        }
        for result in negatives {
            group.push(Occur::MustNot, result.query().clone());
        }
        self.check_fan_out(clause, &group)?;

        Ok(QueryFactoryResult::new(SearchQuery::Bool(group)))
    }

    fn disjunction(
        &self,
        clause: &Clause,
        results: Vec<QueryFactoryResult>,
    ) -> Result<QueryFactoryResult, CompileError> {
        let mut alternatives: Vec<QueryFactoryResult> =
            results.into_iter().filter(|result| !result.is_false()).collect();

        match alternatives.len() {
            0 => Ok(QueryFactoryResult::create_false()),
            1 => Ok(alternatives.remove(0)),
            _ => {
                let mut group = BoolQuery::new();
                for result in alternatives {
                    group.push(Occur::Should, result.into_positive());
                }
                self.check_fan_out(clause, &group)?;

                Ok(QueryFactoryResult::new(SearchQuery::Bool(group)))
            }
        }
    }

    fn check_fan_out(&self, clause: &Clause, group: &BoolQuery) -> Result<(), CompileError> {
        if group.len() > self.options.max_clause_fan_out {
            return Err(self.too_complex(clause, group.len()));
        }

        Ok(())
    }

    fn too_complex(&self, clause: &Clause, count: usize) -> CompileError {
        debug!(
            %clause,
            count,
            limit = self.options.max_clause_fan_out,
            "clause exceeds backend fan-out"
        );

        CompileError::TooComplex {
            clause: Box::new(clause.clone()),
            limit: self.options.max_clause_fan_out,
            count,
        }
    }
}

fn unregistered(terminal: &TerminalClause, scope: Option<&TraceScope<'_>>) -> QueryFactoryResult {
    debug!(
        field = %terminal.field,
        operator = %terminal.operator,
        "no factory for field and operator; clause matches nothing"
    );
    if let Some(scope) = scope {
        scope.terminal(&terminal.field, terminal.operator, TerminalOutcome::Unregistered);
    }

    QueryFactoryResult::create_false()
}

const fn error_outcome(err: &CompileError) -> CompileOutcome {
    match err {
        CompileError::TooComplex { limit, count, .. } => CompileOutcome::TooComplex {
            limit: *limit,
            count: *count,
        },
        CompileError::Internal(internal) => CompileOutcome::Error {
            class: internal.class,
            origin: internal.origin,
        },
    }
}

// Pair `f >= a` with `f <= b` (either order) into one two-sided range.
fn merge_one_sided_ranges(queries: Vec<SearchQuery>) -> Vec<SearchQuery> {
    let mut out: Vec<SearchQuery> = Vec::with_capacity(queries.len());
    for query in queries {
        let merged = out.iter_mut().any(|existing| merge_range(existing, &query));
        if !merged {
            out.push(query);
        }
    }

    out
}

fn merge_range(existing: &mut SearchQuery, incoming: &SearchQuery) -> bool {
    let (
        SearchQuery::Range {
            field,
            lower,
            upper,
        },
        SearchQuery::Range {
            field: other_field,
            lower: other_lower,
            upper: other_upper,
        },
    ) = (existing, incoming)
    else {
        return false;
    };
    if field != other_field {
        return false;
    }

    let existing_lower_only = is_lower_only(lower, upper);
    let existing_upper_only = is_lower_only(upper, lower);
    if existing_upper_only && is_lower_only(other_lower, other_upper) {
        *lower = other_lower.clone();
        return true;
    }
    if existing_lower_only && is_lower_only(other_upper, other_lower) {
        *upper = other_upper.clone();
        return true;
    }

    false
}

// True when `bound` is set and `other` is open.
const fn is_lower_only(bound: &Bound<String>, other: &Bound<String>) -> bool {
    !matches!(bound, Bound::Unbounded) && matches!(other, Bound::Unbounded)
}
