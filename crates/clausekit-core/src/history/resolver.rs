use crate::{
    clause::{HistoryPredicate, Operator, PredicateOperator, QueryLiteral, TerminalClause},
    error::InternalError,
    history::{
        CHANGE_ACTOR, CHANGE_DATE, CHANGE_FIELD, CHANGE_FROM, CHANGE_TO, ChangeHistoryIndex,
        HistoryMatch,
    },
    query::{EMPTY_TERM, SearchQuery},
    registry::HistoryField,
    resolve::{DateRange, DateSupport, OperandResolver, SearchContext},
};
use chrono::{NaiveDateTime, TimeDelta};
use std::{collections::BTreeSet, ops::Bound};
use tracing::debug;

///
/// HistoryResolver
///
/// Builds a change-index query for one WAS / CHANGED clause, runs it, and
/// reports the matching entities. Unresolvable operands and malformed
/// predicates produce an empty match instead of an error.
///

#[derive(Clone, Copy)]
pub struct HistoryResolver<'a> {
    operands: &'a dyn OperandResolver,
    dates: &'a dyn DateSupport,
    index: &'a dyn ChangeHistoryIndex,
}

impl<'a> HistoryResolver<'a> {
    #[must_use]
    pub const fn new(
        operands: &'a dyn OperandResolver,
        dates: &'a dyn DateSupport,
        index: &'a dyn ChangeHistoryIndex,
    ) -> Self {
        Self {
            operands,
            dates,
            index,
        }
    }

    /// Build and run the history sub-search for `clause`.
    pub fn resolve(
        &self,
        ctx: &SearchContext,
        history: &HistoryField,
        clause: &TerminalClause,
    ) -> Result<HistoryMatch, InternalError> {
        let query = self.change_query(ctx, history, clause);

        self.search(clause, query.as_ref())
    }

    /// Run a change-index query built by [`Self::change_query`]. `None`
    /// matches no entity without touching the index.
    pub fn search(
        &self,
        clause: &TerminalClause,
        query: Option<&SearchQuery>,
    ) -> Result<HistoryMatch, InternalError> {
        let negated = matches!(clause.operator, Operator::WasNot | Operator::WasNotIn);
        let Some(query) = query else {
            return Ok(HistoryMatch {
                entities: BTreeSet::new(),
                negated,
            });
        };
        let entities = self.index.matching_entities(query)?;
        debug!(
            field = %clause.field,
            operator = %clause.operator,
            entities = entities.len(),
            "history sub-search"
        );

        Ok(HistoryMatch { entities, negated })
    }

    /// Change-index query for `clause`; `None` when it cannot match.
    #[must_use]
    pub fn change_query(
        &self,
        ctx: &SearchContext,
        history: &HistoryField,
        clause: &TerminalClause,
    ) -> Option<SearchQuery> {
        let mut parts = vec![SearchQuery::term(CHANGE_FIELD, &history.change_field)];

        match clause.operator {
            // CHANGED ignores its operand.
            Operator::Changed => {}
            Operator::Was | Operator::WasNot | Operator::WasIn | Operator::WasNotIn => {
                let literals = self.operands.values(ctx, &clause.operand);
                let held = value_match(history, &literals, &[CHANGE_FROM, CHANGE_TO]);
                if held.is_none() {
                    debug!(field = %clause.field, "history operand resolved to no values");
                }
                parts.push(held?);
            }
            operator => {
                debug!(%operator, "not a history operator");
                return None;
            }
        }

        if let Some(predicate) = &clause.predicate {
            parts.push(self.predicate_query(ctx, history, predicate)?);
        }

        Some(SearchQuery::all_of(parts))
    }

    // ---- predicates ----

    fn predicate_query(
        &self,
        ctx: &SearchContext,
        history: &HistoryField,
        predicate: &HistoryPredicate,
    ) -> Option<SearchQuery> {
        let mut parts = Vec::new();
        for (op, operand) in predicate.terminals() {
            let literals = self.operands.values(ctx, operand);
            let part = match op {
                PredicateOperator::By => actor_query(&literals),
                PredicateOperator::From => value_match(history, &literals, &[CHANGE_FROM]),
                PredicateOperator::To => value_match(history, &literals, &[CHANGE_TO]),
                PredicateOperator::Before => self.first_range(op, &literals).map(|range| {
                    self.date_range(Bound::Unbounded, Bound::Excluded(range.lower))
                }),
                PredicateOperator::After => self.first_range(op, &literals).and_then(|range| {
                    let after = range.upper.checked_add_signed(TimeDelta::seconds(1))?;
                    Some(self.date_range(Bound::Included(after), Bound::Unbounded))
                }),
                PredicateOperator::On => self.first_range(op, &literals).map(|range| {
                    self.date_range(Bound::Included(range.lower), Bound::Included(range.upper))
                }),
                PredicateOperator::During => self.during(&literals),
            };
            if part.is_none() {
                debug!(predicate = %op, "malformed history predicate matches nothing");
            }
            parts.push(part?);
        }

        Some(SearchQuery::all_of(parts))
    }

    // Bounds may be given in either order.
    fn during(&self, literals: &[QueryLiteral]) -> Option<SearchQuery> {
        let [start, end, ..] = literals else {
            return None;
        };
        let start = self.dates.range_of(start.value()?)?;
        let end = self.dates.range_of(end.value()?)?;
        let window = start.span(end);

        Some(self.date_range(Bound::Included(window.lower), Bound::Included(window.upper)))
    }

    fn first_range(&self, op: PredicateOperator, literals: &[QueryLiteral]) -> Option<DateRange> {
        if literals.len() > 1 {
            debug!(
                predicate = %op,
                ignored = literals.len() - 1,
                "date predicate uses its first value only"
            );
        }

        self.dates.range_of(literals.first()?.value()?)
    }

    fn date_range(
        &self,
        lower: Bound<NaiveDateTime>,
        upper: Bound<NaiveDateTime>,
    ) -> SearchQuery {
        let index = |bound: Bound<NaiveDateTime>| match bound {
            Bound::Included(at) => Bound::Included(self.dates.index_value(at)),
            Bound::Excluded(at) => Bound::Excluded(self.dates.index_value(at)),
            Bound::Unbounded => Bound::Unbounded,
        };

        SearchQuery::range(CHANGE_DATE, index(lower), index(upper))
    }
}

// Any literal held in any of `fields`. A literal that no longer resolves
// to a live id is searched by its raw text.
fn value_match(
    history: &HistoryField,
    literals: &[QueryLiteral],
    fields: &[&str],
) -> Option<SearchQuery> {
    let mut terms = Vec::new();
    for literal in literals {
        for value in historical_values(history, literal) {
            for field in fields {
                terms.push(SearchQuery::term(*field, value.clone()));
            }
        }
    }
    if terms.is_empty() {
        return None;
    }

    Some(SearchQuery::any_of(terms))
}

fn historical_values(history: &HistoryField, literal: &QueryLiteral) -> Vec<String> {
    match literal {
        QueryLiteral::Empty => vec![EMPTY_TERM.to_string()],
        QueryLiteral::Value(value) => {
            let indexed = history.resolver.indexed_values(value);
            if indexed.is_empty() {
                vec![value.as_text()]
            } else {
                indexed
            }
        }
    }
}

fn actor_query(literals: &[QueryLiteral]) -> Option<SearchQuery> {
    let terms: Vec<SearchQuery> = literals
        .iter()
        .filter_map(QueryLiteral::value)
        .map(|actor| SearchQuery::term(CHANGE_ACTOR, actor.as_text()))
        .collect();
    if terms.is_empty() {
        return None;
    }

    Some(SearchQuery::any_of(terms))
}
