use super::*;
use crate::{
    clause::{FunctionCall, HistoryPredicate, Operand, Operator, PredicateOperator, TerminalClause},
    index::{Document, MemoryIndex},
    query::{BoolQuery, Occur},
    registry::HistoryField,
    resolve::{
        DefaultDateSupport, DefaultOperandResolver, NameIdIndexInfoResolver, SearchContext,
        TextIndexInfoResolver,
    },
};
use chrono::NaiveDate;
use std::sync::Arc;

// ---- fixture -----------------------------------------------------------

fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hh, mm, 0)
        .unwrap()
}

// I-1: X -> Y (alice, T1), Y -> Z (bob, T2)
// I-2: X -> Y (bob, March)
// I-3: priority only
// I-4: resolution EMPTY -> "Retired" (a value no longer in the catalog)
// I-5: resolution EMPTY -> id 1 ("Fixed")
fn changes() -> MemoryIndex {
    let records = [
        ChangeRecord::new("I-1", "status", Some("X"), Some("Y"), "alice", at(2024, 1, 10, 10, 0)),
        ChangeRecord::new("I-1", "status", Some("Y"), Some("Z"), "bob", at(2024, 2, 10, 10, 0)),
        ChangeRecord::new("I-2", "status", Some("X"), Some("Y"), "bob", at(2024, 3, 1, 9, 0)),
        ChangeRecord::new("I-3", "priority", Some("1"), Some("2"), "alice", at(2024, 1, 5, 8, 0)),
        ChangeRecord::new("I-4", "resolution", None, Some("Retired"), "carol", at(2024, 1, 2, 8, 0)),
        ChangeRecord::new("I-5", "resolution", None, Some("1"), "carol", at(2024, 1, 3, 8, 0)),
    ];

    let mut index = MemoryIndex::new();
    for (n, record) in records.iter().enumerate() {
        index.insert(Document::from_change(format!("c{n}"), record, &DefaultDateSupport));
    }
    index
}

fn status() -> HistoryField {
    HistoryField::new("status", Arc::new(TextIndexInfoResolver::new()))
}

fn resolution() -> HistoryField {
    HistoryField::new(
        "resolution",
        Arc::new(NameIdIndexInfoResolver::new().with("1", "Fixed")),
    )
}

fn ctx() -> SearchContext {
    SearchContext::new(Some("bob".to_string()), at(2024, 6, 1, 12, 0))
}

fn entities(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
}

// Run `clause` against the fixture.
fn run(history: &HistoryField, clause: &TerminalClause) -> HistoryMatch {
    let index = changes();
    let operands = DefaultOperandResolver::with_builtins();
    let resolver = HistoryResolver::new(&operands, &DefaultDateSupport, &index);

    resolver.resolve(&ctx(), history, clause).unwrap()
}

fn was(value: &str) -> TerminalClause {
    TerminalClause::new("status", Operator::Was, value)
}

// ---- WAS ---------------------------------------------------------------

#[test]
fn was_matches_old_or_new_value() {
    let found = run(&status(), &was("Y"));

    assert_eq!(found.entities, entities(&["I-1", "I-2"]));
    assert!(!found.negated);
}

#[test]
fn was_before_and_after_a_transition() {
    let t2 = "2024-02-10 10:00";

    let before = was("Y").with_predicate(HistoryPredicate::before(t2));
    assert_eq!(run(&status(), &before).entities, entities(&["I-1"]));

    // The Y -> Z change at T2 itself is not after T2; I-2 became Y later.
    let after = was("Y").with_predicate(HistoryPredicate::after(t2));
    assert_eq!(run(&status(), &after).entities, entities(&["I-2"]));
}

#[test]
fn was_on_and_during() {
    let on = was("Y").with_predicate(HistoryPredicate::on("2024-03-01"));
    assert_eq!(run(&status(), &on).entities, entities(&["I-2"]));

    let during = was("Z").with_predicate(HistoryPredicate::during("2024-01", "2024-02"));
    assert_eq!(run(&status(), &during).entities, entities(&["I-1"]));

    let later = was("Z").with_predicate(HistoryPredicate::during("2024-03", "2024-04"));
    assert!(run(&status(), &later).entities.is_empty());
}

#[test]
fn during_accepts_bounds_in_either_order() {
    let reversed = was("Z").with_predicate(HistoryPredicate::during("2024-02", "2024-01"));

    assert_eq!(run(&status(), &reversed).entities, entities(&["I-1"]));
}

#[test]
fn point_date_predicates_use_the_first_value() {
    let before = was("Y").with_predicate(HistoryPredicate::new(
        PredicateOperator::Before,
        Operand::list(["2024-02-01", "2020-01-01"]),
    ));
    assert_eq!(run(&status(), &before).entities, entities(&["I-1"]));

    let on = was("Y").with_predicate(HistoryPredicate::new(
        PredicateOperator::On,
        Operand::list(["2024-03-01", "2024-01-10"]),
    ));
    assert_eq!(run(&status(), &on).entities, entities(&["I-2"]));
}

#[test]
fn was_in_accepts_any_listed_value() {
    let clause = TerminalClause::new("status", Operator::WasIn, Operand::list(["Z", "Q"]));

    assert_eq!(run(&status(), &clause).entities, entities(&["I-1"]));
}

#[test]
fn was_not_is_reported_as_complement() {
    let clause = TerminalClause::new("status", Operator::WasNot, "Y");
    let found = run(&status(), &clause);

    assert!(found.negated);
    assert_eq!(
        found.into_result(),
        QueryFactoryResult::negated(SearchQuery::IdSet(entities(&["I-1", "I-2"])))
    );
}

#[test]
fn never_held_value_is_false_or_unrestricted() {
    let held = run(&status(), &was("Q"));
    assert!(held.entities.is_empty());
    assert!(held.into_result().is_false());

    let not_held = run(&status(), &TerminalClause::new("status", Operator::WasNotIn, Operand::list(["Q"])));
    assert_eq!(not_held.into_result().query(), &SearchQuery::MatchAll);
}

#[test]
fn unresolvable_values_fall_back_to_raw_text() {
    let retired = TerminalClause::new("resolution", Operator::Was, "Retired");
    assert_eq!(run(&resolution(), &retired).entities, entities(&["I-4"]));

    let fixed = TerminalClause::new("resolution", Operator::Was, "Fixed");
    assert_eq!(run(&resolution(), &fixed).entities, entities(&["I-5"]));
}

#[test]
fn was_empty_uses_the_sentinel() {
    let clause = TerminalClause::new("resolution", Operator::Was, Operand::Empty);

    assert_eq!(run(&resolution(), &clause).entities, entities(&["I-4", "I-5"]));
}

// ---- CHANGED -----------------------------------------------------------

#[test]
fn changed_ignores_operand_and_scopes_by_field() {
    let clause = TerminalClause::new("priority", Operator::Changed, Operand::Empty);
    let priority = HistoryField::new("priority", Arc::new(TextIndexInfoResolver::new()));

    assert_eq!(run(&priority, &clause).entities, entities(&["I-3"]));
}

#[test]
fn changed_with_transition_predicates() {
    let changed = |predicate| {
        TerminalClause::new("status", Operator::Changed, Operand::Empty).with_predicate(predicate)
    };

    let from_to = changed(HistoryPredicate::from_value("X").and(HistoryPredicate::to("Y")));
    assert_eq!(run(&status(), &from_to).entities, entities(&["I-1", "I-2"]));

    let from_y = changed(HistoryPredicate::from_value("Y"));
    assert_eq!(run(&status(), &from_y).entities, entities(&["I-1"]));

    let by_alice = changed(HistoryPredicate::by("alice"));
    assert_eq!(run(&status(), &by_alice).entities, entities(&["I-1"]));
}

#[test]
fn by_resolves_functions() {
    let by_me = TerminalClause::new("status", Operator::Changed, Operand::Empty).with_predicate(
        HistoryPredicate::by(Operand::Function(FunctionCall::new("currentUser", Vec::new()))),
    );

    assert_eq!(run(&status(), &by_me).entities, entities(&["I-1", "I-2"]));
}

// ---- malformed input ---------------------------------------------------

#[test]
fn malformed_predicates_match_nothing() {
    let one_sided = was("Y").with_predicate(HistoryPredicate::new(PredicateOperator::During, "2024-01"));
    let garbage = was("Y").with_predicate(HistoryPredicate::before("someday"));
    let nobody = TerminalClause::new("status", Operator::Changed, Operand::Empty)
        .with_predicate(HistoryPredicate::by(Operand::Empty));

    for clause in [one_sided, garbage, nobody] {
        assert!(run(&status(), &clause).entities.is_empty(), "{clause}");
    }
}

#[test]
fn change_query_shape() {
    let index = changes();
    let operands = DefaultOperandResolver::with_builtins();
    let resolver = HistoryResolver::new(&operands, &DefaultDateSupport, &index);

    let query = resolver.change_query(&ctx(), &status(), &was("Y"));
    let expected = BoolQuery::new()
        .with(Occur::Must, SearchQuery::term(CHANGE_FIELD, "status"))
        .with(
            Occur::Must,
            SearchQuery::any_of(vec![
                SearchQuery::term(CHANGE_FROM, "Y"),
                SearchQuery::term(CHANGE_TO, "Y"),
            ]),
        );
    assert_eq!(query, Some(SearchQuery::Bool(expected)));

    let equals = TerminalClause::new("status", Operator::Equals, "Y");
    assert_eq!(resolver.change_query(&ctx(), &status(), &equals), None);
}

#[test]
fn index_failures_propagate() {
    struct Offline;

    impl ChangeHistoryIndex for Offline {
        fn matching_entities(&self, _query: &SearchQuery) -> Result<BTreeSet<String>, InternalError> {
            Err(InternalError::history_internal("change index offline"))
        }
    }

    let operands = DefaultOperandResolver::with_builtins();
    let resolver = HistoryResolver::new(&operands, &DefaultDateSupport, &Offline);
    let err = resolver.resolve(&ctx(), &status(), &was("Y")).unwrap_err();

    assert_eq!(err.display_with_class(), "history:internal: change index offline");

    // Nothing to search: the index is never consulted.
    let nothing = resolver.search(&was("Y"), None).unwrap();
    assert_eq!(nothing, HistoryMatch::default());
}

#[test]
fn change_record_terms() {
    let record = ChangeRecord::new("I-9", "status", None, Some("Y"), "bob", at(2024, 1, 1, 0, 0));

    assert_eq!(record.from_term(), EMPTY_TERM);
    assert_eq!(record.to_term(), "Y");
}
