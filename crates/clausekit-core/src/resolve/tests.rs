use super::*;
use crate::clause::{FunctionCall, Operand, QueryLiteral, Value};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hh, mm, ss)
        .unwrap()
}

fn ctx(user: Option<&str>) -> SearchContext {
    SearchContext::new(user.map(str::to_string), at(2024, 6, 1, 12, 0, 0))
}

fn text(value: &str) -> QueryLiteral {
    QueryLiteral::Value(Value::Text(value.to_string()))
}

// ---- dates -------------------------------------------------------------

#[test]
fn partial_dates_expand_to_their_precision() {
    let dates = DefaultDateSupport;
    let cases = [
        ("2024", at(2024, 1, 1, 0, 0, 0), at(2024, 12, 31, 23, 59, 59)),
        ("2024-02", at(2024, 2, 1, 0, 0, 0), at(2024, 2, 29, 23, 59, 59)),
        ("2024-12", at(2024, 12, 1, 0, 0, 0), at(2024, 12, 31, 23, 59, 59)),
        ("2024/03/05", at(2024, 3, 5, 0, 0, 0), at(2024, 3, 5, 23, 59, 59)),
        ("2024-03-05 10:30", at(2024, 3, 5, 10, 30, 0), at(2024, 3, 5, 10, 30, 59)),
        ("2024-03-05 10:30:15", at(2024, 3, 5, 10, 30, 15), at(2024, 3, 5, 10, 30, 15)),
    ];

    for (literal, lower, upper) in cases {
        let range = dates
            .range_of(&Value::Text(literal.to_string()))
            .unwrap_or_else(|| panic!("'{literal}' should parse"));
        assert_eq!(range, DateRange::new(lower, upper), "range of '{literal}'");
    }
}

#[test]
fn unparsable_dates_have_no_range() {
    let dates = DefaultDateSupport;

    for literal in ["", "yesterday", "2024-13", "2024-02-30", "2024-01-01 25:00"] {
        assert_eq!(dates.range_of(&Value::Text(literal.to_string())), None, "'{literal}'");
    }
}

#[test]
fn numbers_are_epoch_millis() {
    let range = DefaultDateSupport
        .range_of(&Value::Number(86_400_000))
        .unwrap();

    assert_eq!(range, DateRange::instant(at(1970, 1, 2, 0, 0, 0)));
}

#[test]
fn index_form_sorts_chronologically_and_round_trips() {
    let dates = DefaultDateSupport;
    let early = dates.index_value(at(2023, 12, 31, 23, 59, 59));
    let late = dates.index_value(at(2024, 1, 1, 0, 0, 0));

    assert!(early < late);
    assert_eq!(late, "20240101000000");
    assert_eq!(dates.parse_index_value(&late), Some(at(2024, 1, 1, 0, 0, 0)));
    assert_eq!(dates.display_value(at(2024, 1, 1, 9, 5, 0)), "2024-01-01 09:05");
}

#[test]
fn date_range_span_and_contains() {
    let jan = DateRange::new(at(2024, 1, 1, 0, 0, 0), at(2024, 1, 31, 23, 59, 59));
    let mar = DateRange::new(at(2024, 3, 1, 0, 0, 0), at(2024, 3, 31, 23, 59, 59));
    let span = jan.span(mar);

    assert!(span.contains(at(2024, 2, 15, 0, 0, 0)));
    assert!(!jan.contains(at(2024, 2, 1, 0, 0, 0)));
}

// ---- functions and operands --------------------------------------------

#[test]
fn current_user_depends_on_context() {
    let resolver = DefaultOperandResolver::with_builtins();
    let operand = Operand::Function(FunctionCall::new("currentUser", Vec::new()));

    assert_eq!(resolver.values(&ctx(Some("alice")), &operand), vec![text("alice")]);
    assert!(resolver.values(&ctx(None), &operand).is_empty());
}

#[test]
fn now_resolves_to_the_search_instant() {
    let resolver = DefaultOperandResolver::with_builtins();
    let operand = Operand::Function(FunctionCall::new("NOW", Vec::new()));

    assert_eq!(
        resolver.values(&ctx(None), &operand),
        vec![QueryLiteral::Value(Value::Date(at(2024, 6, 1, 12, 0, 0)))]
    );
}

#[test]
fn unknown_function_resolves_to_nothing() {
    let resolver = DefaultOperandResolver::with_builtins();
    let operand = Operand::Function(FunctionCall::new("membersOf", vec!["dev".into()]));

    assert!(resolver.values(&ctx(Some("alice")), &operand).is_empty());
}

#[test]
fn lists_flatten_and_keep_empty_markers() {
    let resolver = DefaultOperandResolver::with_builtins();
    let operand = Operand::List(vec![
        Operand::from("a"),
        Operand::Empty,
        Operand::Function(FunctionCall::new("currentUser", Vec::new())),
    ]);

    assert_eq!(
        resolver.values(&ctx(Some("bob")), &operand),
        vec![text("a"), QueryLiteral::Empty, text("bob")]
    );
    assert!(resolver.is_empty_operand(&Operand::Empty));
}

#[test]
fn custom_functions_register_case_insensitively() {
    struct Team;

    impl ClauseFunction for Team {
        fn name(&self) -> &'static str {
            "teamOf"
        }

        fn values(&self, _ctx: &SearchContext, call: &FunctionCall) -> Vec<QueryLiteral> {
            call.args.iter().map(|arg| text(&format!("team-{arg}"))).collect()
        }
    }

    let mut functions = FunctionRegistry::with_builtins();
    functions.register(Arc::new(Team));
    let resolver = DefaultOperandResolver::new(functions);
    let operand = Operand::Function(FunctionCall::new("TEAMOF", vec!["red".into()]));

    assert_eq!(resolver.values(&ctx(None), &operand), vec![text("team-red")]);
}

// ---- index info --------------------------------------------------------

#[test]
fn number_encoding_preserves_order() {
    let encoded: Vec<String> = [-10_i64, -1, 0, 1, 42, i64::MAX]
        .into_iter()
        .map(NumberIndexInfoResolver::encode)
        .collect();

    assert!(encoded.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(encoded.iter().all(|e| e.len() == 20));
    assert_eq!(
        NumberIndexInfoResolver.indexed_values(&Value::Text(" 42 ".into())),
        vec![NumberIndexInfoResolver::encode(42)]
    );
    assert!(NumberIndexInfoResolver.indexed_values(&Value::Text("many".into())).is_empty());
}

#[test]
fn names_resolve_to_ids() {
    let catalogs = NameIdIndexInfoResolver::new()
        .with("10", "Bug")
        .with("11", "Task")
        .with("12", "bug");

    assert_eq!(
        catalogs.indexed_values(&Value::Text("BUG".into())),
        vec!["10".to_string(), "12".to_string()]
    );
    assert_eq!(catalogs.indexed_values(&Value::Text("11".into())), vec!["11".to_string()]);
    assert_eq!(catalogs.indexed_values(&Value::Number(11)), vec!["11".to_string()]);
    assert!(catalogs.indexed_values(&Value::Text("Epic".into())).is_empty());
}

#[test]
fn text_and_date_resolvers() {
    assert_eq!(
        TextIndexInfoResolver::casefolded().indexed_values(&Value::Text("Open".into())),
        vec!["open".to_string()]
    );
    assert_eq!(
        TextIndexInfoResolver::new().indexed_values(&Value::Number(7)),
        vec!["7".to_string()]
    );

    let dates = DateIndexInfoResolver::new(Arc::new(DefaultDateSupport));
    assert_eq!(
        dates.indexed_values(&Value::Text("2024-02".into())),
        vec!["20240201000000".to_string()]
    );
}
