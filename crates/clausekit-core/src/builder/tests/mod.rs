
use crate::{
    builder::{
        BuildState, BuilderError, BuilderOperator, ConditionBuilder, FieldRef, MutableClause,
        PrecedenceBuilder,
    },
    clause::{Clause, HistoryPredicate, Operand, Operator, TerminalClause},
};

// ---- helpers -----------------------------------------------------------

fn t(name: &str) -> TerminalClause {
    FieldRef::new(name).eq("x")
}

fn c(name: &str) -> Clause {
    Clause::Terminal(t(name))
}

fn and(children: Vec<Clause>) -> Clause {
    Clause::And(children)
}

fn or(children: Vec<Clause>) -> Clause {
    Clause::Or(children)
}

fn built(builder: &PrecedenceBuilder) -> Clause {
    builder
        .build()
        .expect("build should succeed")
        .expect("builder should hold a clause")
}

fn message(err: &BuilderError) -> &str {
    match err {
        BuilderError::IllegalState { message, .. } => message,
        BuilderError::Argument(message) => message,
    }
}

// ---- precedence --------------------------------------------------------

#[test]
fn and_binds_tighter_than_or() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    b.or().unwrap();
    b.clause(t("b")).unwrap();
    b.and().unwrap();
    b.clause(t("c")).unwrap();

    assert_eq!(built(&b), or(vec![c("a"), and(vec![c("b"), c("c")])]));
}

#[test]
fn not_binds_tighter_than_and() {
    let mut b = PrecedenceBuilder::new();
    b.not().unwrap();
    b.clause(t("a")).unwrap();
    b.and().unwrap();
    b.clause(t("b")).unwrap();
    b.or().unwrap();
    b.clause(t("c")).unwrap();

    assert_eq!(
        built(&b),
        or(vec![and(vec![Clause::not(c("a")), c("b")]), c("c")])
    );
}

#[test]
fn same_connective_chains_flatten() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    b.and().unwrap();
    b.clause(t("b")).unwrap();
    b.and().unwrap();
    b.clause(t("c")).unwrap();

    assert_eq!(built(&b), and(vec![c("a"), c("b"), c("c")]));
}

#[test]
fn chained_not_pushes_one_operator_each() {
    let mut b = PrecedenceBuilder::new();
    b.not().unwrap();
    b.not().unwrap();
    b.clause(t("a")).unwrap();

    assert_eq!(built(&b), Clause::not(Clause::not(c("a"))));
}

#[test]
fn sub_expression_overrides_precedence() {
    let mut b = PrecedenceBuilder::new();
    b.sub().unwrap();
    b.clause(t("a")).unwrap();
    b.or().unwrap();
    b.clause(t("b")).unwrap();
    b.endsub().unwrap();
    b.and().unwrap();
    b.clause(t("c")).unwrap();

    let clause = built(&b);
    assert_eq!(clause, and(vec![or(vec![c("a"), c("b")]), c("c")]));
    assert_eq!(clause.to_string(), r#"({a = "x"} OR {b = "x"}) AND {c = "x"}"#);
}

#[test]
fn nested_negation_renders_with_minimal_parens() {
    let mut b = PrecedenceBuilder::new();
    b.not().unwrap();
    b.sub().unwrap();
    b.not().unwrap();
    b.sub().unwrap();
    b.clause(t("t1")).unwrap();
    b.or().unwrap();
    b.not().unwrap();
    b.clause(t("t2")).unwrap();
    b.endsub().unwrap();
    b.and().unwrap();
    b.clause(t("t3")).unwrap();
    b.endsub().unwrap();

    assert_eq!(
        built(&b).to_string(),
        r#"NOT (NOT ({t1 = "x"} OR NOT {t2 = "x"}) AND {t3 = "x"})"#
    );
}

#[test]
fn or_inside_and_is_parenthesized_but_not_the_reverse() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    b.or().unwrap();
    b.clause(t("b")).unwrap();
    b.and().unwrap();
    b.clause(t("c")).unwrap();

    assert_eq!(
        built(&b).to_string(),
        r#"{a = "x"} OR {b = "x"} AND {c = "x"}"#
    );
}

// ---- build / copy / clear ---------------------------------------------

#[test]
fn build_is_idempotent_and_non_destructive() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    b.and().unwrap();
    b.clause(t("b")).unwrap();

    let first = built(&b);
    let second = built(&b);
    assert_eq!(first, second);
    assert_eq!(b.state(), BuildState::Operator);

    b.or().unwrap();
    b.clause(t("c")).unwrap();
    assert_eq!(built(&b), or(vec![and(vec![c("a"), c("b")]), c("c")]));
}

#[test]
fn build_on_fresh_builder_is_none() {
    assert_eq!(PrecedenceBuilder::new().build(), Ok(None));
}

#[test]
fn copy_is_isolated_from_original() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    let before = built(&b);

    let mut branch = b.copy();
    branch.and().unwrap();
    branch.clause(t("x")).unwrap();

    assert_eq!(built(&b), before);
    assert_eq!(built(&branch), and(vec![c("a"), c("x")]));
}

#[test]
fn clear_resets_stacks_and_default_operator() {
    let mut b = PrecedenceBuilder::new();
    b.default_and();
    b.sub().unwrap();
    b.clause(t("a")).unwrap();

    b.clear();
    assert_eq!(b.state(), BuildState::Start);
    assert_eq!(b.level(), 0);
    assert_eq!(b.default_operator(), None);
    assert_eq!(b.build(), Ok(None));
}

// ---- protocol errors --------------------------------------------------

#[test]
fn connective_after_connective_names_the_pair() {
    let mut b = PrecedenceBuilder::new();
    b.not().unwrap();
    let err = b.and().unwrap_err();

    assert_eq!(message(&err), "illegal operator sequence 'NOT AND'");
}

#[test]
fn cannot_start_with_a_connective() {
    let err = PrecedenceBuilder::new().or().unwrap_err();

    assert_eq!(message(&err), "cannot start a condition with OR");
}

#[test]
fn two_clauses_without_operator_fail_and_leave_state() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    let err = b.clause(t("b")).unwrap_err();

    assert_eq!(message(&err), "two clauses with no operator between them");
    assert_eq!(b.state(), BuildState::Operator);
    assert_eq!(built(&b), c("a"));
}

#[test]
fn error_carries_partial_rendering() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    b.and().unwrap();
    let err = b.or().unwrap_err();

    let BuilderError::IllegalState { partial, .. } = err else {
        panic!("expected an illegal state error");
    };
    assert_eq!(partial, r#"{a = "x"} AND"#);
}

#[test]
fn endsub_rules() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    assert_eq!(
        message(&b.endsub().unwrap_err()),
        "no open sub-expression to close"
    );

    let mut b = PrecedenceBuilder::new();
    b.sub().unwrap();
    assert_eq!(message(&b.endsub().unwrap_err()), "empty sub-expression");
}

#[test]
fn build_with_open_sub_expression_fails() {
    let mut b = PrecedenceBuilder::new();
    b.sub().unwrap();
    b.clause(t("a")).unwrap();

    let err = b.build().unwrap_err();
    assert!(message(&err).contains("unclosed"), "unexpected error: {err:?}");
    assert_eq!(b.level(), 1);
}

#[test]
fn build_after_dangling_connective_fails() {
    let mut b = PrecedenceBuilder::new();
    b.clause(t("a")).unwrap();
    b.and().unwrap();

    assert!(b.build().is_err());
    assert_eq!(b.state(), BuildState::Clause(BuilderOperator::And));
}

// ---- default operator -------------------------------------------------

#[test]
fn default_and_joins_adjacent_clauses() {
    let mut b = PrecedenceBuilder::new();
    b.default_and();
    b.clause(t("a")).unwrap();
    b.clause(t("b")).unwrap();
    b.or().unwrap();
    b.clause(t("c")).unwrap();

    assert_eq!(built(&b), or(vec![and(vec![c("a"), c("b")]), c("c")]));
}

#[test]
fn default_or_applies_before_not_and_sub() {
    let mut b = PrecedenceBuilder::new();
    b.default_or();
    b.clause(t("a")).unwrap();
    b.not().unwrap();
    b.clause(t("b")).unwrap();
    b.sub().unwrap();
    b.clause(t("c")).unwrap();
    b.endsub().unwrap();

    assert_eq!(built(&b), or(vec![c("a"), Clause::not(c("b")), c("c")]));
}

// ---- mutable clause algebra -------------------------------------------

#[test]
fn combine_appends_under_same_operator_and_wraps_otherwise() {
    let a = MutableClause::single(t("a"));
    let b = MutableClause::single(t("b"));
    let x = MutableClause::single(t("x"));
    let ab = MutableClause::multi(BuilderOperator::And, vec![a.clone(), b.clone()]).unwrap();

    let appended = ab.clone().combine(BuilderOperator::And, Some(x.clone())).unwrap();
    let MutableClause::Multi(multi) = &appended else {
        panic!("expected an AND node, got {appended:?}");
    };
    assert_eq!(multi.op(), BuilderOperator::And);
    assert_eq!(multi.children(), [a, b, x.clone()].as_slice());

    let wrapped = ab.clone().combine(BuilderOperator::Or, Some(x.clone())).unwrap();
    assert_eq!(
        wrapped,
        MutableClause::multi(BuilderOperator::Or, vec![ab, x]).unwrap()
    );
}

#[test]
fn combine_rejects_bad_arguments() {
    let a = MutableClause::single(t("a"));

    assert!(matches!(
        a.clone().combine(BuilderOperator::And, None),
        Err(BuilderError::Argument(_))
    ));
    assert!(matches!(
        a.clone().combine(BuilderOperator::LParen, Some(a.clone())),
        Err(BuilderError::Argument(_))
    ));
    assert_eq!(
        a.clone().combine(BuilderOperator::Not, None).unwrap(),
        MutableClause::Not(Box::new(a))
    );
}

#[test]
fn multi_requires_connective_and_children() {
    let pair = vec![MutableClause::single(t("a")), MutableClause::single(t("b"))];

    for op in [
        BuilderOperator::None,
        BuilderOperator::LParen,
        BuilderOperator::RParen,
        BuilderOperator::Not,
    ] {
        let err = MutableClause::multi(op, pair.clone()).unwrap_err();
        assert!(matches!(err, BuilderError::Argument(_)), "{op}: {err}");
    }
    assert!(matches!(
        MutableClause::multi(BuilderOperator::Or, Vec::new()),
        Err(BuilderError::Argument(_))
    ));
}

#[test]
fn every_multi_node_is_a_non_empty_connective() {
    fn check(node: &MutableClause) {
        match node {
            MutableClause::Single(_) => {}
            MutableClause::Multi(multi) => {
                assert!(multi.op().is_connective());
                assert!(!multi.children().is_empty());
                multi.children().iter().for_each(check);
            }
            MutableClause::Not(inner) => check(inner),
        }
    }

    let a = MutableClause::single(t("a"));
    let b = MutableClause::single(t("b"));
    let tree = a
        .clone()
        .combine(BuilderOperator::Or, Some(b.clone()))
        .unwrap()
        .combine(BuilderOperator::And, Some(a))
        .unwrap()
        .combine(BuilderOperator::Not, None)
        .unwrap()
        .combine(BuilderOperator::Or, Some(b))
        .unwrap();

    check(&tree);
}

#[test]
fn single_child_multi_converts_to_the_child() {
    let only = MutableClause::multi(BuilderOperator::Or, vec![MutableClause::single(t("a"))]).unwrap();

    assert_eq!(only.as_clause(), Some(c("a")));
}

#[test]
fn copy_shares_leaves() {
    let leaf = MutableClause::single(t("a"));
    let tree = MutableClause::Not(Box::new(leaf));
    let copy = tree.copy();

    let (MutableClause::Not(original), MutableClause::Not(copied)) = (&tree, &copy) else {
        panic!("expected NOT nodes");
    };
    let (MutableClause::Single(left), MutableClause::Single(right)) = (&**original, &**copied) else {
        panic!("expected shared leaves");
    };
    assert!(std::sync::Arc::ptr_eq(left, right));
}

#[test]
fn operator_ranks_follow_binding_order() {
    let ordered = [
        BuilderOperator::None,
        BuilderOperator::LParen,
        BuilderOperator::RParen,
        BuilderOperator::Or,
        BuilderOperator::And,
        BuilderOperator::Not,
    ];

    for pair in ordered.windows(2) {
        assert!(pair[0] < pair[1], "{} should rank below {}", pair[0], pair[1]);
    }
}

// ---- condition builder ------------------------------------------------

#[test]
fn fluent_equality_and_in_list() {
    let mut b = ConditionBuilder::new();
    b.eq("field1", "v1")
        .unwrap()
        .and()
        .unwrap()
        .in_list("field2", ["a", "b"])
        .unwrap();

    let clause = b.build().unwrap().unwrap();
    assert_eq!(
        clause.to_string(),
        r#"{field1 = "v1"} AND {field2 in ("a", "b")}"#
    );
}

#[test]
fn range_requires_a_bound() {
    let err = ConditionBuilder::new()
        .range::<i64>("votes", None, None)
        .unwrap_err();

    assert!(matches!(err, BuilderError::Argument(_)));
}

#[test]
fn range_with_one_bound_is_one_sided() {
    let mut lower = ConditionBuilder::new();
    lower.range("votes", Some(3), None).unwrap();
    assert_eq!(
        lower.build().unwrap(),
        Some(Clause::terminal("votes", Operator::GreaterThanEquals, 3))
    );

    let mut upper = ConditionBuilder::new();
    upper.range("votes", None, Some(9)).unwrap();
    assert_eq!(
        upper.build().unwrap(),
        Some(Clause::terminal("votes", Operator::LessThanEquals, 9))
    );
}

#[test]
fn range_with_two_bounds_is_a_group() {
    let mut b = ConditionBuilder::new();
    b.eq("project", "CK")
        .unwrap()
        .or()
        .unwrap()
        .range("votes", Some(3), Some(9))
        .unwrap();

    assert_eq!(
        b.build().unwrap().unwrap().to_string(),
        r#"{project = "CK"} OR {votes >= 3} AND {votes <= 9}"#
    );
    assert_eq!(b.precedence().level(), 0);
}

#[test]
fn blank_field_and_empty_values_are_argument_errors() {
    let mut b = ConditionBuilder::new();

    assert!(matches!(b.eq("  ", "x"), Err(BuilderError::Argument(_))));
    assert!(matches!(
        b.in_list("status", Vec::<String>::new()),
        Err(BuilderError::Argument(_))
    ));
    assert!(matches!(b.like("summary", " "), Err(BuilderError::Argument(_))));
    assert_eq!(b.precedence().state(), BuildState::Start);
}

#[test]
fn history_primitives_carry_predicates() {
    let mut b = ConditionBuilder::new();
    b.was("status", "open", Some(HistoryPredicate::by("bob")))
        .unwrap()
        .and()
        .unwrap()
        .changed("assignee", None)
        .unwrap();

    assert_eq!(
        b.build().unwrap().unwrap().to_string(),
        r#"{status was "open" by "bob"} AND {assignee changed}"#
    );
}

#[test]
fn empty_and_function_operands() {
    let mut b = ConditionBuilder::new();
    b.is_empty("fixVersion")
        .unwrap()
        .or()
        .unwrap()
        .function("assignee", Operator::Equals, "currentUser", Vec::new())
        .unwrap();

    let clause = b.build().unwrap().unwrap();
    let terminals = clause.terminals();
    assert_eq!(terminals[0].operand, Operand::Empty);
    assert!(matches!(terminals[1].operand, Operand::Function(_)));
    assert_eq!(
        clause.to_string(),
        r#"{fixVersion is EMPTY} OR {assignee = currentUser()}"#
    );
}

#[test]
fn display_shows_accepted_tokens() {
    let mut b = ConditionBuilder::new();
    b.not().unwrap().sub().unwrap().eq("a", 1).unwrap();

    assert_eq!(b.to_string(), "NOT ( {a = 1}");
}
