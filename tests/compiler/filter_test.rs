use sift::config::RepositoryConfig;
use sift::metadata::StaticSchema;
use sift::query::{CmpOp, FilterClause, QueryPlan};
use sift::session::Session;

fn users_config() -> RepositoryConfig {
    RepositoryConfig {
        table: "users".to_string(),
        filterable: ["id", "price", "status", "name"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        ..Default::default()
    }
}

fn users_schema() -> StaticSchema {
    StaticSchema::new().with_table("users", &["id", "name", "email", "password", "deleted_at"])
}

fn compile_filter(config: &RepositoryConfig, raw: &str) -> QueryPlan {
    let schema = users_schema();
    let mut session = Session::new(config, &schema, QueryPlan::new());
    session.filter(raw).unwrap();
    session.into_query()
}

fn cmp(column: &str, op: CmpOp, value: &str) -> FilterClause {
    FilterClause::Cmp {
        column: column.to_string(),
        op,
        value: value.to_string(),
        or: false,
        negated: false,
    }
}

#[test]
fn equality_is_qualified_to_the_base_table() {
    let config = users_config();
    let plan = compile_filter(&config, "id:equal_5");
    assert_eq!(plan.filters, vec![cmp("users.id", CmpOp::Eq, "5")]);
}

#[test]
fn unauthorized_column_produces_no_predicate() {
    let config = RepositoryConfig {
        table: "users".to_string(),
        ..Default::default()
    };
    let plan = compile_filter(&config, "id:equal_5");
    assert!(plan.filters.is_empty());
}

#[test]
fn between_emits_one_predicate_per_present_bound() {
    let config = users_config();

    let plan = compile_filter(&config, "price:between_100,200");
    assert_eq!(
        plan.filters,
        vec![
            cmp("users.price", CmpOp::Gte, "100"),
            cmp("users.price", CmpOp::Lte, "200"),
        ]
    );

    let plan = compile_filter(&config, "price:between_,200");
    assert_eq!(plan.filters, vec![cmp("users.price", CmpOp::Lte, "200")]);

    // Explicit zero is a bound; only the empty string is skipped.
    let plan = compile_filter(&config, "price:between_0,200");
    assert_eq!(
        plan.filters,
        vec![
            cmp("users.price", CmpOp::Gte, "0"),
            cmp("users.price", CmpOp::Lte, "200"),
        ]
    );
}

#[test]
fn null_tests_compile_to_null_clauses() {
    let config = users_config();

    let plan = compile_filter(&config, "status:is_null");
    assert_eq!(
        plan.filters,
        vec![FilterClause::Null {
            column: "users.status".to_string(),
            negated: false,
        }]
    );

    let plan = compile_filter(&config, "status:is_not-null");
    assert_eq!(
        plan.filters,
        vec![FilterClause::Null {
            column: "users.status".to_string(),
            negated: true,
        }]
    );

    let plan = compile_filter(&config, "status:is_bogus");
    assert!(plan.filters.is_empty());
}

#[test]
fn negated_operators_use_where_not() {
    let config = users_config();

    let plan = compile_filter(&config, "status:not_equal_archived");
    assert_eq!(
        plan.filters,
        vec![FilterClause::Cmp {
            column: "users.status".to_string(),
            op: CmpOp::Eq,
            value: "archived".to_string(),
            or: false,
            negated: true,
        }]
    );

    let plan = compile_filter(&config, "id:not_in_2,3,4");
    assert_eq!(
        plan.filters,
        vec![FilterClause::In {
            column: "users.id".to_string(),
            values: vec!["2".to_string(), "3".to_string(), "4".to_string()],
            negated: true,
        }]
    );

    let plan = compile_filter(&config, "price:not_between_100,200");
    assert_eq!(
        plan.filters,
        vec![FilterClause::Between {
            column: "users.price".to_string(),
            low: "100".to_string(),
            high: "200".to_string(),
            negated: true,
        }]
    );
}

#[test]
fn default_limit_processes_the_first_five_conditions() {
    let config = users_config();
    let raw = "id:equal_1@id:equal_2@id:equal_3@id:equal_4@id:equal_5@id:equal_6";
    let plan = compile_filter(&config, raw);
    assert_eq!(plan.filters.len(), 5);
    // Original order is preserved.
    assert_eq!(plan.filters[0], cmp("users.id", CmpOp::Eq, "1"));
    assert_eq!(plan.filters[4], cmp("users.id", CmpOp::Eq, "5"));
}

#[test]
fn explicit_limit_overrides_the_configured_one() {
    let config = users_config();
    let schema = users_schema();
    let mut session = Session::new(&config, &schema, QueryPlan::new());
    session
        .filter_limited("id:equal_1@id:equal_2@id:equal_3", 2)
        .unwrap();
    assert_eq!(session.query().filters.len(), 2);
}

#[test]
fn invalid_fragment_skips_only_itself() {
    let config = users_config();
    let plan = compile_filter(&config, "id:bogus_x@price:equal_3");
    assert_eq!(plan.filters, vec![cmp("users.price", CmpOp::Eq, "3")]);
}

#[test]
fn dotted_names_in_the_direct_allow_list_pass_through() {
    let config = RepositoryConfig {
        table: "users".to_string(),
        filterable: vec!["stats.score".to_string()],
        ..Default::default()
    };
    let plan = compile_filter(&config, "stats.score:equal_9");
    assert_eq!(plan.filters, vec![cmp("stats.score", CmpOp::Eq, "9")]);
}

#[test]
fn repeated_calls_accumulate() {
    let config = users_config();
    let schema = users_schema();
    let mut session = Session::new(&config, &schema, QueryPlan::new());
    session.filter("id:equal_5").unwrap();
    session.filter("id:equal_5").unwrap();
    assert_eq!(session.query().filters.len(), 2);
}
