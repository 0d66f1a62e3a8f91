use sift::config::RepositoryConfig;
use sift::metadata::StaticSchema;
use sift::query::{CmpOp, FilterClause, QueryPlan};
use sift::session::Session;

fn users_config() -> RepositoryConfig {
    RepositoryConfig {
        table: "users".to_string(),
        searchable: vec!["name".to_string(), "email".to_string()],
        ..Default::default()
    }
}

fn users_schema() -> StaticSchema {
    StaticSchema::new().with_table("users", &["id", "name", "email"])
}

fn or_like(column: &str, pattern: &str) -> FilterClause {
    FilterClause::Cmp {
        column: column.to_string(),
        op: CmpOp::Like,
        value: pattern.to_string(),
        or: true,
        negated: false,
    }
}

#[test]
fn search_fans_out_as_or_like_over_searchable_columns() {
    let config = users_config();
    let schema = users_schema();
    let mut session = Session::new(&config, &schema, QueryPlan::new());
    session.search("jo").unwrap();
    let plan = session.into_query();
    assert_eq!(
        plan.filters,
        vec![
            or_like("users.name", "%jo%"),
            or_like("users.email", "%jo%"),
        ]
    );
}

#[test]
fn empty_or_whitespace_input_is_a_no_op() {
    let config = users_config();
    let schema = users_schema();
    let mut session = Session::new(&config, &schema, QueryPlan::new());
    session.search("").unwrap();
    session.search("   ").unwrap();
    assert!(session.query().filters.is_empty());
}

#[test]
fn no_searchable_columns_means_no_clauses() {
    let config = RepositoryConfig {
        table: "users".to_string(),
        ..Default::default()
    };
    let schema = users_schema();
    let mut session = Session::new(&config, &schema, QueryPlan::new());
    session.search("jo").unwrap();
    assert!(session.query().filters.is_empty());
}
