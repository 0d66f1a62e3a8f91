use sift::config::{ConfigError, Project, RelationConfig, RepositoryConfig};
use sift::metadata::SchemaProvider;
use sift::query::JoinType;

const PROJECT_TOML: &str = r#"
[repository]
table = "users"
hidden = ["password"]
soft_delete_column = "deleted_at"
filterable = ["id", "status", "price"]
sortable = ["id", "name"]
searchable = ["name", "email"]
filter_limit = 8

[repository.relations.profile]
chain = [["users.pic_id", "user_pictures.id"]]
select = ["user_pictures.path AS photo"]
filterable = ["photo"]
sortable = ["photo"]
soft_delete = ["user_pictures"]
join_type = "left"

[repository.relations.country]
chain = [["users.city_id", "cities.id"], ["cities.country_id", "countries.id"]]
select = ["countries.name AS country"]
filterable = ["country"]

[schema]
users = ["id", "name", "email", "password", "deleted_at"]
user_pictures = ["id", "path", "deleted_at"]
"#;

#[test]
fn parses_a_full_project_document() {
    let project = Project::from_toml(PROJECT_TOML).unwrap();
    let repository = &project.repository;

    assert_eq!(repository.table, "users");
    assert_eq!(repository.hidden, vec!["password"]);
    assert_eq!(repository.filter_limit, 8);
    // Unset limits keep their defaults.
    assert_eq!(repository.sort_limit, 2);

    let profile = repository.relation("profile").unwrap();
    assert_eq!(profile.join_type, JoinType::Left);
    assert_eq!(profile.soft_delete, vec!["user_pictures"]);
    assert_eq!(
        profile.chain,
        vec![("users.pic_id".to_string(), "user_pictures.id".to_string())]
    );

    let country = repository.relation("country").unwrap();
    assert_eq!(country.chain.len(), 2);
    assert_eq!(country.join_type, JoinType::Inner);
    assert!(country.sortable.is_empty());

    assert_eq!(
        project.schema.list_columns("user_pictures").unwrap(),
        vec!["id".to_string(), "path".to_string(), "deleted_at".to_string()]
    );
}

#[test]
fn defaults_match_the_documented_contract() {
    let config = RepositoryConfig::default();
    assert_eq!(config.soft_delete_column, "deleted_at");
    assert_eq!(config.filter_limit, 5);
    assert_eq!(config.sort_limit, 2);
    assert!(config.relations.is_empty());

    let relation = RelationConfig::default();
    assert_eq!(relation.join_type, JoinType::Inner);
    assert!(relation.chain.is_empty());
}

#[test]
fn invalid_base_table_fails_validation_at_load() {
    let toml = r#"
[repository]
table = "users; drop table users"
"#;
    let result = Project::from_toml(toml);
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn syntactically_broken_toml_is_a_parse_error() {
    let result = Project::from_toml("[repository\ntable = users");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn missing_file_is_reported_as_such() {
    let result = Project::from_file("no/such/project.toml");
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}
