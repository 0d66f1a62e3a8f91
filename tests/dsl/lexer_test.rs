use sift::dsl::{parse_conditions, Condition};

#[test]
fn conditions_arrive_in_source_order() {
    let conditions: Vec<Condition> =
        parse_conditions("id:equal_5@name:like_jo@price:between_1,2").collect();
    let columns: Vec<&str> = conditions.iter().map(|c| c.column).collect();
    assert_eq!(columns, vec!["id", "name", "price"]);
}

#[test]
fn splits_on_first_colon_only() {
    let conditions: Vec<Condition> = parse_conditions("created:equal_10:30").collect();
    assert_eq!(
        conditions,
        vec![Condition {
            column: "created",
            expr: "equal_10:30"
        }]
    );
}

#[test]
fn malformed_segments_do_not_consume_the_limit() {
    // Limits apply to well-formed segments: the column-only fragment and the
    // empty-expr fragment are skipped before counting.
    let conditions: Vec<Condition> = parse_conditions("junk@also:@a:equal_1@b:equal_2")
        .take(2)
        .collect();
    assert_eq!(
        conditions,
        vec![
            Condition {
                column: "a",
                expr: "equal_1"
            },
            Condition {
                column: "b",
                expr: "equal_2"
            },
        ]
    );
}

#[test]
fn limit_truncates_the_tail() {
    let count = parse_conditions("a:equal_1@b:equal_2@c:equal_3").take(2).count();
    assert_eq!(count, 2);
}

#[test]
fn lone_separators_yield_nothing() {
    assert_eq!(parse_conditions("@@@").count(), 0);
    assert_eq!(parse_conditions(":").count(), 0);
}
