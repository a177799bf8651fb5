// tests/integration_tests.rs
//
// Compile against the employee schema, then run the filter over JSON records.

mod common;

use common::{compile, filter};
use rsql_filter::{Evaluator, evaluator::filter_records};
use serde_json::{Value, json};

fn records() -> Vec<Value> {
    vec![
        json!({
            "name": "John",
            "age": 30,
            "active": true,
            "birthday": "1990-05-01",
            "createdAt": "2024-03-01T10:20:30.456",
            "tags": ["Urgent", "ops"],
            "address": { "city": "Berlin" },
            "dept": {
                "title": "Sales",
                "manager": { "name": "Ann", "age": 50 },
                "staff": [{ "name": "Kim", "age": 25 }]
            },
            "skills": [
                { "name": "Rust", "level": 5 },
                { "name": "Go", "level": 2 }
            ]
        }),
        json!({
            "name": "Jane",
            "age": 40,
            "active": false,
            "birthday": "1985-01-01",
            "createdAt": "2023-12-31T23:59:59.999",
            "tags": [],
            "dept": { "title": "Ops", "manager": null, "staff": [] },
            "skills": [
                { "name": "Rust", "level": 2 },
                { "name": "Go", "level": 5 }
            ]
        }),
        json!({
            "name": "Bob",
            "age": null,
            "tags": null,
            "skills": []
        }),
    ]
}

fn names(results: &[&Value]) -> Vec<String> {
    results
        .iter()
        .map(|r| r["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn run(query: &str) -> Vec<String> {
    let records = records();
    let filter = filter(query);
    let evaluator = Evaluator::new(&filter).unwrap();
    names(&evaluator.apply(&records))
}

// ============================================================================
// Wildcards and Case
// ============================================================================

#[test]
fn test_wildcard_matches_case_insensitively() {
    assert_eq!(run("name==j*"), vec!["John", "Jane"]);
    assert_eq!(run("name==JOHN"), vec!["John"]);
    assert_eq!(run("name==*O*"), vec!["John", "Bob"]);
    assert_eq!(run("name!=j*"), vec!["Bob"]);
}

#[test]
fn test_list_elements_are_joined() {
    assert_eq!(run("tags==*urgentops*"), vec!["John"]);
    assert_eq!(run("tags==*ops"), vec!["John"]);
}

// ============================================================================
// Complements
// ============================================================================

#[test]
fn test_equal_and_not_equal_partition_non_null_values() {
    assert_eq!(run("age==30"), vec!["John"]);
    assert_eq!(run("age!=30"), vec!["Jane"]);
}

#[test]
fn test_in_and_out_partition_non_null_values() {
    assert_eq!(run("age=in=(30,50)"), vec!["John"]);
    assert_eq!(run("age=out=(30,50)"), vec!["Jane"]);
}

#[test]
fn test_unknown_does_not_block_or() {
    assert_eq!(run("age!=30,name==bob"), vec!["Jane", "Bob"]);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_date_time_round_trip_at_millisecond_resolution() {
    assert_eq!(run("createdAt>='2024-03-01 10:20:30.456'"), vec!["John"]);
    assert!(run("createdAt>'2024-03-01 10:20:30.456'").is_empty());
    assert_eq!(run("createdAt<'2024-03-01 10:20:30.456'"), vec!["Jane"]);
}

#[test]
fn test_one_millisecond_earlier_is_excluded() {
    let records = vec![
        json!({ "name": "exact", "createdAt": "2024-03-01T10:20:30.456" }),
        json!({ "name": "earlier", "createdAt": "2024-03-01T10:20:30.455" }),
    ];
    let filter = filter("createdAt>='2024-03-01 10:20:30.456'");
    let evaluator = Evaluator::new(&filter).unwrap();

    assert!(evaluator.matches(&records[0]));
    assert!(!evaluator.matches(&records[1]));
    assert_eq!(names(&evaluator.apply(&records)), vec!["exact"]);
}

#[test]
fn test_dates_compare_by_day() {
    assert_eq!(run("birthday<'1989-01-01 00:00:00.000'"), vec!["Jane"]);
    assert_eq!(run("birthday=='1990-05-01 12:00:00.000'"), vec!["John"]);
}

#[test]
fn test_numbers_order_lexicographically() {
    // "30" and "40" both sort before "9"
    assert!(run("age=gt=9").is_empty());
    assert_eq!(run("age=lt=9"), vec!["John", "Jane"]);
}

#[test]
fn test_booleans() {
    assert_eq!(run("active==true"), vec!["John"]);
    assert_eq!(run("active==false"), vec!["Jane"]);
}

// ============================================================================
// Paths and Joins
// ============================================================================

#[test]
fn test_embedded_values() {
    assert_eq!(run("address.city==berlin"), vec!["John"]);
}

#[test]
fn test_relations_are_left_outer() {
    // Bob has no department and is still considered
    assert_eq!(run("name==b*,dept.title==sales"), vec!["John", "Bob"]);
    assert_eq!(run("dept.manager=isnull=true"), vec!["Jane", "Bob"]);
    assert_eq!(run("dept.manager.name==ann"), vec!["John"]);
}

#[test]
fn test_and_conditions_share_one_joined_row() {
    // Jane has a rust skill and a level-5 skill, but not the same one
    assert_eq!(run("skills.name==rust;skills.level==5"), vec!["John"]);
}

#[test]
fn test_to_many_joins_duplicate_records() {
    assert_eq!(run("skills.name==*"), vec!["John", "John", "Jane", "Jane"]);

    let records = records();
    let filter = filter("skills.name==*");
    let evaluator = Evaluator::new(&filter).unwrap();
    assert_eq!(evaluator.matching_rows(&records[0]), 2);
    assert_eq!(evaluator.matching_rows(&records[2]), 0);
}

#[test]
fn test_distinct_suppresses_duplicates() {
    let records = records();
    let filter = filter("skills.name==*").distinct();
    let evaluator = Evaluator::new(&filter).unwrap();
    assert_eq!(names(&evaluator.apply(&records)), vec!["John", "Jane"]);
}

#[test]
fn test_distinct_matches_the_same_records() {
    let records = records();
    let queries = vec![
        "skills.level==5",
        "dept.staff.name==k*,name==bob",
        "age=in=(30,40);skills.name==go",
    ];

    for query in queries {
        let plain = filter(query);
        let distinct = plain.clone().distinct();

        let mut expected = names(&Evaluator::new(&plain).unwrap().apply(&records));
        expected.dedup();
        let actual = names(&Evaluator::new(&distinct).unwrap().apply(&records));
        assert_eq!(actual, expected, "Failed for query: {}", query);
    }
}

// ============================================================================
// Empty Checks
// ============================================================================

#[test]
fn test_is_empty() {
    assert_eq!(run("skills=isempty=true"), vec!["Bob"]);
    assert_eq!(run("skills=isempty=false"), vec!["John", "Jane"]);
    assert_eq!(run("tags=isempty=true"), vec!["Jane", "Bob"]);
    assert_eq!(run("dept.staff=isempty=false"), vec!["John"]);
}

// ============================================================================
// No Filter
// ============================================================================

#[test]
fn test_no_filter_keeps_everything() {
    let records = records();
    let filter = compile("").unwrap();
    assert!(filter.is_none());
    assert_eq!(filter_records(filter.as_ref(), &records).unwrap().len(), 3);
}

#[test]
fn test_matches() {
    let records = records();
    let filter = filter("dept.title==ops");
    let evaluator = Evaluator::new(&filter).unwrap();
    assert!(!evaluator.matches(&records[0]));
    assert!(evaluator.matches(&records[1]));
    assert!(!evaluator.matches(&records[2]));
}
