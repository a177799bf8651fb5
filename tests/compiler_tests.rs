// tests/compiler_tests.rs

mod common;

use common::{compile, employee, filter, sql};
use rsql_filter::parser::ParseError;
use rsql_filter::{Compiler, CompilerConfig, Error, ValueType};
use serde_json::json;

// ============================================================================
// No Filter
// ============================================================================

#[test]
fn test_empty_and_absent_input_mean_no_filter() {
    let compiler = Compiler::new();
    assert_eq!(compiler.compile("", &employee()), Ok(None));
    assert_eq!(compiler.compile(None::<&str>, &employee()), Ok(None));
    assert_eq!(compiler.compile_distinct("", &employee()), Ok(None));
}

#[test]
fn test_whitespace_is_a_syntax_error() {
    assert_eq!(compile("   "), Err(Error::Syntax(ParseError::Empty)));
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_text_equality_is_case_insensitive_like() {
    assert_eq!(sql("name==jo*"), "lower(name) like 'jo%'");
    assert_eq!(sql("name==JOHN"), "lower(name) like 'john'");
    assert_eq!(sql("name==*Smith*"), "lower(name) like '%smith%'");
}

#[test]
fn test_text_inequality_is_not_like() {
    assert_eq!(sql("name!=jo*"), "lower(name) not like 'jo%'");
}

#[test]
fn test_typed_equality() {
    let test_cases = vec![
        ("age==30", "age = 30"),
        ("age!=30", "age <> 30"),
        ("id==9000000000", "id = 9000000000"),
        ("level==-3", "level = -3"),
        ("active==TRUE", "active = true"),
        ("active==yes", "active = false"),
    ];

    for (query, expected) in test_cases {
        assert_eq!(sql(query), expected, "Failed for query: {}", query);
    }
}

#[test]
fn test_untyped_values_stay_text() {
    assert_eq!(sql("salary==100*"), "lower(salary) like '100%'");
}

#[test]
fn test_list_equality_joins_elements() {
    assert_eq!(
        sql("tags==*urgent*"),
        "lower(array_to_string(tags, '')) like '%urgent%'"
    );
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_dates_compare_by_value() {
    assert_eq!(
        sql("birthday=ge='2024-03-01 00:00:00.000'"),
        "birthday >= '2024-03-01'"
    );
    assert_eq!(
        sql("createdAt<'2024-03-01 10:20:30.456'"),
        "createdAt < '2024-03-01T10:20:30.456'"
    );
}

#[test]
fn test_other_types_compare_as_text() {
    assert_eq!(sql("age=gt=30"), "age > '30'");
    assert_eq!(sql("name<=m"), "name <= 'm'");
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_in_and_out() {
    assert_eq!(sql("age=in=(30,40)"), "age in (30, 40)");
    assert_eq!(sql("age=out=(30,40)"), "not age in (30, 40)");
    assert_eq!(sql("name=in=(ann,\"o'neil\")"), "name in ('ann', 'o''neil')");
}

#[test]
fn test_in_coerces_every_argument() {
    let err = compile("age=in=(30,abc)").unwrap_err();
    assert!(matches!(err, Error::Coercion { argument, .. } if argument == "abc"));
}

// ============================================================================
// Null and Empty Checks
// ============================================================================

#[test]
fn test_is_null() {
    assert_eq!(sql("name=isnull=true"), "name is null");
    assert_eq!(sql("name=isnull=FALSE"), "name is not null");
    assert_eq!(sql("dept.manager=isnull=true"), "\"dept\".manager is null");
}

#[test]
fn test_is_null_ignores_property_type() {
    // The control argument is never coerced to the property type
    assert_eq!(sql("age=isnull=true"), "age is null");
    assert_eq!(sql("birthday=isnull=false"), "birthday is not null");
}

#[test]
fn test_is_empty_on_collections() {
    assert_eq!(sql("skills=isempty=true"), "skills is empty");
    assert_eq!(sql("tags=isempty=false"), "tags is not empty");
    assert_eq!(sql("dept.staff=isempty=false"), "\"dept\".staff is not empty");
}

#[test]
fn test_is_empty_on_scalar_is_rejected() {
    let err = compile("name=isempty=true").unwrap_err();
    assert!(matches!(err, Error::Compilation { ref property, .. } if property == "name"));
    assert!(err.is_client_error());
}

#[test]
fn test_invalid_control_argument() {
    assert!(matches!(
        compile("name=isnull=maybe"),
        Err(Error::Compilation { .. })
    ));
}

// ============================================================================
// Paths and Joins
// ============================================================================

#[test]
fn test_embedded_values_need_no_join() {
    let filter = filter("address.city==berlin");
    assert!(filter.joins().is_empty());
    assert_eq!(filter.predicate().to_string(), "lower(address.city) like 'berlin'");
}

#[test]
fn test_nested_relations_chain_joins() {
    let filter = filter("dept.manager.name==ann");
    let aliases: Vec<_> = filter.joins().iter().map(|j| j.alias.as_str()).collect();
    assert_eq!(aliases, vec!["dept", "dept.manager"]);
    assert_eq!(
        filter.predicate().to_string(),
        "lower(\"dept.manager\".name) like 'ann'"
    );
}

#[test]
fn test_conditions_share_joins() {
    let filter = filter("skills.name==rust;skills.level=gt=3");
    assert_eq!(filter.joins().len(), 1);
    assert_eq!(filter.joins()[0].alias, "skills");
}

#[test]
fn test_filter_renders_query() {
    assert_eq!(
        filter("dept.title==a;skills.level=gt=3").to_string(),
        "select root from root \
         left join \"root\".dept as \"dept\" \
         left join \"root\".skills as \"skills\" \
         where (lower(\"dept\".title) like 'a' and \"skills\".level > '3')"
    );
}

#[test]
fn test_unknown_property() {
    assert_eq!(
        compile("salary.amount==1;nope==1").unwrap_err(),
        Error::UnknownProperty {
            property: "salary.amount".to_string(),
            segment: "amount".to_string(),
            entity: "other value Employee.salary".to_string(),
        }
    );
    assert_eq!(
        compile("dept.budget==1").unwrap_err(),
        Error::UnknownProperty {
            property: "dept.budget".to_string(),
            segment: "budget".to_string(),
            entity: "Department".to_string(),
        }
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_coercion_errors() {
    assert!(matches!(
        compile("age==abc"),
        Err(Error::Coercion { ref argument, target: ValueType::Integer, .. }) if argument == "abc"
    ));
    assert!(matches!(
        compile("level==200"),
        Err(Error::Coercion { target: ValueType::Byte, .. })
    ));
    assert!(matches!(
        compile("birthday==2024-03-01"),
        Err(Error::Coercion { target: ValueType::Date, .. })
    ));
}

#[test]
fn test_first_failing_leaf_aborts() {
    assert!(matches!(
        compile("name==ok,age==abc,nope==1"),
        Err(Error::Coercion { .. })
    ));
}

#[test]
fn test_syntax_errors_are_client_errors() {
    let err = compile("name==").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)));
    assert!(err.is_client_error());
    assert!(err.to_string().starts_with("malformed filter expression: "));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_custom_date_format() {
    let config = CompilerConfig::from_json(r#"{ "date_format": "dd.MM.yyyy" }"#).unwrap();
    let compiler = Compiler::with_config(&config).unwrap();
    let filter = compiler
        .compile("birthday==01.03.2024", &employee())
        .unwrap()
        .unwrap();
    assert_eq!(filter.predicate().to_string(), "birthday = '2024-03-01'");
}

#[test]
fn test_set_date_format() {
    let mut compiler = Compiler::new();
    compiler.set_date_format("yyyy/MM/dd HH:mm").unwrap();
    assert_eq!(compiler.date_format().pattern(), "yyyy/MM/dd HH:mm");

    let filter = compiler
        .compile("createdAt>'2024/03/01 10:20'", &employee())
        .unwrap()
        .unwrap();
    assert_eq!(
        filter.predicate().to_string(),
        "createdAt > '2024-03-01T10:20:00.000'"
    );
}

#[test]
fn test_invalid_date_format_is_not_a_client_error() {
    let config = CompilerConfig {
        date_format: "yyyy-QQ".to_string(),
    };
    let err = Compiler::with_config(&config).unwrap_err();
    assert!(matches!(err, Error::DateFormat { .. }));
    assert!(!err.is_client_error());
}

#[test]
fn test_unknown_config_fields_are_rejected() {
    assert!(CompilerConfig::from_json(r#"{ "dateFormat": "x" }"#).is_err());
}

// ============================================================================
// Distinct and Serialization
// ============================================================================

#[test]
fn test_distinct_only_sets_the_flag() {
    let compiler = Compiler::new();
    let plain = compiler.compile("skills.name==rust", &employee()).unwrap().unwrap();
    let distinct = compiler
        .compile_distinct("skills.name==rust", &employee())
        .unwrap()
        .unwrap();

    assert!(!plain.is_distinct());
    assert!(distinct.is_distinct());
    assert_eq!(plain.predicate(), distinct.predicate());
    assert!(distinct.to_string().starts_with("select distinct root"));
}

#[test]
fn test_compile_is_deterministic() {
    let query = "(name==jo*,age=in=(1,2));dept.manager.age=lt=40";
    assert_eq!(compile(query), compile(query));
}

#[test]
fn test_predicate_serializes_to_json() {
    let value = serde_json::to_value(filter("age==30;tags=isempty=false")).unwrap();
    assert_eq!(
        value,
        json!({
            "predicate": {
                "op": "and",
                "operands": [
                    { "op": "equal", "path": "age", "value": { "type": "integer", "value": 30 } },
                    { "op": "is_not_empty", "path": "tags" }
                ]
            },
            "distinct": false
        })
    );
}

#[test]
fn test_ordered_comparisons_serialize_to_json() {
    let value =
        serde_json::to_value(filter("age=gt=3;createdAt>='2024-03-01 10:20:30.456'")).unwrap();
    assert_eq!(
        value["predicate"],
        json!({
            "op": "and",
            "operands": [
                {
                    "op": "compare_text",
                    "path": "age",
                    "comparison": "greater",
                    "value": "3"
                },
                {
                    "op": "compare",
                    "path": "createdAt",
                    "comparison": "greater_or_equal",
                    "value": { "type": "date_time", "value": "2024-03-01T10:20:30.456" }
                }
            ]
        })
    );
}
