#![allow(dead_code)]

use rsql_filter::{Compiler, EntitySchema, Error, Filter, ValueType};

/// Employee -> Department -> manager (Person), Employee -> skills (Skill)
pub fn employee() -> EntitySchema {
    let person = EntitySchema::new("Person")
        .basic("name", ValueType::String)
        .basic("age", ValueType::Integer);
    let department = EntitySchema::new("Department")
        .basic("title", ValueType::String)
        .to_one("manager", person.clone())
        .to_many("staff", person);
    let skill = EntitySchema::new("Skill")
        .basic("name", ValueType::String)
        .basic("level", ValueType::Integer);
    let address = EntitySchema::new("Address")
        .basic("city", ValueType::String)
        .basic("zip", ValueType::String);

    EntitySchema::new("Employee")
        .basic("name", ValueType::String)
        .basic("age", ValueType::Integer)
        .basic("id", ValueType::Long)
        .basic("level", ValueType::Byte)
        .basic("active", ValueType::Boolean)
        .basic("birthday", ValueType::Date)
        .basic("createdAt", ValueType::DateTime)
        .basic("tags", ValueType::List)
        .basic("salary", ValueType::Other)
        .embedded("address", address)
        .to_one("dept", department)
        .to_many("skills", skill)
}

pub fn compile(query: &str) -> Result<Option<Filter>, Error> {
    Compiler::new().compile(query, &employee())
}

/// Compile a non-empty query that must succeed
pub fn filter(query: &str) -> Filter {
    compile(query)
        .unwrap_or_else(|e| panic!("failed to compile {}: {}", query, e))
        .unwrap_or_else(|| panic!("no filter for {}", query))
}

/// The predicate's SQL-like rendering
pub fn sql(query: &str) -> String {
    filter(query).predicate().to_string()
}
