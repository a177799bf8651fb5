//! Reference documentation for the rsql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Types,
    Paths,
    Schema,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "types" | "type" | "coercion" => Some(Self::Types),
            "paths" | "path" | "joins" => Some(Self::Paths),
            "schema" | "schemas" => Some(Self::Schema),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"RSQL-FILTER DOCUMENTATION

rsql compiles RSQL/FIQL filter expressions such as

    name==jo*;(age=gt=30,dept.title==sales)

into backend-neutral predicates, checked against an entity schema.

DOCUMENTATION CATEGORIES

  syntax            Comparisons, AND/OR, grouping and quoting
  operators         Every comparison operator and the predicate it compiles to
  types             How arguments are coerced to property types
  paths             Dotted property paths, embedded values and joins
  schema            JSON format of the --schema file

QUICK REFERENCE

  ;  and            Logical AND (binds tighter)
  ,  or             Logical OR
  ( ... )           Grouping
  *                 Wildcard in == and != on text
  =in=(a,b)         Membership

Run 'rsql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Types) => Ok(TYPES_DOC),
        Some(DocCategory::Paths) => Ok(PATHS_DOC),
        Some(DocCategory::Schema) => Ok(SCHEMA_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Comparisons and Logic

A filter is one or more comparisons joined by logical operators.

COMPARISON

  selector operator argument
  selector operator (argument, argument, ...)

  name==john
  age=gt=30
  status=in=(active,pending)

LOGIC

  ;   or  and       AND, binds tighter than OR
  ,   or  or        OR

  name==john;age=gt=30            both must hold
  name==john,name==jane           either may hold
  (name==john,name==jane);age<40  grouping with parentheses

QUOTING

Arguments containing spaces or reserved characters ( ) ; , = ! ~ < > "
must be quoted with single or double quotes. A backslash escapes the next
character inside a quoted argument.

  title=="Head of sales"
  note=='it\'s done'

EMPTY INPUT

An empty filter means "no filter": every entity matches.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparisons

  ==            Equal
                Text: case-insensitive LIKE, * matches any run of characters
                List: elements joined without delimiter, then LIKE
                Others: typed equality
  !=            Not equal
                Text: case-insensitive NOT LIKE with * wildcard
                Others: typed inequality
  =gt=  >       Greater than
  =ge=  >=      Greater than or equal
  =lt=  <       Less than
  =le=  <=      Less than or equal
                Dates and date-times compare by value. Every other type
                compares as text, so "9" > "10".
  =in=          Member of the argument list
  =out=         Not a member of the argument list
  =isnull=      =isnull=true is "is null", =isnull=false is "is not null"
  =isempty=     =isempty=true is "is empty", =isempty=false is "is not empty"
                Only valid on collections (list values, to-many relations)

EXAMPLES

  name==jo*                 lower(name) like 'jo%'
  tags==*urgent*            lower(array_to_string(tags, '')) like '%urgent%'
  createdAt=ge='2024-03-01 00:00:00.000'
  manager=isnull=true
  staff=isempty=false
"#;

const TYPES_DOC: &str = r#"TYPES - Argument Coercion

Arguments are text. Before comparison they are converted to the type of the
property they are compared against.

  integer       32-bit signed integer       age==42
  long          64-bit signed integer       id==9000000000
  byte          8-bit signed integer        level==3
  boolean       "true" in any case is true, anything else is false
  date          parsed with the date format, time of day dropped
  date_time     parsed with the date format, millisecond resolution
  string, list, entity, other
                kept as text

A value that does not parse, such as age==abc, is rejected.

DATE FORMAT

The default date format is

  yyyy-MM-dd HH:mm:ss.SSS

Change it with a --config file:

  { "date_format": "dd.MM.yyyy HH:mm" }

The =isnull= and =isempty= arguments are never coerced.
"#;

const PATHS_DOC: &str = r#"PATHS - Dotted Selectors

A selector is a dot-separated path from the root entity.

  name                      attribute of the root entity
  address.city              attribute of an embedded value, read in place
  dept.title                attribute of a related entity, via a left join
  dept.manager.name         nested relations, one left join each

Relations are traversed as LEFT OUTER joins, so entities without the related
entity are kept and compare as null. Every comparison through the same
relation reuses the same join:

  staff.name==ann;staff.age=gt=30

requires a single staff member named ann who is over 30. To-many joins can
produce duplicate rows; use --distinct to suppress them.

Unknown segments are rejected with the segment and the entity they were
looked up on.
"#;

const SCHEMA_DOC: &str = r#"SCHEMA - Entity Description Format

The --schema file describes the root entity as JSON:

  {
    "name": "Employee",
    "attributes": {
      "name":    { "kind": "basic", "type": "string" },
      "age":     { "kind": "basic", "type": "integer" },
      "tags":    { "kind": "basic", "type": "list" },
      "address": { "kind": "embedded", "schema": { "name": "Address", "attributes": { ... } } },
      "dept":    { "kind": "to_one", "target": { "name": "Department", "attributes": { ... } } },
      "skills":  { "kind": "to_many", "target": { "name": "Skill", "attributes": { ... } } }
    }
  }

Attribute kinds: basic, embedded, to_one, to_many.
Basic types: integer, long, byte, boolean, date, date_time, string, list,
entity, other.

RECORDS

'rsql filter' reads a JSON array of records shaped like the schema. Dates
are ISO-8601 strings, e.g. "2024-03-01" or "2024-03-01T10:00:00.000".
"#;
