//! # RSQL Filter Language - Abstract Syntax Tree
//!
//! This module defines the tree the grammar adapter produces for an RSQL/FIQL
//! filter expression: conjunctions, disjunctions and comparison leaves.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparison operators and the operator set a parser accepts
//! - **[node]** - The parsed tree (`And`, `Or`, `Comparison`)
//!
//! ## Quick Start
//!
//! ```text
//! name==john*;age>=30
//! ```
//!
//! Matches records whose name starts with `john` (any case) and whose age is
//! at least 30.
//!
//! ## Core Concepts
//!
//! ### Logical Operators
//!
//! - `;` or `and` - conjunction, binds tighter than OR
//! - `,` or `or` - disjunction
//! - `( ... )` - grouping
//!
//! ### Comparisons
//!
//! Every leaf is `selector operator arguments`:
//!
//! ```text
//! dept.manager.name=="Alice Smith"
//! status=in=(active,pending)
//! deletedAt=isnull=true
//! ```
//!
//! Selectors are dotted property paths. Arguments are bare words or quoted
//! strings; membership operators take a parenthesized list.
//!
//! ## Examples
//!
//! ### Wildcards
//!
//! ```text
//! name==jo*n
//! ```
//!
//! ### Grouping
//!
//! ```text
//! (status==active,status==pending);createdAt>="2024-01-01 00:00:00.000"
//! ```
//!
//! ### Custom Operators
//!
//! ```text
//! tags=isempty=false;manager=isnull=true
//! ```
pub mod node;
pub mod operators;
pub mod tokens;

pub use node::{Comparison, Node};
pub use operators::{ComparisonOperator, OperatorSet};
pub use tokens::Token;
