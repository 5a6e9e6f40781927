//! SQL generation module.
//!
//! This module provides a small type-safe SQL builder that generates
//! dialect-aware SELECT statements. It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    cast, col, count_star, func, interval, lit_int, lit_str, star, BinaryOperator, Expr, ExprExt,
    IntervalUnit, Literal,
};
pub use query::{OrderByExpr, Query, SelectExpr, SortDir};
pub use token::{Token, TokenStream};
