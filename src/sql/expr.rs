//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for the expressions the
//! synthesizer emits, with exhaustive pattern matching enforced by the
//! compiler. There is deliberately no raw-SQL variant: only schema-derived
//! identifiers and integers can reach the output.

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens_for_dialect()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(String),

    /// Literal values
    Literal(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// CAST(expr AS type)
    Cast {
        expr: Box<Expr>,
        type_name: &'static str,
    },

    /// Interval literal; the dialect decides the spelling.
    Interval { value: i64, unit: IntervalUnit },

    /// Current date, e.g. `CURDATE()` or `CURRENT_DATE`.
    CurrentDate,

    /// Current timestamp, e.g. `NOW()`.
    CurrentTimestamp,

    /// Wildcard: *
    Star,
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Gte,
    // Logical
    And,
    // Arithmetic
    Minus,
}

/// Units accepted by [`Expr::Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
}

impl Expr {
    /// Convert to tokens for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Expr::Column(name) => {
                ts.push(Token::Ident(name.clone()));
            }
            Expr::Literal(Literal::Int(n)) => {
                ts.push(Token::LitInt(*n));
            }
            Expr::Literal(Literal::String(s)) => {
                ts.push(Token::LitString(s.clone()));
            }
            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens_for_dialect(dialect));
                ts.space().push(op.token()).space();
                ts.append(&right.to_tokens_for_dialect(dialect));
            }
            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone())).lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens_for_dialect(dialect));
                }
                ts.rparen();
            }
            Expr::Cast { expr, type_name } => {
                ts.push(Token::FunctionName("CAST".into())).lparen();
                ts.append(&expr.to_tokens_for_dialect(dialect));
                ts.space()
                    .push(Token::As)
                    .space()
                    .push(Token::Keyword(*type_name));
                ts.rparen();
            }
            Expr::Interval { value, unit } => {
                ts.append(&dialect.emit_interval(*value, *unit));
            }
            Expr::CurrentDate => {
                ts.append(&dialect.emit_current_date());
            }
            Expr::CurrentTimestamp => {
                ts.append(&dialect.emit_current_timestamp());
            }
            Expr::Star => {
                ts.push(Token::Star);
            }
        }
        ts
    }

    /// Render this expression as SQL text.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }

    /// Wrap in an alias for use in a SELECT list.
    pub fn alias(self, alias: &str) -> crate::sql::query::SelectExpr {
        crate::sql::query::SelectExpr::new(self).with_alias(alias)
    }
}

impl BinaryOperator {
    fn token(self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Gte => Token::Gte,
            BinaryOperator::And => Token::And,
            BinaryOperator::Minus => Token::Minus,
        }
    }
}

// =============================================================================
// Builder functions
// =============================================================================

/// Column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column(name.into())
}

/// Integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// String literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// `*`
pub fn star() -> Expr {
    Expr::Star
}

/// `COUNT(*)`
pub fn count_star() -> Expr {
    func("COUNT", vec![star()])
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// `CAST(expr AS type_name)`
pub fn cast(expr: Expr, type_name: &'static str) -> Expr {
    Expr::Cast {
        expr: Box::new(expr),
        type_name,
    }
}

/// Interval of `value` units.
pub fn interval(value: i64, unit: IntervalUnit) -> Expr {
    Expr::Interval { value, unit }
}

// =============================================================================
// Extension trait for fluent building
// =============================================================================

/// Fluent operators on expressions.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Minus, other.into())
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}
