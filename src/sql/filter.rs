//! Structured row filters for the delete page.
//!
//! The condition the user types is parsed with sqlparser's PostgreSQL dialect
//! and narrowed to a small AST: column/literal comparisons combined with
//! `AND`, `OR` and `NOT`. The AST is rendered back to SQL with every literal
//! moved into a positional parameter.

use std::fmt;

use sqlparser::ast::{BinaryOperator, Expr, Ident, UnaryOperator, Value as SqlValue};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

use crate::db::{schema, TableColumn};
use crate::error::{DashError, Result};

use super::{placeholder, quote_ident};

/// A literal operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Numeric literal, kept as written (`42`, `-3.5`).
    Number(String),
    Text(String),
    Bool(bool),
}

impl Literal {
    /// The text bound as a statement parameter.
    pub fn to_param(&self) -> String {
        match self {
            Self::Number(n) => n.clone(),
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Cast for a numeric literal, following how PostgreSQL types the same
    /// literal written inline: whole numbers as integers, the rest as numeric.
    fn number_type(text: &str) -> &'static str {
        if text.parse::<i64>().is_ok() {
            "int8"
        } else {
            "numeric"
        }
    }

    /// The literal as it would be written inline in SQL.
    pub fn to_inline(&self) -> String {
        match self {
            Self::Number(n) => n.clone(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
        }
    }
}

/// Comparison operator between a column and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    fn from_operator(op: &BinaryOperator) -> Option<Self> {
        match op {
            BinaryOperator::Eq => Some(Self::Eq),
            BinaryOperator::NotEq => Some(Self::NotEq),
            BinaryOperator::Lt => Some(Self::Lt),
            BinaryOperator::LtEq => Some(Self::LtEq),
            BinaryOperator::Gt => Some(Self::Gt),
            BinaryOperator::GtEq => Some(Self::GtEq),
            _ => None,
        }
    }

    /// The operator with its operands swapped (`1 < a` is `a > 1`).
    fn flipped(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::LtEq => Self::GtEq,
            Self::Gt => Self::Lt,
            Self::GtEq => Self::LtEq,
            other => other,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// A parsed row filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Compare {
        column: String,
        op: CompareOp,
        value: Literal,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    InList {
        column: String,
        values: Vec<Literal>,
        negated: bool,
    },
    Between {
        column: String,
        low: Literal,
        high: Literal,
        negated: bool,
    },
    Like {
        column: String,
        pattern: String,
        negated: bool,
        case_insensitive: bool,
    },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Not(Box<Condition>),
}

/// Parses condition text into a [`Condition`].
///
/// Fails with [`DashError::Input`] for empty text, comments, anything left
/// over after the expression (a single trailing `;` is allowed) and any
/// expression outside the supported grammar.
pub fn parse_condition(text: &str) -> Result<Condition> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DashError::input(
            "A condition is required; unconditional deletes are not allowed",
        ));
    }

    let dialect = PostgreSqlDialect {};
    let tokens = Tokenizer::new(&dialect, text)
        .tokenize()
        .map_err(|e| DashError::input(format!("Could not read condition: {e}")))?;

    if tokens.iter().any(|t| {
        matches!(
            t,
            Token::Whitespace(Whitespace::SingleLineComment { .. })
                | Token::Whitespace(Whitespace::MultiLineComment(_))
        )
    }) {
        return Err(DashError::input("Comments are not allowed in a condition"));
    }

    let mut parser = Parser::new(&dialect).with_tokens(tokens);
    let expr = parser
        .parse_expr()
        .map_err(|e| DashError::input(format!("Could not parse condition: {e}")))?;

    if parser.peek_token().token == Token::SemiColon {
        parser.next_token();
    }
    let rest = parser.peek_token().token;
    if rest != Token::EOF {
        return Err(DashError::input(format!(
            "Unexpected '{rest}' after the condition; only a single condition is allowed"
        )));
    }

    Condition::from_expr(&expr)
}

impl Condition {
    fn from_expr(expr: &Expr) -> Result<Self> {
        match expr {
            Expr::Nested(inner) => Self::from_expr(inner),
            Expr::BinaryOp { left, op, right } => match op {
                BinaryOperator::And => Ok(Self::And(
                    Box::new(Self::from_expr(left)?),
                    Box::new(Self::from_expr(right)?),
                )),
                BinaryOperator::Or => Ok(Self::Or(
                    Box::new(Self::from_expr(left)?),
                    Box::new(Self::from_expr(right)?),
                )),
                other => {
                    let op = CompareOp::from_operator(other).ok_or_else(|| {
                        DashError::input(format!("Unsupported operator '{other}'"))
                    })?;
                    comparison(left, op, right)
                }
            },
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                expr,
            } => Ok(Self::Not(Box::new(Self::from_expr(expr)?))),
            Expr::IsNull(inner) => Ok(Self::IsNull {
                column: column_name(inner)?,
                negated: false,
            }),
            Expr::IsNotNull(inner) => Ok(Self::IsNull {
                column: column_name(inner)?,
                negated: true,
            }),
            Expr::InList {
                expr,
                list,
                negated,
            } => Ok(Self::InList {
                column: column_name(expr)?,
                values: list.iter().map(literal).collect::<Result<_>>()?,
                negated: *negated,
            }),
            Expr::Between {
                expr,
                negated,
                low,
                high,
            } => Ok(Self::Between {
                column: column_name(expr)?,
                low: literal(low)?,
                high: literal(high)?,
                negated: *negated,
            }),
            Expr::Like {
                negated,
                expr,
                pattern,
                escape_char,
                ..
            } => like(expr, pattern, *negated, escape_char.is_some(), false),
            Expr::ILike {
                negated,
                expr,
                pattern,
                escape_char,
                ..
            } => like(expr, pattern, *negated, escape_char.is_some(), true),
            other => Err(DashError::input(format!(
                "Unsupported condition '{other}'; compare a column with a literal value"
            ))),
        }
    }

    /// Column names referenced by the condition, in order of appearance.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Compare { column, .. }
            | Self::IsNull { column, .. }
            | Self::InList { column, .. }
            | Self::Between { column, .. }
            | Self::Like { column, .. } => out.push(column.as_str()),
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Self::Not(inner) => inner.collect_columns(out),
        }
    }

    /// Renders the condition with literals inline, for display only.
    pub fn to_preview(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, &mut |_, lit| lit.to_inline());
        out
    }

    /// Renders the condition with placeholders starting at `$first`.
    ///
    /// Number placeholders carry the literal's own numeric type, so the
    /// comparison matches the inline preview. Text and boolean placeholders
    /// are cast to the column's type when `columns` knows it.
    /// Returns the SQL fragment and the parameters in placeholder order.
    pub fn to_parameterized(&self, first: usize, columns: &[TableColumn]) -> (String, Vec<String>) {
        let mut params = Vec::new();
        let mut out = String::new();
        self.render(&mut out, &mut |column, lit| {
            params.push(lit.to_param());
            let type_name = match lit {
                Literal::Number(n) => Some(Literal::number_type(n)),
                _ => column
                    .and_then(|name| schema::find(columns, name))
                    .and_then(|c| c.type_name.as_deref()),
            };
            placeholder(first + params.len() - 1, type_name)
        });
        (out, params)
    }

    fn render(&self, out: &mut String, literal: &mut dyn FnMut(Option<&str>, &Literal) -> String) {
        match self {
            Self::Compare { column, op, value } => {
                out.push_str(&format!("{} {} ", quote_ident(column), op.as_sql()));
                out.push_str(&literal(Some(column.as_str()), value));
            }
            Self::IsNull { column, negated } => {
                let not = if *negated { "NOT " } else { "" };
                out.push_str(&format!("{} IS {not}NULL", quote_ident(column)));
            }
            Self::InList {
                column,
                values,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                let items: Vec<String> = values
                    .iter()
                    .map(|v| literal(Some(column.as_str()), v))
                    .collect();
                out.push_str(&format!(
                    "{} {not}IN ({})",
                    quote_ident(column),
                    items.join(", ")
                ));
            }
            Self::Between {
                column,
                low,
                high,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                let low = literal(Some(column.as_str()), low);
                let high = literal(Some(column.as_str()), high);
                out.push_str(&format!(
                    "{} {not}BETWEEN {low} AND {high}",
                    quote_ident(column)
                ));
            }
            Self::Like {
                column,
                pattern,
                negated,
                case_insensitive,
            } => {
                let not = if *negated { "NOT " } else { "" };
                let op = if *case_insensitive { "ILIKE" } else { "LIKE" };
                let pattern = literal(None, &Literal::Text(pattern.clone()));
                out.push_str(&format!("{} {not}{op} {pattern}", quote_ident(column)));
            }
            Self::And(left, right) => {
                left.render_operand(out, literal, matches!(**left, Self::Or(..)));
                out.push_str(" AND ");
                right.render_operand(out, literal, matches!(**right, Self::Or(..)));
            }
            Self::Or(left, right) => {
                left.render(out, literal);
                out.push_str(" OR ");
                right.render_operand(out, literal, matches!(**right, Self::Or(..)));
            }
            Self::Not(inner) => {
                out.push_str("NOT ");
                inner.render_operand(out, literal, matches!(**inner, Self::And(..) | Self::Or(..)));
            }
        }
    }

    fn render_operand(
        &self,
        out: &mut String,
        literal: &mut dyn FnMut(Option<&str>, &Literal) -> String,
        parenthesize: bool,
    ) {
        if parenthesize {
            out.push('(');
            self.render(out, literal);
            out.push(')');
        } else {
            self.render(out, literal);
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_preview())
    }
}

fn comparison(left: &Expr, op: CompareOp, right: &Expr) -> Result<Condition> {
    if is_column(left) {
        Ok(Condition::Compare {
            column: column_name(left)?,
            op,
            value: literal(right)?,
        })
    } else if is_column(right) {
        Ok(Condition::Compare {
            column: column_name(right)?,
            op: op.flipped(),
            value: literal(left)?,
        })
    } else {
        Err(DashError::input(format!(
            "Comparison '{left} {} {right}' must name a column",
            op.as_sql()
        )))
    }
}

fn like(
    expr: &Expr,
    pattern: &Expr,
    negated: bool,
    has_escape: bool,
    case_insensitive: bool,
) -> Result<Condition> {
    if has_escape {
        return Err(DashError::input("LIKE ... ESCAPE is not supported"));
    }
    let pattern = match literal(pattern)? {
        Literal::Text(s) => s,
        _ => {
            return Err(DashError::input(
                "LIKE patterns must be single-quoted strings",
            ))
        }
    };
    Ok(Condition::Like {
        column: column_name(expr)?,
        pattern,
        negated,
        case_insensitive,
    })
}

fn is_column(expr: &Expr) -> bool {
    matches!(expr, Expr::Identifier(_) | Expr::CompoundIdentifier(_))
}

/// Unquoted names fold to lowercase, as PostgreSQL does.
fn normalize(ident: &Ident) -> String {
    if ident.quote_style.is_some() {
        ident.value.clone()
    } else {
        ident.value.to_lowercase()
    }
}

fn column_name(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Identifier(ident) => Ok(normalize(ident)),
        Expr::Nested(inner) => column_name(inner),
        Expr::CompoundIdentifier(_) => Err(DashError::input(format!(
            "Qualified column names are not supported: '{expr}'"
        ))),
        other => Err(DashError::input(format!(
            "Expected a column name, found '{other}'"
        ))),
    }
}

fn literal(expr: &Expr) -> Result<Literal> {
    match expr {
        Expr::Value(SqlValue::Number(n, _)) => Ok(Literal::Number(n.clone())),
        Expr::Value(SqlValue::SingleQuotedString(s)) => Ok(Literal::Text(s.clone())),
        Expr::Value(SqlValue::Boolean(b)) => Ok(Literal::Bool(*b)),
        Expr::Value(SqlValue::Null) => Err(DashError::input(
            "Use IS NULL or IS NOT NULL to match NULL values",
        )),
        Expr::UnaryOp {
            op: op @ (UnaryOperator::Minus | UnaryOperator::Plus),
            expr: inner,
        } => match inner.as_ref() {
            Expr::Value(SqlValue::Number(n, _)) => {
                let sign = if *op == UnaryOperator::Minus { "-" } else { "" };
                Ok(Literal::Number(format!("{sign}{n}")))
            }
            other => Err(DashError::input(format!(
                "Expected a literal value, found '{op}{other}'"
            ))),
        },
        Expr::Nested(inner) => literal(inner),
        other => Err(DashError::input(format!(
            "Expected a literal value, found '{other}'"
        ))),
    }
}
