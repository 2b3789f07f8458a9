//! Recursive-descent parser producing a [`SelectStatement`].

use super::lexer::{Token, tokenize};
use crate::error::{KdTableError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub projection: Projection,
    /// Accepted for familiarity; an index holds a single table.
    pub table: String,
    /// Conjunction of conditions. Empty when there is no WHERE clause.
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    All,
    Columns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub criterion: String,
    pub op: Operator,
    pub value: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Le,
    Ge,
    Lt,
    Gt,
    Ne,
    In,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Eq => "=",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Ne => "!=",
            Operator::In => "in",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(String),
    /// `[low, high]`, only after `in`.
    Range(String, String),
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse_select(mut self) -> Result<SelectStatement> {
        self.consume(Token::Select)?;
        let projection = self.parse_projection()?;
        self.consume(Token::From)?;
        let table = self.expect_word("a table name")?;

        let mut conditions = Vec::new();
        if self.match_token(&Token::Where) {
            self.current += 1;
            conditions.push(self.parse_condition()?);
            while self.match_token(&Token::And) {
                self.current += 1;
                conditions.push(self.parse_condition()?);
            }
        }

        if self.match_token(&Token::Semicolon) {
            self.current += 1;
        }
        if let Some(token) = self.peek() {
            return Err(KdTableError::Validation(format!(
                "Unexpected '{}' after end of query",
                token
            )));
        }

        Ok(SelectStatement {
            projection,
            table,
            conditions,
        })
    }

    fn parse_projection(&mut self) -> Result<Projection> {
        if self.match_token(&Token::Star) {
            self.current += 1;
            return Ok(Projection::All);
        }

        let mut columns = vec![self.expect_word("a column name")?];
        while self.match_token(&Token::Comma) {
            self.current += 1;
            columns.push(self.expect_word("a column name")?);
        }
        Ok(Projection::Columns(columns))
    }

    fn parse_condition(&mut self) -> Result<Condition> {
        let criterion = self.expect_word("a criterion name")?;

        let op = match self.consume_any() {
            Some(Token::In) => Operator::In,
            Some(Token::Operator(symbol)) => match symbol.as_str() {
                "=" => Operator::Eq,
                "<=" => Operator::Le,
                ">=" => Operator::Ge,
                "<" => Operator::Lt,
                ">" => Operator::Gt,
                "!=" => Operator::Ne,
                other => {
                    return Err(KdTableError::Validation(format!(
                        "Unknown operator '{}'",
                        other
                    )));
                }
            },
            Some(other) => return Err(expected("an operator", Some(&other))),
            None => return Err(expected("an operator", None)),
        };

        let value = if op == Operator::In {
            self.consume(Token::LBracket)?;
            let low = self.expect_value()?;
            self.consume(Token::Comma)?;
            let high = self.expect_value()?;
            self.consume(Token::RBracket)?;
            Operand::Range(low, high)
        } else {
            Operand::Scalar(self.expect_value()?)
        };

        Ok(Condition {
            criterion,
            op,
            value,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn match_token(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn consume_any(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn consume(&mut self, expected_token: Token) -> Result<()> {
        match self.consume_any() {
            Some(token) if token == expected_token => Ok(()),
            found => Err(expected(
                &format!("'{}'", expected_token),
                found.as_ref(),
            )),
        }
    }

    fn expect_word(&mut self, what: &str) -> Result<String> {
        match self.consume_any() {
            Some(Token::Word(word)) => Ok(word),
            found => Err(expected(what, found.as_ref())),
        }
    }

    fn expect_value(&mut self) -> Result<String> {
        match self.consume_any() {
            Some(Token::Word(value)) | Some(Token::Quoted(value)) => Ok(value),
            found => Err(expected("a value", found.as_ref())),
        }
    }
}

fn expected(what: &str, found: Option<&Token>) -> KdTableError {
    match found {
        Some(token) => KdTableError::Validation(format!("Expected {}, found '{}'", what, token)),
        None => KdTableError::Validation(format!("Expected {}, found end of query", what)),
    }
}

/// Tokenize and parse a query string.
pub fn parse(input: &str) -> Result<SelectStatement> {
    Parser::new(tokenize(input)?).parse_select()
}
