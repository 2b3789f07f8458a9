//! Tokenizer for the WHERE-clause query language.

use crate::error::{KdTableError, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords, matched case-insensitively
    Select,
    From,
    Where,
    And,
    In,

    /// Bare word: a criterion name, a table name, a number or an unquoted value.
    Word(String),
    /// Single- or double-quoted text, quotes removed.
    Quoted(String),
    /// One of `=`, `<=`, `>=`, `<`, `>`, `!=`.
    Operator(String),

    Comma,
    Star,
    LBracket,
    RBracket,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Select => write!(f, "SELECT"),
            Token::From => write!(f, "FROM"),
            Token::Where => write!(f, "WHERE"),
            Token::And => write!(f, "AND"),
            Token::In => write!(f, "IN"),
            Token::Word(word) => write!(f, "{}", word),
            Token::Quoted(text) => write!(f, "'{}'", text),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Comma => write!(f, ","),
            Token::Star => write!(f, "*"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        let Some((start, ch)) = self.chars.next() else {
            return Ok(None);
        };

        let token = match ch {
            ',' => Token::Comma,
            '*' => Token::Star,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ';' => Token::Semicolon,
            '=' => Token::Operator("=".to_string()),
            '<' | '>' => {
                if self.next_if_eq('=') {
                    Token::Operator(format!("{}=", ch))
                } else {
                    Token::Operator(ch.to_string())
                }
            }
            '!' => {
                if self.next_if_eq('=') {
                    Token::Operator("!=".to_string())
                } else {
                    return Err(unexpected(ch, start));
                }
            }
            '\'' | '"' => self.read_quoted(ch, start)?,
            c if is_word_char(c) => self.read_word(start, c),
            c => return Err(unexpected(c, start)),
        };
        Ok(Some(token))
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}
    }

    fn next_if_eq(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, ch)| ch == expected).is_some()
    }

    fn read_word(&mut self, start: usize, first: char) -> Token {
        let mut end = start + first.len_utf8();
        while let Some((idx, ch)) = self.chars.next_if(|&(_, ch)| is_word_char(ch)) {
            end = idx + ch.len_utf8();
        }
        let word = &self.input[start..end];
        keyword(word).unwrap_or_else(|| Token::Word(word.to_string()))
    }

    fn read_quoted(&mut self, quote: char, start: usize) -> Result<Token> {
        let mut text = String::new();
        for (_, ch) in self.chars.by_ref() {
            if ch == quote {
                return Ok(Token::Quoted(text));
            }
            text.push(ch);
        }
        Err(KdTableError::Validation(format!(
            "Unterminated string literal starting at position {}",
            start
        )))
    }
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-' | '+')
}

/// Keyword token for a word, matched case-insensitively.
pub(crate) fn keyword(word: &str) -> Option<Token> {
    match word.to_uppercase().as_str() {
        "SELECT" => Some(Token::Select),
        "FROM" => Some(Token::From),
        "WHERE" => Some(Token::Where),
        "AND" => Some(Token::And),
        "IN" => Some(Token::In),
        _ => None,
    }
}

fn unexpected(ch: char, position: usize) -> KdTableError {
    KdTableError::Validation(format!(
        "Unexpected character '{}' at position {}",
        ch, position
    ))
}

/// Split a query string into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
