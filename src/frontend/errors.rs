use super::token::{Token, TokenKind};

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum ParserError {
    UnexpectedToken { expected: TokenKind, got: TokenKind },
    ExpectedType(TokenKind),
    NoPrefixParseFn(TokenKind),
    InvalidInteger(String),
    InvalidReal(String),
    IllegalToken(String),
}

pub type ParserResult<T> = Result<T, ParserError>;

impl ParserError {
    /// Error for a token that cannot start an expression.
    pub fn no_prefix(token: &Token) -> Self {
        match token.kind {
            TokenKind::Illegal => ParserError::IllegalToken(token.literal.clone()),
            kind => ParserError::NoPrefixParseFn(kind),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParserError::UnexpectedToken { expected, got } => {
                write!(
                    f,
                    "expected next token to be {}, got {} instead",
                    expected, got
                )
            }
            ParserError::ExpectedType(got) => {
                write!(
                    f,
                    "expected next token to be a type (integer or real), got {} instead",
                    got
                )
            }
            ParserError::NoPrefixParseFn(kind) => {
                write!(f, "no prefix parse function for {} found", kind)
            }
            ParserError::InvalidInteger(literal) => {
                write!(f, "could not parse {:?} as integer", literal)
            }
            ParserError::InvalidReal(literal) => write!(f, "could not parse {:?} as real", literal),
            ParserError::IllegalToken(literal) => write!(f, "illegal token {:?}", literal),
        }
    }
}
