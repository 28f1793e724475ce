use std::fmt;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    EndOfFile,
    Illegal,

    // Literals.
    Identifier,
    Integer,
    Real,
    String,

    // Keywords.
    Var,
    Const,
    IntegerType,
    RealType,
    Program,
    Procedure,
    Begin,
    Do,
    End,
    For,
    To,
    While,
    If,
    Then,
    Else,
    Return,
    True,
    False,
    Not,

    // Operators.
    Assign,
    Plus,
    Minus,
    Slash,
    Asterisk,
    LessThan,
    GreaterThan,
    LessEq,
    GreaterEq,
    Equal,
    NotEqual,

    // Punctuation.
    Comma,
    Colon,
    Semicolon,
    LeftParen,
    RightParen,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl TokenKind {
    /// Looks up a scanned word in the keyword table.
    pub fn from_word(word: &str) -> TokenKind {
        match word {
            "var" => TokenKind::Var,
            "const" => TokenKind::Const,
            "integer" => TokenKind::IntegerType,
            "real" => TokenKind::RealType,
            "program" => TokenKind::Program,
            "procedure" => TokenKind::Procedure,
            "begin" => TokenKind::Begin,
            "do" => TokenKind::Do,
            "end" => TokenKind::End,
            "for" => TokenKind::For,
            "to" => TokenKind::To,
            "while" => TokenKind::While,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "not" => TokenKind::Not,
            _ => TokenKind::Identifier,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::EndOfFile => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::String => "STRING",
            TokenKind::Var => "VAR",
            TokenKind::Const => "CONST",
            TokenKind::IntegerType => "INTEGER_KEYWORD",
            TokenKind::RealType => "REAL_KEYWORD",
            TokenKind::Program => "PROGRAM",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Begin => "BEGIN",
            TokenKind::Do => "DO",
            TokenKind::End => "END",
            TokenKind::For => "FOR",
            TokenKind::To => "TO",
            TokenKind::While => "WHILE",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Not => "NOT",
            TokenKind::Assign => ":=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Slash => "/",
            TokenKind::Asterisk => "*",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::LessEq => "<=",
            TokenKind::GreaterEq => ">=",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "<>",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Token {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Self {
        Token::new(TokenKind::EndOfFile, "")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
