use super::cursor::Cursor;
use super::token::{Token, TokenKind};

use log::trace;

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token. Keeps returning `EndOfFile` once the source is exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.cursor.take_while(is_whitespace_char);

            if let Some(token) = self.lex_token() {
                if token.is(TokenKind::Illegal) {
                    trace!("illegal token {:?}", token.literal);
                }
                return token;
            }
        }
    }

    /// Lexes one token. Returns None after skipping a comment.
    fn lex_token(&mut self) -> Option<Token> {
        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => return Some(Token::eof()),
        };

        let token = match ch {
            // Single-character tokens.
            '+' => single(TokenKind::Plus, ch),
            '-' => single(TokenKind::Minus, ch),
            '*' => single(TokenKind::Asterisk, ch),
            '/' => single(TokenKind::Slash, ch),
            '(' => single(TokenKind::LeftParen, ch),
            ')' => single(TokenKind::RightParen, ch),
            ',' => single(TokenKind::Comma, ch),
            ';' => single(TokenKind::Semicolon, ch),
            '!' => single(TokenKind::Not, ch),

            // Comments.
            '{' => {
                self.cursor.take_until(|ch| ch == '}');
                if self.cursor.take_if('}') {
                    return None;
                }
                single(TokenKind::Illegal, ch)
            }

            // Potentially two character tokens.
            '<' => {
                if self.cursor.take_if('>') {
                    Token::new(TokenKind::NotEqual, "<>")
                } else if self.cursor.take_if('=') {
                    Token::new(TokenKind::LessEq, "<=")
                } else {
                    single(TokenKind::LessThan, ch)
                }
            }
            '>' => self.look_for_eq_sign(ch, TokenKind::GreaterThan, TokenKind::GreaterEq),
            ':' => self.look_for_eq_sign(ch, TokenKind::Colon, TokenKind::Assign),
            '=' => self.look_for_eq_sign(ch, TokenKind::Illegal, TokenKind::Equal),

            // String literals.
            '"' => self.lex_string(byte_idx),

            // Numbers.
            _ if is_digit_char(ch) => self.lex_number(byte_idx),

            // Identifiers.
            _ if is_letter_char(ch) => self.lex_identifier_or_kw(byte_idx),

            // Unrecognized token.
            _ => single(TokenKind::Illegal, ch),
        };

        Some(token)
    }

    /// Checks if next char is '='. If so, consume it and return a `double` token.
    /// Otherwise, return a `single` token for `first`.
    fn look_for_eq_sign(&mut self, first: char, single_kind: TokenKind, double: TokenKind) -> Token {
        if self.cursor.take_if('=') {
            Token::new(double, format!("{}=", first))
        } else {
            single(single_kind, first)
        }
    }

    /// Scans string up to next '"'. start_idx is the starting '"'.
    fn lex_string(&mut self, start_idx: usize) -> Token {
        self.cursor.take_until(|ch| ch == '"');

        if self.cursor.take_if('"') {
            let text = self.cursor.slice_from(start_idx);
            Token::new(TokenKind::String, &text[1..text.len() - 1])
        } else {
            Token::new(TokenKind::Illegal, self.cursor.slice_from(start_idx))
        }
    }

    /// Scans an integer, or a real when a '.' is followed by a digit.
    fn lex_number(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_digit_char);

        let mut kind = TokenKind::Integer;
        if let Some((_, '.')) = self.cursor.peek() {
            if self
                .cursor
                .peek_next()
                .map_or(false, |t| is_digit_char(t.1))
            {
                self.cursor.take();
                self.cursor.take_while(is_digit_char);
                kind = TokenKind::Real;
            }
        }

        Token::new(kind, self.cursor.slice_from(start_idx))
    }

    /// Scan up to end of word and return it as identifier. Checks for keywords.
    fn lex_identifier_or_kw(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_letter_char);

        let word = self.cursor.slice_from(start_idx);
        Token::new(TokenKind::from_word(word), word)
    }

    /// Returns an iterator version of lexer.
    pub fn iter(self) -> LexerIterator<'src> {
        LexerIterator { lexer: self }
    }
}

pub struct LexerIterator<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Iterator for LexerIterator<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lexer.next_token();

        if token.is(TokenKind::EndOfFile) {
            return None;
        }

        Some(token)
    }
}

fn single(kind: TokenKind, ch: char) -> Token {
    Token::new(kind, ch.to_string())
}

fn is_whitespace_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_digit_char(ch: char) -> bool {
    ch.is_ascii_digit()
}

// ':' is never part of a word, `x:integer` must split around it.
fn is_letter_char(ch: char) -> bool {
    (ch.is_ascii_alphabetic() || ch == '_') && ch != ':'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source)
            .iter()
            .map(|t| (t.kind, t.literal))
            .collect()
    }

    fn tok(kind: TokenKind, literal: &str) -> (TokenKind, String) {
        (kind, literal.to_owned())
    }

    #[test]
    fn test_declarations_and_procedures() {
        let source = "var five: integer := 5;const ten: integer := 10;
            procedure testing(x: real, y: integer);";

        assert_eq!(
            lex(source),
            vec![
                tok(TokenKind::Var, "var"),
                tok(TokenKind::Identifier, "five"),
                tok(TokenKind::Colon, ":"),
                tok(TokenKind::IntegerType, "integer"),
                tok(TokenKind::Assign, ":="),
                tok(TokenKind::Integer, "5"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Const, "const"),
                tok(TokenKind::Identifier, "ten"),
                tok(TokenKind::Colon, ":"),
                tok(TokenKind::IntegerType, "integer"),
                tok(TokenKind::Assign, ":="),
                tok(TokenKind::Integer, "10"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Procedure, "procedure"),
                tok(TokenKind::Identifier, "testing"),
                tok(TokenKind::LeftParen, "("),
                tok(TokenKind::Identifier, "x"),
                tok(TokenKind::Colon, ":"),
                tok(TokenKind::RealType, "real"),
                tok(TokenKind::Comma, ","),
                tok(TokenKind::Identifier, "y"),
                tok(TokenKind::Colon, ":"),
                tok(TokenKind::IntegerType, "integer"),
                tok(TokenKind::RightParen, ")"),
                tok(TokenKind::Semicolon, ";"),
            ]
        );
    }

    #[test]
    fn test_operators_and_control_flow() {
        let source = "if 5 <= 10 then
                begin
                    5 / 5;
                    10.5 * 10.5;
                end
            else
                10.7;
            10 == 10; 10 <> 9; a >= b; not x - y";

        assert_eq!(
            lex(source),
            vec![
                tok(TokenKind::If, "if"),
                tok(TokenKind::Integer, "5"),
                tok(TokenKind::LessEq, "<="),
                tok(TokenKind::Integer, "10"),
                tok(TokenKind::Then, "then"),
                tok(TokenKind::Begin, "begin"),
                tok(TokenKind::Integer, "5"),
                tok(TokenKind::Slash, "/"),
                tok(TokenKind::Integer, "5"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Real, "10.5"),
                tok(TokenKind::Asterisk, "*"),
                tok(TokenKind::Real, "10.5"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::End, "end"),
                tok(TokenKind::Else, "else"),
                tok(TokenKind::Real, "10.7"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Integer, "10"),
                tok(TokenKind::Equal, "=="),
                tok(TokenKind::Integer, "10"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Integer, "10"),
                tok(TokenKind::NotEqual, "<>"),
                tok(TokenKind::Integer, "9"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Identifier, "a"),
                tok(TokenKind::GreaterEq, ">="),
                tok(TokenKind::Identifier, "b"),
                tok(TokenKind::Semicolon, ";"),
                tok(TokenKind::Not, "not"),
                tok(TokenKind::Identifier, "x"),
                tok(TokenKind::Minus, "-"),
                tok(TokenKind::Identifier, "y"),
            ]
        );
    }

    #[test]
    fn test_bang_is_not() {
        assert_eq!(
            lex("!done"),
            vec![tok(TokenKind::Not, "!"), tok(TokenKind::Identifier, "done")]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            lex("{just a comment} foo := 5 {another}"),
            vec![
                tok(TokenKind::Identifier, "foo"),
                tok(TokenKind::Assign, ":="),
                tok(TokenKind::Integer, "5"),
            ]
        );
        assert_eq!(lex("1 {never closed"), vec![tok(TokenKind::Integer, "1"), tok(TokenKind::Illegal, "{")]);
        assert_eq!(lex("}"), vec![tok(TokenKind::Illegal, "}")]);
    }

    #[test]
    fn test_number_boundaries() {
        assert_eq!(lex("10.5"), vec![tok(TokenKind::Real, "10.5")]);
        assert_eq!(lex("10"), vec![tok(TokenKind::Integer, "10")]);
        assert_eq!(
            lex("10."),
            vec![tok(TokenKind::Integer, "10"), tok(TokenKind::Illegal, ".")]
        );
        assert_eq!(
            lex("1.2.3"),
            vec![
                tok(TokenKind::Real, "1.2"),
                tok(TokenKind::Illegal, "."),
                tok(TokenKind::Integer, "3"),
            ]
        );
    }

    #[test]
    fn test_colon_and_equals() {
        assert_eq!(lex(":"), vec![tok(TokenKind::Colon, ":")]);
        assert_eq!(lex(":="), vec![tok(TokenKind::Assign, ":=")]);
        assert_eq!(lex("= 1"), vec![tok(TokenKind::Illegal, "="), tok(TokenKind::Integer, "1")]);
        assert_eq!(
            lex("x:integer"),
            vec![
                tok(TokenKind::Identifier, "x"),
                tok(TokenKind::Colon, ":"),
                tok(TokenKind::IntegerType, "integer"),
            ]
        );
    }

    #[test]
    fn test_strings_and_illegal_chars() {
        assert_eq!(lex("\"hello world\""), vec![tok(TokenKind::String, "hello world")]);
        assert_eq!(lex("\"open"), vec![tok(TokenKind::Illegal, "\"open")]);
        assert_eq!(lex("@ é"), vec![tok(TokenKind::Illegal, "@"), tok(TokenKind::Illegal, "é")]);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            lex("Var begin_x end"),
            vec![
                tok(TokenKind::Identifier, "Var"),
                tok(TokenKind::Identifier, "begin_x"),
                tok(TokenKind::End, "end"),
            ]
        );
    }

    #[test]
    fn test_end_of_file_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Identifier, "x"));
        assert_eq!(lexer.next_token(), Token::eof());
        assert_eq!(lexer.next_token(), Token::eof());
        assert_eq!(lexer.next_token(), Token::eof());
    }
}
