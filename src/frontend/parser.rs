use super::ast::{Block, Declaration, Expression, Identifier, Parameter, ProcedureLiteral};
use super::ast::{Program, Statement, TypeName};
use super::errors::{ParserError, ParserResult};
use super::lexer::{Lexer, LexerIterator};
use super::operator::{InfixOperator, Precedence, PrefixOperator};
use super::token::{Token, TokenKind};

use log::debug;
use std::iter::Fuse;
use std::rc::Rc;

pub struct Parser<T>
where
    T: Iterator<Item = Token>,
{
    tokens: Fuse<T>,
    current: Token,
    peek: Token,
    errors: Vec<ParserError>,
}

impl<'s> Parser<LexerIterator<'s>> {
    pub fn from_source(source: &'s str) -> Self {
        Parser::new(Lexer::new(source).iter())
    }
}

impl<T> Parser<T>
where
    T: Iterator<Item = Token>,
{
    pub fn new(tokens: T) -> Self {
        let mut parser = Parser {
            tokens: tokens.fuse(),
            current: Token::eof(),
            peek: Token::eof(),
            errors: vec![],
        };

        // Fill current and peek.
        parser.bump();
        parser.bump();
        parser
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Errors rendered as diagnostic messages.
    pub fn diagnostics(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Parses the whole token stream, returning the program only if no errors were found.
    pub fn parse(mut self) -> Result<Program, Vec<ParserError>> {
        let program = self.parse_program();

        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(self.errors)
        }
    }

    /// Parses statements until end of input. Statements that fail to parse are dropped
    /// and their errors recorded.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.check(TokenKind::EndOfFile) {
            if let Some(statement) = self.parse_statement_with_recovery() {
                program.statements.push(statement);
            }
            self.bump();
        }

        program
    }

    /// Advances the stream.
    fn bump(&mut self) {
        let next = self.tokens.next().unwrap_or_else(Token::eof);
        self.current = std::mem::replace(&mut self.peek, next);
    }

    /// Checks whether or not the current token is of the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    /// Moves onto the next token only if it is of the expected kind.
    fn expect_peek(&mut self, expected: TokenKind) -> ParserResult<()> {
        if self.peek_is(expected) {
            self.bump();
            Ok(())
        } else {
            Err(ParserError::UnexpectedToken {
                expected,
                got: self.peek.kind,
            })
        }
    }

    fn expect_type(&mut self) -> ParserResult<TypeName> {
        let type_name = match self.peek.kind {
            TokenKind::IntegerType => TypeName::Integer,
            TokenKind::RealType => TypeName::Real,
            other => return Err(ParserError::ExpectedType(other)),
        };
        self.bump();
        Ok(type_name)
    }

    fn emit_error(&mut self, error: ParserError) {
        debug!("parse error: {}", error);
        self.errors.push(error);
    }

    /// Skips to a `;`, to just before an `end`, or to end of input.
    fn synchronize(&mut self) {
        while !matches!(
            self.current.kind,
            TokenKind::Semicolon | TokenKind::EndOfFile
        ) && !matches!(self.peek.kind, TokenKind::End | TokenKind::EndOfFile)
        {
            self.bump();
        }
    }

    fn parse_statement_with_recovery(&mut self) -> Option<Statement> {
        match self.parse_statement() {
            Ok(statement) => Some(statement),
            Err(err) => {
                self.emit_error(err);
                self.synchronize();
                None
            }
        }
    }

    /// Parses one statement, leaving the current token on its last token.
    fn parse_statement(&mut self) -> ParserResult<Statement> {
        match self.current.kind {
            TokenKind::Var => Ok(Statement::Var(self.parse_declaration()?)),
            TokenKind::Const => Ok(Statement::Const(self.parse_declaration()?)),
            TokenKind::Begin => {
                let block = self.parse_block();
                self.skip_semicolon();
                Ok(Statement::Block(block))
            }
            TokenKind::Return => self.parse_return(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Identifier if self.peek_is(TokenKind::Assign) => self.parse_assignment(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_declaration(&mut self) -> ParserResult<Declaration> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::Identifier)?;
        let name = Identifier::new(self.current.clone());

        self.expect_peek(TokenKind::Colon)?;
        let type_name = self.expect_type()?;

        self.expect_peek(TokenKind::Assign)?;
        self.bump();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Semicolon)?;

        Ok(Declaration {
            token,
            name,
            type_name,
            value,
        })
    }

    fn parse_assignment(&mut self) -> ParserResult<Statement> {
        let token = self.current.clone();
        let name = Identifier::new(token.clone());

        self.expect_peek(TokenKind::Assign)?;
        self.bump();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Assign { token, name, value })
    }

    fn parse_return(&mut self) -> ParserResult<Statement> {
        let token = self.current.clone();

        self.bump();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Return { token, value })
    }

    fn parse_while(&mut self) -> ParserResult<Statement> {
        let token = self.current.clone();

        self.bump();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Do)?;
        let body = self.parse_block();
        self.skip_semicolon();

        Ok(Statement::While {
            token,
            condition,
            body,
        })
    }

    fn parse_for(&mut self) -> ParserResult<Statement> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::Identifier)?;
        let variable = Identifier::new(self.current.clone());

        self.expect_peek(TokenKind::Assign)?;
        self.bump();
        let from = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::To)?;
        self.bump();
        let to = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::Do)?;
        let body = self.parse_block();
        self.skip_semicolon();

        Ok(Statement::For {
            token,
            variable,
            from,
            to,
            body,
        })
    }

    fn parse_expression_statement(&mut self) -> ParserResult<Statement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Expression { token, expression })
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.bump();
        }
    }

    /// Parses statements after the current token up to `end` or end of input.
    fn parse_block(&mut self) -> Block {
        let token = self.current.clone();
        let mut statements = vec![];

        self.bump();
        while !self.check(TokenKind::End) && !self.check(TokenKind::EndOfFile) {
            if let Some(statement) = self.parse_statement_with_recovery() {
                statements.push(statement);
            }
            self.bump();
        }

        Block { token, statements }
    }

    /// Pratt parsing algo.
    pub fn parse_expression(&mut self, min_precedence: Precedence) -> ParserResult<Expression> {
        let mut lhs = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && min_precedence < Precedence::of(self.peek.kind)
        {
            self.bump();

            lhs = match InfixOperator::from_token_kind(self.current.kind) {
                Some(operator) => self.parse_infix_expression(lhs, operator)?,
                // `(` is the only other token that binds above Lowest.
                None => self.parse_call_expression(lhs)?,
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ParserResult<Expression> {
        if let Some(operator) = PrefixOperator::from_token_kind(self.current.kind) {
            return self.parse_prefix_expression(operator);
        }

        let token = self.current.clone();
        let expr = match token.kind {
            TokenKind::Identifier => Expression::Identifier(Identifier::new(token)),
            TokenKind::Integer => match token.literal.parse() {
                Ok(value) => Expression::Integer { token, value },
                Err(_) => return Err(ParserError::InvalidInteger(token.literal)),
            },
            TokenKind::Real => match token.literal.parse() {
                Ok(value) => Expression::Real { token, value },
                Err(_) => return Err(ParserError::InvalidReal(token.literal)),
            },
            TokenKind::String => {
                let value = token.literal.clone();
                Expression::Str { token, value }
            }
            TokenKind::True => Expression::Boolean { token, value: true },
            TokenKind::False => Expression::Boolean {
                token,
                value: false,
            },
            TokenKind::LeftParen => return self.parse_grouped_expression(),
            TokenKind::If => return self.parse_conditional_expression(),
            TokenKind::Procedure => return self.parse_procedure_literal(),
            _ => return Err(ParserError::no_prefix(&token)),
        };

        Ok(expr)
    }

    fn parse_prefix_expression(&mut self, operator: PrefixOperator) -> ParserResult<Expression> {
        let token = self.current.clone();

        self.bump();
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(
        &mut self,
        lhs: Expression,
        operator: InfixOperator,
    ) -> ParserResult<Expression> {
        let token = self.current.clone();

        self.bump();
        let rhs = self.parse_expression(operator.precedence())?;

        Ok(Expression::Infix {
            token,
            left: Box::new(lhs),
            operator,
            right: Box::new(rhs),
        })
    }

    fn parse_grouped_expression(&mut self) -> ParserResult<Expression> {
        self.bump();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;

        Ok(expr)
    }

    fn parse_conditional_expression(&mut self) -> ParserResult<Expression> {
        let token = self.current.clone();

        self.bump();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Then)?;
        let consequence = self.parse_block();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.bump();
            Some(self.parse_block())
        } else {
            None
        };

        Ok(Expression::Conditional {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_procedure_literal(&mut self) -> ParserResult<Expression> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::Identifier)?;
        let name = Identifier::new(self.current.clone());

        self.expect_peek(TokenKind::LeftParen)?;
        let params = self.parse_comma_sep(Self::parse_parameter)?;

        self.expect_peek(TokenKind::Begin)?;
        let body = self.parse_block();

        Ok(Expression::Procedure(Rc::new(ProcedureLiteral {
            token,
            name,
            params,
            body,
        })))
    }

    fn parse_parameter(&mut self) -> ParserResult<Parameter> {
        self.expect_peek(TokenKind::Identifier)?;
        let ident = Identifier::new(self.current.clone());

        self.expect_peek(TokenKind::Colon)?;
        let type_name = self.expect_type()?;

        Ok(Parameter { ident, type_name })
    }

    fn parse_call_expression(&mut self, callee: Expression) -> ParserResult<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_comma_sep(|this| {
            this.bump();
            this.parse_expression(Precedence::Lowest)
        })?;

        Ok(Expression::Call {
            token,
            callee: Box::new(callee),
            arguments,
        })
    }

    /// Parses a parenthesised list whose `(` is the current token. Each item
    /// parser starts on the token before its item.
    fn parse_comma_sep<U, F>(&mut self, item: F) -> ParserResult<Vec<U>>
    where
        F: Fn(&mut Self) -> ParserResult<U>,
    {
        let mut items = vec![];
        if self.peek_is(TokenKind::RightParen) {
            self.bump();
            return Ok(items);
        }

        items.push(item(self)?);
        while self.peek_is(TokenKind::Comma) {
            self.bump();
            items.push(item(self)?);
        }
        self.expect_peek(TokenKind::RightParen)?;

        Ok(items)
    }
}
