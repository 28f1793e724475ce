use super::operator::{InfixOperator, PrefixOperator};
use super::token::Token;

use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TypeName {
    Integer,
    Real,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Var(Declaration),
    Const(Declaration),
    Assign {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Expression,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
    Block(Block),
    While {
        token: Token,
        condition: Expression,
        body: Block,
    },
    For {
        token: Token,
        variable: Identifier,
        from: Expression,
        to: Expression,
        body: Block,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(Identifier),
    Integer {
        token: Token,
        value: i64,
    },
    Real {
        token: Token,
        value: f64,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Str {
        token: Token,
        value: String,
    },
    Prefix {
        token: Token,
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },
    Conditional {
        token: Token,
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Procedure(Rc<ProcedureLiteral>),
    Call {
        token: Token,
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

/// Shared shape of `var` and `const` declarations.
#[derive(Debug, PartialEq, Clone)]
pub struct Declaration {
    pub token: Token,
    pub name: Identifier,
    pub type_name: TypeName,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Parameter {
    pub ident: Identifier,
    pub type_name: TypeName,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ProcedureLiteral {
    pub token: Token,
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub body: Block,
}

impl TypeName {
    pub fn keyword(&self) -> &str {
        match self {
            TypeName::Integer => "integer",
            TypeName::Real => "real",
        }
    }
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let name = token.literal.clone();
        Identifier { token, name }
    }
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |statement| statement.token_literal())
    }
}

impl Statement {
    pub fn token_literal(&self) -> &str {
        match self {
            Statement::Var(decl) | Statement::Const(decl) => &decl.token.literal,
            Statement::Assign { token, .. }
            | Statement::Return { token, .. }
            | Statement::Expression { token, .. }
            | Statement::While { token, .. }
            | Statement::For { token, .. } => &token.literal,
            Statement::Block(block) => &block.token.literal,
        }
    }
}

impl Expression {
    pub fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(ident) => &ident.token.literal,
            Expression::Procedure(procedure) => &procedure.token.literal,
            Expression::Integer { token, .. }
            | Expression::Real { token, .. }
            | Expression::Boolean { token, .. }
            | Expression::Str { token, .. }
            | Expression::Prefix { token, .. }
            | Expression::Infix { token, .. }
            | Expression::Conditional { token, .. }
            | Expression::Call { token, .. } => &token.literal,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in self.statements.iter() {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let statements: Vec<_> = self.statements.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", statements.join(" "))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.ident, self.type_name)
    }
}

impl fmt::Display for ProcedureLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({}) begin ", self.signature_name(), self.params_string())?;
        write_block_body(f, &self.body)?;
        write!(f, "end")
    }
}

impl ProcedureLiteral {
    fn signature_name(&self) -> String {
        format!("{} {}", self.token.literal, self.name)
    }

    pub fn params_string(&self) -> String {
        let params: Vec<_> = self.params.iter().map(|p| p.to_string()).collect();
        params.join(", ")
    }

    /// Header without the body, e.g. `procedure add(x: integer)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.signature_name(), self.params_string())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Var(decl) | Statement::Const(decl) => write!(
                f,
                "{} {}: {} := {};",
                decl.token.literal, decl.name, decl.type_name, decl.value
            ),
            Statement::Assign { name, value, .. } => write!(f, "{} := {};", name, value),
            Statement::Return { token, value } => write!(f, "{} {};", token.literal, value),
            Statement::Expression { expression, .. } => write!(f, "{}", expression),
            Statement::Block(block) => {
                write!(f, "begin ")?;
                write_block_body(f, block)?;
                write!(f, "end")
            }
            Statement::While {
                condition, body, ..
            } => {
                write!(f, "while {} do ", condition)?;
                write_block_body(f, body)?;
                write!(f, "end")
            }
            Statement::For {
                variable,
                from,
                to,
                body,
                ..
            } => {
                write!(f, "for {} := {} to {} do ", variable, from, to)?;
                write_block_body(f, body)?;
                write!(f, "end")
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::Integer { token, .. } | Expression::Real { token, .. } => {
                write!(f, "{}", token.literal)
            }
            Expression::Boolean { value, .. } => write!(f, "{}", value),
            Expression::Str { value, .. } => write!(f, "\"{}\"", value),
            Expression::Prefix {
                operator, right, ..
            } => match operator {
                PrefixOperator::Negate => write!(f, "({}{})", operator.symbol(), right),
                PrefixOperator::LogicalNot => write!(f, "({} {})", operator.symbol(), right),
            },
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator.symbol(), right),
            Expression::Conditional {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {} then ", condition)?;
                write_block_body(f, consequence)?;
                write!(f, "end")?;
                if let Some(alternative) = alternative {
                    write!(f, " else ")?;
                    write_block_body(f, alternative)?;
                    write!(f, "end")?;
                }
                Ok(())
            }
            Expression::Procedure(procedure) => write!(f, "{}", procedure),
            Expression::Call {
                callee, arguments, ..
            } => {
                let arguments: Vec<_> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", callee, arguments.join(", "))
            }
        }
    }
}

/// Writes each statement followed by a space, so an empty block renders as nothing.
fn write_block_body(f: &mut fmt::Formatter, block: &Block) -> fmt::Result {
    for statement in block.statements.iter() {
        write!(f, "{} ", statement)?;
    }
    Ok(())
}
