use super::token::TokenKind;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    // Lowest precedence
    Lowest,
    Equality,
    Comparison,
    Addition,
    Multiplication,
    Prefix,
    Call, // Highest precedence
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOperator {
    Negate,
    LogicalNot,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterEq,
    LessThan,
    LessEq,
}

impl Precedence {
    /// Binding power of a token in infix position.
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::LeftParen => Precedence::Call,
            _ => InfixOperator::from_token_kind(kind).map_or(Precedence::Lowest, |op| op.precedence()),
        }
    }
}

impl PrefixOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<PrefixOperator> {
        let op = match kind {
            TokenKind::Minus => PrefixOperator::Negate,
            TokenKind::Not => PrefixOperator::LogicalNot,
            _ => return None,
        };

        Some(op)
    }

    pub fn symbol(&self) -> &str {
        match self {
            PrefixOperator::LogicalNot => "not",
            PrefixOperator::Negate => "-",
        }
    }
}

impl InfixOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<InfixOperator> {
        let op = match kind {
            TokenKind::Plus => InfixOperator::Add,
            TokenKind::Minus => InfixOperator::Subtract,
            TokenKind::Asterisk => InfixOperator::Multiply,
            TokenKind::Slash => InfixOperator::Divide,
            TokenKind::Equal => InfixOperator::EqualTo,
            TokenKind::NotEqual => InfixOperator::NotEqualTo,
            TokenKind::GreaterThan => InfixOperator::GreaterThan,
            TokenKind::GreaterEq => InfixOperator::GreaterEq,
            TokenKind::LessThan => InfixOperator::LessThan,
            TokenKind::LessEq => InfixOperator::LessEq,
            _ => return None,
        };

        Some(op)
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            InfixOperator::Add | InfixOperator::Subtract => Precedence::Addition,
            InfixOperator::Multiply | InfixOperator::Divide => Precedence::Multiplication,
            InfixOperator::EqualTo | InfixOperator::NotEqualTo => Precedence::Equality,
            InfixOperator::GreaterEq
            | InfixOperator::LessEq
            | InfixOperator::GreaterThan
            | InfixOperator::LessThan => Precedence::Comparison,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::EqualTo => "==",
            InfixOperator::NotEqualTo => "<>",
            InfixOperator::GreaterThan => ">",
            InfixOperator::GreaterEq => ">=",
            InfixOperator::LessThan => "<",
            InfixOperator::LessEq => "<=",
        }
    }
}
