use super::object::ObjectType;
use crate::frontend::operator::{InfixOperator, PrefixOperator};

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum EvalError {
    UnknownPrefixOperator(PrefixOperator, ObjectType),
    UnknownInfixOperator(ObjectType, InfixOperator, ObjectType),
    TypeMismatch(ObjectType, InfixOperator, ObjectType),
    DivisionByZero,
    IdentifierNotFound(String),
    ConstantAssignment(String),
    ConstantRedeclaration(String),
    NotAProcedure(ObjectType),
    WrongArity { want: usize, got: usize },
    NonIntegerBound(ObjectType),
    CallDepthExceeded(usize),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::UnknownPrefixOperator(op, operand) => {
                write!(f, "unknown operator: {}{}", op.symbol(), operand)
            }
            EvalError::UnknownInfixOperator(lhs, op, rhs) => {
                write!(f, "unknown operator: {} {} {}", lhs, op.symbol(), rhs)
            }
            EvalError::TypeMismatch(lhs, op, rhs) => {
                write!(f, "type mismatch: {} {} {}", lhs, op.symbol(), rhs)
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::IdentifierNotFound(name) => write!(f, "identifier not found: {}", name),
            EvalError::ConstantAssignment(name) => {
                write!(f, "cannot assign to constant: {}", name)
            }
            EvalError::ConstantRedeclaration(name) => {
                write!(f, "cannot redeclare constant: {}", name)
            }
            EvalError::NotAProcedure(found) => write!(f, "not a procedure: {}", found),
            EvalError::WrongArity { want, got } => {
                write!(f, "wrong number of arguments: want={}, got={}", want, got)
            }
            EvalError::NonIntegerBound(found) => {
                write!(f, "for loop bounds must be INTEGER, got {}", found)
            }
            EvalError::CallDepthExceeded(limit) => {
                write!(f, "maximum call depth of {} exceeded", limit)
            }
        }
    }
}
