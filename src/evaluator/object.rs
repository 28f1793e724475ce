use super::errors::EvalError;
use super::procedure::Procedure;
use crate::frontend::operator::{InfixOperator, PrefixOperator};

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Str(String),
    Null,
    ReturnValue(Box<Object>),
    Error(String),
    Procedure(Procedure),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ObjectType {
    Integer,
    Real,
    Boolean,
    Str,
    Null,
    ReturnValue,
    Error,
    Procedure,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Real => "REAL",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Str => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
            ObjectType::Procedure => "PROCEDURE",
        };
        write!(f, "{}", tag)
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        if value {
            Object::TRUE
        } else {
            Object::FALSE
        }
    }
}

impl Object {
    pub const TRUE: Object = Object::Boolean(true);
    pub const FALSE: Object = Object::Boolean(false);
    pub const NULL: Object = Object::Null;

    pub fn error(error: EvalError) -> Object {
        Object::Error(error.to_string())
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Real(_) => ObjectType::Real,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Str(_) => ObjectType::Str,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
            Object::Procedure(_) => ObjectType::Procedure,
        }
    }

    /// Rendering printed by the shell.
    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(n) => n.to_string(),
            Object::Real(r) => format!("{:?}", r),
            Object::Boolean(true) => "TRUE".to_owned(),
            Object::Boolean(false) => "FALSE".to_owned(),
            Object::Str(s) => s.clone(),
            Object::Null => "NULL".to_owned(),
            Object::ReturnValue(value) => value.inspect(),
            Object::Error(message) => format!("[ERROR]: {}", message),
            Object::Procedure(procedure) => procedure.signature(),
        }
    }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Object::ReturnValue(_))
    }

    /// Errors and return wrappers both unwind to the enclosing call.
    pub fn is_abrupt(&self) -> bool {
        self.is_error() || self.is_return()
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Object) -> Object {
        match op {
            PrefixOperator::LogicalNot => Object::from(!value.is_truthy()),
            PrefixOperator::Negate => match value {
                Object::Integer(n) => Object::Integer(n.wrapping_neg()),
                Object::Real(r) => Object::Real(-r),
                other => Object::error(EvalError::UnknownPrefixOperator(op, other.object_type())),
            },
        }
    }

    pub fn apply_infix_op(op: InfixOperator, lhs: Object, rhs: Object) -> Object {
        match (lhs, rhs) {
            (Object::Integer(a), Object::Integer(b)) => integer_infix_op(op, a, b),
            (Object::Integer(a), Object::Real(b)) => real_infix_op(op, a as f64, b),
            (Object::Real(a), Object::Integer(b)) => real_infix_op(op, a, b as f64),
            (Object::Real(a), Object::Real(b)) => real_infix_op(op, a, b),
            (Object::Str(a), Object::Str(b)) if op == InfixOperator::Add => Object::Str(a + &b),
            (lhs, rhs) => {
                let (lhs_type, rhs_type) = (lhs.object_type(), rhs.object_type());
                if lhs_type != rhs_type {
                    return Object::error(EvalError::TypeMismatch(lhs_type, op, rhs_type));
                }

                match op {
                    InfixOperator::EqualTo => Object::from(lhs == rhs),
                    InfixOperator::NotEqualTo => Object::from(lhs != rhs),
                    _ => Object::error(EvalError::UnknownInfixOperator(lhs_type, op, rhs_type)),
                }
            }
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

fn integer_infix_op(op: InfixOperator, a: i64, b: i64) -> Object {
    match op {
        InfixOperator::Add => Object::Integer(a.wrapping_add(b)),
        InfixOperator::Subtract => Object::Integer(a.wrapping_sub(b)),
        InfixOperator::Multiply => Object::Integer(a.wrapping_mul(b)),
        InfixOperator::Divide => {
            if b != 0 {
                Object::Integer(a.wrapping_div(b))
            } else {
                Object::error(EvalError::DivisionByZero)
            }
        }
        InfixOperator::EqualTo => Object::from(a == b),
        InfixOperator::NotEqualTo => Object::from(a != b),
        InfixOperator::GreaterThan => Object::from(a > b),
        InfixOperator::GreaterEq => Object::from(a >= b),
        InfixOperator::LessThan => Object::from(a < b),
        InfixOperator::LessEq => Object::from(a <= b),
    }
}

fn real_infix_op(op: InfixOperator, a: f64, b: f64) -> Object {
    match op {
        InfixOperator::Add => Object::Real(a + b),
        InfixOperator::Subtract => Object::Real(a - b),
        InfixOperator::Multiply => Object::Real(a * b),
        InfixOperator::Divide => {
            if b != 0.0 {
                Object::Real(a / b)
            } else {
                Object::error(EvalError::DivisionByZero)
            }
        }
        InfixOperator::EqualTo => Object::from(a == b),
        InfixOperator::NotEqualTo => Object::from(a != b),
        InfixOperator::GreaterThan => Object::from(a > b),
        InfixOperator::GreaterEq => Object::from(a >= b),
        InfixOperator::LessThan => Object::from(a < b),
        InfixOperator::LessEq => Object::from(a <= b),
    }
}
