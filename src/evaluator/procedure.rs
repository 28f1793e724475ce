use std::fmt;
use std::rc::Rc;

use log::trace;

use super::environment::Environment;
use super::errors::EvalError;
use super::evaluator::Evaluator;
use super::object::Object;
use crate::frontend::ast::ProcedureLiteral;

pub struct ProcedureData {
    literal: Rc<ProcedureLiteral>,
    closure: Environment,
}

/// A procedure value. Clones share the same definition and closure.
#[derive(Clone)]
pub struct Procedure(Rc<ProcedureData>);

impl Procedure {
    pub fn new(literal: Rc<ProcedureLiteral>, closure: Environment) -> Self {
        Procedure(Rc::new(ProcedureData { literal, closure }))
    }

    pub fn name(&self) -> &str {
        &self.0.literal.name.name
    }

    pub fn arity(&self) -> usize {
        self.0.literal.params.len()
    }

    pub fn signature(&self) -> String {
        self.0.literal.signature()
    }

    pub fn execute(&self, args: Vec<Object>, evaluator: &mut Evaluator) -> Object {
        if args.len() != self.arity() {
            return Object::error(EvalError::WrongArity {
                want: self.arity(),
                got: args.len(),
            });
        }
        trace!("calling procedure {} with {} argument(s)", self.name(), args.len());

        let env = Environment::with_enclosing(&self.0.closure);
        for (param, arg) in self.0.literal.params.iter().zip(args.into_iter()) {
            env.define(param.ident.name.clone(), arg);
        }

        let prev_env = evaluator.swap_env(env);
        let result = evaluator.eval_statements(&self.0.literal.body.statements);
        evaluator.swap_env(prev_env);

        match result {
            Some(Object::ReturnValue(value)) => *value,
            Some(value) => value,
            None => Object::NULL,
        }
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<procedure {}>", self.name())
    }
}

impl PartialEq<Procedure> for Procedure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Procedure {}
