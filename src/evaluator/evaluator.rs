use std::rc::Rc;

use log::debug;

use super::environment::Environment;
use super::errors::EvalError;
use super::object::Object;
use super::procedure::Procedure;

pub const MAX_CALL_DEPTH: usize = 200;
use crate::frontend::ast::{
    Block, Declaration, Expression, Identifier, ProcedureLiteral, Program, Statement,
};

/// Tree-walking evaluator. The global environment lives as long as the
/// evaluator, so successive programs share bindings.
pub struct Evaluator {
    env: Environment,
    call_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            env: Environment::new(),
            call_depth: 0,
        }
    }

    pub fn swap_env(&mut self, mut env: Environment) -> Environment {
        std::mem::swap(&mut self.env, &mut env);
        env
    }

    pub fn eval_program(&mut self, program: &Program) -> Option<Object> {
        let mut result = None;
        for stmt in program.statements.iter() {
            match self.eval_statement(stmt) {
                Some(Object::ReturnValue(value)) => return Some(*value),
                Some(Object::Error(message)) => {
                    debug!("evaluation stopped: {}", message);
                    return Some(Object::Error(message));
                }
                other => result = other,
            }
        }
        result
    }

    /// Evaluates top-level statements one at a time and collects every value
    /// they produce. Stops after the first error or return, whose value is the
    /// last one collected.
    pub fn eval_each(&mut self, program: &Program) -> Vec<Object> {
        let mut values = vec![];
        for stmt in program.statements.iter() {
            match self.eval_statement(stmt) {
                Some(Object::ReturnValue(value)) => {
                    values.push(*value);
                    break;
                }
                Some(obj) if obj.is_error() => {
                    debug!("evaluation stopped: {}", obj.inspect());
                    values.push(obj);
                    break;
                }
                Some(obj) => values.push(obj),
                None => {}
            }
        }
        values
    }

    /// Evaluates statements in the current environment, stopping at the first
    /// return or error.
    pub fn eval_statements(&mut self, stmts: &[Statement]) -> Option<Object> {
        let mut result = None;
        for stmt in stmts.iter() {
            let value = self.eval_statement(stmt);
            if value.as_ref().map_or(false, Object::is_abrupt) {
                return value;
            }
            result = value;
        }
        result
    }

    pub fn eval_statement(&mut self, stmt: &Statement) -> Option<Object> {
        match stmt {
            Statement::Var(decl) => self.eval_declaration(decl, false),
            Statement::Const(decl) => self.eval_declaration(decl, true),
            Statement::Assign { name, value, .. } => self.eval_assignment(name, value),
            Statement::Return { value, .. } => {
                let value = self.eval_expression(value);
                if value.is_abrupt() {
                    return Some(value);
                }
                Some(Object::ReturnValue(Box::new(value)))
            }
            Statement::Expression { expression, .. } => Some(self.eval_expression(expression)),
            Statement::Block(block) => self.eval_block(block),
            Statement::While {
                condition, body, ..
            } => self.eval_while(condition, body),
            Statement::For {
                variable,
                from,
                to,
                body,
                ..
            } => self.eval_for(variable, from, to, body),
        }
    }

    fn eval_block(&mut self, block: &Block) -> Option<Object> {
        let child = Environment::with_enclosing(&self.env);
        let prev_env = self.swap_env(child);
        let result = self.eval_statements(&block.statements);
        self.swap_env(prev_env);
        result
    }

    fn eval_declaration(&mut self, decl: &Declaration, constant: bool) -> Option<Object> {
        let value = self.eval_expression(&decl.value);
        if value.is_abrupt() {
            return Some(value);
        }

        match self.env.declare(decl.name.name.clone(), value, constant) {
            Ok(()) => None,
            Err(e) => Some(Object::error(e)),
        }
    }

    fn eval_assignment(&mut self, name: &Identifier, value: &Expression) -> Option<Object> {
        let value = self.eval_expression(value);
        if value.is_abrupt() {
            return Some(value);
        }

        match self.env.assign(&name.name, value) {
            Ok(()) => None,
            Err(e) => Some(Object::error(e)),
        }
    }

    fn eval_while(&mut self, condition: &Expression, body: &Block) -> Option<Object> {
        loop {
            let condition = self.eval_expression(condition);
            if condition.is_abrupt() {
                return Some(condition);
            }
            if !condition.is_truthy() {
                return None;
            }

            if let Some(obj) = self.eval_block(body) {
                if obj.is_abrupt() {
                    return Some(obj);
                }
            }
        }
    }

    fn eval_for(
        &mut self,
        variable: &Identifier,
        from: &Expression,
        to: &Expression,
        body: &Block,
    ) -> Option<Object> {
        let from = self.eval_expression(from);
        if from.is_abrupt() {
            return Some(from);
        }
        let to = self.eval_expression(to);
        if to.is_abrupt() {
            return Some(to);
        }

        let (from, to) = match (from, to) {
            (Object::Integer(from), Object::Integer(to)) => (from, to),
            (Object::Integer(_), other) | (other, _) => {
                return Some(Object::error(EvalError::NonIntegerBound(
                    other.object_type(),
                )))
            }
        };

        let loop_env = Environment::with_enclosing(&self.env);
        let prev_env = self.swap_env(loop_env);
        let mut result = None;
        for i in from..=to {
            self.env.define(variable.name.clone(), Object::Integer(i));
            if let Some(obj) = self.eval_block(body) {
                if obj.is_abrupt() {
                    result = Some(obj);
                    break;
                }
            }
        }
        self.swap_env(prev_env);
        result
    }

    pub fn eval_expression(&mut self, expr: &Expression) -> Object {
        match expr {
            Expression::Identifier(ident) => match self.env.get(&ident.name) {
                Some(value) => value,
                None => Object::error(EvalError::IdentifierNotFound(ident.name.clone())),
            },
            Expression::Integer { value, .. } => Object::Integer(*value),
            Expression::Real { value, .. } => Object::Real(*value),
            Expression::Boolean { value, .. } => Object::from(*value),
            Expression::Str { value, .. } => Object::Str(value.clone()),
            Expression::Prefix {
                operator, right, ..
            } => {
                let right = self.eval_expression(right);
                if right.is_abrupt() {
                    return right;
                }
                Object::apply_prefix_op(*operator, right)
            }
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.eval_expression(left);
                if left.is_abrupt() {
                    return left;
                }
                let right = self.eval_expression(right);
                if right.is_abrupt() {
                    return right;
                }
                Object::apply_infix_op(*operator, left, right)
            }
            Expression::Conditional {
                condition,
                consequence,
                alternative,
                ..
            } => self.eval_conditional(condition, consequence, alternative.as_ref()),
            Expression::Procedure(literal) => self.eval_procedure_literal(literal),
            Expression::Call {
                callee, arguments, ..
            } => self.eval_call(callee, arguments),
        }
    }

    fn eval_conditional(
        &mut self,
        condition: &Expression,
        consequence: &Block,
        alternative: Option<&Block>,
    ) -> Object {
        let condition = self.eval_expression(condition);
        if condition.is_abrupt() {
            return condition;
        }

        let branch = if condition.is_truthy() {
            Some(consequence)
        } else {
            alternative
        };

        branch
            .and_then(|block| self.eval_block(block))
            .unwrap_or(Object::NULL)
    }

    fn eval_procedure_literal(&mut self, literal: &Rc<ProcedureLiteral>) -> Object {
        let procedure = Object::Procedure(Procedure::new(literal.clone(), self.env.clone()));
        match self
            .env
            .declare(literal.name.name.clone(), procedure.clone(), false)
        {
            Ok(()) => procedure,
            Err(e) => Object::error(e),
        }
    }

    fn eval_call(&mut self, callee: &Expression, arguments: &[Expression]) -> Object {
        let procedure = match self.eval_expression(callee) {
            Object::Procedure(procedure) => procedure,
            other if other.is_abrupt() => return other,
            other => return Object::error(EvalError::NotAProcedure(other.object_type())),
        };

        let mut args = Vec::with_capacity(arguments.len());
        for arg in arguments.iter() {
            let value = self.eval_expression(arg);
            if value.is_abrupt() {
                return value;
            }
            args.push(value);
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Object::error(EvalError::CallDepthExceeded(MAX_CALL_DEPTH));
        }
        self.call_depth += 1;
        let result = procedure.execute(args, self);
        self.call_depth -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Parser;

    fn eval(source: &str) -> Option<Object> {
        let program = Parser::from_source(source)
            .parse()
            .expect("source should parse");
        Evaluator::new().eval_program(&program)
    }

    fn eval_ok(source: &str) -> Object {
        eval(source).expect("program should produce a value")
    }

    fn assert_error(source: &str, message: &str) {
        assert_eq!(eval_ok(source), Object::Error(message.to_owned()), "{}", source);
    }

    #[test]
    fn test_integer_expressions() {
        let cases = [
            ("5", 5),
            ("-10", -10),
            ("5 + 5 * 2;", 15),
            ("(5 + 5) * 2", 20),
            ("50 / 2 * 2 + 10", 60),
            ("-7 / 2", -3),
            ("2 * (5 + 10) - -3", 33),
        ];
        for (source, expected) in cases {
            assert_eq!(eval_ok(source), Object::Integer(expected), "{}", source);
        }
    }

    #[test]
    fn test_real_expressions() {
        assert_eq!(eval_ok("10.5"), Object::Real(10.5));
        assert_eq!(eval_ok("1.5 * 2"), Object::Real(3.0));
        assert_eq!(eval_ok("1 / 4.0"), Object::Real(0.25));
        assert_eq!(eval_ok("-2.5"), Object::Real(-2.5));
    }

    #[test]
    fn test_boolean_expressions() {
        let cases = [
            ("true", true),
            ("not true", false),
            ("not not true", true),
            ("not 5", false),
            ("1 < 2", true),
            ("2 <= 2", true),
            ("3 >= 4", false),
            ("1 <> 2", true),
            ("true == true", true),
            ("(1 < 2) == false", false),
            ("1.5 > 1", true),
        ];
        for (source, expected) in cases {
            assert_eq!(eval_ok(source), Object::from(expected), "{}", source);
        }
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            eval_ok("\"Hello\" + \" \" + \"World\""),
            Object::Str("Hello World".to_owned())
        );
        assert_eq!(eval_ok("\"a\" == \"a\""), Object::TRUE);
    }

    #[test]
    fn test_conditionals() {
        assert_eq!(eval_ok("if 0 then 1 end"), Object::Integer(1));
        assert_eq!(eval_ok("if true then 10 end"), Object::Integer(10));
        assert_eq!(eval_ok("if false then 10 end"), Object::NULL);
        assert_eq!(eval_ok("if 1 > 2 then 10 end else 20 end"), Object::Integer(20));
        assert_eq!(eval_ok("if true then end"), Object::NULL);
    }

    #[test]
    fn test_return_stops_evaluation() {
        assert_eq!(eval_ok("9; return 10; 9;"), Object::Integer(10));
        assert_eq!(eval_ok("return 2 * 5; 9;"), Object::Integer(10));
        assert_eq!(
            eval_ok("if 10 > 1 then if 10 > 1 then return 10; end return 1; end"),
            Object::Integer(10)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_error("-true;", "unknown operator: -BOOLEAN");
        assert_error("5 + true;", "type mismatch: INTEGER + BOOLEAN");
        assert_error("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN");
        assert_error("true + false;", "unknown operator: BOOLEAN + BOOLEAN");
        assert_error("begin true + false; 5 end", "unknown operator: BOOLEAN + BOOLEAN");
        assert_error(
            "if 10 > 1 then true + false; 1 end",
            "unknown operator: BOOLEAN + BOOLEAN",
        );
        assert_error("foobar", "identifier not found: foobar");
        assert_error("10 / 0", "division by zero");
        assert_error("1.0 / 0", "division by zero");
        assert_error("\"a\" - \"b\"", "unknown operator: STRING - STRING");
        assert_error("5(1)", "not a procedure: INTEGER");
        assert_error("-(1 + true)", "type mismatch: INTEGER + BOOLEAN");
    }

    #[test]
    fn test_declarations() {
        assert_eq!(eval_ok("var a: integer := 5; a;"), Object::Integer(5));
        assert_eq!(
            eval_ok("var a: integer := 5; var b: integer := a * 2; b;"),
            Object::Integer(10)
        );
        assert_eq!(eval_ok("const c: real := 2.5; c * 2;"), Object::Real(5.0));
        assert_eq!(eval("var a: integer := 5;"), None);
        assert_error("var a: integer := b;", "identifier not found: b");
    }

    #[test]
    fn test_constants_are_immutable() {
        assert_error(
            "const c: integer := 1; c := 2;",
            "cannot assign to constant: c",
        );
        assert_error(
            "const c: integer := 1; var c: integer := 2;",
            "cannot redeclare constant: c",
        );
        assert_eq!(
            eval_ok("const c: integer := 1; begin var c: integer := 2; c end"),
            Object::Integer(2)
        );
    }

    #[test]
    fn test_assignment() {
        assert_eq!(eval_ok("var x: integer := 1; x := x + 1; x"), Object::Integer(2));
        assert_eq!(
            eval_ok("var x: integer := 1; begin x := 5; end x"),
            Object::Integer(5)
        );
        assert_error("y := 1;", "identifier not found: y");
    }

    #[test]
    fn test_blocks_have_their_own_scope() {
        assert_error(
            "begin var inner: integer := 1; end inner",
            "identifier not found: inner",
        );
        assert_eq!(
            eval_ok("var x: integer := 1; begin var x: integer := 2; end x"),
            Object::Integer(1)
        );
    }

    #[test]
    fn test_procedure_literal() {
        let obj = eval_ok("procedure add(x: integer, y: integer) begin x + y end");
        match obj {
            Object::Procedure(procedure) => {
                assert_eq!(procedure.name(), "add");
                assert_eq!(procedure.arity(), 2);
                assert_eq!(
                    procedure.signature(),
                    "procedure add(x: integer, y: integer)"
                );
            }
            other => panic!("expected a procedure, got {:?}", other),
        }
    }

    #[test]
    fn test_procedure_calls() {
        let cases = [
            ("procedure id(x: integer) begin x end; id(5);", 5),
            ("procedure id(x: integer) begin return x; end; id(5);", 5),
            ("procedure double(x: integer) begin x * 2 end; double(5);", 10),
            (
                "procedure add(x: integer, y: integer) begin x + y end; add(5, add(5, 5));",
                15,
            ),
            ("procedure five() begin return 5; 10 end five()", 5),
        ];
        for (source, expected) in cases {
            assert_eq!(eval_ok(source), Object::Integer(expected), "{}", source);
        }
        assert_eq!(eval_ok("procedure nothing() begin end nothing()"), Object::NULL);
    }

    #[test]
    fn test_call_errors() {
        assert_error(
            "procedure id(x: integer) begin x end; id(1, 2);",
            "wrong number of arguments: want=1, got=2",
        );
        assert_error(
            "procedure id(x: integer) begin x end; id(missing);",
            "identifier not found: missing",
        );
        assert_error("missing(1)", "identifier not found: missing");
    }

    #[test]
    fn test_closures() {
        let source = "
            procedure adder(x: integer) begin
                procedure add(y: integer) begin x + y end
            end
            var addTwo: integer := adder(2);
            addTwo(3);
        ";
        assert_eq!(eval_ok(source), Object::Integer(5));
    }

    #[test]
    fn test_recursion() {
        let source = "
            procedure fib(n: integer) begin
                if n < 2 then return n; end
                return fib(n - 1) + fib(n - 2);
            end
            fib(15);
        ";
        assert_eq!(eval_ok(source), Object::Integer(610));
    }

    #[test]
    fn test_while_loop() {
        let source = "
            var i: integer := 0;
            var total: integer := 0;
            while i < 5 do
                i := i + 1;
                total := total + i;
            end
            total
        ";
        assert_eq!(eval_ok(source), Object::Integer(15));
        assert_eq!(eval("while false do 1 end"), None);
    }

    #[test]
    fn test_for_loop() {
        let source = "
            var total: integer := 0;
            for i := 1 to 4 do total := total + i; end
            total
        ";
        assert_eq!(eval_ok(source), Object::Integer(10));
        assert_eq!(
            eval_ok("var n: integer := 0; for i := 5 to 1 do n := 1; end n"),
            Object::Integer(0)
        );
        assert_error("for i := 1 to 3 do end i", "identifier not found: i");
        assert_error(
            "for i := 1 to 2.5 do end",
            "for loop bounds must be INTEGER, got REAL",
        );
        assert_error(
            "for i := true to 2 do end",
            "for loop bounds must be INTEGER, got BOOLEAN",
        );
    }

    #[test]
    fn test_return_from_loop_inside_procedure() {
        let source = "
            procedure first_over(limit: integer) begin
                for i := 1 to 100 do
                    if i * i > limit then return i; end
                end
                return 0;
            end
            first_over(50);
        ";
        assert_eq!(eval_ok(source), Object::Integer(8));
    }

    #[test]
    fn test_eval_each_collects_values() {
        let program = Parser::from_source("var x: integer := 1; x; x + 1; -true; x")
            .parse()
            .expect("source should parse");
        let values = Evaluator::new().eval_each(&program);
        let rendered: Vec<_> = values.iter().map(Object::inspect).collect();
        assert_eq!(
            rendered,
            vec!["1", "2", "[ERROR]: unknown operator: -BOOLEAN"]
        );
    }

    #[test]
    fn test_return_inside_nested_expressions() {
        let cases = [
            "procedure f() begin var x: integer := if true then return 5; end; 99 end f()",
            "procedure f() begin var x: integer := 1; x := if true then return 5; end; 99 end f()",
            "procedure g(x: integer) begin 99 end
             procedure f() begin g(if true then return 5; end); 99 end f()",
            "procedure f() begin (if true then return 5; end) + 1 end f()",
            "procedure f() begin 1 + (if true then return 5; end) end f()",
            "procedure f() begin -(if true then return 5; end) end f()",
            "procedure f() begin while if true then return 5; end do end 99 end f()",
            "procedure f() begin for i := 1 to if true then return 5; end do end 99 end f()",
            "procedure f() begin if (if true then return 5; end) then 99 end end f()",
        ];
        for source in cases {
            assert_eq!(eval_ok(source), Object::Integer(5), "{}", source);
        }
    }

    #[test]
    fn test_top_level_return_in_initializer_stops_program() {
        let program = Parser::from_source("var x: integer := if true then return 5; end; 7")
            .parse()
            .expect("source should parse");
        let values = Evaluator::new().eval_each(&program);
        assert_eq!(values, vec![Object::Integer(5)]);
    }

    #[test]
    fn test_runaway_recursion_is_an_error() {
        // Debug builds need more than the default test thread stack to reach the limit.
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let mut evaluator = Evaluator::new();
                let program = Parser::from_source("procedure f() begin f() end f()")
                    .parse()
                    .expect("source should parse");
                let result = evaluator.eval_program(&program).map(|obj| obj.inspect());

                let follow_up = Parser::from_source("procedure one() begin 1 end one()")
                    .parse()
                    .expect("source should parse");
                let after = evaluator.eval_program(&follow_up).map(|obj| obj.inspect());
                (result, after)
            })
            .expect("thread should spawn");

        let (result, after) = handle.join().expect("evaluation should not crash");
        assert_eq!(
            result.as_deref(),
            Some("[ERROR]: maximum call depth of 200 exceeded")
        );
        assert_eq!(after.as_deref(), Some("1"));
    }

    #[test]
    fn test_state_persists_across_programs() {
        let mut evaluator = Evaluator::new();
        let first = Parser::from_source("var x: integer := 41;")
            .parse()
            .expect("source should parse");
        let second = Parser::from_source("x + 1")
            .parse()
            .expect("source should parse");

        assert_eq!(evaluator.eval_program(&first), None);
        assert_eq!(evaluator.eval_program(&second), Some(Object::Integer(42)));
    }
}
