use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::errors::EvalError;
use super::object::Object;

#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

struct EnvironmentData {
    values: HashMap<String, Binding>,
    enclosing: Option<Environment>,
}

struct Binding {
    value: Object,
    constant: bool,
}

impl Environment {
    pub fn new() -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: None,
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    pub fn with_enclosing(env: &Environment) -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(env.clone()),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// Binds a mutable name in this scope, shadowing whatever was there.
    pub fn define(&self, name: String, value: Object) {
        let binding = Binding {
            value,
            constant: false,
        };
        self.env_ptr.borrow_mut().values.insert(name, binding);
    }

    /// Like `define`, but refuses to replace a constant bound in this scope.
    pub fn declare(&self, name: String, value: Object, constant: bool) -> Result<(), EvalError> {
        let mut data = self.env_ptr.borrow_mut();
        if let Some(existing) = data.values.get(&name) {
            if existing.constant {
                return Err(EvalError::ConstantRedeclaration(name));
            }
        }
        data.values.insert(name, Binding { value, constant });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        let data = self.env_ptr.borrow();
        match data.values.get(name) {
            Some(binding) => Some(binding.value.clone()),
            None => data.enclosing.as_ref().and_then(|env| env.get(name)),
        }
    }

    /// Updates the nearest binding of `name` along the enclosing chain.
    pub fn assign(&self, name: &str, value: Object) -> Result<(), EvalError> {
        let mut data = self.env_ptr.borrow_mut();
        if let Some(binding) = data.values.get_mut(name) {
            if binding.constant {
                return Err(EvalError::ConstantAssignment(name.to_owned()));
            }
            binding.value = value;
            return Ok(());
        }

        match &data.enclosing {
            Some(env) => env.assign(name, value),
            None => Err(EvalError::IdentifierNotFound(name.to_owned())),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let data = self.env_ptr.borrow();
        let mut names: Vec<_> = data.values.keys().collect();
        names.sort();
        write!(f, "<env {:?}>", names)
    }
}
