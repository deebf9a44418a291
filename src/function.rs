use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::environment::{EnvRef, Environment};
use crate::error::Result;
use crate::instance::KoiInstance;
use crate::interpreter::{Exec, Interpreter};
use crate::value::{Callable, Value};

/// A user-defined function or method together with the scope it closes over.
pub struct KoiFunction {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
    is_initializer: bool,
}

impl KoiFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// A copy of this method whose closure defines `this` as `instance`.
    pub fn bind(&self, instance: Rc<KoiInstance>) -> KoiFunction {
        let mut scope = Environment::with_enclosing(Rc::clone(&self.closure));
        scope.define("this", Value::Instance(instance));

        KoiFunction {
            declaration: Rc::clone(&self.declaration),
            closure: scope.into_ref(),
            is_initializer: self.is_initializer,
        }
    }

    fn bound_this(&self) -> Result<Value> {
        Environment::get_keyword_at(&self.closure, 0, "this", self.declaration.name.line)
    }
}

impl Callable for KoiFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        let mut scope = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            scope.define(&param.lexeme, argument);
        }

        let exec: Exec = interpreter.execute_block(&self.declaration.body, scope.into_ref())?;

        // Initializers hand back the instance whatever the body returned.
        if self.is_initializer {
            return self.bound_this();
        }

        match exec {
            Exec::Return(value) => Ok(value),
            Exec::Normal => Ok(Value::Nil),
        }
    }
}

impl fmt::Display for KoiFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

impl fmt::Debug for KoiFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
