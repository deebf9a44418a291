use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::error::Result;
use crate::function::KoiFunction;
use crate::instance::KoiInstance;
use crate::interpreter::Interpreter;
use crate::value::{Callable, Value};

const INITIALIZER: &str = "init";

/// A class: its own methods plus a link to the superclass. Inherited methods
/// are found by walking that link, never copied.
pub struct KoiClass {
    name: String,
    superclass: Option<Rc<KoiClass>>,
    methods: HashMap<String, Rc<KoiFunction>>,
}

impl KoiClass {
    pub fn new(
        name: String,
        superclass: Option<Rc<KoiClass>>,
        methods: HashMap<String, Rc<KoiFunction>>,
    ) -> Self {
        Self {
            name,
            superclass,
            methods,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn superclass(&self) -> Option<&Rc<KoiClass>> {
        self.superclass.as_ref()
    }

    pub fn find_method(&self, name: &str) -> Option<Rc<KoiFunction>> {
        match self.methods.get(name) {
            Some(method) => Some(Rc::clone(method)),
            None => self
                .superclass
                .as_ref()
                .and_then(|superclass| superclass.find_method(name)),
        }
    }
}

/// Calling a class constructs an instance and runs `init` if one exists
/// anywhere on the chain.
impl Callable for Rc<KoiClass> {
    fn arity(&self) -> usize {
        self.find_method(INITIALIZER)
            .map_or(0, |initializer| initializer.arity())
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        debug!("Instantiating class '{}'", self.name);

        let instance: Rc<KoiInstance> = Rc::new(KoiInstance::new(Rc::clone(self)));

        if let Some(initializer) = self.find_method(INITIALIZER) {
            initializer
                .bind(Rc::clone(&instance))
                .call(interpreter, arguments)?;
        }

        Ok(Value::Instance(instance))
    }
}

impl fmt::Debug for KoiClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}
