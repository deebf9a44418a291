use crate::error::{KoiError, Result};
use crate::token::Token;
use crate::value::Value;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope. Closures keep their defining scope alive by
/// holding one of these.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope. The parent link is fixed at construction.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap in the shared handle used by the interpreter.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    pub fn enclosing(&self) -> Option<&EnvRef> {
        self.enclosing.as_ref()
    }

    /// Bind `name` in this scope, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        trace!("define '{}' = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up along the whole chain.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Overwrite an existing binding along the chain; never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Walk `distance` parent links from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> EnvRef {
        let mut current: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let parent: Option<EnvRef> = current.borrow().enclosing.clone();

            match parent {
                Some(parent) => current = parent,
                // The resolver never records a distance deeper than the chain.
                None => break,
            }
        }

        current
    }

    /// Read `name` from exactly the scope `distance` links up.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        Self::ancestor(env, distance)
            .borrow()
            .values
            .get(&name.lexeme)
            .cloned()
            .ok_or_else(|| undefined(name))
    }

    /// Like [`Self::get_at`] for the implicit `this` / `super` bindings.
    pub fn get_keyword_at(env: &EnvRef, distance: usize, keyword: &str, line: usize) -> Result<Value> {
        Self::ancestor(env, distance)
            .borrow()
            .values
            .get(keyword)
            .cloned()
            .ok_or_else(|| KoiError::runtime(line, format!("Undefined variable '{}'.", keyword)))
    }

    /// Write `name` in exactly the scope `distance` links up.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        let target: EnvRef = Self::ancestor(env, distance);
        let mut scope = target.borrow_mut();

        match scope.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(undefined(name)),
        }
    }
}

fn undefined(name: &Token) -> KoiError {
    KoiError::runtime(name.line, format!("Undefined variable '{}'.", name.lexeme))
}
