//! Tree-walking evaluator.
//!
//! Statements produce an [`Exec`] so that `return` travels up the Rust call
//! stack as an ordinary value until the nearest function call absorbs it;
//! `Err` is reserved for genuine runtime errors, which abort the run.
//!
//! Variable references use the distances recorded by the
//! [`Resolver`](crate::resolver::Resolver): a recorded distance is read
//! directly from that ancestor scope, anything else is a global.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::mem;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::class::KoiClass;
use crate::environment::{EnvRef, Environment};
use crate::error::{KoiError, Result};
use crate::function::KoiFunction;
use crate::natives;
use crate::resolver::Locals;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};
use crate::value::{NativeFn, NativeFunction, Value};

/// Deepest chain of nested calls a script may build before it is stopped.
pub const MAX_CALL_DEPTH: usize = 1024;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Exec {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    locals: HashMap<ExprId, usize>,
    out: Box<dyn Write>,
    input: Option<Box<dyn BufRead>>,
    call_line: usize,
    call_depth: usize,
}

impl Interpreter {
    /// Creates an interpreter printing to stdout, with the native library installed.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    /// Creates an interpreter whose `print` output goes to `out`.
    pub fn with_output<W: Write + 'static>(out: W) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Environment::new().into_ref();

        let mut interpreter = Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out: Box::new(out),
            input: None,
            call_line: 0,
            call_depth: 0,
        };

        natives::install(&mut interpreter);

        interpreter
    }

    /// Expose a host function to scripts as a global.
    pub fn define_native(&mut self, name: &'static str, arity: usize, func: NativeFn) {
        debug!("Defining native function '{}'", name);

        let native = NativeFunction { name, arity, func };

        self.globals
            .borrow_mut()
            .define(name, Value::NativeFunction(Rc::new(native)));
    }

    /// Read lines for `input()` from `input` instead of stdin.
    pub fn with_input<R: BufRead + 'static>(mut self, input: R) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// The sink `print` and prompts write to.
    pub(crate) fn out(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }

    /// One line from the input source, newline included.
    pub(crate) fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        match &mut self.input {
            Some(input) => input.read_line(buf),
            None => io::stdin().read_line(buf),
        }
    }

    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    /// Line of the call expression currently being dispatched.
    pub fn call_line(&self) -> usize {
        self.call_line
    }

    /// Record that expression `id` refers to a binding `depth` scopes out.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.entry(id).or_insert(depth);
    }

    /// Merge a table produced by the resolver.
    pub fn add_locals(&mut self, locals: Locals) {
        for (id, depth) in locals {
            self.resolve(id, depth);
        }
    }

    /// Interprets a list of statements (a "program"), stopping at the first
    /// runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Run `statements` inside `environment`, restoring the current scope on
    /// every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> Result<Exec> {
        let previous: EnvRef = mem::replace(&mut self.environment, environment);

        let result = self.execute_all(statements);

        self.environment = previous;

        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Exec> {
        for stmt in statements {
            if let Exec::Return(value) = self.execute(stmt)? {
                return Ok(Exec::Return(value));
            }
        }

        Ok(Exec::Normal)
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Exec> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Result<Exec> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Defining variable '{}'", name.lexeme);
                self.environment.borrow_mut().define(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                debug!("Entering block with {} statements", statements.len());

                let scope: EnvRef =
                    Environment::with_enclosing(Rc::clone(&self.environment)).into_ref();

                return self.execute_block(statements, scope);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                } else if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Exec::Return(value) = self.execute(body)? {
                        return Ok(Exec::Return(value));
                    }
                }
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                let function = KoiFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Returning value: {}", value);
                return Ok(Exec::Return(value));
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods)?,
        }

        Ok(Exec::Normal)
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<()> {
        debug!("Declaring class '{}'", name.lexeme);

        let superclass: Option<Rc<KoiClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let line: usize = match expr {
                        Expr::Variable { name, .. } => name.line,
                        _ => name.line,
                    };

                    return Err(KoiError::runtime(line, "Superclass must be a class."));
                }
            },
            None => None,
        };

        self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

        // Methods of a subclass close over an extra scope holding `super`.
        let method_scope: EnvRef = match &superclass {
            Some(superclass) => {
                let mut scope = Environment::with_enclosing(Rc::clone(&self.environment));
                scope.define("super", Value::Class(Rc::clone(superclass)));
                scope.into_ref()
            }
            None => Rc::clone(&self.environment),
        };

        let methods: HashMap<String, Rc<KoiFunction>> = methods
            .iter()
            .map(|declaration| {
                let is_initializer: bool = declaration.name.lexeme == "init";
                let method = KoiFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&method_scope),
                    is_initializer,
                );

                (declaration.name.lexeme.clone(), Rc::new(method))
            })
            .collect();

        let class = KoiClass::new(name.lexeme.clone(), superclass, methods);

        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        ensure_sufficient_stack(|| self.evaluate_expr(expr))
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left)?;
                let right: Value = self.evaluate(right)?;

                binary(operator, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left)?;

                let short_circuit: bool = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren, arguments),

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.get(name),
                _ => Err(KoiError::runtime(
                    name.line,
                    "Only instances have properties.",
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(KoiError::runtime(name.line, "Only instances have fields."));
                };

                let value: Value = self.evaluate(value)?;
                instance.set(name, value.clone());

                Ok(value)
            }

            Expr::This { id, keyword } => match self.locals.get(id) {
                Some(&distance) => {
                    Environment::get_keyword_at(&self.environment, distance, "this", keyword.line)
                }
                None => Err(KoiError::runtime(
                    keyword.line,
                    "Can't use 'this' outside of a class.",
                )),
            },

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(KoiError::runtime(
                    operator.line,
                    format!("Operand must be a number, got {}.", other.type_name()),
                )),
            },
            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
            _ => Err(KoiError::runtime(
                operator.line,
                format!("Invalid unary operator '{}'.", operator.lexeme),
            )),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<Value> {
        let callee: Value = self.evaluate(callee)?;

        let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument)?);
        }

        let Some(callable) = callee.as_callable() else {
            return Err(KoiError::runtime(
                paren.line,
                format!(
                    "Can only call functions and classes, got {}.",
                    callee.type_name()
                ),
            ));
        };

        if values.len() != callable.arity() {
            return Err(KoiError::runtime(
                paren.line,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    values.len()
                ),
            ));
        }

        debug!("Calling {} with {} arguments", callee, values.len());

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(KoiError::runtime(paren.line, "Stack overflow."));
        }

        self.call_line = paren.line;
        self.call_depth += 1;

        let result = callable.call(self, values);

        self.call_depth -= 1;

        result
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let Some(&distance) = self.locals.get(&id) else {
            return Err(KoiError::runtime(
                keyword.line,
                "Can't use 'super' outside of a class.",
            ));
        };

        let superclass: Value =
            Environment::get_keyword_at(&self.environment, distance, "super", keyword.line)?;

        // `this` lives in the scope just inside the one holding `super`.
        let object: Value = Environment::get_keyword_at(
            &self.environment,
            distance.saturating_sub(1),
            "this",
            keyword.line,
        )?;

        let (Value::Class(superclass), Value::Instance(instance)) = (superclass, object) else {
            return Err(KoiError::runtime(keyword.line, "Invalid 'super' binding."));
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
            None => Err(KoiError::runtime(
                method.line,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies an arithmetic, comparison or equality operator.
fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    let line: usize = operator.line;

    match operator.token_type {
        TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),
        TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),
        TokenType::PLUS => {
            return match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                (a, b) => Err(KoiError::runtime(
                    line,
                    format!(
                        "Operands of '+' must be two numbers or two strings, got {} and {}.",
                        a.type_name(),
                        b.type_name()
                    ),
                )),
            };
        }
        _ => {}
    }

    let (a, b) = match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => (*a, *b),
        _ => {
            return Err(KoiError::runtime(
                line,
                format!(
                    "Operands of '{}' must be numbers, got {} and {}.",
                    operator.lexeme,
                    left.type_name(),
                    right.type_name()
                ),
            ))
        }
    };

    match operator.token_type {
        TokenType::MINUS => Ok(Value::Number(a - b)),
        TokenType::STAR => Ok(Value::Number(a * b)),
        TokenType::SLASH if b == 0.0 => Err(KoiError::runtime(
            line,
            format!("Division by zero: cannot divide {} by {}.", left, right),
        )),
        TokenType::SLASH => Ok(Value::Number(a / b)),
        TokenType::PERCENT => Ok(Value::Number(a % b)),
        TokenType::GREATER => Ok(Value::Bool(a > b)),
        TokenType::GREATER_EQUAL => Ok(Value::Bool(a >= b)),
        TokenType::LESS => Ok(Value::Bool(a < b)),
        TokenType::LESS_EQUAL => Ok(Value::Bool(a <= b)),
        _ => Err(KoiError::runtime(
            line,
            format!("Invalid binary operator '{}'.", operator.lexeme),
        )),
    }
}
