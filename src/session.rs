//! The full pipeline behind one interpreter: scan → parse → resolve → run.
//!
//! A [`Koi`] keeps its interpreter (and so its globals) between calls to
//! [`Koi::run`], which is what the REPL needs. It also carries the
//! expression-id counter forward so nodes from different runs never share a
//! slot in the interpreter's distance table.

use std::io::Write;

use log::{debug, info};

use crate::ast::{ExprId, Stmt};
use crate::error::{Diagnostics, RunError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

pub struct Koi {
    interpreter: Interpreter,
    next_id: ExprId,
}

impl Koi {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output<W: Write + 'static>(out: W) -> Self {
        Self::with_interpreter(Interpreter::with_output(out))
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            next_id: 0,
        }
    }

    pub fn interpreter(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Scan and parse `source`, continuing the session's id numbering.
    /// Static errors suppress the result.
    pub fn compile(&mut self, source: &str) -> Result<Vec<Stmt>, RunError> {
        let mut diagnostics = Diagnostics::new();

        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);

        let mut parser = Parser::new(tokens, &mut diagnostics).starting_at(self.next_id);
        let statements: Vec<Stmt> = parser.parse();
        self.next_id = parser.next_id();

        if diagnostics.has_errors() {
            debug!("{} error(s) before resolution", diagnostics.len());
            return Err(RunError::Static(diagnostics.into_vec()));
        }

        let locals = Resolver::new(&mut diagnostics).resolve(&statements);

        if diagnostics.has_errors() {
            debug!("{} resolution error(s)", diagnostics.len());
            return Err(RunError::Static(diagnostics.into_vec()));
        }

        self.interpreter.add_locals(locals);

        Ok(statements)
    }

    /// Run one program (or REPL line) to completion.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        let statements: Vec<Stmt> = self.compile(source)?;

        info!("Running {} statement(s)", statements.len());

        self.interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)
    }
}

impl Default for Koi {
    fn default() -> Self {
        Self::new()
    }
}
