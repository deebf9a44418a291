//! Centralised error hierarchy for the **Koi interpreter**.
//!
//! All passes (scanner, parser, resolver, runtime) convert their failure modes
//! into one of the variants defined here. Static passes never stop at the first
//! problem: they hand each error to a [`Reporter`] and keep going, so a single
//! run can surface several independent diagnostics.
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::debug;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KoiError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        /// ` at 'lexeme'` or ` at end`.
        location: String,
    },

    /// Static‑analysis failure found by the resolver.
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error. Fatal for the current run.
    #[error("{message}\n[line {line}]")]
    Runtime { message: String, line: usize },

    /// Failure writing program output.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl KoiError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: line={}, msg={}", line, message);

        KoiError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Parse error: line={}, msg={}", token.line, message);

        KoiError::Parse {
            message,
            line: token.line,
            location: location(token),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Resolve error: line={}, msg={}", token.line, message);

        KoiError::Resolve {
            message,
            line: token.line,
            location: location(token),
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Runtime error: line={}, msg={}", line, message);

        KoiError::Runtime { message, line }
    }

    /// Source line the error points at, if it carries one.
    pub fn line(&self) -> Option<usize> {
        match self {
            KoiError::Lex { line, .. }
            | KoiError::Parse { line, .. }
            | KoiError::Resolve { line, .. }
            | KoiError::Runtime { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// `true` for errors raised by the scan/parse/resolve passes.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            KoiError::Lex { .. } | KoiError::Parse { .. } | KoiError::Resolve { .. }
        )
    }
}

fn location(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, KoiError>;

/// Sink for non-fatal diagnostics produced by the static passes.
pub trait Reporter {
    fn report(&mut self, error: KoiError);
}

impl<F> Reporter for F
where
    F: FnMut(KoiError),
{
    fn report(&mut self, error: KoiError) {
        self(error)
    }
}

/// A [`Reporter`] that keeps every error in arrival order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<KoiError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KoiError> {
        self.errors.iter()
    }

    /// Rendered messages, handy for tests and the CLI.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<KoiError> {
        self.errors
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, error: KoiError) {
        self.errors.push(error);
    }
}

/// Outcome of running a whole program through the pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    /// One or more scan/parse/resolve errors; nothing was executed.
    #[error("{}", join_lines(.0))]
    Static(Vec<KoiError>),

    /// Execution started and was aborted by this error.
    #[error(transparent)]
    Runtime(KoiError),
}

impl RunError {
    /// Process exit code for a file run: 65 for static errors, 70 for runtime errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Static(_) => 65,
            RunError::Runtime(_) => 70,
        }
    }
}

fn join_lines(errors: &[KoiError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
