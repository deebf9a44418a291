pub mod ast;
pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod function;
pub mod instance;
pub mod interpreter;
mod natives;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod session;
mod stack;
pub mod token;
pub mod value;

pub use error::{Diagnostics, KoiError, Reporter, RunError};
pub use interpreter::Interpreter;
pub use session::Koi;
