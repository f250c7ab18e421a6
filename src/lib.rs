pub mod ast;
mod environment;
pub mod evaluator;
mod interpreter;
pub mod lexer;
pub mod logging;
mod object;
pub mod parser;
pub mod repl;
mod token;

pub use environment::Environment;
pub use interpreter::{Error, Interpreter};
pub use lexer::{LexError, Lexer};
pub use object::{EvalError, Function, Object};
pub use parser::{ParseError, ScriptParser};
pub use token::{Token, TokenKind};
