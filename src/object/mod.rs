use crate::ast::NodeRef;
use crate::environment::Environment;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

mod eval_error;
pub use eval_error::EvalError;

pub type Result<T> = std::result::Result<T, EvalError>;

pub static TRUE: i64 = 1;
pub static FALSE: i64 = 0;

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    String(String),
    Function(Rc<Function>),
    Nil,
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Function(func) => write!(f, "{}", func),
            Self::Nil => write!(f, "nil"),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Nil, Self::Nil) => true,
            _ => false,
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::Nil
    }
}

impl From<i64> for Object {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Self::Integer(if b { TRUE } else { FALSE })
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<Function> for Object {
    fn from(f: Function) -> Self {
        Self::Function(Rc::new(f))
    }
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::String(_) => "STRING",
            Self::Function(_) => "FUNCTION",
            Self::Nil => "NIL",
        }
    }

    /// Only a non-zero integer is true; every other value, including
    /// strings and functions, is not.
    pub fn is_true(&self) -> bool {
        match self {
            Self::Integer(n) => *n != FALSE,
            _ => false,
        }
    }

    /// Loops exit only on an explicit integer zero.
    pub fn is_false(&self) -> bool {
        match self {
            Self::Integer(n) => *n == FALSE,
            _ => false,
        }
    }
}

/// A closure: parameter list and body borrowed from the syntax tree, plus
/// the environment the definition was evaluated in.
pub struct Function {
    pub name: String,
    pub parameters: NodeRef,
    pub body: NodeRef,
    pub env: Environment,
}

impl Function {
    pub fn new(name: String, parameters: NodeRef, body: NodeRef, env: Environment) -> Self {
        Self {
            name,
            parameters,
            body,
            env,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.num_children()
    }

    pub fn make_env(&self) -> Environment {
        Environment::with_enclosed(&self.env)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters.to_string())
            .field("body", &self.body.to_string())
            .finish()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "<fun: {}>", self.name)
    }
}
