use crate::ast::{NodeKind, NodeRef};
use crate::environment::Environment;
use crate::evaluator::eval;
use crate::lexer::Lexer;
use crate::object::{EvalError, Object};
use crate::parser::{ParseError, ScriptParser};
use custom_error::custom_error;
use tracing::debug;

custom_error! {
    pub Error

    Parse{source: ParseError} = "{source}",
    Eval{source: EvalError, location: String} = "{source} {location}",
}

/// A parser paired with the global environment every top-level statement
/// is evaluated in.
pub struct Interpreter {
    parser: ScriptParser,
    env: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_parser(ScriptParser::new())
    }

    pub fn with_parser(parser: ScriptParser) -> Self {
        Self {
            parser,
            env: Environment::new(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn parser(&self) -> &ScriptParser {
        &self.parser
    }

    /// Every top-level statement in `source`, null statements included.
    pub fn parse_all(&self, source: &str) -> Result<Vec<NodeRef>, ParseError> {
        let mut lexer = Lexer::from_source(source);
        let mut statements = vec![];
        while !lexer.peek(0)?.is_eof() {
            statements.push(self.parser.parse(&mut lexer)?);
        }
        Ok(statements)
    }

    /// Evaluates already parsed statements in order, returning the value of
    /// the last one that is not a null statement.
    pub fn eval_all(&self, statements: &[NodeRef]) -> Result<Object, EvalError> {
        let mut result = Object::Nil;
        for statement in statements.iter() {
            if statement.kind() != NodeKind::NullStatement {
                result = self.eval(statement)?;
            }
        }
        Ok(result)
    }

    pub fn eval(&self, statement: &NodeRef) -> Result<Object, EvalError> {
        debug!(statement = %statement, "evaluating");
        eval(statement, &self.env)
    }

    /// Parses and evaluates `source` one statement at a time. Statements
    /// before the first error stay committed to the environment; a runtime
    /// error names the line of the statement that raised it.
    pub fn run(&self, source: &str) -> Result<Object, Error> {
        let mut lexer = Lexer::from_source(source);
        let mut result = Object::Nil;
        while !lexer.peek(0).map_err(ParseError::from)?.is_eof() {
            let statement = self.parser.parse(&mut lexer)?;
            if statement.kind() != NodeKind::NullStatement {
                result = self.eval(&statement).map_err(|source| Error::Eval {
                    location: statement.location().unwrap_or_default(),
                    source,
                })?;
            }
        }
        Ok(result)
    }
}
