use crate::ast::NodeKind;
use crate::interpreter::Interpreter;
use std::env;
use std::io::{self, BufRead, Write};

static PROMPT: &str = ">> ";
static CONTINUATION_PROMPT: &str = ".. ";

pub struct Config {
    pub prompt: String,
    pub show_ast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_owned(),
            show_ast: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            prompt: env::var("SCRIPT_PROMPT").unwrap_or_else(|_| PROMPT.to_owned()),
            show_ast: env::var("SCRIPT_SHOW_AST").is_ok(),
        }
    }
}

pub fn start() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let _ = run(&Config::from_env(), stdin.lock(), &mut stdout.lock());
}

/// Reads units from `input` until it runs out. A unit that ends inside an
/// open block keeps collecting lines under the continuation prompt.
pub fn run<R: BufRead, W: Write>(config: &Config, mut input: R, output: &mut W) -> io::Result<()> {
    let interpreter = Interpreter::new();
    let mut unit = String::new();
    loop {
        if unit.is_empty() {
            write!(output, "{}", config.prompt)?;
        } else {
            write!(output, "{}", CONTINUATION_PROMPT)?;
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        unit.push_str(&line);

        let statements = match interpreter.parse_all(&unit) {
            Err(err) if err.is_incomplete() => continue,
            Err(err) => {
                writeln!(output, "\t{}", err)?;
                unit.clear();
                continue;
            }
            Ok(statements) => statements,
        };
        unit.clear();

        for statement in statements.iter() {
            if statement.kind() == NodeKind::NullStatement {
                continue;
            }
            if config.show_ast {
                writeln!(output, "=> {}", statement)?;
            }
            match interpreter.eval(statement) {
                Ok(val) => writeln!(output, "{}", val)?,
                Err(err) => {
                    writeln!(output, "ERROR: {}", err)?;
                    break;
                }
            }
        }
    }
}
