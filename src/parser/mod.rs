mod combinator;

pub use combinator::{Assoc, Grammar, Operators, Precedence, Rule, RuleId, TokenClass};

use crate::ast::{AstError, NodeKind, NodeRef};
use crate::lexer::{LexError, Lexer};
use crate::token::{Token, EOL};
use custom_error::custom_error;
use lazy_static::lazy_static;
use std::collections::HashSet;

custom_error! {
    pub ParseError

    Syntax{token: String, line: usize, message: String} = "syntax error around \"{token}\" at line {line}. {message}",
    AtEnd{message: String} = "syntax error around the last line. {message}",
    Lex{source: LexError} = "{source}",
    Ast{source: AstError} = "{source}",
}

impl ParseError {
    pub fn unexpected(token: &Token, message: &str) -> Self {
        if token.is_eof() {
            Self::AtEnd {
                message: message.to_owned(),
            }
        } else {
            Self::Syntax {
                token: token.text().into_owned(),
                line: token.line,
                message: message.to_owned(),
            }
        }
    }

    /// The input ended before the construct being parsed was complete.
    pub fn is_incomplete(&self) -> bool {
        match self {
            Self::AtEnd { .. } => true,
            _ => false,
        }
    }
}

lazy_static! {
    pub static ref OPERATORS: Operators = {
        let mut operators = Operators::new();
        operators.add("=", 1, Assoc::Right);
        operators.add("==", 2, Assoc::Left);
        operators.add(">", 2, Assoc::Left);
        operators.add("<", 2, Assoc::Left);
        operators.add("+", 3, Assoc::Left);
        operators.add("-", 3, Assoc::Left);
        operators.add("*", 4, Assoc::Left);
        operators.add("/", 4, Assoc::Left);
        operators.add("%", 4, Assoc::Left);
        operators
    };
    pub static ref RESERVED: HashSet<&'static str> =
        vec![";", "}", EOL, "if", "else", "while"].into_iter().collect();
}

/// The script grammar.
///
/// ```text
/// program   := compound (";" | EOL)? | expr (";" | EOL) | (";" | EOL)
/// compound  := def | if | while
/// block     := "{" (compound | expr (";" | EOL | &"}") | ";" | EOL)* "}"
/// if        := "if" expr block ("else" block)?
/// while     := "while" expr block
/// def       := "def" identifier "(" params? ")" block
/// expr      := factor (operator factor)*
/// factor    := "-" primary | primary
/// primary   := ("(" expr ")" | number | identifier | string) postfix*
/// postfix   := "(" args? ")"
/// ```
pub struct ScriptParser {
    grammar: Grammar,
    program: RuleId,
    expr: RuleId,
}

struct BasicRules {
    expr: RuleId,
    primary: RuleId,
    block: RuleId,
    compound: RuleId,
    program: RuleId,
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptParser {
    /// The full language: the basic rules extended with function
    /// definitions and calls.
    pub fn new() -> Self {
        let mut grammar = Grammar::new(RESERVED.iter().copied());
        let rules = basic_rules(&mut grammar);
        function_rules(&mut grammar, &rules);

        Self {
            grammar,
            program: rules.program,
            expr: rules.expr,
        }
    }

    /// Expressions, blocks, `if` and `while` only.
    pub fn basic() -> Self {
        let mut grammar = Grammar::new(RESERVED.iter().copied());
        let rules = basic_rules(&mut grammar);

        Self {
            grammar,
            program: rules.program,
            expr: rules.expr,
        }
    }

    /// Parses one top-level statement together with its terminator.
    pub fn parse(&self, lexer: &mut Lexer) -> Result<NodeRef, ParseError> {
        self.grammar.parse(self.program, lexer)
    }

    pub fn parse_expression(&self, lexer: &mut Lexer) -> Result<NodeRef, ParseError> {
        self.grammar.parse(self.expr, lexer)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

fn basic_rules(g: &mut Grammar) -> BasicRules {
    let expr = g.declare("expr");
    let compound = g.declare("compound");

    let paren = g.add(Rule::new("paren").sep(&["("]).ast(expr).sep(&[")"]));
    let number = g.add(Rule::new("number").number(NodeKind::NumberLiteral));
    let name = g.add(Rule::new("name").identifier(NodeKind::Variable));
    let string = g.add(Rule::new("string").string(NodeKind::StringLiteral));
    let primary = g.add(Rule::of("primary", NodeKind::Primary).or(&[paren, number, name, string]));
    let negative = g.add(Rule::of("negative", NodeKind::Negative).sep(&["-"]).ast(primary));
    let factor = g.add(Rule::new("factor").or(&[negative, primary]));
    g.define(
        expr,
        Rule::new("expr").expression(NodeKind::BinaryExpr, factor, OPERATORS.clone()),
    );

    let simple = g.add(Rule::new("simple").ast(expr));
    let separator = g.add(Rule::new("separator").sep(&[";", EOL]));
    let block_end = g.add(Rule::new("block_end").ahead(&["}"]));
    let block_simple = g.add(Rule::new("block_simple").ast(simple).or(&[separator, block_end]));
    let block_statement = g.add(Rule::new("block_statement").or(&[compound, block_simple, separator]));
    let block = g.add(
        Rule::of("block", NodeKind::Block)
            .sep(&["{"])
            .repeat(block_statement)
            .sep(&["}"]),
    );
    let else_block = g.add(Rule::new("else").sep(&["else"]).ast(block));
    let if_statement = g.add(
        Rule::of("if", NodeKind::If)
            .sep(&["if"])
            .ast(expr)
            .ast(block)
            .option(else_block),
    );
    let while_statement = g.add(
        Rule::of("while", NodeKind::While)
            .sep(&["while"])
            .ast(expr)
            .ast(block),
    );
    g.define(compound, Rule::new("compound").or(&[if_statement, while_statement]));

    let compound_statement = g.add(
        Rule::new("compound_statement")
            .ast(compound)
            .option(separator),
    );
    let simple_statement = g.add(Rule::new("simple_statement").ast(simple).sep(&[";", EOL]));
    let null_statement = g.add(Rule::of("null_statement", NodeKind::NullStatement).sep(&[";", EOL]));
    let program = g.add(Rule::new("program").or(&[
        compound_statement,
        simple_statement,
        null_statement,
    ]));

    BasicRules {
        expr,
        primary,
        block,
        compound,
        program,
    }
}

fn function_rules(g: &mut Grammar, rules: &BasicRules) {
    g.reserve(")");
    g.reserve("def");

    let param = g.add(Rule::new("param").identifier(NodeKind::Leaf));
    let param_tail = g.add(Rule::new("param_tail").sep(&[","]).ast(param));
    let params = g.add(
        Rule::of("params", NodeKind::ParameterList)
            .ast(param)
            .repeat(param_tail),
    );
    let param_list = g.add(Rule::new("param_list").sep(&["("]).maybe(params).sep(&[")"]));
    let def = g.add(
        Rule::of("def", NodeKind::FunctionDefinition)
            .sep(&["def"])
            .identifier(NodeKind::Leaf)
            .ast(param_list)
            .ast(rules.block),
    );

    let arg_tail = g.add(Rule::new("arg_tail").sep(&[","]).ast(rules.expr));
    let args = g.add(
        Rule::of("args", NodeKind::Arguments)
            .ast(rules.expr)
            .repeat(arg_tail),
    );
    let postfix = g.add(Rule::new("postfix").sep(&["("]).maybe(args).sep(&[")"]));

    g.extend(rules.primary, |primary| primary.repeat(postfix));
    g.insert_choice(rules.compound, def);
}
