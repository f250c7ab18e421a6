use super::ParseError;
use crate::ast::{Node, NodeKind, NodeRef};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
use std::collections::{HashMap, HashSet};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precedence {
    pub value: u32,
    pub assoc: Assoc,
}

impl Precedence {
    /// Whether an operator with this precedence, following a right operand
    /// of an operator at `prec`, must be folded into that right operand.
    fn right_is_expr(self, prec: u32) -> bool {
        match self.assoc {
            Assoc::Left => prec < self.value,
            Assoc::Right => prec <= self.value,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Operators {
    table: HashMap<String, Precedence>,
}

impl Operators {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, name: &str, value: u32, assoc: Assoc) {
        self.table
            .insert(name.to_owned(), Precedence { value, assoc });
    }

    pub fn get(&self, name: &str) -> Option<Precedence> {
        self.table.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Number,
    String,
    Identifier,
}

impl TokenClass {
    fn expected(self) -> &'static str {
        match self {
            Self::Number => "number expected.",
            Self::String => "string expected.",
            Self::Identifier => "identifier expected.",
        }
    }
}

#[derive(Debug, Clone)]
enum Element {
    Tree(RuleId),
    Or(Vec<RuleId>),
    Repeat { rule: RuleId, once: bool },
    Maybe(RuleId),
    Token { class: TokenClass, kind: NodeKind },
    Literal { texts: Vec<String>, keep: bool },
    Ahead(Vec<String>),
    Expression {
        factor: RuleId,
        operators: Operators,
        kind: NodeKind,
    },
}

/// A sequence of elements plus the node kind its results are wrapped in.
///
/// Rules are plain values while being described; once added to a `Grammar`
/// they are addressed by `RuleId`, so every reference to a rule sees later
/// extensions of it.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    kind: NodeKind,
    elements: Vec<Element>,
}

impl Default for Rule {
    fn default() -> Self {
        Self::new("")
    }
}

impl Rule {
    /// An untyped rule: a single result is passed through unchanged,
    /// anything else becomes a generic `List`.
    pub fn new(name: &'static str) -> Self {
        Self::of(name, NodeKind::List)
    }

    pub fn of(name: &'static str, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            elements: vec![],
        }
    }

    fn push(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn number(self, kind: NodeKind) -> Self {
        self.push(Element::Token {
            class: TokenClass::Number,
            kind,
        })
    }

    pub fn string(self, kind: NodeKind) -> Self {
        self.push(Element::Token {
            class: TokenClass::String,
            kind,
        })
    }

    /// A name-shaped identifier that is not a reserved word of the grammar.
    pub fn identifier(self, kind: NodeKind) -> Self {
        self.push(Element::Token {
            class: TokenClass::Identifier,
            kind,
        })
    }

    /// One of `texts`, kept as a `Leaf`.
    pub fn token(self, texts: &[&str]) -> Self {
        self.push(Element::Literal {
            texts: texts.iter().map(|t| (*t).to_owned()).collect(),
            keep: true,
        })
    }

    /// One of `texts`, consumed and dropped.
    pub fn sep(self, texts: &[&str]) -> Self {
        self.push(Element::Literal {
            texts: texts.iter().map(|t| (*t).to_owned()).collect(),
            keep: false,
        })
    }

    /// One of `texts` must come next. Nothing is consumed.
    pub fn ahead(self, texts: &[&str]) -> Self {
        self.push(Element::Ahead(texts.iter().map(|t| (*t).to_owned()).collect()))
    }

    pub fn ast(self, rule: RuleId) -> Self {
        self.push(Element::Tree(rule))
    }

    pub fn or(self, rules: &[RuleId]) -> Self {
        self.push(Element::Or(rules.to_vec()))
    }

    pub fn option(self, rule: RuleId) -> Self {
        self.push(Element::Repeat { rule, once: true })
    }

    pub fn repeat(self, rule: RuleId) -> Self {
        self.push(Element::Repeat { rule, once: false })
    }

    /// Like `option`, but yields an empty node of `rule`'s kind when absent.
    pub fn maybe(self, rule: RuleId) -> Self {
        self.push(Element::Maybe(rule))
    }

    pub fn expression(self, kind: NodeKind, factor: RuleId, operators: Operators) -> Self {
        self.push(Element::Expression {
            factor,
            operators,
            kind,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
    reserved: HashSet<String>,
}

impl Grammar {
    pub fn new<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            rules: vec![],
            reserved: reserved.into_iter().map(str::to_owned).collect(),
        }
    }

    pub fn add(&mut self, rule: Rule) -> RuleId {
        self.rules.push(rule);
        RuleId(self.rules.len() - 1)
    }

    /// Reserves an id for a rule referenced before it can be described.
    pub fn declare(&mut self, name: &'static str) -> RuleId {
        self.add(Rule::new(name))
    }

    pub fn define(&mut self, id: RuleId, rule: Rule) {
        self.rules[id.0] = rule;
    }

    pub fn extend(&mut self, id: RuleId, extension: impl FnOnce(Rule) -> Rule) {
        let rule = std::mem::take(&mut self.rules[id.0]);
        self.rules[id.0] = extension(rule);
    }

    /// Makes `choice` the first alternative of `id`. A rule that does not
    /// start with an alternation is moved behind a new one.
    pub fn insert_choice(&mut self, id: RuleId, choice: RuleId) {
        if let Some(Element::Or(rules)) = self.rules[id.0].elements.first_mut() {
            rules.insert(0, choice);
            return;
        }

        let name = self.rules[id.0].name;
        let otherwise = std::mem::replace(&mut self.rules[id.0], Rule::new(name));
        let otherwise = self.add(otherwise);
        self.rules[id.0] = Rule::new(name).or(&[choice, otherwise]);
    }

    pub fn reserve(&mut self, word: &str) {
        self.reserved.insert(word.to_owned());
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word)
    }

    /// Whether `id` could start at the current token. A rule without
    /// elements always matches; otherwise only its first element is asked.
    pub fn matches(&self, id: RuleId, lexer: &mut Lexer) -> Result<bool, ParseError> {
        match self.rules[id.0].elements.first() {
            None => Ok(true),
            Some(element) => self.element_matches(element, lexer),
        }
    }

    pub fn parse(&self, id: RuleId, lexer: &mut Lexer) -> Result<NodeRef, ParseError> {
        let rule = &self.rules[id.0];
        trace!(rule = rule.name, "parsing");

        let mut results = vec![];
        for element in rule.elements.iter() {
            self.parse_element(element, lexer, &mut results)?;
        }
        Ok(Node::branch(rule.kind, results)?)
    }

    fn element_matches(&self, element: &Element, lexer: &mut Lexer) -> Result<bool, ParseError> {
        match element {
            Element::Tree(rule) | Element::Repeat { rule, .. } => self.matches(*rule, lexer),
            Element::Expression { factor, .. } => self.matches(*factor, lexer),
            Element::Or(rules) => Ok(self.choose(rules, lexer)?.is_some()),
            Element::Maybe(_) => Ok(true),
            Element::Token { class, .. } => Ok(self.accepts(*class, &lexer.peek(0)?)),
            Element::Literal { texts, .. } | Element::Ahead(texts) => {
                Ok(is_literal(texts, &lexer.peek(0)?))
            }
        }
    }

    fn parse_element(
        &self,
        element: &Element,
        lexer: &mut Lexer,
        results: &mut Vec<NodeRef>,
    ) -> Result<(), ParseError> {
        match element {
            Element::Tree(rule) => results.push(self.parse(*rule, lexer)?),
            Element::Or(rules) => match self.choose(rules, lexer)? {
                Some(rule) => push_nonempty(results, self.parse(rule, lexer)?),
                None => return Err(ParseError::unexpected(&lexer.peek(0)?, "unexpected token.")),
            },
            Element::Repeat { rule, once } => {
                while self.matches(*rule, lexer)? {
                    push_nonempty(results, self.parse(*rule, lexer)?);
                    if *once {
                        break;
                    }
                }
            }
            Element::Maybe(rule) => {
                if self.matches(*rule, lexer)? {
                    results.push(self.parse(*rule, lexer)?);
                } else {
                    results.push(Node::branch(self.rules[rule.0].kind, vec![])?);
                }
            }
            Element::Token { class, kind } => {
                let token = lexer.read()?;
                if !self.accepts(*class, &token) {
                    return Err(ParseError::unexpected(&token, class.expected()));
                }
                results.push(Node::leaf(*kind, token)?);
            }
            Element::Literal { texts, keep } => {
                let token = lexer.read()?;
                if !is_literal(texts, &token) {
                    return Err(ParseError::unexpected(&token, &expected(texts)));
                }
                if *keep {
                    results.push(Node::leaf(NodeKind::Leaf, token)?);
                }
            }
            Element::Ahead(texts) => {
                let token = lexer.peek(0)?;
                if !is_literal(texts, &token) {
                    return Err(ParseError::unexpected(&token, &expected(texts)));
                }
            }
            Element::Expression {
                factor,
                operators,
                kind,
            } => {
                let mut right = self.parse(*factor, lexer)?;
                while let Some(prec) = next_operator(operators, lexer)? {
                    right = self.shift(lexer, right, prec.value, *factor, operators, *kind)?;
                }
                results.push(right);
            }
        }
        Ok(())
    }

    /// Consumes the operator after `left` and its right operand, first
    /// folding in any following operators that bind tighter.
    fn shift(
        &self,
        lexer: &mut Lexer,
        left: NodeRef,
        prec: u32,
        factor: RuleId,
        operators: &Operators,
        kind: NodeKind,
    ) -> Result<NodeRef, ParseError> {
        let operator = Node::leaf(NodeKind::Leaf, lexer.read()?)?;
        let mut right = self.parse(factor, lexer)?;
        while let Some(next) = next_operator(operators, lexer)? {
            if !next.right_is_expr(prec) {
                break;
            }
            right = self.shift(lexer, right, next.value, factor, operators, kind)?;
        }
        Ok(Node::branch(kind, vec![left, operator, right])?)
    }

    fn choose(&self, rules: &[RuleId], lexer: &mut Lexer) -> Result<Option<RuleId>, ParseError> {
        for rule in rules.iter() {
            if self.matches(*rule, lexer)? {
                return Ok(Some(*rule));
            }
        }
        Ok(None)
    }

    fn accepts(&self, class: TokenClass, token: &Token) -> bool {
        match class {
            TokenClass::Number => token.is_number(),
            TokenClass::String => token.is_string(),
            TokenClass::Identifier => token.is_name() && !self.is_reserved(&token.text()),
        }
    }
}

/// Drops the empty `List` left by rules made only of separators.
fn push_nonempty(results: &mut Vec<NodeRef>, node: NodeRef) {
    if node.kind() != NodeKind::List || node.num_children() > 0 {
        results.push(node);
    }
}

fn expected(texts: &[String]) -> String {
    match texts.first() {
        Some(text) => format!("\"{}\" expected.", text),
        None => String::new(),
    }
}

fn is_literal(texts: &[String], token: &Token) -> bool {
    (token.is_identifier() || token.is(TokenType::EndOfLine))
        && texts.iter().any(|text| *text == token.text())
}

fn next_operator(operators: &Operators, lexer: &mut Lexer) -> Result<Option<Precedence>, ParseError> {
    let token = lexer.peek(0)?;
    if token.is_identifier() {
        Ok(operators.get(&token.text()))
    } else {
        Ok(None)
    }
}
