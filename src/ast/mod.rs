mod display;

use crate::token::{Token, TokenKind};
use custom_error::custom_error;
use std::rc::Rc;
use strum_macros::EnumDiscriminants;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub AstError

    NoChild{index: usize, node: String} = "no child {index} in {node}",
    NotABranch{kind: NodeKind} = "{kind} nodes cannot hold children",
    NotALeaf{kind: NodeKind} = "{kind} nodes are not built from a token",
}

pub type NodeRef = Rc<Node>;

/// Syntax tree node.
///
/// Leaf variants wrap the token they were built from; every other variant
/// is a branch holding its children in source order. Nodes are shared
/// through `Rc` so function values can keep their parameter list and body
/// without copying.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(derive(Hash, strum_macros::Display))]
#[strum_discriminants(name(NodeKind))]
pub enum Node {
    // Leaves
    Leaf(Token),
    NumberLiteral(Token),
    StringLiteral(Token),
    Variable(Token),

    // Expressions
    List(Vec<NodeRef>),
    Negative(Vec<NodeRef>),
    BinaryExpr(Vec<NodeRef>),
    Primary(Vec<NodeRef>),
    Arguments(Vec<NodeRef>),

    // Statements
    Block(Vec<NodeRef>),
    If(Vec<NodeRef>),
    While(Vec<NodeRef>),
    NullStatement(Vec<NodeRef>),
    ParameterList(Vec<NodeRef>),
    FunctionDefinition(Vec<NodeRef>),
}

impl Node {
    /// Builds the branch node a grammar rule was declared for.
    ///
    /// `List` and `Primary` rules collapse to their only child when they
    /// collected exactly one.
    pub fn branch(kind: NodeKind, mut children: Vec<NodeRef>) -> Result<NodeRef, AstError> {
        if children.len() == 1 && (kind == NodeKind::List || kind == NodeKind::Primary) {
            if let Some(only) = children.pop() {
                return Ok(only);
            }
        }

        let node = match kind {
            NodeKind::List => Self::List(children),
            NodeKind::Negative => Self::Negative(children),
            NodeKind::BinaryExpr => Self::BinaryExpr(children),
            NodeKind::Primary => Self::Primary(children),
            NodeKind::Arguments => Self::Arguments(children),
            NodeKind::Block => Self::Block(children),
            NodeKind::If => Self::If(children),
            NodeKind::While => Self::While(children),
            NodeKind::NullStatement => Self::NullStatement(children),
            NodeKind::ParameterList => Self::ParameterList(children),
            NodeKind::FunctionDefinition => Self::FunctionDefinition(children),
            NodeKind::Leaf
            | NodeKind::NumberLiteral
            | NodeKind::StringLiteral
            | NodeKind::Variable => return Err(AstError::NotABranch { kind }),
        };
        Ok(Rc::new(node))
    }

    pub fn leaf(kind: NodeKind, token: Token) -> Result<NodeRef, AstError> {
        let node = match kind {
            NodeKind::Leaf => Self::Leaf(token),
            NodeKind::NumberLiteral => Self::NumberLiteral(token),
            NodeKind::StringLiteral => Self::StringLiteral(token),
            NodeKind::Variable => Self::Variable(token),
            kind => return Err(AstError::NotALeaf { kind }),
        };
        Ok(Rc::new(node))
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from(self)
    }

    pub fn is_leaf(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::Leaf(token)
            | Self::NumberLiteral(token)
            | Self::StringLiteral(token)
            | Self::Variable(token) => Some(token),
            _ => None,
        }
    }

    pub fn children(&self) -> &[NodeRef] {
        match self {
            Self::Leaf(_) | Self::NumberLiteral(_) | Self::StringLiteral(_) | Self::Variable(_) => {
                &[]
            }
            Self::List(children)
            | Self::Negative(children)
            | Self::BinaryExpr(children)
            | Self::Primary(children)
            | Self::Arguments(children)
            | Self::Block(children)
            | Self::If(children)
            | Self::While(children)
            | Self::NullStatement(children)
            | Self::ParameterList(children)
            | Self::FunctionDefinition(children) => children,
        }
    }

    pub fn num_children(&self) -> usize {
        self.children().len()
    }

    pub fn child(&self, index: usize) -> Result<&NodeRef, AstError> {
        self.children().get(index).ok_or_else(|| AstError::NoChild {
            index,
            node: self.to_string(),
        })
    }

    /// Text of a name-carrying leaf: variables, parameter names, operators.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Leaf(token) | Self::Variable(token) => match &token.kind {
                TokenKind::Identifier(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// "at line N" for the first leaf found in a depth-first walk.
    pub fn location(&self) -> Option<String> {
        match self.token() {
            Some(token) => Some(format!("at line {}", token.line)),
            None => self.children().iter().find_map(|child| child.location()),
        }
    }
}
