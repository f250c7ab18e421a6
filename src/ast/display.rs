use super::{Node, NodeRef};
use std::fmt::{self, Display, Formatter};

fn write_list(f: &mut Formatter, children: &[NodeRef]) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Leaf(token) | Self::NumberLiteral(token) | Self::Variable(token) => {
                write!(f, "{}", token)
            }
            Self::StringLiteral(token) => write!(f, "{:?}", token.text()),
            Self::Negative(children) if children.len() == 1 => write!(f, "-{}", children[0]),
            Self::If(children) if children.len() == 2 => {
                write!(f, "(if {} {})", children[0], children[1])
            }
            Self::If(children) if children.len() == 3 => write!(
                f,
                "(if {} {} else {})",
                children[0], children[1], children[2]
            ),
            Self::While(children) if children.len() == 2 => {
                write!(f, "(while {} {})", children[0], children[1])
            }
            Self::FunctionDefinition(children) if children.len() == 3 => write!(
                f,
                "(def {} {} {})",
                children[0], children[1], children[2]
            ),
            branch => write_list(f, branch.children()),
        }
    }
}
