use crate::ast::{AstError, NodeKind};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    UndefinedName{name: String} = "undefined name: {name}",
    BadNegation{type_name: &'static str} = "bad type for negation: {type_name}",
    BadType{left: &'static str, operator: String, right: &'static str} = "bad type: {left} {operator} {right}",
    BadOperator{operator: String} = "bad operator: {operator}",
    BadAssignment{target: String} = "bad assignment: {target}",
    BadFunction{callee: String} = "bad function: {callee}",
    BadArgumentCount{want: usize, got: usize} = "bad number of arguments: want={want}, got={got}",
    DivisionByZero = "division by zero",
    CannotEval{kind: NodeKind} = "cannot eval: {kind}",
    Malformed{source: AstError} = "malformed syntax tree: {source}",
}
