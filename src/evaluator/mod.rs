#[cfg(test)]
mod tests;

use crate::ast::{Node, NodeKind, NodeRef};
use crate::environment::Environment;
use crate::object::{EvalError, Function, Object, Result};
use tracing::debug;

pub fn eval(node: &NodeRef, env: &Environment) -> Result<Object> {
    match node.as_ref() {
        Node::NumberLiteral(token) => token.number().map(Object::Integer).ok_or(EvalError::CannotEval {
            kind: NodeKind::NumberLiteral,
        }),
        Node::StringLiteral(token) => Ok(Object::String(token.text().into_owned())),
        Node::Variable(token) => {
            let name = token.text();
            env.get(&name).ok_or_else(|| EvalError::UndefinedName {
                name: name.into_owned(),
            })
        }
        Node::Negative(_) => match eval(node.child(0)?, env)? {
            Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
            operand => Err(EvalError::BadNegation {
                type_name: operand.type_name(),
            }),
        },
        Node::BinaryExpr(_) => eval_binary_expression(node, env),
        Node::Primary(_) => eval_primary_expression(node, env, 0),
        Node::Block(children) => eval_block(children, env),
        Node::If(_) => eval_if_statement(node, env),
        Node::While(_) => eval_while_statement(node, env),
        Node::NullStatement(_) => Ok(Object::Nil),
        Node::FunctionDefinition(_) => eval_function_definition(node, env),
        Node::Leaf(_) | Node::List(_) | Node::Arguments(_) | Node::ParameterList(_) => {
            Err(EvalError::CannotEval { kind: node.kind() })
        }
    }
}

fn operator_name(node: &Node) -> Result<&str> {
    node.name()
        .ok_or(EvalError::CannotEval { kind: node.kind() })
}

fn eval_binary_expression(node: &Node, env: &Environment) -> Result<Object> {
    let left = node.child(0)?;
    let operator = operator_name(node.child(1)?)?;
    let right = node.child(2)?;

    if operator == "=" {
        let value = eval(right, env)?;
        return eval_assignment(left, value, env);
    }

    let left = eval(left, env)?;
    let right = eval(right, env)?;
    eval_infix_expression(operator, left, right)
}

fn eval_assignment(target: &Node, value: Object, env: &Environment) -> Result<Object> {
    match target {
        Node::Variable(token) => {
            env.put(&token.text(), value.clone());
            Ok(value)
        }
        other => Err(EvalError::BadAssignment {
            target: other.to_string(),
        }),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Result<Object> {
    match (&left, &right) {
        (Object::Integer(x), Object::Integer(y)) => eval_integer_infix_expression(operator, *x, *y),
        _ if operator == "+" => Ok(Object::String(format!("{}{}", left, right))),
        _ if operator == "==" => Ok(Object::from(left == right)),
        _ => Err(EvalError::BadType {
            left: left.type_name(),
            operator: operator.to_owned(),
            right: right.type_name(),
        }),
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Result<Object> {
    Ok(match operator {
        "+" => left.wrapping_add(right).into(),
        "-" => left.wrapping_sub(right).into(),
        "*" => left.wrapping_mul(right).into(),
        "/" | "%" if right == 0 => return Err(EvalError::DivisionByZero),
        "/" => left.wrapping_div(right).into(),
        "%" => left.wrapping_rem(right).into(),
        "==" => (left == right).into(),
        ">" => (left > right).into(),
        "<" => (left < right).into(),
        _ => {
            return Err(EvalError::BadOperator {
                operator: operator.to_owned(),
            })
        }
    })
}

/// Applies postfixes innermost-first: the value of everything before the
/// last postfix is computed, then the last postfix is applied to it.
fn eval_primary_expression(node: &Node, env: &Environment, nest: usize) -> Result<Object> {
    let size = node.num_children();
    if nest + 1 < size {
        let target = eval_primary_expression(node, env, nest + 1)?;
        let postfix = node.child(size - nest - 1)?;
        eval_postfix(postfix, env, target)
    } else {
        eval(node.child(0)?, env)
    }
}

fn eval_postfix(postfix: &Node, env: &Environment, target: Object) -> Result<Object> {
    match postfix {
        Node::Arguments(arguments) => eval_call(arguments, env, target),
        other => Err(EvalError::CannotEval { kind: other.kind() }),
    }
}

fn eval_call(arguments: &[NodeRef], env: &Environment, callee: Object) -> Result<Object> {
    let function = match callee {
        Object::Function(function) => function,
        other => {
            return Err(EvalError::BadFunction {
                callee: other.to_string(),
            })
        }
    };

    if arguments.len() != function.arity() {
        return Err(EvalError::BadArgumentCount {
            want: function.arity(),
            got: arguments.len(),
        });
    }

    let call_env = function.make_env();
    for (parameter, argument) in function.parameters.children().iter().zip(arguments) {
        let value = eval(argument, env)?;
        call_env.put_new(operator_name(parameter)?, value);
    }

    debug!(function = %function.name, arity = function.arity(), "calling");
    eval(&function.body, &call_env)
}

fn eval_block(statements: &[NodeRef], env: &Environment) -> Result<Object> {
    let mut result = Object::Integer(0);
    for statement in statements.iter() {
        if statement.kind() != NodeKind::NullStatement {
            result = eval(statement, env)?;
        }
    }
    Ok(result)
}

fn eval_if_statement(node: &Node, env: &Environment) -> Result<Object> {
    if eval(node.child(0)?, env)?.is_true() {
        return eval(node.child(1)?, env);
    }
    match node.children().get(2) {
        Some(alternative) => eval(alternative, env),
        None => Ok(Object::Integer(0)),
    }
}

fn eval_while_statement(node: &Node, env: &Environment) -> Result<Object> {
    let condition = node.child(0)?;
    let body = node.child(1)?;

    let mut result = Object::Integer(0);
    loop {
        if eval(condition, env)?.is_false() {
            return Ok(result);
        }
        result = eval(body, env)?;
    }
}

fn eval_function_definition(node: &Node, env: &Environment) -> Result<Object> {
    let name = operator_name(node.child(0)?)?.to_owned();
    let parameters = node.child(1)?.clone();
    let body = node.child(2)?.clone();

    debug!(function = %name, arity = parameters.num_children(), "defining");
    let function = Function::new(name.clone(), parameters, body, env.clone());
    env.put_new(&name, function.into());
    Ok(Object::String(name))
}
