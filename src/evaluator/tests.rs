use super::*;
use crate::lexer::Lexer;
use crate::parser::ScriptParser;
use pretty_assertions::assert_eq;

fn parse(input: &str) -> Vec<NodeRef> {
    let parser = ScriptParser::new();
    let mut lexer = Lexer::from_source(input);
    let mut statements = vec![];
    while !lexer.peek(0).expect("Lex errors found").is_eof() {
        let statement = parser.parse(&mut lexer).expect("Parse errors found");
        if statement.kind() != NodeKind::NullStatement {
            statements.push(statement);
        }
    }
    statements
}

fn run_in(input: &str, env: &Environment) -> Result<Object> {
    parse(input)
        .iter()
        .try_fold(Object::Nil, |_, statement| eval(statement, env))
}

fn test_eval(input: &str) -> Result<Object> {
    run_in(input, &Environment::new())
}

fn run_eval_tests(cases: Vec<(&str, Object)>) {
    for (input, expected) in cases.into_iter() {
        match test_eval(input) {
            Ok(value) => assert_eq!(value, expected, "{}", input),
            Err(err) => panic!("{}: {}", input, err),
        }
    }
}

#[test]
fn test_integer_arithmetic() {
    let cases = vec![
        ("5", 5.into()),
        ("-5", (-5).into()),
        ("1 + 2 * 3", 7.into()),
        ("2 - 3 - 4", (-5).into()),
        ("2 * (3 + 4)", 14.into()),
        ("20 / 2 / 5", 2.into()),
        ("7 / 2", 3.into()),
        ("-7 / 2", (-3).into()),
        ("7 % 3", 1.into()),
        ("-50 + 100 + -50", 0.into()),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50.into()),
        ("1 < 2", 1.into()),
        ("2 < 1", 0.into()),
        ("3 > 2", 1.into()),
        ("2 == 2", 1.into()),
        ("2 == 3", 0.into()),
        ("1 + 1 == 2", 1.into()),
        ("9223372036854775807 + 1", i64::MIN.into()),
    ];

    run_eval_tests(cases);
}

#[test]
fn test_assignment() {
    let cases = vec![
        ("a = 1; a = a + 1; a", 2.into()),
        ("a = b = 3; a", 3.into()),
        ("a = b = 3; b", 3.into()),
        ("x = 4", 4.into()),
        ("x = 4\ny = x * 2\ny - x", 4.into()),
    ];

    run_eval_tests(cases);
}

#[test]
fn test_strings() {
    let cases = vec![
        ("\"foo\"", "foo".into()),
        ("\"foo\" + \"bar\"", "foobar".into()),
        ("\"n=\" + 3", "n=3".into()),
        ("3 + \"px\"", "3px".into()),
        ("\"a\" == \"a\"", 1.into()),
        ("\"a\" == \"b\"", 0.into()),
        ("\"1\" == 1", 0.into()),
        ("s = \"x\"; s = s + s; s", "xx".into()),
    ];

    run_eval_tests(cases);
}

#[test]
fn test_if_statements() {
    let cases = vec![
        ("if (0) { 1 } else { 2 }", 2.into()),
        ("if (1) { 1 } else { 2 }", 1.into()),
        ("if (-1) { 1 } else { 2 }", 1.into()),
        ("if (\"x\") { 1 } else { 2 }", 2.into()),
        ("if 1 < 2 { \"yes\" }", "yes".into()),
        ("if 1 > 2 { \"yes\" }", 0.into()),
        ("if 1 { }", 0.into()),
        ("x = 3\nif x == 3 {\n  x = 4\n  x * 10\n} else {\n  0\n}", 40.into()),
    ];

    run_eval_tests(cases);
}

#[test]
fn test_while_statements() {
    let cases = vec![
        ("i = 0; while (i < 5) { i = i + 1 } i", 5.into()),
        ("i = 5; while (i < 0) { i = i + 1 } i", 5.into()),
        ("i = 5; while (i < 0) { i = i + 1 }", 0.into()),
        ("i = 0; while i < 3 { i = i + 1; i * 10 }", 30.into()),
        (
            "sum = 0\ni = 1\nwhile i < 11 {\n  sum = sum + i\n  i = i + 1\n}\nsum",
            55.into(),
        ),
    ];

    run_eval_tests(cases);
}

#[test]
fn test_while_runs_until_integer_zero() {
    let input = "c = \"go\"; n = 0; while c { n = n + 1; if n == 3 { c = 0 } } n";
    assert_eq!(test_eval(input).unwrap(), Object::Integer(3));
}

#[test]
fn test_functions() {
    let cases = vec![
        ("def add(x, y) { x + y } add(2, 3)", 5.into()),
        ("def add(x, y) { x + y }", "add".into()),
        ("def one() { 1 }\none()", 1.into()),
        ("def id(x) { x }; id(\"s\")", "s".into()),
        ("def twice(f, x) { f(f(x)) }\ndef inc(n) { n + 1 }\ntwice(inc, 5)", 7.into()),
        ("def f() { 1 }\nf == f", 1.into()),
        (
            "def fib(n) { if n < 2 { n } else { fib(n - 1) + fib(n - 2) } }\nfib(15)",
            610.into(),
        ),
        ("x = 10\ndef f(x) { x = x + 1; x }\nf(1) * 100 + x", 210.into()),
        ("def empty() { }\nempty()", 0.into()),
    ];

    run_eval_tests(cases);
}

#[test]
fn test_closures() {
    let input = "
def make_counter() {
  count = 0
  def inc() { count = count + 1 }
  inc
}
c1 = make_counter()
c2 = make_counter()
c1()
c1()
c2()
c1() * 10 + c2()
";

    assert_eq!(test_eval(input).unwrap(), Object::Integer(32));
}

#[test]
fn test_lexical_scoping() {
    let input = "
x = 1
def get() { x }
def shadow(x) { get() }
shadow(5)
";

    assert_eq!(test_eval(input).unwrap(), Object::Integer(1));
}

#[test]
fn test_assignment_reaches_enclosing_scope() {
    let env = Environment::new();
    run_in("total = 0\ndef add(n) { total = total + n }\nadd(3)\nadd(4)", &env).unwrap();

    assert_eq!(env.get("total"), Some(Object::Integer(7)));
    assert_eq!(env.get("n"), None);
}

#[test]
fn test_errors() {
    let cases = vec![
        (
            "y + 1",
            EvalError::UndefinedName {
                name: "y".to_owned(),
            },
        ),
        (
            "-\"a\"",
            EvalError::BadNegation {
                type_name: "STRING",
            },
        ),
        (
            "\"a\" - 1",
            EvalError::BadType {
                left: "STRING",
                operator: "-".to_owned(),
                right: "INTEGER",
            },
        ),
        (
            "def f() { 1 }\nf < 2",
            EvalError::BadType {
                left: "FUNCTION",
                operator: "<".to_owned(),
                right: "INTEGER",
            },
        ),
        (
            "1 = 2",
            EvalError::BadAssignment {
                target: "1".to_owned(),
            },
        ),
        (
            "x = 1; x(2)",
            EvalError::BadFunction {
                callee: "1".to_owned(),
            },
        ),
        (
            "def add(x, y) { x + y } add(1)",
            EvalError::BadArgumentCount { want: 2, got: 1 },
        ),
        (
            "def add(x, y) { x + y } add(1, 2, 3)",
            EvalError::BadArgumentCount { want: 2, got: 3 },
        ),
        ("1 / 0", EvalError::DivisionByZero),
        ("1 % 0", EvalError::DivisionByZero),
        (
            "def f(x) { missing }\nf(1)",
            EvalError::UndefinedName {
                name: "missing".to_owned(),
            },
        ),
    ];

    for (input, expected) in cases.into_iter() {
        assert_eq!(test_eval(input), Err(expected), "{}", input);
    }
}

#[test]
fn test_error_keeps_earlier_state() {
    let env = Environment::new();
    assert!(run_in("a = 1; a = 2; b = a + nope", &env).is_err());

    assert_eq!(env.get("a"), Some(Object::Integer(2)));
    assert_eq!(env.get("b"), None);
}

#[test]
fn test_reevaluation_is_stable() {
    let env = Environment::new();
    env.put_new("x", 4.into());
    let statements = parse("1 + 2 * x");

    let first = eval(&statements[0], &env).unwrap();
    let second = eval(&statements[0], &env).unwrap();
    assert_eq!(first, Object::Integer(9));
    assert_eq!(first, second);
}

#[test]
fn test_assignment_is_visible_in_environment() {
    let env = Environment::new();
    let statements = parse("if 1 { x = x + 1 }");
    env.put_new("x", 0.into());

    eval(&statements[0], &env).unwrap();
    eval(&statements[0], &env).unwrap();
    assert_eq!(env.get("x"), Some(Object::Integer(2)));
}

#[test]
fn test_structural_nodes_cannot_be_evaluated() {
    let statements = parse("def f(a, b) { a }");
    let params = statements[0].child(1).unwrap();

    assert_eq!(
        eval(params, &Environment::new()),
        Err(EvalError::CannotEval {
            kind: NodeKind::ParameterList
        })
    );
}
