use simple_script::{logging, Interpreter};
use std::env;
use std::time::Instant;

static INPUT: &str = "def fibonacci(x) {
  if x == 0 { 0 } else {
    if x == 1 {
      1
    } else {
      fibonacci(x - 1) + fibonacci(x - 2)
    }
  }
}";

fn main() {
    logging::init_tracing();

    let n: i64 = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(25);

    let interpreter = Interpreter::new();
    interpreter.run(INPUT).expect("Definition failed");
    let statements = interpreter
        .parse_all(&format!("fibonacci({})", n))
        .expect("Parse errors found");

    let start = Instant::now();
    let result = interpreter.eval_all(&statements).expect("Evaluation failed");
    let duration = start.elapsed();

    println!(
        "engine=tree, n={}, result={}, duration={}",
        n,
        result,
        duration.as_secs_f64(),
    );
}
