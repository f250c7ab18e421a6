use simple_script::{logging, repl, Interpreter};
use std::env;
use std::fs;
use std::process;

fn main() {
    logging::init_tracing();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            println!("Hello! This is a simple scripting language!");
            println!("Feel free to type in commands");
            repl::start();
            return;
        }
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("cannot read {}: {}", path, err);
            process::exit(2);
        }
    };

    match Interpreter::new().run(&source) {
        Ok(val) => println!("{}", val),
        Err(err) => {
            eprintln!("ERROR: {}", err);
            process::exit(1);
        }
    }
}
