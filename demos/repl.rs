//! Interactive read-evaluate-print loop
//!
//! Bindings persist across lines, so assignments build up a working set:
//!
//! ```text
//! pybble> rate = 3
//! 3
//! pybble> rate * 2 + 1
//! 7
//! ```
//!
//! Run with: cargo run --example repl

use std::io::{self, BufRead, Write};

use anyhow::Result;
use pybble::{evaluate_expr, Context};

fn main() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut ctx = Context::new();

    println!(
        "pybble {} - type an expression, 'vars' to list bindings, Ctrl-D to exit",
        pybble::VERSION
    );

    loop {
        print!("pybble> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let source = line.trim();

        if source.is_empty() {
            continue;
        }
        if source == "exit" || source == "quit" {
            break;
        }
        if source == "vars" {
            for name in ctx.names() {
                if let Ok(value) = ctx.get(&name) {
                    println!("{} = {}", name, value);
                }
            }
            continue;
        }

        match evaluate_expr(source, &mut ctx) {
            Ok(value) => println!("{}", value),
            Err(err) => println!("error: {}", err),
        }
    }

    Ok(())
}
