use crate::evaluator::{Evaluator, EvaluatorConfig};
use crate::runner::{interpret_with, print_environments};
use std::io::{self, Write};

const COMMANDS: [&str; 6] = [".help", ".exit", ".quit", ".q", ".reset", ".env"];

/// REPL commands starting with `line`. An exact match wins over longer ones,
/// so `.q` completes to itself rather than also offering `.quit`.
pub fn complete(line: &str) -> Vec<&'static str> {
    if let Some(command) = COMMANDS.iter().find(|command| **command == line) {
        return vec![*command];
    }
    COMMANDS
        .iter()
        .copied()
        .filter(|command| command.starts_with(line))
        .collect()
}

/// Interactive session. The evaluator persists between lines until `.reset`.
pub fn start(config: EvaluatorConfig) {
    println!("Mint Interpreter v{}", env!("CARGO_PKG_VERSION"));
    println!("Type '.help' for commands, '.exit' to quit");
    println!();

    let mut evaluator = Evaluator::with_config(config);

    loop {
        print!(": ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let line = if line.starts_with('.') {
                    match complete(line).as_slice() {
                        [command] => *command,
                        [] => {
                            println!("Unknown command '{}'. Commands: {}", line, COMMANDS.join(" "));
                            continue;
                        }
                        candidates => {
                            println!("{}", candidates.join(" "));
                            continue;
                        }
                    }
                } else {
                    line
                };

                match line {
                    ".exit" | ".quit" | ".q" => break,
                    ".reset" => {
                        evaluator = Evaluator::with_config(config);
                        println!("The global environment has been reset.");
                    }
                    ".help" => print_help(),
                    ".env" => print_environments(&evaluator),
                    _ => run_repl_command(line, &mut evaluator),
                }
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_repl_command(source: &str, evaluator: &mut Evaluator) {
    match interpret_with(source, evaluator) {
        Ok(results) => {
            for value in results {
                println!("{}", value);
            }
        }
        Err(error) => error.report(source, None),
    }
}

fn print_help() {
    println!();
    println!("--- Mint REPL help ---");
    println!(".reset   Resets the global environment (clears all variables)");
    println!(".env     Print the environments recorded so far (needs --trace-limit > 0)");
    println!(".exit    Exit the REPL (.quit, .q also work)");
    println!(".help    Print this message");
    println!("Commands may be shortened to any unique prefix, e.g. '.r' for '.reset'.");
    println!();
}
