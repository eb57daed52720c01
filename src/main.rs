use clap::{value_parser, Arg, ArgAction, Command};
use mint::evaluator::{EvaluatorConfig, DEFAULT_MAX_CALL_DEPTH};
use mint::{repl, runner};
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let matches = Command::new("mint")
        .about("Interpreter and JavaScript transpiler for the Mint language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("compile")
                .long("compile")
                .help("Write the program as JavaScript to FILE.js instead of running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Print the environments created while running")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("trace-limit")
                .long("trace-limit")
                .value_name("N")
                .help("How many call environments to keep for --debug and .env")
                .value_parser(value_parser!(usize))
                .default_value("64"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Maximum nesting of function calls")
                .value_parser(value_parser!(usize))
                .default_value("256"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let debug = matches.get_flag("debug");
    let trace_limit = matches.get_one::<usize>("trace-limit").copied().unwrap_or(0);
    let config = EvaluatorConfig {
        max_call_depth: matches
            .get_one::<usize>("max-depth")
            .copied()
            .unwrap_or(DEFAULT_MAX_CALL_DEPTH),
        trace_capacity: Some(trace_limit),
        ..EvaluatorConfig::default()
    };
    // Scripts only pay for the trace when it will be printed
    let script_config = EvaluatorConfig {
        trace_capacity: debug.then_some(trace_limit),
        ..config
    };

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => {
            if matches.get_flag("compile") {
                compile_file(file_path);
            } else {
                run_file(file_path, script_config, debug);
            }
        }
        _ => repl::start(config),
    }
}

fn read_source(path: &Path) -> String {
    if !path.exists() {
        eprintln!("The file \"{}\" could not be found.", path.display());
        process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn run_file(path: &str, config: EvaluatorConfig, debug: bool) {
    let path = Path::new(path);
    let source = read_source(path);
    let filename = path.display().to_string();

    match runner::run(&source, Some(&filename), config) {
        Some(evaluator) => {
            if debug {
                runner::print_environments(&evaluator);
            }
        }
        None => process::exit(1),
    }
}

fn compile_file(path: &str) {
    let path = Path::new(path);
    let source = read_source(path);
    let filename = path.display().to_string();

    let output = match runner::compile(&source) {
        Ok(output) => output,
        Err(error) => {
            error.report(&source, Some(&filename));
            process::exit(1);
        }
    };

    let target = format!("{}.js", path.display());
    if let Err(e) = fs::write(&target, output) {
        eprintln!("Error writing file '{}': {}", target, e);
        process::exit(1);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(filename);
    println!("Compiled ./{} to ./{}.js", name, name);
}
