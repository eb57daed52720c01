use crate::ast::Program;
use crate::error::MintError;
use crate::evaluator::{Evaluator, EvaluatorConfig, PrintSink};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;

/// Lex and parse a whole compilation unit.
pub fn parse(source: &str) -> Result<Program, MintError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.scan_tokens()?;
    let mut parser = Parser::new(tokens);
    parser.parse()
}

/// Parse and evaluate `source` in an existing session.
pub fn interpret_with<S: PrintSink>(
    source: &str,
    evaluator: &mut Evaluator<S>,
) -> Result<Vec<Value>, MintError> {
    let program = parse(source)?;
    evaluator.interpret(&program)
}

/// Parse and evaluate `source` in a fresh session, collecting printed lines.
pub fn interpret(source: &str) -> Result<(Vec<Value>, Vec<String>), MintError> {
    let mut evaluator = Evaluator::with_sink(EvaluatorConfig::default(), Vec::new());
    let results = interpret_with(source, &mut evaluator)?;
    Ok((results, evaluator.sink().clone()))
}

/// Transpile `source` to JavaScript.
pub fn compile(source: &str) -> Result<String, MintError> {
    Ok(parse(source)?.transpile())
}

/// Run a script to stdout, reporting any error against the source.
/// Returns the evaluator so callers can inspect the session afterwards.
pub fn run(source: &str, filename: Option<&str>, config: EvaluatorConfig) -> Option<Evaluator> {
    let program = match parse(source) {
        Ok(program) => program,
        Err(error) => {
            error.report(source, filename);
            return None;
        }
    };

    let mut evaluator = Evaluator::with_config(config);
    if let Err(error) = evaluator.interpret(&program) {
        error.report(source, filename);
        return None;
    }
    Some(evaluator)
}

/// Print the environment trace, indenting each scope by its distance.
pub fn print_environments<S: PrintSink>(evaluator: &Evaluator<S>) {
    println!("Environments: ");
    for info in evaluator.environment_info() {
        for line in info.lines() {
            println!("{}{}", "  ".repeat(info.distance), line);
        }
    }
}
