// Mint Language Library
//
// Lexer, parser, tree-walking evaluator and JavaScript transpiler for Mint,
// a small expression language with write-once bindings and curried functions.

// Public modules
pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{Node, Program};
pub use environment::{EnvironmentInfo, Environments, ScopeId};
pub use error::{ErrorKind, MintError, Span};
pub use evaluator::{Evaluator, EvaluatorConfig, PrintSink};
pub use lexer::{Lexer, Token, TokenType, TokenValue};
pub use parser::Parser;
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{compile, interpret, parse, run};
