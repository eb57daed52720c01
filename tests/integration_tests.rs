// Parser robustness tests for Mint
//
// Table-driven suites that push source text through the lexer and parser and
// check that each input is accepted or rejected as expected, without panics.

use mint::error::MintError;
use mint::lexer::Lexer;
use mint::parser::Parser;

#[derive(Debug)]
enum Outcome {
    Pass,
    Fail(String),
    Crash(String),
}

#[derive(Debug, Clone)]
struct Case {
    name: &'static str,
    input: String,
    accept: bool,
    message: Option<&'static str>,
}

impl Case {
    fn accepts(name: &'static str, input: &str) -> Self {
        Self {
            name,
            input: input.to_string(),
            accept: true,
            message: None,
        }
    }

    fn rejects(name: &'static str, input: &str) -> Self {
        Self {
            name,
            input: input.to_string(),
            accept: false,
            message: None,
        }
    }

    fn rejects_with(name: &'static str, input: &str, message: &'static str) -> Self {
        Self {
            name,
            input: input.to_string(),
            accept: false,
            message: Some(message),
        }
    }

    fn run(&self) -> Outcome {
        let input = self.input.clone();
        let result = std::panic::catch_unwind(move || parse_input(&input));

        match result {
            Ok(Ok(_)) if self.accept => Outcome::Pass,
            Ok(Ok(_)) => Outcome::Fail("expected a syntax error, but parsing succeeded".to_string()),
            Ok(Err(error)) if self.accept => {
                Outcome::Fail(format!("expected success, got error: {}", error))
            }
            Ok(Err(error)) => match self.message {
                Some(expected) if !error.message.contains(expected) => Outcome::Fail(format!(
                    "error message '{}' does not contain '{}'",
                    error.message, expected
                )),
                _ => Outcome::Pass,
            },
            Err(panic) => Outcome::Crash(
                panic
                    .downcast_ref::<String>()
                    .cloned()
                    .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown panic".to_string()),
            ),
        }
    }
}

struct Suite {
    name: &'static str,
    cases: Vec<Case>,
}

impl Suite {
    /// Run every case, printing one line each; returns the number of failures.
    fn run(&self) -> usize {
        println!("Running suite: {}", self.name);
        let mut failures = 0;
        for case in &self.cases {
            match case.run() {
                Outcome::Pass => println!("  ok   {}", case.name),
                Outcome::Fail(msg) => {
                    failures += 1;
                    println!("  FAIL {}: {}", case.name, msg);
                }
                Outcome::Crash(msg) => {
                    failures += 1;
                    println!("  CRASH {}: {}", case.name, msg);
                }
            }
        }
        println!();
        failures
    }
}

fn parse_input(input: &str) -> Result<mint::ast::Program, MintError> {
    let mut lexer = Lexer::new(input);
    let tokens = lexer.scan_tokens()?;
    let mut parser = Parser::new(tokens);
    parser.parse()
}

// ============================================================================
// Suites
// ============================================================================

fn malformed_expressions() -> Suite {
    Suite {
        name: "Malformed Expressions",
        cases: vec![
            Case::rejects_with("unmatched_opening_paren", "(1 + 2;", "Expected ')'"),
            Case::rejects_with("unmatched_opening_paren_nested", "((1 + 2);", "Expected ')'"),
            Case::rejects_with("unmatched_closing_paren", "1 + 2);", "Expected ';', got ')'"),
            Case::rejects_with("empty_parentheses", "();", "Expected number, got ')'"),
            Case::rejects_with("empty_parentheses_operand", "1 + ();", "Expected number"),
            Case::rejects_with("braces_have_no_grammar", "{ 1 };", "got '{'"),
            Case::rejects_with("pipe_has_no_grammar", "1 | 2;", "Expected ';', got '|'"),
        ],
    }
}

fn edge_cases() -> Suite {
    let deep_parens = "(".repeat(100) + "1" + &")".repeat(100) + ";";
    Suite {
        name: "Edge Cases",
        cases: vec![
            Case::accepts("empty_input", ""),
            Case::accepts("only_whitespace", "   \n\t  "),
            Case::accepts("only_comment", "# nothing to see here"),
            Case::accepts("deeply_nested_parens", &deep_parens),
            Case::rejects("eof_after_operator", "1 +"),
            Case::rejects("eof_in_parens", "1 + ("),
            Case::rejects_with("missing_semicolon", "1", "Expected ';', got end of input"),
        ],
    }
}

fn operators() -> Suite {
    Suite {
        name: "Operators",
        cases: vec![
            Case::accepts("unary_plus", "+ 1;"),
            Case::accepts("unary_minus_operand", "1 -- 2;"),
            Case::accepts("unary_plus_operand", "1 ++ 2;"),
            Case::accepts("unary_after_star", "1 * - 2;"),
            Case::accepts("mixed_precedence", "1 - 2 * 3;"),
            Case::accepts("parenthesised_chain", "(1 + 2) + 3;"),
            Case::rejects("missing_right_operand", "1 +;"),
            Case::rejects("lone_operator", "+;"),
            // One operator per level: chains need parentheses
            Case::rejects_with("chained_sum", "1 + 2 + 3;", "Expected ';', got '+'"),
            Case::rejects_with("chained_product", "1 * 2 * 3;", "Expected ';', got '*'"),
            Case::rejects_with("assignment_operator", "1 = 2;", "Unrecognized character '='"),
        ],
    }
}

fn literals() -> Suite {
    Suite {
        name: "Literals",
        cases: vec![
            Case::accepts("integer", "42;"),
            Case::accepts("fraction", "3.14;"),
            Case::rejects("multiple_dots", "3.14.159;"),
            Case::rejects("trailing_dot", "42.;"),
            Case::rejects("leading_dot", ".42;"),
        ],
    }
}

fn declarations() -> Suite {
    Suite {
        name: "Declarations",
        cases: vec![
            Case::accepts("simple", "let x be 10;"),
            Case::accepts("keywords_any_case", "LET x BE 10;"),
            Case::accepts("function", "let id be fn with a returning a;"),
            Case::accepts("curried", "let add be fn with a returning fn with b returning a + b;"),
            Case::rejects("missing_value", "let x be;"),
            Case::rejects_with("number_as_name", "let 1 be 2;", "Expected identifier, got number"),
            Case::rejects_with("missing_be", "let x 10;", "Expected 'be', got number"),
            Case::rejects_with(
                "no_parameters",
                "let f be fn with returning 1;",
                "Expected identifier, got 'returning'",
            ),
            Case::rejects("trailing_parameter_comma", "let f be fn with a, returning a;"),
            Case::rejects_with("missing_returning", "let f be fn with a a;", "Expected 'returning'"),
            Case::rejects_with("bare_function", "fn with a returning a;", "Expected number, got 'fn'"),
        ],
    }
}

fn calls_and_prints() -> Suite {
    Suite {
        name: "Calls and Prints",
        cases: vec![
            Case::accepts("single_argument", "foo of 1;"),
            Case::accepts("several_arguments", "foo of 1, 2, 3;"),
            Case::accepts("call_in_parens", "1 + (foo of 2);"),
            Case::accepts("print_expression", "print 1 + 2;"),
            Case::accepts("print_call", "print foo of 1;"),
            Case::rejects("no_arguments", "foo of;"),
            Case::rejects("trailing_argument_comma", "foo of 1,;"),
            Case::rejects_with("missing_of", "foo 1;", "Expected ';', got number"),
            Case::rejects("print_nothing", "print;"),
            Case::rejects("print_keyword", "print let;"),
        ],
    }
}

#[test]
fn parser_robustness_suites() {
    let suites = vec![
        malformed_expressions(),
        edge_cases(),
        operators(),
        literals(),
        declarations(),
        calls_and_prints(),
    ];

    let failures: usize = suites.iter().map(Suite::run).sum();
    assert_eq!(failures, 0, "{} parser case(s) failed, see output above", failures);
}
