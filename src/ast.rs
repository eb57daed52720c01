use crate::error::Span;
use std::fmt;

/// Header written at the top of every transpiled program.
pub const TRANSPILE_HEADER: &str = "// Compiled from Mint";

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    BinaryOp {
        left: Box<Node>,
        operator: BinaryOp,
        right: Box<Node>,
        span: Span,
    },
    UnaryOp {
        operator: UnaryOp,
        operand: Box<Node>,
        span: Span,
    },
    Declaration {
        identifier: Var,
        value: Box<Node>,
        span: Span,
    },
    FnDeclaration {
        parameters: FnArgs,
        body: Box<Node>,
        span: Span,
    },
    FnCall {
        identifier: Var,
        arguments: Vec<Node>,
        span: Span,
    },
    Print {
        expression: Box<Node>,
        span: Span,
    },
    Var(Var),
    Num {
        value: f64,
        span: Span,
    },
}

impl Node {
    pub fn span(&self) -> &Span {
        match self {
            Node::BinaryOp { span, .. } => span,
            Node::UnaryOp { span, .. } => span,
            Node::Declaration { span, .. } => span,
            Node::FnDeclaration { span, .. } => span,
            Node::FnCall { span, .. } => span,
            Node::Print { span, .. } => span,
            Node::Var(var) => &var.span,
            Node::Num { span, .. } => span,
        }
    }
}

/// A variable reference or binding name.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub span: Span,
}

impl Var {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parameter list of a function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FnArgs {
    pub parameters: Vec<Var>,
}

impl FnArgs {
    pub fn names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Subtract),
            "*" => Some(BinaryOp::Multiply),
            "/" => Some(BinaryOp::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Negate,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(UnaryOp::Plus),
            "-" => Some(UnaryOp::Negate),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Negate => "-",
        }
    }
}

/// Render a number the way the JavaScript host prints it: shortest
/// round-trip digits, switching to exponent form (`1e+21`, `1e-7`) outside
/// `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || (magnitude < 1e-6 && n != 0.0) {
        let exponent = format!("{:e}", n);
        return match exponent.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exponent,
        };
    }

    format!("{}", n)
}

/// Render a number as Mint source the lexer reads back to the same value.
/// Literals are unsigned decimals, so non-finite values become divisions.
fn number_literal(n: f64) -> String {
    if n.is_nan() {
        "(0 / 0)".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "(1 / 0)" } else { "(-1 / 0)" }.to_string()
    } else {
        format!("{}", n)
    }
}

fn join<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// JavaScript transpilation
// ============================================================================

impl Program {
    /// Render the program as JavaScript.
    pub fn transpile(&self) -> String {
        let mut out = String::from(TRANSPILE_HEADER);
        out.push('\n');
        for statement in &self.statements {
            out.push_str(&statement.transpile());
            out.push_str(";\n");
        }
        out
    }

    /// Render the program as canonical Mint source.
    ///
    /// Binary operations and calls are parenthesised, so the result re-parses
    /// to the same tree even though the grammar only takes one operator per
    /// precedence level and call arguments are greedy.
    pub fn to_source(&self) -> String {
        self.statements
            .iter()
            .map(|statement| format!("{};\n", statement.to_source()))
            .collect()
    }
}

impl Node {
    pub fn transpile(&self) -> String {
        match self {
            Node::BinaryOp {
                left,
                operator,
                right,
                ..
            } => format!(
                "{} {} {}",
                left.transpile_operand(),
                operator.symbol(),
                right.transpile_operand()
            ),
            Node::UnaryOp {
                operator, operand, ..
            } => format!("{}({})", operator.symbol(), operand.transpile()),
            Node::Declaration {
                identifier, value, ..
            } => format!("const {} = {}", identifier.name, value.transpile()),
            Node::FnDeclaration {
                parameters, body, ..
            } => {
                // An arrow body starting with '(' could be read as a call; wrap nested arrows
                let body = match body.as_ref() {
                    Node::FnDeclaration { .. } => format!("({})", body.transpile()),
                    _ => body.transpile(),
                };
                format!("({}) => {}", join(&parameters.parameters, |p| p.name.clone()), body)
            }
            Node::FnCall {
                identifier,
                arguments,
                ..
            } => format!("{}({})", identifier.name, join(arguments, |a| a.transpile())),
            Node::Print { expression, .. } => format!("console.log({})", expression.transpile()),
            Node::Var(var) => var.name.clone(),
            Node::Num { value, .. } => format_number(*value),
        }
    }

    fn transpile_operand(&self) -> String {
        match self {
            Node::BinaryOp { .. } => format!("({})", self.transpile()),
            _ => self.transpile(),
        }
    }

    // ========================================================================
    // Canonical Mint rendering
    // ========================================================================

    pub fn to_source(&self) -> String {
        match self {
            Node::BinaryOp {
                left,
                operator,
                right,
                ..
            } => format!(
                "({} {} {})",
                left.to_source(),
                operator.symbol(),
                right.to_source()
            ),
            Node::UnaryOp {
                operator, operand, ..
            } => format!("{}{}", operator.symbol(), operand.to_source_value()),
            Node::Declaration {
                identifier, value, ..
            } => format!("let {} be {}", identifier.name, value.to_source()),
            Node::FnDeclaration {
                parameters, body, ..
            } => format!(
                "fn with {} returning {}",
                join(&parameters.parameters, |p| p.name.clone()),
                body.to_source()
            ),
            Node::FnCall {
                identifier,
                arguments,
                ..
            } => format!(
                "({} of {})",
                identifier.name,
                join(arguments, |a| a.to_source())
            ),
            Node::Print { expression, .. } => format!("print {}", expression.to_source()),
            Node::Var(var) => var.name.clone(),
            Node::Num { value, .. } => number_literal(*value),
        }
    }

    /// Operand of a unary operator must be a `value` in the grammar.
    fn to_source_value(&self) -> String {
        match self {
            Node::BinaryOp { .. } | Node::FnCall { .. } | Node::Var(_) | Node::Num { .. } => {
                self.to_source()
            }
            _ => format!("({})", self.to_source()),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.transpile())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.transpile())
    }
}
