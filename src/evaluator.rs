use crate::ast::{BinaryOp, Node, Program, UnaryOp};
use crate::environment::{EnvironmentInfo, Environments, ScopeId};
use crate::error::{ErrorKind, MintError, Span};
use crate::value::{Closure, Value};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;
pub const DEFAULT_MAX_NESTING: usize = 512;

/// Where `print` statements go.
pub trait PrintSink {
    fn print_line(&mut self, line: &str);
}

impl PrintSink for io::Stdout {
    fn print_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

impl PrintSink for Vec<String> {
    fn print_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Calls nested deeper than this fail with `RecursionLimit`.
    pub max_call_depth: usize,
    /// Nodes nested deeper than this (operands, arguments and call bodies
    /// together) fail with `RecursionLimit`.
    pub max_nesting: usize,
    /// Keep snapshots of at most this many call scopes; `None` disables tracing.
    pub trace_capacity: Option<usize>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_nesting: DEFAULT_MAX_NESTING,
            trace_capacity: None,
        }
    }
}

/// Bounded record of call scopes, oldest dropped first.
#[derive(Debug, Clone)]
struct EnvironmentTrace {
    capacity: usize,
    entries: VecDeque<EnvironmentInfo>,
}

impl EnvironmentTrace {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    fn record(&mut self, info: EnvironmentInfo) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(info);
    }
}

/// Tree-walking evaluator. One instance is one evaluation session: the root
/// scope persists across [`Evaluator::interpret`] calls.
pub struct Evaluator<S: PrintSink = io::Stdout> {
    environments: Environments,
    config: EvaluatorConfig,
    trace: Option<EnvironmentTrace>,
    depth: usize,
    nesting: usize,
    sink: S,
}

impl Evaluator<io::Stdout> {
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self::with_sink(config, io::stdout())
    }
}

impl Default for Evaluator<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PrintSink> Evaluator<S> {
    pub fn with_sink(config: EvaluatorConfig, sink: S) -> Self {
        Self {
            environments: Environments::new("Global"),
            config,
            trace: config.trace_capacity.map(EnvironmentTrace::new),
            depth: 0,
            nesting: 0,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn environments(&self) -> &Environments {
        &self.environments
    }

    pub fn root(&self) -> ScopeId {
        self.environments.root()
    }

    /// Run a program against the root scope, returning the values of its
    /// bare expression statements in order.
    pub fn interpret(&mut self, program: &Program) -> Result<Vec<Value>, MintError> {
        let root = self.root();
        self.evaluate_program(program, root)
    }

    pub fn evaluate_program(
        &mut self,
        program: &Program,
        scope: ScopeId,
    ) -> Result<Vec<Value>, MintError> {
        let mut results = Vec::new();
        for statement in &program.statements {
            if let Some(value) = self.evaluate(statement, scope)? {
                results.push(value);
            }
        }
        Ok(results)
    }

    /// Root scope snapshot followed by the recorded call scopes.
    /// Empty unless tracing was enabled.
    pub fn environment_info(&self) -> Vec<EnvironmentInfo> {
        match &self.trace {
            Some(trace) => {
                let mut infos = vec![self.environments.info(self.root())];
                infos.extend(trace.entries.iter().cloned());
                infos
            }
            None => Vec::new(),
        }
    }

    /// Evaluate one node. Declarations and prints yield `None`.
    pub fn evaluate(&mut self, node: &Node, scope: ScopeId) -> Result<Option<Value>, MintError> {
        if self.nesting >= self.config.max_nesting {
            return Err(MintError::runtime_error(
                ErrorKind::RecursionLimit,
                *node.span(),
                format!("Expression nesting exceeds {} levels", self.config.max_nesting),
            ));
        }

        self.nesting += 1;
        let result = self.evaluate_node(node, scope);
        self.nesting -= 1;
        result
    }

    fn evaluate_node(&mut self, node: &Node, scope: ScopeId) -> Result<Option<Value>, MintError> {
        match node {
            Node::Declaration {
                identifier, value, ..
            } => {
                let value = self.evaluate_value(value, scope)?;
                self.environments
                    .set_item(scope, &identifier.name, value)
                    .map_err(|e| e.at(identifier.span))?;
                Ok(None)
            }
            Node::Print { expression, .. } => {
                let value = self.evaluate_value(expression, scope)?;
                self.sink.print_line(&value.to_string());
                Ok(None)
            }
            Node::BinaryOp {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.evaluate_number(left, scope)?;
                let right = self.evaluate_number(right, scope)?;
                let result = match operator {
                    BinaryOp::Add => left + right,
                    BinaryOp::Subtract => left - right,
                    BinaryOp::Multiply => left * right,
                    BinaryOp::Divide => left / right,
                };
                Ok(Some(Value::Number(result)))
            }
            Node::UnaryOp {
                operator, operand, ..
            } => {
                let operand = self.evaluate_number(operand, scope)?;
                let result = match operator {
                    UnaryOp::Plus => operand,
                    UnaryOp::Negate => -operand,
                };
                Ok(Some(Value::Number(result)))
            }
            Node::FnDeclaration {
                parameters, body, ..
            } => Ok(Some(Value::Function(Rc::new(Closure {
                parameters: parameters.names(),
                body: body.as_ref().clone(),
                scope,
            })))),
            Node::FnCall {
                identifier,
                arguments,
                span,
            } => {
                let callee = self
                    .environments
                    .get_item(scope, &identifier.name)
                    .map_err(|e| e.at(identifier.span))?;

                let closure = match callee {
                    Value::Function(closure) => closure,
                    other => {
                        return Err(MintError::runtime_error(
                            ErrorKind::NotCallable,
                            identifier.span,
                            format!(
                                "'{}' is a {}, not a function",
                                identifier.name,
                                other.type_name()
                            ),
                        ))
                    }
                };

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate_value(argument, scope)?);
                }

                self.call(&identifier.name, &closure, values, *span).map(Some)
            }
            Node::Var(var) => self
                .environments
                .get_item(scope, &var.name)
                .map(Some)
                .map_err(|e| e.at(var.span)),
            Node::Num { value, .. } => Ok(Some(Value::Number(*value))),
        }
    }

    fn call(
        &mut self,
        name: &str,
        closure: &Closure,
        arguments: Vec<Value>,
        span: Span,
    ) -> Result<Value, MintError> {
        if arguments.len() != closure.parameters.len() {
            return Err(MintError::runtime_error(
                ErrorKind::ArityMismatch,
                span,
                format!(
                    "'{}' expects {} argument(s), got {}",
                    name,
                    closure.parameters.len(),
                    arguments.len()
                ),
            ));
        }

        if self.depth >= self.config.max_call_depth {
            return Err(MintError::runtime_error(
                ErrorKind::RecursionLimit,
                span,
                format!(
                    "Call depth exceeded {} while calling '{}'",
                    self.config.max_call_depth, name
                ),
            )
            .with_help("Raise the limit with --max-depth if the recursion is intended."));
        }

        let mark = self.environments.len();
        let frame = self
            .environments
            .create(closure.scope, format!("Fn_{}", name));
        for (parameter, value) in closure.parameters.iter().zip(arguments) {
            // `fn with a, a` fails here
            if let Err(error) = self.environments.set_item(frame, parameter, value) {
                self.environments.release_to(mark);
                return Err(error.at(span));
            }
        }

        if let Some(trace) = self.trace.as_mut() {
            trace.record(self.environments.info(frame));
        }

        self.depth += 1;
        let result = self.evaluate_value(&closure.body, frame);
        self.depth -= 1;

        // A numeric result cannot reference scopes created by this call
        if matches!(result, Ok(Value::Number(_)) | Err(_)) {
            self.environments.release_to(mark);
        }

        result
    }

    /// Evaluate a node that must produce a value.
    fn evaluate_value(&mut self, node: &Node, scope: ScopeId) -> Result<Value, MintError> {
        self.evaluate(node, scope)?.ok_or_else(|| {
            MintError::runtime_error(
                ErrorKind::InvalidOperand,
                *node.span(),
                "Statement used where a value is expected".to_string(),
            )
        })
    }

    fn evaluate_number(&mut self, node: &Node, scope: ScopeId) -> Result<f64, MintError> {
        match self.evaluate_value(node, scope)? {
            Value::Number(n) => Ok(n),
            other => Err(MintError::runtime_error(
                ErrorKind::InvalidOperand,
                *node.span(),
                format!("Arithmetic on a {} value", other.type_name()),
            )
            .with_help("Call the function with 'of' to get a number from it.")),
        }
    }
}
