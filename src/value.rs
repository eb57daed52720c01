use crate::ast::{format_number, Node};
use crate::environment::ScopeId;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Function(Rc<Closure>),
}

/// A function value: parameter names, body, and the scope it was declared in.
#[derive(Debug, PartialEq)]
pub struct Closure {
    pub parameters: Vec<String>,
    pub body: Node,
    pub scope: ScopeId,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Function(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Function(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Function(closure) => write!(f, "<fn with {}>", closure.parameters.join(", ")),
        }
    }
}
