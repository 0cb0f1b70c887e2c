//! Arithmetic evaluation for calculation records.
//!
//! The front end carries a copy of [`evaluate`] in `static/js/evaluator.js` for
//! previews; both must apply the same four formulas on IEEE-754 doubles.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Operation kind of a calculation, stored and sent by its canonical name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Add,
    Sub,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("Division by zero is not allowed")]
    DivisionByZero,
    #[error("Unsupported operation type: {0}")]
    UnsupportedOperation(String),
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Sub,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Sub => "SUB",
            Operation::Multiply => "MULTIPLY",
            Operation::Divide => "DIVIDE",
        }
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64, EvalError> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Sub => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            // -0.0 == 0.0, so both signed zeros are rejected
            Operation::Divide if b == 0.0 => Err(EvalError::DivisionByZero),
            Operation::Divide => Ok(a / b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| EvalError::UnsupportedOperation(s.to_string()))
    }
}

/// Computes `a <op> b`, refusing to divide by zero.
pub fn evaluate(a: f64, b: f64, op: Operation) -> Result<f64, EvalError> {
    op.apply(a, b)
}
