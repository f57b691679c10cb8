//! Evaluates placeholder expressions against a bindings table.
use crate::ast::{Expr, Operator};
use quarry_types::{Bindings, Value};
use std::fmt;

/// The result of evaluating a placeholder expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A bound value, untouched (stringified with its own coercion).
    Value(Value),
    /// A computed number.
    Number(f64),
    /// A literal or concatenated string.
    Text(String),
}

impl Operand {
    fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Value(Value::Bool(_)) => None,
            Operand::Value(v) => v.as_f64(),
            Operand::Number(n) => Some(*n),
            Operand::Text(s) => s.trim().parse().ok(),
        }
    }

    fn empty() -> Self {
        Operand::Text(String::new())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{}", v),
            Operand::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Text(s) => f.write_str(s),
        }
    }
}

/// Evaluates an expression. Never fails: unknown names and non-numeric
/// arithmetic degrade to the empty string.
pub fn evaluate(expr: &Expr, bindings: &Bindings) -> Operand {
    match expr {
        Expr::Number(n) => Operand::Number(*n),
        Expr::Text(s) => Operand::Text(s.clone()),
        Expr::Variable(name) => match bindings.get(name) {
            Some(value) => Operand::Value(value.clone()),
            None => {
                log::debug!("Unbound variable '{}' resolves to an empty string", name);
                Operand::empty()
            }
        },
        Expr::Negate(inner) => match evaluate(inner, bindings).as_number() {
            Some(n) => Operand::Number(-n),
            None => Operand::empty(),
        },
        Expr::Binary { left, op, right } => {
            let left = evaluate(left, bindings);
            let right = evaluate(right, bindings);
            apply(*op, left, right)
        }
    }
}

fn apply(op: Operator, left: Operand, right: Operand) -> Operand {
    let numbers = left.as_number().zip(right.as_number());
    match (op, numbers) {
        (Operator::Add, Some((a, b))) => Operand::Number(a + b),
        (Operator::Add, None) => Operand::Text(format!("{}{}", left, right)),
        (Operator::Subtract, Some((a, b))) => Operand::Number(a - b),
        (Operator::Multiply, Some((a, b))) => Operand::Number(a * b),
        (Operator::Divide, Some((_, b))) if b == 0.0 => {
            log::debug!("Division by zero in placeholder expression");
            Operand::empty()
        }
        (Operator::Divide, Some((a, b))) => Operand::Number(a / b),
        (op, None) => {
            log::debug!(
                "Non-numeric operands '{}' and '{}' for {:?}",
                left,
                right,
                op
            );
            Operand::empty()
        }
    }
}
