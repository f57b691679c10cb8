//! Defines the AST for placeholder expressions.

/// An arithmetic operator, in the usual precedence classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Text(String),
    /// A reference to a binding.
    Variable(String),
    Negate(Box<Expr>),
    Binary {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
}
