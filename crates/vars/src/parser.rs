//! A `nom`-based parser for placeholder expressions.
use super::ast::{Expr, Operator};
use crate::error::VarsError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, char, multispace0},
    combinator::{map, recognize},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded},
};

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expr, VarsError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(VarsError::Parse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(VarsError::Parse(input.to_string(), e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expr>
where
    F: Parser<&'a str, Output = Expr, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = Operator, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(term, additive_op)(input)
}

fn additive_op(input: &str) -> IResult<&str, Operator> {
    alt((
        map(char('+'), |_| Operator::Add),
        map(char('-'), |_| Operator::Subtract),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, Operator> {
    alt((
        map(char('*'), |_| Operator::Multiply),
        map(char('/'), |_| Operator::Divide),
    ))
    .parse(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(unary, multiplicative_op)(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |e| Expr::Negate(Box::new(e))),
        ws(primary),
    ))
    .parse(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    alt((
        delimited(ws(char('(')), expression, ws(char(')'))),
        map(string_literal, Expr::Text),
        // Identifiers come before numbers so `inf`/`nan` stay names.
        map(identifier, |s: &str| Expr::Variable(s.to_string())),
        map(double, Expr::Number),
    ))
    .parse(input)
}

// --- Literal & Name Parsers ---

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}
