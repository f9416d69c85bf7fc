//! A `nom`-based parser for the write-rule expression language.
//!
//! Precedence, from loosest to tightest binding: `??`, `||`, `&&`, equality,
//! relational, additive, multiplicative, unary prefix, then member access and
//! calls.
use super::ast::*;
use crate::error::ParseError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded},
};

/// Deepest nesting of parentheses, prefix operators, indexes and call
/// arguments that [`parse_rule`] accepts.
pub const MAX_NESTING: usize = 32;

// --- Main Public Parser ---

pub fn parse_rule(source: &str) -> Result<Node, ParseError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    match expression(trimmed, 0) {
        Ok(("", node)) => Ok(node),
        Ok((rem, _)) => Err(ParseError::TrailingInput {
            source_text: source.to_string(),
            remainder: rem.to_string(),
        }),
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => Err(ParseError::TooDeep {
            source_text: source.to_string(),
            limit: MAX_NESTING,
        }),
        Err(e) => Err(ParseError::Syntax {
            source_text: source.to_string(),
            message: e.to_string(),
        }),
    }
}

// --- Combinators & Helpers ---

/// A combinator that takes a parser `inner` and produces a parser that consumes
/// surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parses `operand (op operand)*` and folds the result left-associatively with `build`.
fn left_assoc<'a, O, F, G>(
    operand: F,
    operator: G,
    build: fn(O, Node, Node) -> Node,
) -> impl FnMut(&'a str) -> IResult<&'a str, Node>
where
    F: Parser<&'a str, Output = Node, Error = Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = O, Error = Error<&'a str>> + Clone,
{
    move |input: &'a str| {
        let (input, first) = operand.clone().parse(input)?;
        let (input, remainder) = many0(pair(ws(operator.clone()), operand.clone())).parse(input)?;
        let node = remainder
            .into_iter()
            .fold(first, |left, (op, right)| build(op, left, right));
        Ok((input, node))
    }
}

/// Fails hard once `depth` passes [`MAX_NESTING`], so no other branch retries
/// the same input.
fn check_nesting(input: &str, depth: usize) -> Result<(), nom::Err<Error<&str>>> {
    if depth > MAX_NESTING {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    Ok(())
}

fn logical(operator: LogicalOperator, left: Node, right: Node) -> Node {
    Node::Logical {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn binary(operator: BinaryOperator, left: Node, right: Node) -> Node {
    Node::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str, depth: usize) -> IResult<&str, Node> {
    check_nesting(input, depth)?;
    coalesce_expr(input, depth)
}

fn coalesce_op(input: &str) -> IResult<&str, LogicalOperator> {
    value(LogicalOperator::Coalesce, tag("??")).parse(input)
}

fn or_op(input: &str) -> IResult<&str, LogicalOperator> {
    value(LogicalOperator::Or, tag("||")).parse(input)
}

fn and_op(input: &str) -> IResult<&str, LogicalOperator> {
    value(LogicalOperator::And, tag("&&")).parse(input)
}

fn coalesce_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    left_assoc(move |i| or_expr(i, depth), coalesce_op, logical)(input)
}

fn or_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    left_assoc(move |i| and_expr(i, depth), or_op, logical)(input)
}

fn and_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    left_assoc(move |i| equality_expr(i, depth), and_op, logical)(input)
}

fn equality_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::StrictEqual, tag("===")),
        value(BinaryOperator::StrictNotEqual, tag("!==")),
        value(BinaryOperator::Equal, tag("==")),
        value(BinaryOperator::NotEqual, tag("!=")),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::LessThanOrEqual, tag("<=")),
        value(BinaryOperator::GreaterThanOrEqual, tag(">=")),
        value(BinaryOperator::LessThan, tag("<")),
        value(BinaryOperator::GreaterThan, tag(">")),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Plus, char('+')),
        value(BinaryOperator::Minus, char('-')),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Multiply, char('*')),
        value(BinaryOperator::Divide, char('/')),
        value(BinaryOperator::Modulo, char('%')),
    ))
    .parse(input)
}

fn equality_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    left_assoc(move |i| relational_expr(i, depth), equality_op, binary)(input)
}

fn relational_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    left_assoc(move |i| additive_expr(i, depth), relational_op, binary)(input)
}

fn additive_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    left_assoc(move |i| multiplicative_expr(i, depth), additive_op, binary)(input)
}

fn multiplicative_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    left_assoc(move |i| unary_expr(i, depth), multiplicative_op, binary)(input)
}

fn unary_op(input: &str) -> IResult<&str, UnaryOperator> {
    alt((
        value(UnaryOperator::Not, char('!')),
        value(UnaryOperator::Minus, char('-')),
        value(UnaryOperator::Plus, char('+')),
    ))
    .parse(input)
}

fn unary_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    check_nesting(input, depth)?;
    alt((
        map(
            pair(ws(unary_op), |i| unary_expr(i, depth + 1)),
            |(operator, argument)| Node::Unary {
                operator,
                argument: Box::new(argument),
            },
        ),
        |i| postfix_expr(i, depth),
    ))
    .parse(input)
}

// --- Member Access & Calls ---

enum Postfix {
    Property(String),
    Index(Node),
    Call(Vec<Node>),
}

fn postfix_op(input: &str, depth: usize) -> IResult<&str, Postfix> {
    alt((
        map(preceded(ws(char('.')), identifier), |name| {
            Postfix::Property(name.to_string())
        }),
        map(
            delimited(ws(char('[')), |i| expression(i, depth + 1), ws(char(']'))),
            Postfix::Index,
        ),
        map(
            delimited(
                ws(char('(')),
                separated_list0(ws(char(',')), |i| expression(i, depth + 1)),
                ws(char(')')),
            ),
            Postfix::Call,
        ),
    ))
    .parse(input)
}

fn postfix_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    let (input, start) = primary_expr(input, depth)?;
    let (input, ops) = many0(|i| postfix_op(i, depth)).parse(input)?;
    let node = ops.into_iter().fold(start, |node, op| match op {
        Postfix::Property(name) => Node::Member {
            object: Box::new(node),
            property: Box::new(Node::Identifier(name)),
            computed: false,
        },
        Postfix::Index(index) => Node::Member {
            object: Box::new(node),
            property: Box::new(index),
            computed: true,
        },
        Postfix::Call(arguments) => Node::Call {
            callee: Box::new(node),
            arguments,
        },
    });
    Ok((input, node))
}

fn primary_expr(input: &str, depth: usize) -> IResult<&str, Node> {
    ws(alt((
        number_literal,
        string_literal,
        name_or_keyword,
        delimited(ws(char('(')), |i| expression(i, depth + 1), ws(char(')'))),
    )))
    .parse(input)
}

// --- Literal Parsers ---

fn number_literal(input: &str) -> IResult<&str, Node> {
    map_res(
        recognize((
            digit1,
            opt((char('.'), digit0)),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        |raw: &str| {
            raw.parse::<f64>().map(|n| {
                Node::Literal(Literal {
                    value: LiteralValue::Number(n),
                    raw: raw.to_string(),
                })
            })
        },
    )
    .parse(input)
}

/// Parses a single- or double-quoted string. Escapes are resolved in the value
/// and kept verbatim in `raw`.
fn string_literal(input: &str) -> IResult<&str, Node> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('\'' | '"'))) => c,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };
    let mut text = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(unescape(escaped)),
                None => break,
            },
            c if c == quote => {
                let end = i + c.len_utf8();
                let node = Node::Literal(Literal {
                    value: LiteralValue::String(text),
                    raw: input[..end].to_string(),
                });
                return Ok((&input[end..], node));
            }
            c => text.push(c),
        }
    }
    // Unterminated string: no other branch can make sense of it.
    Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)))
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

// --- Name Parsers ---

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    ))
    .parse(input)
}

fn name_or_keyword(input: &str) -> IResult<&str, Node> {
    map(identifier, |name| match name {
        "true" => Node::boolean(true),
        "false" => Node::boolean(false),
        "null" => Node::Literal(Literal {
            value: LiteralValue::Null,
            raw: "null".to_string(),
        }),
        _ => Node::Identifier(name.to_string()),
    })
    .parse(input)
}
