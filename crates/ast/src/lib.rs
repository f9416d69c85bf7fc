//! Syntax tree and parser for data-store write rules.
//!
//! A rule is a single JavaScript-like boolean expression, for example
//! `auth != null && (auth.uid == $uid || root.child('admins').child(auth.uid).exists())`.
//! This crate turns the rule source into a [`Node`] tree; it does not evaluate it.

pub mod ast;
pub mod error;
mod parser;

// --- Public API ---
pub use ast::{
    BinaryOperator, Literal, LiteralValue, LogicalOperator, Node, NodeKind, UnaryOperator,
};
pub use error::ParseError;
pub use parser::{MAX_NESTING, parse_rule};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typical_write_rule() {
        let rule =
            "auth != null && (auth.uid == $uid || root.child('admins').child(auth.uid).exists())";
        let node = parse_rule(rule).unwrap();
        assert_eq!(node.kind(), NodeKind::Logical);
        assert_eq!(node.to_string(), rule);
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let rule = "data.child('a').val() + 1 >= newData.child(\"b\").val() * 2";
        let node = parse_rule(rule).unwrap();
        assert_eq!(parse_rule(&node.to_string()).unwrap(), node);
    }
}
