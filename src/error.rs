// src/error.rs
use thiserror::Error;
use warrant_ast::NodeKind;
use warrant_refs::RefError;

/// Errors raised while translating a rule. Parse failures are not among them:
/// an unparseable rule translates to [`Access::multiple`](warrant_access::Access::multiple).
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Unsupported literal '{raw}': only true and false are meaningful here")]
    UnsupportedLiteral { raw: String },

    #[error("Unsupported logical operator: {operator}")]
    UnsupportedOperator { operator: String },

    #[error("Unsupported comparison operand: {kind}")]
    UnsupportedOperand { kind: NodeKind },

    #[error("Expected a BinaryExpression, found {kind}")]
    InvalidShape { kind: NodeKind },

    #[error("Rule nests logical expressions deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("Invalid rule path: {0}")]
    Path(#[from] RefError),

    #[error("Invalid translator configuration: {0}")]
    Config(#[from] serde_json::Error),
}
