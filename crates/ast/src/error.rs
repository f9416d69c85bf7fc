use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Rule expression is empty")]
    Empty,

    #[error("Rule parse error in '{source_text}': {message}")]
    Syntax { source_text: String, message: String },

    #[error(
        "Rule parse error in '{source_text}': parser did not consume all input. \
         Remainder: '{remainder}'"
    )]
    TrailingInput { source_text: String, remainder: String },

    #[error("Rule parse error in '{source_text}': nesting exceeds {limit} levels")]
    TooDeep { source_text: String, limit: usize },
}
