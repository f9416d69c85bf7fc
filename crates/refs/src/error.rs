use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefError {
    #[error("Invalid rule path '{0}': expected a non-empty path starting with 'rules'")]
    InvalidRulePath(String),
}
