//! Access-policy values produced by write-rule analysis.
//!
//! An [`Expression`] is one clause of a policy, tagged `True`, `False` or
//! `Undefined` (granted iff some references are defined), and combined with
//! [`Expression::and`] / [`Expression::or`]. [`Access`] is the normalized
//! form handed to consumers.

pub mod access;
pub mod expression;

pub use access::{Access, AccessKind};
pub use expression::{Expression, Tag};
