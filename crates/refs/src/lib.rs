//! Reference resolution for write-rule analysis.
//!
//! Rules read stored data through navigation chains (`root.child('a')`,
//! `data.parent()`) and compare it against the requester's `auth` context.
//! This crate decides which nodes denote `auth` and maps data chains to
//! absolute paths relative to the rule's [`RulePath`].

mod config;
mod error;
mod path;
mod resolver;

pub use config::ResolverConfig;
pub use error::RefError;
pub use path::RulePath;
pub use resolver::{DataReferenceResolver, ReferenceResolver};
