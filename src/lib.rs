//! Static access analysis for data-store write rules.
//!
//! [`translate`] turns one rule, such as `auth.uid == $uid`, into an
//! [`Access`] describing when it grants a write: always, never, iff some
//! references are defined, or under a residual data-dependent condition.
//!
//! ```
//! use warrant::{translate, AccessKind, RulePath};
//!
//! let path: RulePath = "rules/users/$uid/.write".parse().unwrap();
//! let access = translate("auth.uid == $uid", &path).unwrap();
//! assert_eq!(access.kind(), AccessKind::Undefined);
//! assert_eq!(access.required_refs(), [vec!["$uid".to_string()]].as_slice());
//! ```

pub mod config;
pub mod error;
pub mod folder;
mod translator;

// --- Public API ---
pub use config::TranslatorConfig;
pub use error::TranslateError;
pub use folder::LogicFolder;
pub use translator::{RuleTranslator, translate};

pub use warrant_access::{Access, AccessKind, Expression, Tag};
pub use warrant_ast::{Node, NodeKind, ParseError, parse_rule};
pub use warrant_refs::{DataReferenceResolver, ReferenceResolver, ResolverConfig, RulePath};
