//! The normalized result of analysing one rule.
use crate::expression::{Expression, Tag};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Granted, possibly under a residual condition.
    Granted,
    Denied,
    /// Granted iff one of the reference conjunctions is defined.
    Undefined,
    /// The rule's intent is unknown; treat it as possibly granted.
    Multiple,
}

/// Under which conditions a rule grants access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    kind: AccessKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    refs: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
}

impl Access {
    /// The access of a rule that could not be analysed at all.
    pub fn multiple() -> Self {
        Self::bare(AccessKind::Multiple)
    }

    pub fn granted() -> Self {
        Self::bare(AccessKind::Granted)
    }

    pub fn denied() -> Self {
        Self::bare(AccessKind::Denied)
    }

    fn bare(kind: AccessKind) -> Self {
        Self {
            kind,
            refs: Vec::new(),
            condition: None,
        }
    }

    /// Normalizes a fully folded expression.
    ///
    /// Reference conjunctions are sorted and de-duplicated, and alternatives
    /// implied by a smaller alternative are absorbed. An `Undefined`
    /// expression with nothing left to require is granted; one with no
    /// alternatives at all is denied.
    pub fn from_expression(expression: Expression) -> Self {
        let (tag, refs, condition) = expression.into_parts();
        match tag {
            Tag::True => Self {
                kind: AccessKind::Granted,
                refs: Vec::new(),
                condition,
            },
            Tag::False => Self::denied(),
            Tag::Undefined => {
                let refs = normalize_alternatives(refs);
                if refs.is_empty() {
                    Self::denied()
                } else if refs[0].is_empty() {
                    Self {
                        kind: AccessKind::Granted,
                        refs: Vec::new(),
                        condition,
                    }
                } else {
                    Self {
                        kind: AccessKind::Undefined,
                        refs,
                        condition,
                    }
                }
            }
        }
    }

    pub fn kind(&self) -> AccessKind {
        self.kind
    }

    /// The reference conjunctions, one of which must be defined for an `Undefined` access.
    pub fn required_refs(&self) -> &[Vec<String>] {
        &self.refs
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// Granted unconditionally.
    pub fn is_always_granted(&self) -> bool {
        self.kind == AccessKind::Granted && self.condition.is_none()
    }

    pub fn is_never_granted(&self) -> bool {
        self.kind == AccessKind::Denied
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }
}

// Sorted by length first, so an alternative can only be absorbed by one kept before it.
fn normalize_alternatives(refs: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let candidates = refs
        .into_iter()
        .map(|conj| conj.into_iter().sorted().dedup().collect::<Vec<_>>())
        .sorted_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .dedup();

    let mut kept: Vec<Vec<String>> = Vec::new();
    for alternative in candidates {
        let absorbed = kept
            .iter()
            .any(|smaller| smaller.iter().all(|r| alternative.binary_search(r).is_ok()));
        if !absorbed {
            kept.push(alternative);
        }
    }
    kept
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AccessKind::Granted => f.write_str("granted")?,
            AccessKind::Denied => f.write_str("denied")?,
            AccessKind::Multiple => f.write_str("multiple")?,
            AccessKind::Undefined => write!(
                f,
                "granted if defined: {}",
                self.refs.iter().map(|conj| conj.join(" & ")).join(" | ")
            )?,
        }
        if let Some(condition) = &self.condition {
            write!(f, " when {}", condition)?;
        }
        Ok(())
    }
}
