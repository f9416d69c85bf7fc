//! The location of a rule inside a rules document.
use crate::error::RefError;
use std::fmt;
use std::str::FromStr;

/// An ordered list of segments naming a rule, e.g. `rules/users/$uid/.write`.
///
/// The first segment is always `rules`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RulePath {
    segments: Vec<String>,
}

impl RulePath {
    /// The segment every rule path starts with.
    pub const ROOT: &'static str = "rules";

    pub fn new<I, S>(segments: I) -> Result<Self, RefError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.first().map(String::as_str) != Some(Self::ROOT) {
            return Err(RefError::InvalidRulePath(segments.join("/")));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The data location guarded by the rule: the segments after `rules`,
    /// without trailing rule keys such as `.write` or `.validate`.
    pub fn location(&self) -> Vec<String> {
        let mut location: Vec<String> = self.segments[1..].to_vec();
        while location.last().is_some_and(|s| s.starts_with('.')) {
            location.pop();
        }
        location
    }
}

impl FromStr for RulePath {
    type Err = RefError;

    /// Parses a `/`-separated path such as `rules/users/$uid/.write`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RulePath::new(s.split('/').filter(|part| !part.is_empty()))
    }
}

impl fmt::Display for RulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
