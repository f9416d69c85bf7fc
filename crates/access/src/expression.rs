//! Boolean clauses of an access policy and their `and`/`or` algebra.
use itertools::{Itertools, iproduct};
use serde::{Deserialize, Serialize};

/// The static truth value of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    True,
    False,
    /// Holds iff the clause's references are defined.
    Undefined,
}

/// One clause of an access policy.
///
/// `refs` is a disjunction of conjunctions: the clause holds if every
/// reference of at least one inner list is defined. It is only populated for
/// [`Tag::Undefined`]. `condition` carries a data-dependent predicate that
/// could not be decided statically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    tag: Tag,
    refs: Vec<Vec<String>>,
    condition: Option<String>,
}

impl Expression {
    pub fn new(tag: Tag) -> Self {
        Self::with_condition(tag, None)
    }

    /// A clause with a residual condition. `False` clauses drop it, since they never hold.
    pub fn with_condition(tag: Tag, condition: Option<String>) -> Self {
        let condition = if tag == Tag::False { None } else { condition };
        Self {
            tag,
            refs: Vec::new(),
            condition,
        }
    }

    /// A clause that holds iff one of the reference conjunctions is defined.
    pub fn undefined(refs: Vec<Vec<String>>) -> Self {
        Self {
            tag: Tag::Undefined,
            refs,
            condition: None,
        }
    }

    pub fn always() -> Self {
        Self::new(Tag::True)
    }

    pub fn never() -> Self {
        Self::new(Tag::False)
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn refs(&self) -> &[Vec<String>] {
        &self.refs
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn into_parts(self) -> (Tag, Vec<Vec<String>>, Option<String>) {
        (self.tag, self.refs, self.condition)
    }

    /// Conjunction of two clauses.
    pub fn and(left: Expression, right: Expression) -> Expression {
        let condition = and_conditions(left.condition, right.condition);
        match (left.tag, right.tag) {
            (Tag::False, _) | (_, Tag::False) => Expression::never(),
            (Tag::True, Tag::True) => Expression::with_condition(Tag::True, condition),
            (Tag::Undefined, Tag::True) => Expression {
                tag: Tag::Undefined,
                refs: left.refs,
                condition,
            },
            (Tag::True, Tag::Undefined) => Expression {
                tag: Tag::Undefined,
                refs: right.refs,
                condition,
            },
            (Tag::Undefined, Tag::Undefined) => Expression {
                tag: Tag::Undefined,
                refs: iproduct!(left.refs.iter(), right.refs.iter())
                    .map(|(a, b)| a.iter().chain(b).cloned().collect())
                    .collect(),
                condition,
            },
        }
    }

    /// Disjunction of two clauses.
    ///
    /// `True(c1) or Undefined(r, c2)` widens to `True(c1 || c2)`: granting
    /// whenever either condition holds is never narrower than the exact result.
    pub fn or(left: Expression, right: Expression) -> Expression {
        match (left.tag, right.tag) {
            (Tag::False, _) => right,
            (_, Tag::False) => left,
            (Tag::Undefined, Tag::Undefined) => Expression {
                tag: Tag::Undefined,
                refs: left.refs.into_iter().chain(right.refs).unique().collect(),
                condition: or_conditions(left.condition, right.condition),
            },
            _ => Expression::with_condition(
                Tag::True,
                or_conditions(left.condition, right.condition),
            ),
        }
    }
}

fn and_conditions(left: Option<String>, right: Option<String>) -> Option<String> {
    match (left, right) {
        (Some(l), Some(r)) => Some(format!("{} && {}", group_disjunction(l), group_disjunction(r))),
        (l, r) => l.or(r),
    }
}

// A missing condition is an unconditional grant, which absorbs the other side.
fn or_conditions(left: Option<String>, right: Option<String>) -> Option<String> {
    match (left, right) {
        (Some(l), Some(r)) => Some(format!("{} || {}", l, r)),
        _ => None,
    }
}

fn group_disjunction(condition: String) -> String {
    if has_top_level_or(&condition) {
        format!("({})", condition)
    } else {
        condition
    }
}

/// Whether `condition` contains `||` outside of parentheses and string literals.
fn has_top_level_or(condition: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = condition.chars().peekable();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, '|') if depth == 0 && chars.peek() == Some(&'|') => return true,
            (None, _) => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(tag: Tag, condition: &str) -> Expression {
        Expression::with_condition(tag, Some(condition.to_string()))
    }

    fn refs(names: &[&[&str]]) -> Vec<Vec<String>> {
        names
            .iter()
            .map(|conj| conj.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_and_truth_table() {
        let undefined = Expression::undefined(refs(&[&["$uid"]]));
        assert_eq!(
            Expression::and(Expression::always(), Expression::always()),
            Expression::always()
        );
        assert_eq!(Expression::and(Expression::always(), Expression::never()), Expression::never());
        assert_eq!(Expression::and(undefined.clone(), Expression::never()), Expression::never());
        assert_eq!(Expression::and(Expression::always(), undefined.clone()), undefined);
        assert_eq!(Expression::and(undefined.clone(), Expression::always()), undefined);
    }

    #[test]
    fn test_or_truth_table() {
        let undefined = Expression::undefined(refs(&[&["$uid"]]));
        assert_eq!(Expression::or(Expression::never(), Expression::never()), Expression::never());
        assert_eq!(Expression::or(Expression::never(), undefined.clone()), undefined);
        assert_eq!(Expression::or(undefined.clone(), Expression::never()), undefined);
        assert_eq!(Expression::or(Expression::always(), undefined.clone()), Expression::always());
        assert_eq!(Expression::or(undefined, Expression::always()), Expression::always());
    }

    #[test]
    fn test_and_of_undefined_is_cross_product() {
        let left = Expression::undefined(refs(&[&["a"], &["b"]]));
        let right = Expression::undefined(refs(&[&["c"]]));
        let result = Expression::and(left, right);
        assert_eq!(result.tag(), Tag::Undefined);
        assert_eq!(result.refs(), refs(&[&["a", "c"], &["b", "c"]]).as_slice());
    }

    #[test]
    fn test_or_of_undefined_is_union() {
        let left = Expression::undefined(refs(&[&["a"], &["b"]]));
        let right = Expression::undefined(refs(&[&["b"], &["c"]]));
        let result = Expression::or(left, right);
        assert_eq!(result.refs(), refs(&[&["a"], &["b"], &["c"]]).as_slice());
    }

    #[test]
    fn test_conditions_join_under_and() {
        let result = Expression::and(cond(Tag::True, "a == 'x'"), cond(Tag::True, "b == 'y'"));
        assert_eq!(result.condition(), Some("a == 'x' && b == 'y'"));

        let result = Expression::and(Expression::always(), cond(Tag::True, "b == 'y'"));
        assert_eq!(result.condition(), Some("b == 'y'"));
    }

    #[test]
    fn test_and_groups_disjunctive_conditions() {
        let either = Expression::or(cond(Tag::True, "a == 1"), cond(Tag::True, "b == 2"));
        let result = Expression::and(either, cond(Tag::True, "c == 3"));
        assert_eq!(result.condition(), Some("(a == 1 || b == 2) && c == 3"));
    }

    #[test]
    fn test_unconditional_true_absorbs_or() {
        let result = Expression::or(cond(Tag::True, "a == true"), Expression::always());
        assert_eq!(result, Expression::always());
    }

    #[test]
    fn test_false_drops_condition() {
        assert_eq!(cond(Tag::False, "a == 1").condition(), None);
        let result = Expression::and(cond(Tag::True, "a == 1"), Expression::never());
        assert_eq!(result.condition(), None);
    }

    #[test]
    fn test_top_level_or_detection() {
        assert!(has_top_level_or("a || b"));
        assert!(!has_top_level_or("(a || b)"));
        assert!(!has_top_level_or("a == '||'"));
        assert!(!has_top_level_or(r"a == 'x\'||' && b"));
    }
}
