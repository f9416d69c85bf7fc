//! Folds a parsed rule into an access [`Expression`].
//!
//! Literals and logical combinators are decided statically. Comparisons never
//! change the truth value on their own; they either contribute a residual
//! condition or, when one side is `auth`, collapse to a tag or a reference
//! requirement. Shapes the folder does not model default to `True`, so the
//! result over-approximates what a rule grants.
use crate::error::TranslateError;
use log::trace;
use warrant_access::{Expression, Tag};
use warrant_ast::{BinaryOperator, LiteralValue, LogicalOperator, Node};
use warrant_refs::{ReferenceResolver, RulePath};

/// Walks a rule's syntax tree, asking a [`ReferenceResolver`] about references.
pub struct LogicFolder<'r> {
    resolver: &'r dyn ReferenceResolver,
    max_depth: usize,
}

impl<'r> LogicFolder<'r> {
    pub fn new(resolver: &'r dyn ReferenceResolver, max_depth: usize) -> Self {
        Self {
            resolver,
            max_depth,
        }
    }

    pub fn fold(&self, node: &Node, path: &RulePath) -> Result<Expression, TranslateError> {
        self.fold_at(node, path, 0)
    }

    fn fold_at(
        &self,
        node: &Node,
        path: &RulePath,
        depth: usize,
    ) -> Result<Expression, TranslateError> {
        if depth > self.max_depth {
            return Err(TranslateError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        trace!("Folding {} at depth {}", node.kind(), depth);

        match node {
            // A call is logically true; its reference is kept for later checks.
            Node::Call { .. } => Ok(Expression::with_condition(
                Tag::True,
                self.resolver.resolve(node, path),
            )),
            Node::Binary { .. } => self.fold_binary(node, path),
            Node::Literal(literal) => match literal.value {
                LiteralValue::Bool(true) => Ok(Expression::always()),
                LiteralValue::Bool(false) => Ok(Expression::never()),
                _ => Err(TranslateError::UnsupportedLiteral {
                    raw: literal.raw.clone(),
                }),
            },
            Node::Logical { operator, .. } => {
                // A flat `a && b && c` chain counts as one level of nesting.
                let operands = chain_operands(*operator, node)
                    .into_iter()
                    .map(|operand| self.fold_at(operand, path, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                let combine: fn(Expression, Expression) -> Expression = match operator {
                    LogicalOperator::Or => Expression::or,
                    LogicalOperator::And => Expression::and,
                    other => {
                        return Err(TranslateError::UnsupportedOperator {
                            operator: other.symbol().to_string(),
                        });
                    }
                };
                Ok(operands
                    .into_iter()
                    .reduce(combine)
                    .unwrap_or_else(Expression::always))
            }
            Node::Identifier(_) | Node::Member { .. } | Node::Unary { .. } => {
                Ok(Expression::always())
            }
        }
    }

    /// Folds a comparison. `node` must be a [`Node::Binary`].
    pub fn fold_binary(&self, node: &Node, path: &RulePath) -> Result<Expression, TranslateError> {
        let Node::Binary {
            operator,
            left,
            right,
        } = node
        else {
            return Err(TranslateError::InvalidShape { kind: node.kind() });
        };

        if self.resolver.is_auth_reference(left) {
            return Ok(self.auth_fold(right, *operator, path));
        }
        if self.resolver.is_auth_reference(right) {
            return Ok(self.auth_fold(left, *operator, path));
        }

        // Either side reading the write payload drops the whole condition.
        let condition = match (self.to_condition(left, path)?, self.to_condition(right, path)?) {
            (Some(l), Some(r)) => Some(format!("{} {} {}", l, operator.symbol(), r)),
            _ => None,
        };
        Ok(Expression::with_condition(Tag::True, condition))
    }

    /// Folds the operand compared against `auth`.
    pub fn auth_fold(&self, other: &Node, operator: BinaryOperator, path: &RulePath) -> Expression {
        if !operator.is_equality() {
            return Expression::always();
        }
        match other {
            Node::Literal(_) => {
                if other.as_bool() == Some(true) {
                    Expression::always()
                } else {
                    Expression::never()
                }
            }
            Node::Identifier(name) if name.starts_with('$') => {
                Expression::undefined(vec![vec![name.clone()]])
            }
            Node::Identifier(_) => Expression::never(),
            Node::Call { .. } => match self.resolver.resolve(other, path) {
                Some(reference) => Expression::undefined(vec![vec![reference]]),
                None => Expression::always(),
            },
            // May compare against request data; not modelled.
            _ => Expression::always(),
        }
    }

    /// Renders one side of a non-auth comparison.
    pub fn to_condition(
        &self,
        node: &Node,
        path: &RulePath,
    ) -> Result<Option<String>, TranslateError> {
        match node {
            Node::Literal(literal) => Ok(Some(literal.raw.clone())),
            Node::Identifier(name) => Ok(Some(name.clone())),
            Node::Call { .. } => Ok(self.resolver.resolve(node, path)),
            other => Err(TranslateError::UnsupportedOperand { kind: other.kind() }),
        }
    }
}

/// The operands of the `operator` chain rooted at `node`, left to right.
fn chain_operands(operator: LogicalOperator, node: &Node) -> Vec<&Node> {
    let mut operands = Vec::new();
    let mut pending = vec![node];
    while let Some(next) = pending.pop() {
        match next {
            Node::Logical {
                operator: op,
                left,
                right,
            } if *op == operator => {
                pending.push(right);
                pending.push(left);
            }
            other => operands.push(other),
        }
    }
    operands
}
