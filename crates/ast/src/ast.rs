//! Defines the Abstract Syntax Tree (AST) for write-rule expressions.
//!
//! The node shapes follow the usual JavaScript expression tree: a rule such as
//! `auth.uid == $uid && data.child('owner').exists()` becomes a `Logical` node
//! whose children are a `Binary` comparison and a `Call`.
use std::fmt;

/// A node of a parsed rule expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal value, like a string, number, boolean or `null`.
    Literal(Literal),
    /// A bare name such as `auth`, `data` or a `$wildcard`.
    Identifier(String),
    /// Property access: `object.property` or `object[property]`.
    Member {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    /// A call such as `data.child('name')`.
    Call { callee: Box<Node>, arguments: Vec<Node> },
    Unary {
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    /// A comparison or arithmetic operation.
    Binary {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A short-circuiting combination of two expressions.
    Logical {
        operator: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A literal together with its exact source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    /// The literal as written, quotes and escapes included.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    Number(f64),
    String(String),
    Null,
}

/// The kind of a node, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Literal,
    Identifier,
    Member,
    Call,
    Unary,
    Binary,
    Logical,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Literal => "Literal",
            NodeKind::Identifier => "Identifier",
            NodeKind::Member => "MemberExpression",
            NodeKind::Call => "CallExpression",
            NodeKind::Unary => "UnaryExpression",
            NodeKind::Binary => "BinaryExpression",
            NodeKind::Logical => "LogicalExpression",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

/// A binary operator used in a comparison or arithmetic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Equality
    Equal,
    StrictEqual,
    NotEqual,
    StrictNotEqual,
    // Relational
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Additive
    Plus,
    Minus,
    // Multiplicative
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Equal => "==",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        }
    }

    /// True for `==` and `===`.
    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOperator::Equal | BinaryOperator::StrictEqual)
    }

    fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Equal
            | BinaryOperator::StrictEqual
            | BinaryOperator::NotEqual
            | BinaryOperator::StrictNotEqual => 4,
            BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual => 5,
            BinaryOperator::Plus | BinaryOperator::Minus => 6,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    /// Nullish coalescing, `??`.
    Coalesce,
}

impl LogicalOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::Coalesce => "??",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            LogicalOperator::Coalesce => 1,
            LogicalOperator::Or => 2,
            LogicalOperator::And => 3,
        }
    }
}

impl Node {
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier(name.into())
    }

    pub fn boolean(value: bool) -> Self {
        Node::Literal(Literal {
            value: LiteralValue::Bool(value),
            raw: value.to_string(),
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        let raw = format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"));
        Node::Literal(Literal {
            value: LiteralValue::String(value),
            raw,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Literal(_) => NodeKind::Literal,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::Member { .. } => NodeKind::Member,
            Node::Call { .. } => NodeKind::Call,
            Node::Unary { .. } => NodeKind::Unary,
            Node::Binary { .. } => NodeKind::Binary,
            Node::Logical { .. } => NodeKind::Logical,
        }
    }

    /// Returns the name if this node is an identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Node::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the value if this node is a boolean literal.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Literal(Literal {
                value: LiteralValue::Bool(value),
                ..
            }) => Some(*value),
            _ => None,
        }
    }

    // Binding strength when printed; operands of higher precedence print bare.
    fn precedence(&self) -> u8 {
        match self {
            Node::Logical { operator, .. } => operator.precedence(),
            Node::Binary { operator, .. } => operator.precedence(),
            Node::Unary { .. } => 8,
            _ => 9,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    fn fmt_infix(
        f: &mut fmt::Formatter<'_>,
        precedence: u8,
        symbol: &str,
        left: &Node,
        right: &Node,
    ) -> fmt::Result {
        left.fmt_operand(f, precedence)?;
        write!(f, " {} ", symbol)?;
        // Operators are left-associative, so an equal-precedence right operand needs grouping.
        right.fmt_operand(f, precedence + 1)
    }
}

impl fmt::Display for Node {
    /// Renders the node back to normalized rule source.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(literal) => f.write_str(&literal.raw),
            Node::Identifier(name) => f.write_str(name),
            Node::Member {
                object,
                property,
                computed,
            } => {
                object.fmt_operand(f, 9)?;
                if *computed {
                    write!(f, "[{}]", property)
                } else {
                    write!(f, ".{}", property)
                }
            }
            Node::Call { callee, arguments } => {
                callee.fmt_operand(f, 9)?;
                f.write_str("(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(")")
            }
            Node::Unary { operator, argument } => {
                f.write_str(operator.symbol())?;
                argument.fmt_operand(f, 8)
            }
            Node::Binary {
                operator,
                left,
                right,
            } => Node::fmt_infix(f, operator.precedence(), operator.symbol(), left, right),
            Node::Logical {
                operator,
                left,
                right,
            } => Node::fmt_infix(f, operator.precedence(), operator.symbol(), left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(object: Node, property: &str) -> Node {
        Node::Member {
            object: Box::new(object),
            property: Box::new(Node::identifier(property)),
            computed: false,
        }
    }

    #[test]
    fn test_display_member_call() {
        let node = Node::Call {
            callee: Box::new(member(Node::identifier("data"), "child")),
            arguments: vec![Node::string("owner")],
        };
        assert_eq!(node.to_string(), "data.child('owner')");
    }

    #[test]
    fn test_display_groups_lower_precedence_operands() {
        let or = Node::Logical {
            operator: LogicalOperator::Or,
            left: Box::new(Node::identifier("a")),
            right: Box::new(Node::identifier("b")),
        };
        let and = Node::Logical {
            operator: LogicalOperator::And,
            left: Box::new(or),
            right: Box::new(Node::identifier("c")),
        };
        assert_eq!(and.to_string(), "(a || b) && c");
    }

    #[test]
    fn test_string_literal_raw_escapes_quotes() {
        let node = Node::string("it's");
        assert_eq!(node.to_string(), r"'it\'s'");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Node::boolean(true).kind().as_str(), "Literal");
        assert_eq!(member(Node::identifier("auth"), "uid").kind().to_string(), "MemberExpression");
        assert_eq!(Node::boolean(false).as_bool(), Some(false));
        assert_eq!(Node::identifier("$uid").as_identifier(), Some("$uid"));
    }
}
