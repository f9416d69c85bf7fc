//! Recognizes the auth identifier and resolves data references to absolute paths.
use crate::config::ResolverConfig;
use crate::path::RulePath;
use log::trace;
use warrant_ast::{LiteralValue, Node};

/// Methods that read a value or test for existence. They end a reference chain.
const ACCESSORS: &[&str] = &[
    "val",
    "exists",
    "hasChildren",
    "isString",
    "isNumber",
    "isBoolean",
    "getPriority",
];

/// The seam through which rule analysis learns about references.
///
/// Implementations must be total: unknown shapes answer `false` or `None`
/// rather than failing.
pub trait ReferenceResolver: Send + Sync {
    /// Whether `node` denotes the requester's authentication context.
    fn is_auth_reference(&self, node: &Node) -> bool;

    /// Resolves `node`, read from the rule at `path`, to a canonical reference
    /// string. `None` means the node reads data with no stable location, such
    /// as the write payload.
    fn resolve(&self, node: &Node, path: &RulePath) -> Option<String>;
}

/// Resolves `root`/`data` navigation chains such as
/// `data.parent().child('owner').val()` to absolute paths like `/users/owner`.
#[derive(Debug, Clone, Default)]
pub struct DataReferenceResolver {
    config: ResolverConfig,
}

impl DataReferenceResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn walk(&self, node: &Node, path: &RulePath) -> Option<Vec<String>> {
        match node {
            Node::Identifier(name) if *name == self.config.root_identifier => Some(Vec::new()),
            Node::Identifier(name) if *name == self.config.data_identifier => Some(path.location()),
            Node::Identifier(name) if *name == self.config.new_data_identifier => {
                trace!("'{}' reads the write payload; no stable reference", name);
                None
            }
            Node::Call { callee, arguments } => {
                let Node::Member {
                    object,
                    property,
                    computed: false,
                } = callee.as_ref()
                else {
                    return None;
                };
                let method = property.as_identifier()?;
                let mut segments = self.walk(object, path)?;
                match method {
                    "child" | "hasChild" => self.push_child(&mut segments, arguments.first()?)?,
                    "parent" => {
                        segments.pop()?;
                    }
                    m if ACCESSORS.contains(&m) => {}
                    other => {
                        trace!("Unknown reference method '{}'", other);
                        return None;
                    }
                }
                Some(segments)
            }
            _ => None,
        }
    }

    fn push_child(&self, segments: &mut Vec<String>, argument: &Node) -> Option<()> {
        match argument {
            Node::Literal(literal) => match &literal.value {
                LiteralValue::String(child) => {
                    segments.extend(
                        child
                            .split('/')
                            .filter(|part| !part.is_empty())
                            .map(str::to_string),
                    );
                    Some(())
                }
                _ => None,
            },
            Node::Identifier(name) if name.starts_with('$') => {
                segments.push(name.clone());
                Some(())
            }
            other if self.is_auth_reference(other) => {
                segments.push(other.to_string());
                Some(())
            }
            _ => None,
        }
    }
}

impl ReferenceResolver for DataReferenceResolver {
    fn is_auth_reference(&self, node: &Node) -> bool {
        match node {
            Node::Identifier(name) => *name == self.config.auth_identifier,
            Node::Member {
                object,
                computed: false,
                ..
            } => self.is_auth_reference(object),
            _ => false,
        }
    }

    fn resolve(&self, node: &Node, path: &RulePath) -> Option<String> {
        let segments = self.walk(node, path)?;
        Some(format!("/{}", segments.join("/")))
    }
}
