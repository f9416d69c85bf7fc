use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use crate::folder::LogicFolder;
use log::debug;
use std::sync::Arc;
use warrant_access::Access;
use warrant_ast::parse_rule;
use warrant_refs::{DataReferenceResolver, ReferenceResolver, RulePath};

/// Translates write rules into [`Access`] values.
///
/// A translator holds no per-call state and can be shared between threads.
#[derive(Clone)]
pub struct RuleTranslator {
    config: TranslatorConfig,
    resolver: Arc<dyn ReferenceResolver>,
}

impl Default for RuleTranslator {
    fn default() -> Self {
        Self::new(TranslatorConfig::default())
    }
}

impl RuleTranslator {
    /// Creates a translator using a [`DataReferenceResolver`] built from `config`.
    pub fn new(config: TranslatorConfig) -> Self {
        let resolver = DataReferenceResolver::new(config.resolver.clone());
        Self {
            config,
            resolver: Arc::new(resolver),
        }
    }

    /// Creates a translator with a custom reference resolver. The resolver
    /// settings in `config` are ignored.
    pub fn with_resolver<R>(config: TranslatorConfig, resolver: R) -> Self
    where
        R: ReferenceResolver + 'static,
    {
        Self {
            config,
            resolver: Arc::new(resolver),
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translates the write rule `rule_source` found at `path`.
    ///
    /// A rule that does not parse yields [`Access::multiple`] rather than an
    /// error. Constructs the folder cannot model, such as non-boolean literals
    /// in logical position, are returned as errors.
    pub fn translate(&self, rule_source: &str, path: &RulePath) -> Result<Access, TranslateError> {
        let root = match parse_rule(rule_source) {
            Ok(root) => root,
            Err(e) => {
                debug!("Ignoring unparseable rule at {}: {}", path, e);
                return Ok(Access::multiple());
            }
        };

        let folder = LogicFolder::new(self.resolver.as_ref(), self.config.max_depth);
        let access = Access::from_expression(folder.fold(&root, path)?);
        debug!("Rule at {} translated to {}", path, access);
        Ok(access)
    }

    /// Like [`translate`](Self::translate), with the rule location given as
    /// slash-separated text such as `rules/users/$uid/.write`.
    pub fn translate_at(&self, rule_source: &str, path: &str) -> Result<Access, TranslateError> {
        let path: RulePath = path.parse()?;
        self.translate(rule_source, &path)
    }
}

/// Translates a write rule with the default configuration.
pub fn translate(rule_source: &str, path: &RulePath) -> Result<Access, TranslateError> {
    RuleTranslator::default().translate(rule_source, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warrant_access::AccessKind;
    use warrant_ast::Node;

    fn path() -> RulePath {
        "rules/users/$uid/.write".parse().unwrap()
    }

    /// Treats every identifier named `principal` as auth and resolves nothing.
    struct PrincipalResolver;

    impl ReferenceResolver for PrincipalResolver {
        fn is_auth_reference(&self, node: &Node) -> bool {
            node.as_identifier() == Some("principal")
        }

        fn resolve(&self, _node: &Node, _path: &RulePath) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_parse_failure_is_multiple_access() {
        let _ = env_logger::builder().is_test(true).try_init();
        for source in ["", "auth.uid ==", "a = b", "data.child('x"] {
            assert_eq!(translate(source, &path()).unwrap(), Access::multiple(), "{}", source);
        }
    }

    #[test]
    fn test_custom_resolver_replaces_auth_concept() {
        let translator =
            RuleTranslator::with_resolver(TranslatorConfig::default(), PrincipalResolver);
        let access = translator.translate("principal == $uid", &path()).unwrap();
        assert_eq!(access.kind(), AccessKind::Undefined);

        // With this resolver `auth` is an ordinary name.
        let access = translator.translate("auth == $uid", &path()).unwrap();
        assert_eq!(access.condition(), Some("auth == $uid"));
    }

    #[test]
    fn test_configured_auth_identifier() {
        let config = TranslatorConfig::default().with_auth_identifier("user");
        let translator = RuleTranslator::new(config);
        assert_eq!(translator.config().resolver.auth_identifier, "user");
        let access = translator.translate("user.id == $uid", &path()).unwrap();
        assert_eq!(access.required_refs(), [vec!["$uid".to_string()]].as_slice());
    }

    #[test]
    fn test_translate_at_parses_location() {
        let translator = RuleTranslator::default();
        let access = translator
            .translate_at("data.child('owner').val() == auth.uid", "rules/users/$uid/.write")
            .unwrap();
        assert_eq!(access.required_refs(), [vec!["/users/$uid/owner".to_string()]].as_slice());

        let err = translator.translate_at("true", "users/$uid/.write").unwrap_err();
        assert!(matches!(err, TranslateError::Path(_)));
    }

    #[test]
    fn test_translator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleTranslator>();
    }
}
