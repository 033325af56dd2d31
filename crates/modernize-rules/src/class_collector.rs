//! Reflection harvesting from parsed sources

use modernize_syntax::{AttributeKey, FunctionKind, NodeId, NodeKind, NodeNameResolver, SyntaxTree};
use modernize_types::{ClassReflection, InMemoryReflectionProvider, MethodReflection, ParameterReflection};
use tracing::debug;

/// Collects class declarations into an [`InMemoryReflectionProvider`]
#[derive(Debug, Clone, Default)]
pub struct ClassCollector {
    provider: InMemoryReflectionProvider,
    names: NodeNameResolver,
}

impl ClassCollector {
    /// Create collector with an empty provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create collector on top of already known classes
    #[inline]
    #[must_use]
    pub fn with_provider(provider: InMemoryReflectionProvider) -> Self {
        Self {
            provider,
            names: NodeNameResolver::new(),
        }
    }

    /// Add every named class declared in `tree`; returns how many were found
    ///
    /// A class declared again replaces the earlier declaration.
    pub fn collect(&mut self, tree: &SyntaxTree) -> usize {
        let mut found = 0;
        for node in tree.descendants(tree.root()) {
            let NodeKind::Class { members, .. } = tree.kind(node) else {
                continue;
            };
            // anonymous classes carry no name
            let Some(class_name) = tree.name_attribute(node, AttributeKey::ClassName) else {
                continue;
            };

            let class = members
                .iter()
                .filter_map(|member| self.method(tree, *member))
                .fold(ClassReflection::new(class_name), ClassReflection::with_method);
            debug!(class = class.name(), methods = class.methods().len(), "class collected");
            self.provider.add_class(class);
            found += 1;
        }
        found
    }

    fn method(&self, tree: &SyntaxTree, member: NodeId) -> Option<MethodReflection> {
        let NodeKind::FunctionLike {
            kind: FunctionKind::Method,
            params,
            ..
        } = tree.kind(member)
        else {
            return None;
        };
        let name = self.names.get_name(tree, member)?;

        let method = params
            .iter()
            .filter_map(|param| {
                let NodeKind::Param { default, .. } = tree.kind(*param) else {
                    return None;
                };
                let name = self.names.get_name(tree, *param)?;
                Some(match default {
                    Some(default) => ParameterReflection::optional(name, tree.print_node(*default)),
                    None => ParameterReflection::required(name),
                })
            })
            .fold(MethodReflection::new(name), MethodReflection::with_parameter);
        Some(method)
    }

    /// Classes collected so far
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &InMemoryReflectionProvider {
        &self.provider
    }

    /// Finish collecting
    #[inline]
    #[must_use]
    pub fn into_provider(self) -> InMemoryReflectionProvider {
        self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modernize_test_utils::parse_php;
    use modernize_types::ReflectionProvider;

    const SOURCE: &str = r"<?php
namespace App\Service;

class Mailer
{
    public function __construct(private string $dsn, int $retries = 3)
    {
    }

    public function send(string $to): void
    {
    }
}

$anonymous = new class {
    public function run() {}
};
";

    #[test]
    fn collects_namespaced_classes() {
        let mut collector = ClassCollector::new();
        assert_eq!(collector.collect(&parse_php(SOURCE)), 1);

        let provider = collector.into_provider();
        let mailer = provider.get_class("App\\Service\\Mailer").unwrap();
        assert!(mailer.has_method("send"));

        let constructor = mailer.constructor().unwrap();
        let params: Vec<_> = constructor
            .parameters()
            .iter()
            .map(|p| (p.name().to_string(), p.default_value().map(str::to_string)))
            .collect();
        assert_eq!(
            params,
            vec![("dsn".to_string(), None), ("retries".to_string(), Some("3".to_string()))]
        );
    }

    #[test]
    fn extends_existing_provider() {
        let mut collector = ClassCollector::with_provider(InMemoryReflectionProvider::with_builtins());
        collector.collect(&parse_php("<?php class Local {}"));
        assert!(collector.provider().has_class("Local"));
        assert!(collector.provider().has_class("stdClass"));
    }
}
