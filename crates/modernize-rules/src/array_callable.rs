//! `[$object, 'method']` callable recognition

use modernize_syntax::{AttributeKey, NodeId, NodeKind, NodeNameResolver, SyntaxTree, Value, ValueResolver};
use modernize_types::{DetailedTypeAnalyzer, ReflectionProvider, TooDetailed, Type};
use tracing::trace;

use crate::node_type_resolver::NodeTypeResolver;
use crate::value_object::{ArrayCallable, ArrayCallableMatch};

/// Functions whose array arguments are invoked later, outside the class
const CALLBACK_FUNCTIONS: &[&str] = &["register_shutdown_function", "forward_static_call"];

const CONSTRUCTOR: &str = "__construct";

/// Recognises two-item arrays that name an object method
#[derive(Debug, Clone)]
pub struct ArrayCallableMethodMatcher<R, D = DetailedTypeAnalyzer> {
    types: NodeTypeResolver<R, D>,
    names: NodeNameResolver,
    values: ValueResolver,
}

impl<R: ReflectionProvider, D: TooDetailed> ArrayCallableMethodMatcher<R, D> {
    /// Create matcher
    #[inline]
    #[must_use]
    pub fn new(types: NodeTypeResolver<R, D>) -> Self {
        Self {
            types,
            names: NodeNameResolver::new(),
            values: ValueResolver::new(),
        }
    }

    /// Type resolver in use
    #[inline]
    #[must_use]
    pub fn type_resolver(&self) -> &NodeTypeResolver<R, D> {
        &self.types
    }

    /// Match an array literal against the callable shape
    ///
    /// `None` when the array is not a method callable. `Unknown` when it
    /// targets a known class but the method name is not a literal.
    #[must_use]
    pub fn match_array(&self, tree: &SyntaxTree, array: NodeId) -> Option<ArrayCallableMatch> {
        let NodeKind::Array { items } = tree.kind(array) else {
            return None;
        };
        let [first, second] = items[..] else {
            return None;
        };
        let (first_key, callee) = plain_item(tree, first)?;
        let (second_key, method) = plain_item(tree, second)?;

        let callee_type = match tree.kind(callee) {
            NodeKind::ClassConstFetch { .. } => self.resolve_class_const_fetch_type(tree, callee),
            _ => self.types.resolve(tree, callee),
        };
        let class_name = callee_type.object_class_name()?.to_string();

        if self.values.get_value(tree, method).is_none() {
            trace!(%array, "callable method name is dynamic");
            return Some(ArrayCallableMatch::Unknown);
        }

        if !self.has_list_keys(tree, [first_key, second_key]) {
            return None;
        }

        let NodeKind::String { value: method_name } = tree.kind(method) else {
            return None;
        };

        if self.is_callback_at_function_names(tree, array) {
            return None;
        }

        if method_name.eq_ignore_ascii_case(CONSTRUCTOR) {
            return None;
        }

        Some(ArrayCallableMatch::Callable(ArrayCallable::new(
            callee,
            class_name,
            method_name.clone(),
        )))
    }

    /// `Foo::class` as an object of `Foo`, if it can be built without
    /// arguments
    fn resolve_class_const_fetch_type(&self, tree: &SyntaxTree, fetch: NodeId) -> Type {
        let Some(Value::String(class_name)) = self.values.get_value(tree, fetch) else {
            return Type::Mixed;
        };
        let class_name = if class_name == "static" {
            match tree.name_attribute(fetch, AttributeKey::ClassName) {
                Some(enclosing) => enclosing.to_string(),
                None => return Type::Mixed,
            }
        } else {
            class_name
        };

        let Some(class) = self.types.reflection().get_class(&class_name) else {
            return Type::Mixed;
        };

        if let Some(constructor) = class.constructor() {
            if constructor.parameters().iter().any(|parameter| !parameter.has_default()) {
                trace!(class = %class_name, "constructor needs arguments");
                return Type::Mixed;
            }
        }

        Type::object(class_name)
    }

    /// Keys normalise to `[0, 1]`, or to `[1]` after a duplicate
    fn has_list_keys(&self, tree: &SyntaxTree, keys: [Option<NodeId>; 2]) -> bool {
        let mut resolved: Vec<Value> = Vec::with_capacity(2);
        let mut next_index: i64 = 0;

        for key in keys {
            let key = match key {
                None => Value::Int(next_index),
                Some(key) => match self.values.get_value(tree, key) {
                    Some(Value::String(s)) => match s.parse::<i64>() {
                        Ok(i) if i.to_string() == s => Value::Int(i),
                        _ => Value::String(s),
                    },
                    Some(value) => value,
                    None => return false,
                },
            };
            if let Value::Int(i) = key {
                next_index = next_index.max(i.saturating_add(1));
            }
            if !resolved.contains(&key) {
                resolved.push(key);
            }
        }

        resolved == [Value::Int(0), Value::Int(1)] || resolved == [Value::Int(1)]
    }

    fn is_callback_at_function_names(&self, tree: &SyntaxTree, array: NodeId) -> bool {
        let Some(arg) = tree.parent(array) else {
            return false;
        };
        if !matches!(tree.kind(arg), NodeKind::Arg { .. }) {
            return false;
        }
        let Some(call) = tree.parent(arg) else {
            return false;
        };
        matches!(tree.kind(call), NodeKind::FuncCall { .. })
            && self.names.is_names(tree, call, CALLBACK_FUNCTIONS)
    }
}

/// Key and value of a non-spread array item
fn plain_item(tree: &SyntaxTree, item: NodeId) -> Option<(Option<NodeId>, NodeId)> {
    match tree.kind(item) {
        NodeKind::ArrayItem {
            key,
            value,
            unpack: false,
        } => Some((*key, tree.resolve(*value))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modernize_test_utils::{find_first, fixture_reflection, parse_php};
    use modernize_types::InMemoryReflectionProvider;
    use pretty_assertions::assert_eq;

    fn match_first_array(source: &str) -> Option<ArrayCallableMatch> {
        let tree = parse_php(source);
        let array = find_first(&tree, |kind| matches!(kind, NodeKind::Array { .. }));
        let matcher: ArrayCallableMethodMatcher<InMemoryReflectionProvider> =
            ArrayCallableMethodMatcher::new(NodeTypeResolver::new(fixture_reflection()));
        matcher.match_array(&tree, array)
    }

    fn callable(source: &str) -> Option<(String, String)> {
        match match_first_array(source)? {
            ArrayCallableMatch::Callable(callable) => {
                Some((callable.class_name().to_string(), callable.method_name().to_string()))
            }
            ArrayCallableMatch::Unknown => None,
        }
    }

    #[test]
    fn this_method() {
        let source = "<?php namespace App; class Listener { function boot() { $cb = [$this, 'handle']; } }";
        assert_eq!(callable(source), Some(("App\\Listener".into(), "handle".into())));
    }

    #[test]
    fn class_constant_with_default_constructor() {
        assert_eq!(
            callable("<?php $cb = [\\App\\Entity\\Post::class, 'publish'];"),
            Some(("App\\Entity\\Post".into(), "publish".into()))
        );
    }

    #[test]
    fn class_constant_with_required_constructor_argument() {
        // User::__construct($name) has no default
        assert_eq!(match_first_array("<?php $cb = [\\App\\Entity\\User::class, 'getName'];"), None);
    }

    #[test]
    fn unknown_class_is_rejected() {
        assert_eq!(match_first_array("<?php $cb = [Missing::class, 'run'];"), None);
    }

    #[test]
    fn dynamic_method_is_unknown() {
        let source = "<?php class Listener { function boot($m) { $cb = [$this, $m]; } }";
        assert_eq!(match_first_array(source), Some(ArrayCallableMatch::Unknown));
    }

    #[test]
    fn rejected_shapes() {
        let in_class = |body: &str| format!("<?php class Listener {{ function boot() {{ {body} }} }}");
        for source in [
            in_class("$cb = [$this, 'a', 'b'];"),
            in_class("$cb = [$this];"),
            in_class("$cb = ['obj' => $this, 'method' => 'handle'];"),
            in_class("$cb = [$this, '__construct'];"),
            in_class("$cb = [$this, 42];"),
            in_class("register_shutdown_function([$this, 'flush']);"),
            in_class("forward_static_call([$this, 'flush']);"),
            "<?php $cb = [$plain, 'handle'];".to_string(),
        ] {
            assert_eq!(match_first_array(&source), None, "{source}");
        }
    }

    #[test]
    fn explicit_list_keys_are_accepted() {
        let source = "<?php class Listener { function boot() { $cb = [0 => $this, 1 => 'handle']; } }";
        assert_eq!(callable(source), Some(("Listener".into(), "handle".into())));
    }
}
