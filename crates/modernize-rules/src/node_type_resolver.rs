//! Expression type inference
//!
//! Covers literals, `$this`, `new X`, `X::class` and array literals. Anything
//! else is `mixed`. Every result is passed through the class-string
//! normaliser.

use modernize_syntax::{
    AttributeKey, BinaryOperator, NodeId, NodeKind, NodeNameResolver, SyntaxTree, UnaryOperator,
    Value, ValueResolver,
};
use modernize_types::{
    DetailedTypeAnalyzer, GenericClassStringTypeNormalizer, ReflectionProvider, TooDetailed, Type,
};

/// Infers the static type of an expression node
#[derive(Debug, Clone)]
pub struct NodeTypeResolver<R, D = DetailedTypeAnalyzer> {
    normalizer: GenericClassStringTypeNormalizer<R, D>,
    names: NodeNameResolver,
    values: ValueResolver,
}

impl<R: ReflectionProvider> NodeTypeResolver<R> {
    /// Create resolver with the default detail threshold
    #[inline]
    #[must_use]
    pub fn new(reflection: R) -> Self {
        Self::with_normalizer(GenericClassStringTypeNormalizer::new(reflection))
    }
}

impl<R: ReflectionProvider, D: TooDetailed> NodeTypeResolver<R, D> {
    /// Create resolver around an existing normaliser
    #[inline]
    #[must_use]
    pub fn with_normalizer(normalizer: GenericClassStringTypeNormalizer<R, D>) -> Self {
        Self {
            normalizer,
            names: NodeNameResolver::new(),
            values: ValueResolver::new(),
        }
    }

    /// Reflection oracle in use
    #[inline]
    #[must_use]
    pub fn reflection(&self) -> &R {
        self.normalizer.reflection()
    }

    /// Normalised type of `node`
    #[must_use]
    pub fn resolve(&self, tree: &SyntaxTree, node: NodeId) -> Type {
        self.normalizer.normalize(self.infer(tree, node))
    }

    fn infer(&self, tree: &SyntaxTree, node: NodeId) -> Type {
        match tree.kind(node) {
            NodeKind::String { value } => Type::constant_string(value.clone()),
            NodeKind::Integer { value } => Type::ConstantInteger(*value),
            NodeKind::Float { .. } => Type::Float,
            NodeKind::Bool { .. } => Type::Bool,
            NodeKind::Null => Type::Null,
            NodeKind::Name { value } => match value.trim_start_matches('\\').to_ascii_lowercase().as_str() {
                "true" | "false" => Type::Bool,
                "null" => Type::Null,
                _ => Type::Mixed,
            },
            NodeKind::Variable { name } if name == "this" => enclosing_class(tree, node)
                .map_or(Type::Mixed, Type::object),
            NodeKind::New { class, .. } => match self.values.resolve_class_name(tree, node, *class) {
                Some(name) if name == "static" => enclosing_class(tree, node).map_or(Type::Mixed, Type::object),
                Some(name) => Type::object(name),
                None => Type::Mixed,
            },
            NodeKind::ClassConstFetch { .. } => match self.values.get_value(tree, node) {
                Some(Value::String(name)) if name == "static" => {
                    enclosing_class(tree, node).map_or(Type::Mixed, Type::constant_string)
                }
                Some(Value::String(name)) => Type::constant_string(name),
                _ => Type::Mixed,
            },
            NodeKind::Parenthesized { inner } => self.infer(tree, *inner),
            NodeKind::Array { items } => self.infer_array(tree, items),
            NodeKind::BinaryOp { op, .. } => binary_result(op),
            NodeKind::UnaryOp { op, operand } => match op {
                UnaryOperator::Not => Type::Bool,
                UnaryOperator::BitwiseNot => Type::Integer,
                UnaryOperator::Minus | UnaryOperator::Plus => match self.values.get_value(tree, node) {
                    Some(Value::Int(i)) => Type::ConstantInteger(i),
                    Some(Value::Float(_)) => Type::Float,
                    _ => match self.infer(tree, *operand) {
                        Type::Float => Type::Float,
                        Type::Integer | Type::ConstantInteger(_) => Type::Integer,
                        _ => Type::Mixed,
                    },
                },
            },
            NodeKind::FuncCall { .. } => self
                .names
                .get_name(tree, node)
                .map_or(Type::Mixed, |name| function_return_type(&name)),
            _ => Type::Mixed,
        }
    }

    fn infer_array(&self, tree: &SyntaxTree, items: &[NodeId]) -> Type {
        let mut keys: Vec<Type> = Vec::with_capacity(items.len());
        let mut values: Vec<Type> = Vec::with_capacity(items.len());
        let mut next_index: i64 = 0;

        for item in items {
            let NodeKind::ArrayItem { key, value, unpack } = tree.kind(*item) else {
                return Type::array(Type::Mixed, Type::Mixed);
            };
            if *unpack {
                return self.infer_general_array(tree, items);
            }

            let key_type = match key {
                None => Type::ConstantInteger(next_index),
                Some(key) => match self.values.get_value(tree, *key) {
                    Some(Value::Int(i)) => Type::ConstantInteger(i),
                    Some(Value::String(s)) => match s.parse::<i64>() {
                        Ok(i) if i.to_string() == s => Type::ConstantInteger(i),
                        _ => Type::constant_string(s),
                    },
                    _ => return self.infer_general_array(tree, items),
                },
            };
            if let Type::ConstantInteger(i) = key_type {
                next_index = next_index.max(i.saturating_add(1));
            }

            let value_type = self.infer(tree, *value);
            match keys.iter().position(|k| *k == key_type) {
                Some(existing) => values[existing] = value_type,
                None => {
                    keys.push(key_type);
                    values.push(value_type);
                }
            }
        }

        Type::ConstantArray { keys, values }
    }

    fn infer_general_array(&self, tree: &SyntaxTree, items: &[NodeId]) -> Type {
        let item_types = items.iter().filter_map(|item| match tree.kind(*item) {
            NodeKind::ArrayItem {
                value, unpack: false, ..
            } => Some(self.infer(tree, *value)),
            _ => None,
        });
        Type::array(Type::Mixed, Type::union(item_types))
    }
}

fn enclosing_class(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    tree.name_attribute(node, AttributeKey::ClassName)
        .map(str::to_string)
}

fn binary_result(op: &BinaryOperator) -> Type {
    match op {
        BinaryOperator::Identical
        | BinaryOperator::NotIdentical
        | BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::Smaller
        | BinaryOperator::SmallerOrEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterOrEqual
        | BinaryOperator::BooleanAnd
        | BinaryOperator::BooleanOr => Type::Bool,
        BinaryOperator::Concat => Type::String,
        BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Other(_) => Type::Mixed,
    }
}

/// Declared return types of the string functions the rules care about
fn function_return_type(name: &str) -> Type {
    match name.to_ascii_lowercase().as_str() {
        "strlen" | "strcmp" | "strncmp" | "strcasecmp" | "strncasecmp" | "count" => Type::Integer,
        "str_starts_with" | "str_ends_with" | "str_contains" | "is_string" | "is_int" | "is_array" => Type::Bool,
        "substr" | "strtolower" | "strtoupper" | "trim" | "ltrim" | "rtrim" | "implode" | "sprintf" => Type::String,
        _ => Type::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modernize_test_utils::{find_first, fixture_reflection, parse_php};
    use modernize_types::InMemoryReflectionProvider;
    use pretty_assertions::assert_eq;

    fn resolver() -> NodeTypeResolver<InMemoryReflectionProvider> {
        NodeTypeResolver::new(fixture_reflection())
    }

    /// Type of the right-hand side of the first assignment
    fn assigned_type(source: &str) -> Type {
        let tree = parse_php(source);
        let assignment = find_first(&tree, |kind| {
            matches!(kind, NodeKind::Opaque { kind, .. } if kind == "assignment_expression")
        });
        let value = *tree.children(assignment).last().unwrap();
        resolver().resolve(&tree, value)
    }

    #[test]
    fn scalars() {
        assert_eq!(assigned_type("<?php $x = 'abc';"), Type::constant_string("abc"));
        assert_eq!(assigned_type("<?php $x = -2;"), Type::ConstantInteger(-2));
        assert_eq!(assigned_type("<?php $x = 1.5;"), Type::Float);
        assert_eq!(assigned_type("<?php $x = false;"), Type::Bool);
        assert_eq!(assigned_type("<?php $x = $a === $b;"), Type::Bool);
        assert_eq!(assigned_type("<?php $x = $a . $b;"), Type::String);
        assert_eq!(assigned_type("<?php $x = strlen($a);"), Type::Integer);
        assert_eq!(assigned_type("<?php $x = $y;"), Type::Mixed);
    }

    #[test]
    fn objects_and_class_strings() {
        assert_eq!(
            assigned_type("<?php namespace App\\Entity; $x = new User();"),
            Type::object("App\\Entity\\User")
        );
        assert_eq!(
            assigned_type("<?php $x = \\App\\Entity\\Post::class;"),
            Type::generic_class_string("App\\Entity\\Post")
        );
        assert_eq!(assigned_type("<?php $x = 'App\\Entity\\Comment';"), Type::generic_class_string("App\\Entity\\Comment"));
        assert_eq!(assigned_type("<?php $x = Unknown::class;"), Type::constant_string("Unknown"));
        assert_eq!(
            assigned_type("<?php namespace App; class Svc { function f() { $x = $this; } }"),
            Type::object("App\\Svc")
        );
    }

    #[test]
    fn array_literals() {
        assert_eq!(
            assigned_type("<?php $x = ['a', 5 => 2, 'k' => null];"),
            Type::ConstantArray {
                keys: vec![
                    Type::ConstantInteger(0),
                    Type::ConstantInteger(5),
                    Type::constant_string("k"),
                ],
                values: vec![Type::constant_string("a"), Type::ConstantInteger(2), Type::Null],
            }
        );
        assert_eq!(
            assigned_type("<?php $x = [$k => 1, $j => 2];"),
            Type::array(Type::Mixed, Type::union([Type::ConstantInteger(1), Type::ConstantInteger(2)]))
        );
    }

    #[test]
    fn class_literals_in_arrays_are_normalised() {
        assert_eq!(
            assigned_type("<?php $x = [\\App\\Entity\\User::class];"),
            Type::ConstantArray {
                keys: vec![Type::ConstantInteger(0)],
                values: vec![Type::generic_class_string("App\\Entity\\User")],
            }
        );
    }
}
