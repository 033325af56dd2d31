//! Compile-time literal evaluation

use std::fmt::{self, Display, Formatter};

use crate::attributes::AttributeKey;
use crate::node::{NodeId, NodeKind, UnaryOperator};
use crate::tree::SyntaxTree;

/// A statically known PHP value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String
    String(String),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// `null`
    Null,
    /// Array as ordered key/value pairs
    Array(Vec<(Value, Value)>),
}

impl Value {
    /// String payload
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{s}'"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, (key, value)) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} => {value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Evaluates literal expressions
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueResolver;

impl ValueResolver {
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Statically known value of an expression, `None` if not a literal
    #[must_use]
    pub fn get_value(&self, tree: &SyntaxTree, id: NodeId) -> Option<Value> {
        match tree.kind(id) {
            NodeKind::String { value } => Some(Value::String(value.clone())),
            NodeKind::Integer { value } => Some(Value::Int(*value)),
            NodeKind::Float { value } => Some(Value::Float(*value)),
            NodeKind::Bool { value } => Some(Value::Bool(*value)),
            NodeKind::Null => Some(Value::Null),
            NodeKind::Name { value } => match value.trim_start_matches('\\').to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                "null" => Some(Value::Null),
                _ => None,
            },
            NodeKind::Parenthesized { inner } => self.get_value(tree, *inner),
            NodeKind::UnaryOp { op, operand } => match (op, self.get_value(tree, *operand)?) {
                (UnaryOperator::Minus, Value::Int(i)) => i.checked_neg().map(Value::Int),
                (UnaryOperator::Minus, Value::Float(v)) => Some(Value::Float(-v)),
                (UnaryOperator::Plus, v @ (Value::Int(_) | Value::Float(_))) => Some(v),
                (UnaryOperator::Not, Value::Bool(b)) => Some(Value::Bool(!b)),
                _ => None,
            },
            NodeKind::Array { items } => self.get_array_value(tree, items),
            NodeKind::ClassConstFetch { class, constant } => {
                let is_class = matches!(
                    tree.kind(*constant),
                    NodeKind::Name { value } if value.eq_ignore_ascii_case("class")
                );
                if is_class {
                    self.resolve_class_name(tree, id, *class).map(Value::String)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Whether the expression statically equals `expected`
    #[must_use]
    pub fn is_value(&self, tree: &SyntaxTree, id: NodeId, expected: &Value) -> bool {
        self.get_value(tree, id).as_ref() == Some(expected)
    }

    /// Class named by `class` as seen from `context`
    ///
    /// `self` resolves to the enclosing class, `static` stays `"static"` and
    /// `parent` is unknown. Relative names are prefixed with the namespace.
    #[must_use]
    pub fn resolve_class_name(&self, tree: &SyntaxTree, fetch: NodeId, class: NodeId) -> Option<String> {
        let NodeKind::Name { value } = tree.kind(class) else {
            return None;
        };

        match value.to_ascii_lowercase().as_str() {
            "self" => tree
                .name_attribute(fetch, AttributeKey::ClassName)
                .map(str::to_string),
            "static" => Some("static".to_string()),
            "parent" => None,
            _ => {
                if let Some(fully_qualified) = value.strip_prefix('\\') {
                    return Some(fully_qualified.to_string());
                }
                match tree.name_attribute(fetch, AttributeKey::Namespace) {
                    Some(namespace) => Some(format!("{namespace}\\{value}")),
                    None => Some(value.clone()),
                }
            }
        }
    }

    fn get_array_value(&self, tree: &SyntaxTree, items: &[NodeId]) -> Option<Value> {
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(items.len());
        let mut next_index: i64 = 0;

        for item in items {
            let NodeKind::ArrayItem { key, value, unpack } = tree.kind(*item) else {
                return None;
            };
            if *unpack {
                return None;
            }

            let key = match key {
                Some(key) => normalize_key(self.get_value(tree, *key)?)?,
                None => Value::Int(next_index),
            };
            if let Value::Int(i) = key {
                next_index = next_index.max(i.checked_add(1)?);
            }

            let value = self.get_value(tree, *value)?;
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => entries.push((key, value)),
            }
        }

        Some(Value::Array(entries))
    }
}

/// PHP array key casting: decimal strings, bools and null become int/string keys
fn normalize_key(key: Value) -> Option<Value> {
    match key {
        Value::Int(_) => Some(key),
        Value::String(s) => match s.parse::<i64>() {
            Ok(i) if i.to_string() == s => Some(Value::Int(i)),
            _ => Some(Value::String(s)),
        },
        Value::Bool(b) => Some(Value::Int(i64::from(b))),
        Value::Null => Some(Value::String(String::new())),
        Value::Float(_) | Value::Array(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn value_of_assignment(source: &str) -> Option<Value> {
        let tree = parse(source).unwrap();
        // value side of the first assignment
        let assignment = tree
            .descendants(tree.root())
            .into_iter()
            .find(|id| {
                matches!(tree.kind(*id), NodeKind::Opaque { kind, .. } if kind == "assignment_expression")
            })
            .unwrap();
        let value = *tree.children(assignment).last().unwrap();
        ValueResolver::new().get_value(&tree, value)
    }

    #[test]
    fn scalars() {
        assert_eq!(value_of_assignment("<?php $x = 'abc';"), Some(Value::String("abc".into())));
        assert_eq!(value_of_assignment("<?php $x = -3;"), Some(Value::Int(-3)));
        assert_eq!(value_of_assignment("<?php $x = (0);"), Some(Value::Int(0)));
        assert_eq!(value_of_assignment("<?php $x = TRUE;"), Some(Value::Bool(true)));
        assert_eq!(value_of_assignment("<?php $x = null;"), Some(Value::Null));
        assert_eq!(value_of_assignment("<?php $x = $y;"), None);
        assert_eq!(value_of_assignment("<?php $x = foo();"), None);
    }

    #[test]
    fn arrays_follow_php_key_rules() {
        let value = value_of_assignment("<?php $x = ['a', 5 => 'b', 'c', '7' => 'd', 'k' => 'e'];");
        assert_eq!(
            value,
            Some(Value::Array(vec![
                (Value::Int(0), Value::String("a".into())),
                (Value::Int(5), Value::String("b".into())),
                (Value::Int(6), Value::String("c".into())),
                (Value::Int(7), Value::String("d".into())),
                (Value::String("k".into()), Value::String("e".into())),
            ]))
        );
        assert_eq!(value_of_assignment("<?php $x = [$y];"), None);
    }

    #[test]
    fn class_constant_names() {
        assert_eq!(
            value_of_assignment("<?php $x = \\App\\Foo::class;"),
            Some(Value::String("App\\Foo".into()))
        );
        assert_eq!(
            value_of_assignment("<?php namespace App; $x = Foo::class;"),
            Some(Value::String("App\\Foo".into()))
        );
        assert_eq!(
            value_of_assignment("<?php namespace App; class Bar { function f() { $x = self::class; } }"),
            Some(Value::String("App\\Bar".into()))
        );
        assert_eq!(
            value_of_assignment("<?php $x = static::class;"),
            Some(Value::String("static".into()))
        );
        assert_eq!(value_of_assignment("<?php $x = Foo::BAR;"), None);
    }

    #[test]
    fn is_value_compares_exactly() {
        let tree = parse("<?php $x = 0;").unwrap();
        let zero = tree
            .descendants(tree.root())
            .into_iter()
            .find(|id| matches!(tree.kind(*id), NodeKind::Integer { .. }))
            .unwrap();
        let resolver = ValueResolver::new();
        assert!(resolver.is_value(&tree, zero, &Value::Int(0)));
        assert!(!resolver.is_value(&tree, zero, &Value::String("0".into())));
        assert!(!resolver.is_value(&tree, zero, &Value::Bool(false)));
    }
}
