//! Typed node attributes
//!
//! Metadata attached to nodes after parsing lives in a side-table keyed by
//! node id plus a closed set of [`AttributeKey`]s.

use std::collections::HashMap;

use crate::node::NodeId;

/// Well-known attribute slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// Enclosing node
    Parent,
    /// Nearest enclosing function-like node
    Scope,
    /// Fully qualified name of the enclosing class
    ClassName,
    /// Name of the enclosing method or function
    MethodName,
    /// Enclosing namespace
    Namespace,
}

/// Attribute payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Reference to another node
    Node(NodeId),
    /// Resolved name
    Name(String),
}

impl AttributeValue {
    /// Node reference, if this is one
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    /// Name, if this is one
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Node(_) => None,
        }
    }
}

/// Side-table of node attributes
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    entries: HashMap<(NodeId, AttributeKey), AttributeValue>,
}

impl Attributes {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get attribute
    #[inline]
    #[must_use]
    pub fn get(&self, node: NodeId, key: AttributeKey) -> Option<&AttributeValue> {
        self.entries.get(&(node, key))
    }

    /// Set attribute, returning the previous value
    pub fn set(
        &mut self,
        node: NodeId,
        key: AttributeKey,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        self.entries.insert((node, key), value)
    }

    /// Remove attribute
    pub fn remove(&mut self, node: NodeId, key: AttributeKey) -> Option<AttributeValue> {
        self.entries.remove(&(node, key))
    }

    /// Number of stored attributes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut attrs = Attributes::new();
        assert!(attrs.is_empty());

        attrs.set(NodeId(1), AttributeKey::Parent, AttributeValue::Node(NodeId(0)));
        attrs.set(
            NodeId(1),
            AttributeKey::ClassName,
            AttributeValue::Name("App\\Foo".to_string()),
        );

        assert_eq!(
            attrs.get(NodeId(1), AttributeKey::Parent).and_then(AttributeValue::as_node),
            Some(NodeId(0))
        );
        assert_eq!(
            attrs.get(NodeId(1), AttributeKey::ClassName).and_then(AttributeValue::as_name),
            Some("App\\Foo")
        );
        assert_eq!(attrs.get(NodeId(1), AttributeKey::Scope), None);

        attrs.remove(NodeId(1), AttributeKey::Parent);
        assert_eq!(attrs.len(), 1);
    }
}
