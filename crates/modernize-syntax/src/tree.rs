//! Arena syntax tree
//!
//! Nodes are never removed. A rewrite allocates new nodes and records that
//! they replace an existing one; every accessor resolves through that record,
//! so callers always see the current shape of the tree while the printer can
//! still splice replacements into the original source text.

use std::collections::HashMap;

use crate::attributes::{AttributeKey, AttributeValue, Attributes};
use crate::node::{Node, NodeId, NodeKind, Span};

/// Attributes a synthetic node inherits from the node it replaces
const CONTEXT_KEYS: [AttributeKey; 4] = [
    AttributeKey::Scope,
    AttributeKey::ClassName,
    AttributeKey::MethodName,
    AttributeKey::Namespace,
];

/// Parsed source plus its node arena
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<Node>,
    root: NodeId,
    attributes: Attributes,
    replacements: HashMap<NodeId, NodeId>,
}

impl SyntaxTree {
    pub(crate) fn from_parts(source: String, nodes: Vec<Node>, root: NodeId) -> Self {
        Self {
            source,
            nodes,
            root,
            attributes: Attributes::new(),
            replacements: HashMap::new(),
        }
    }

    /// Original source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node (a `Program`)
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of allocated nodes, including replaced ones
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow recorded replacements to the node currently standing at `id`
    #[must_use]
    pub fn resolve(&self, id: NodeId) -> NodeId {
        let mut current = id;
        // bounded walk; a chain can never be longer than the arena
        for _ in 0..=self.nodes.len() {
            match self.replacements.get(&current) {
                Some(next) => current = *next,
                None => return current,
            }
        }
        current
    }

    /// Get current node at `id`, or `None` if the id is foreign
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(self.resolve(id).0)
    }

    /// Get current node at `id`
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this tree
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[self.resolve(id).0]
    }

    /// Get current node kind at `id`
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this tree
    #[inline]
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Node exactly as allocated, ignoring replacements
    pub(crate) fn raw(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Source text of a parsed node
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        let span = self.node(id).span?;
        self.source.get(span.start..span.end)
    }

    /// Span of the current node at `id`
    #[inline]
    #[must_use]
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).span
    }

    /// Direct children in source order, replacements applied
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id)
            .children()
            .into_iter()
            .map(|child| self.resolve(child))
            .collect()
    }

    /// All nodes below and including `id`, children before parents
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        // (node, children already pushed)
        let mut stack = vec![(self.resolve(id), false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                out.push(current);
                continue;
            }
            stack.push((current, true));
            for child in self.children(current).into_iter().rev() {
                stack.push((child, false));
            }
        }
        out
    }

    /// Enclosing node
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.attribute(self.resolve(id), AttributeKey::Parent)
            .and_then(AttributeValue::as_node)
            .map(|parent| self.resolve(parent))
    }

    /// Get node attribute
    #[inline]
    #[must_use]
    pub fn attribute(&self, id: NodeId, key: AttributeKey) -> Option<&AttributeValue> {
        self.attributes.get(id, key)
    }

    /// Set node attribute
    pub fn set_attribute(&mut self, id: NodeId, key: AttributeKey, value: AttributeValue) {
        self.attributes.set(id, key, value);
    }

    /// Name-valued attribute, e.g. [`AttributeKey::ClassName`]
    #[must_use]
    pub fn name_attribute(&self, id: NodeId, key: AttributeKey) -> Option<&str> {
        self.attribute(self.resolve(id), key)
            .and_then(AttributeValue::as_name)
    }

    /// Attribute side-table
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Allocate a synthetic node
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::synthetic(kind));
        id
    }

    /// Make `new` stand where `old` currently stands
    ///
    /// Synthetic nodes under `new` are linked to their parents and inherit the
    /// scope attributes of `old`. Reused parsed nodes are re-parented.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        let old = self.resolve(old);
        let new = self.resolve(new);
        if old == new {
            return;
        }

        if let Some(parent) = self.attributes.get(old, AttributeKey::Parent).cloned() {
            self.attributes.set(new, AttributeKey::Parent, parent);
        }
        let context: Vec<_> = CONTEXT_KEYS
            .iter()
            .filter_map(|key| self.attributes.get(old, *key).cloned().map(|v| (*key, v)))
            .collect();

        let mut stack = vec![new];
        while let Some(current) = stack.pop() {
            for (key, value) in &context {
                if self.attributes.get(current, *key).is_none() {
                    self.attributes.set(current, *key, value.clone());
                }
            }
            for child in self.children(current) {
                self.attributes
                    .set(child, AttributeKey::Parent, AttributeValue::Node(current));
                if self.nodes[child.0].is_synthetic() {
                    stack.push(child);
                }
            }
        }

        self.replacements.insert(old, new);
    }

    /// Whether `id` has been replaced
    #[inline]
    #[must_use]
    pub fn is_replaced(&self, id: NodeId) -> bool {
        self.replacements.contains_key(&id)
    }

    /// Whether any replacement was recorded
    #[inline]
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.replacements.is_empty()
    }
}
