//! Attribute decoration
//!
//! Fills the attribute side-table right after lowering: parent links plus
//! the enclosing scope, class, method and namespace of every node.

use crate::attributes::{AttributeKey, AttributeValue};
use crate::node::{FunctionKind, NodeId, NodeKind};
use crate::tree::SyntaxTree;

#[derive(Debug, Clone, Default)]
struct Context {
    scope: Option<NodeId>,
    class_name: Option<String>,
    method_name: Option<String>,
    namespace: Option<String>,
}

pub(crate) fn decorate(tree: &mut SyntaxTree) {
    let root = tree.root();
    let statements = tree.children(root);
    let mut context = Context::default();

    for statement in statements {
        visit(tree, statement, root, &context);

        // `namespace Foo;` applies to the statements that follow it
        if let NodeKind::Namespace { name, body } = tree.kind(statement) {
            if body.is_empty() {
                context.namespace = name.and_then(|n| name_value(tree, n));
            }
        }
    }
}

fn visit(tree: &mut SyntaxTree, id: NodeId, parent: NodeId, context: &Context) {
    tree.set_attribute(id, AttributeKey::Parent, AttributeValue::Node(parent));
    apply(tree, id, context);

    let mut inner = context.clone();
    match tree.kind(id).clone() {
        NodeKind::Namespace { name, .. } => {
            inner.namespace = name.and_then(|n| name_value(tree, n));
        }
        NodeKind::Class { name, .. } => {
            if let Some(short) = name.and_then(|n| name_value(tree, n)) {
                let fqn = match &context.namespace {
                    Some(ns) => format!("{ns}\\{short}"),
                    None => short,
                };
                tree.set_attribute(id, AttributeKey::ClassName, AttributeValue::Name(fqn.clone()));
                inner.class_name = Some(fqn);
            }
            inner.method_name = None;
            inner.scope = None;
        }
        NodeKind::FunctionLike { kind, name, .. } => {
            inner.scope = Some(id);
            if matches!(kind, FunctionKind::Method | FunctionKind::Function) {
                if let Some(method) = name.and_then(|n| name_value(tree, n)) {
                    tree.set_attribute(id, AttributeKey::MethodName, AttributeValue::Name(method.clone()));
                    inner.method_name = Some(method);
                }
            }
        }
        _ => {}
    }

    for child in tree.children(id) {
        visit(tree, child, id, &inner);
    }
}

fn apply(tree: &mut SyntaxTree, id: NodeId, context: &Context) {
    if let Some(scope) = context.scope {
        tree.set_attribute(id, AttributeKey::Scope, AttributeValue::Node(scope));
    }
    if let Some(class_name) = &context.class_name {
        tree.set_attribute(id, AttributeKey::ClassName, AttributeValue::Name(class_name.clone()));
    }
    if let Some(method_name) = &context.method_name {
        tree.set_attribute(id, AttributeKey::MethodName, AttributeValue::Name(method_name.clone()));
    }
    if let Some(namespace) = &context.namespace {
        tree.set_attribute(id, AttributeKey::Namespace, AttributeValue::Name(namespace.clone()));
    }
}

fn name_value(tree: &SyntaxTree, id: NodeId) -> Option<String> {
    match tree.kind(id) {
        NodeKind::Name { value } => Some(value.trim_start_matches('\\').to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::attributes::{AttributeKey, AttributeValue};
    use crate::node::NodeKind;
    use crate::parser::parse;

    #[test]
    fn braced_namespace_and_scope() {
        let source = "<?php\nnamespace App\\Service {\n    function helper() { return fn () => $x; }\n}\n";
        let tree = parse(source).unwrap();

        let variable = tree
            .descendants(tree.root())
            .into_iter()
            .find(|id| matches!(tree.kind(*id), NodeKind::Variable { name } if name == "x"))
            .unwrap();

        assert_eq!(
            tree.name_attribute(variable, AttributeKey::Namespace),
            Some("App\\Service")
        );
        assert_eq!(tree.name_attribute(variable, AttributeKey::MethodName), Some("helper"));
        assert_eq!(tree.name_attribute(variable, AttributeKey::ClassName), None);

        // innermost scope is the arrow function, not the named function
        let scope = tree
            .attribute(variable, AttributeKey::Scope)
            .and_then(AttributeValue::as_node)
            .unwrap();
        assert!(matches!(
            tree.kind(scope),
            NodeKind::FunctionLike {
                kind: crate::node::FunctionKind::ArrowFn,
                ..
            }
        ));
    }

    #[test]
    fn every_non_root_node_has_parent() {
        let tree = parse("<?php class A { function b() { return [1, 2]; } }").unwrap();
        let root = tree.root();
        for id in tree.descendants(root) {
            if id == root {
                assert_eq!(tree.parent(id), None);
            } else {
                let parent = tree.parent(id).unwrap();
                assert!(tree.children(parent).contains(&id));
            }
        }
    }
}
