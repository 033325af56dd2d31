//! Recursive type mapping

use crate::types::Type;

/// Rebuilds a type tree through a callback
///
/// The callback receives each type together with a `traverse` function. It
/// either returns a replacement or calls `traverse` to descend into the
/// type's children, which are offered to the same callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeTraverser;

impl TypeTraverser {
    /// Map `ty` top-down through `callback`
    pub fn map<F>(ty: Type, callback: &F) -> Type
    where
        F: Fn(Type, &dyn Fn(Type) -> Type) -> Type,
    {
        let traverse = |inner: Type| inner.map_children(&|child| Self::map(child, callback));
        callback(ty, &traverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_sees_nested_members() {
        let ty = Type::array(
            Type::Integer,
            Type::union([Type::constant_string("a"), Type::Null]),
        );

        let mapped = TypeTraverser::map(ty, &|ty, traverse| match ty {
            Type::ConstantString(_) => Type::String,
            other => traverse(other),
        });

        assert_eq!(mapped, Type::array(Type::Integer, Type::union([Type::String, Type::Null])));
    }

    #[test]
    fn callback_can_stop_descent() {
        let ty = Type::array(Type::Mixed, Type::constant_string("a"));

        let mapped = TypeTraverser::map(ty.clone(), &|ty, traverse| match ty {
            Type::Array { .. } => ty,
            other => traverse(other),
        });

        assert_eq!(mapped, ty);
    }
}
