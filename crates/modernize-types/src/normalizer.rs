//! Class-string normalisation
//!
//! Literal strings naming known classes become `class-string<Class>`. Unions
//! and arrays built from many of them are then collapsed into a bounded shape
//! once they stop carrying actionable precision.

use tracing::trace;

use crate::detailed::{DetailedTypeAnalyzer, TooDetailed};
use crate::reflection::ReflectionProvider;
use crate::traverser::TypeTraverser;
use crate::types::Type;

/// Literal that looks like a class name but never is one
const ERROR_SENTINEL: &str = "error";

/// Canonicalises inferred types that mention class names
#[derive(Debug, Clone)]
pub struct GenericClassStringTypeNormalizer<R, D = DetailedTypeAnalyzer> {
    reflection: R,
    too_detailed: D,
}

impl<R: ReflectionProvider> GenericClassStringTypeNormalizer<R> {
    /// Create normaliser with the default detail threshold
    #[inline]
    #[must_use]
    pub fn new(reflection: R) -> Self {
        Self::with_detail_check(reflection, DetailedTypeAnalyzer::default())
    }
}

impl<R: ReflectionProvider, D: TooDetailed> GenericClassStringTypeNormalizer<R, D> {
    /// Create normaliser with a custom "too detailed" predicate
    #[inline]
    #[must_use]
    pub fn with_detail_check(reflection: R, too_detailed: D) -> Self {
        Self {
            reflection,
            too_detailed,
        }
    }

    /// Reflection oracle in use
    #[inline]
    #[must_use]
    pub fn reflection(&self) -> &R {
        &self.reflection
    }

    /// Normalise a type; applying it twice gives the same result as once
    #[must_use]
    pub fn normalize(&self, ty: Type) -> Type {
        let ty = TypeTraverser::map(ty, &|ty, traverse| match ty {
            Type::ConstantString(value)
                if value != ERROR_SENTINEL && self.reflection.has_class(&value) =>
            {
                Type::generic_class_string(value)
            }
            other => traverse(other),
        });

        match ty {
            Type::Union(members) => self.resolve_class_string_in_union_type(members),
            Type::Array { key, item } if matches!(*key, Type::Union(_)) => {
                self.resolve_array_type_with_union_key_type(*key, *item)
            }
            other => other,
        }
    }

    fn resolve_array_type_with_union_key_type(&self, key: Type, item: Type) -> Type {
        let Type::Union(members) = &item else {
            return Type::array(key, item);
        };

        if !Self::is_all_generic_class_string_type(members) {
            trace!(%key, %item, "mixed item union widened");
            return Type::array(key, Type::Mixed);
        }

        if self.too_detailed.is_too_detailed(&item) {
            trace!(%key, %item, "class-string union too detailed");
            return Type::array(key, Type::ClassString);
        }

        Type::array(key, item)
    }

    fn resolve_class_string_in_union_type(&self, members: Vec<Type>) -> Type {
        for member in &members {
            let Type::Array { key, item } = member else {
                return Type::Union(members);
            };

            if matches!(**item, Type::ConstantArray { .. }) {
                return Type::array(Type::Mixed, Type::array(Type::Mixed, Type::Mixed));
            }

            if !matches!(**key, Type::Mixed | Type::ConstantInteger(_)) {
                return Type::Union(members);
            }

            if !item.is_class_string() {
                return Type::Union(members);
            }
        }

        Type::array(Type::Mixed, Type::ClassString)
    }

    /// True iff every member is `class-string<T>`
    #[must_use]
    pub fn is_all_generic_class_string_type(members: &[Type]) -> bool {
        members
            .iter()
            .all(|member| matches!(member, Type::GenericClassString(_)))
    }
}
