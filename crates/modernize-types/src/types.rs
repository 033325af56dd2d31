//! Inferred type model
//!
//! A small, closed subset of the PHP static type lattice: enough to describe
//! literal strings that name classes, arrays of them and unions thereof.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Object of a named class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectType {
    class_name: String,
}

impl ObjectType {
    /// Create object type; a leading `\` is dropped
    #[inline]
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        let class_name = match class_name.strip_prefix('\\') {
            Some(stripped) => stripped.to_string(),
            None => class_name,
        };
        Self { class_name }
    }

    /// Fully qualified class name
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

/// A statically inferred type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Anything
    Mixed,
    /// Any string
    String,
    /// Any integer
    Integer,
    /// Any float
    Float,
    /// Any boolean
    Bool,
    /// `null`
    Null,
    /// A specific string literal
    ConstantString(String),
    /// A specific integer literal
    ConstantInteger(i64),
    /// A string naming some class
    ClassString,
    /// A string naming a class of the given object type
    GenericClassString(Box<Type>),
    /// Instance of a class
    Object(ObjectType),
    /// Array with uniform key and item types
    Array {
        /// Key type
        key: Box<Type>,
        /// Item type
        item: Box<Type>,
    },
    /// Array literal shape, keys and values pairwise
    ConstantArray {
        /// Key types
        keys: Vec<Type>,
        /// Value types
        values: Vec<Type>,
    },
    /// One of several types; build through [`Type::union`]
    Union(Vec<Type>),
}

impl Type {
    /// `array<key, item>`
    #[inline]
    #[must_use]
    pub fn array(key: Type, item: Type) -> Self {
        Self::Array {
            key: Box::new(key),
            item: Box::new(item),
        }
    }

    /// Object of `class_name`
    #[inline]
    #[must_use]
    pub fn object(class_name: impl Into<String>) -> Self {
        Self::Object(ObjectType::new(class_name))
    }

    /// `class-string<class_name>`
    #[inline]
    #[must_use]
    pub fn generic_class_string(class_name: impl Into<String>) -> Self {
        Self::GenericClassString(Box::new(Self::object(class_name)))
    }

    /// String literal type
    #[inline]
    #[must_use]
    pub fn constant_string(value: impl Into<String>) -> Self {
        Self::ConstantString(value.into())
    }

    /// Canonical union: nested unions are flattened, duplicates dropped
    /// (first occurrence wins), a single member is returned as is and an
    /// empty union widens to `mixed`.
    #[must_use]
    pub fn union(members: impl IntoIterator<Item = Type>) -> Self {
        let mut flat: Vec<Type> = Vec::new();
        let mut pending: Vec<Type> = members.into_iter().collect();
        pending.reverse();

        while let Some(member) = pending.pop() {
            match member {
                Self::Union(inner) => pending.extend(inner.into_iter().rev()),
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }

        match flat.len() {
            0 => Self::Mixed,
            1 => flat.pop().unwrap_or(Self::Mixed),
            _ => Self::Union(flat),
        }
    }

    /// `class-string` or `class-string<T>`
    #[inline]
    #[must_use]
    pub fn is_class_string(&self) -> bool {
        matches!(self, Self::ClassString | Self::GenericClassString(_))
    }

    /// Class named by an object type
    #[inline]
    #[must_use]
    pub fn object_class_name(&self) -> Option<&str> {
        match self {
            Self::Object(object) => Some(object.class_name()),
            _ => None,
        }
    }

    /// Union members, or the type itself
    #[must_use]
    pub fn members(&self) -> &[Type] {
        match self {
            Self::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }

    /// Apply `f` to every immediate child type
    ///
    /// Unions are re-canonicalised after mapping.
    #[must_use]
    pub fn map_children(self, f: &dyn Fn(Type) -> Type) -> Self {
        match self {
            Self::GenericClassString(inner) => Self::GenericClassString(Box::new(f(*inner))),
            Self::Array { key, item } => Self::array(f(*key), f(*item)),
            Self::ConstantArray { keys, values } => Self::ConstantArray {
                keys: keys.into_iter().map(f).collect(),
                values: values.into_iter().map(f).collect(),
            },
            Self::Union(members) => Self::union(members.into_iter().map(f)),
            leaf => leaf,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mixed => write!(f, "mixed"),
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Null => write!(f, "null"),
            Self::ConstantString(value) => write!(f, "'{value}'"),
            Self::ConstantInteger(value) => write!(f, "{value}"),
            Self::ClassString => write!(f, "class-string"),
            Self::GenericClassString(inner) => write!(f, "class-string<{inner}>"),
            Self::Object(object) => write!(f, "{}", object.class_name()),
            Self::Array { key, item } => write!(f, "array<{key}, {item}>"),
            Self::ConstantArray { keys, values } => {
                write!(f, "array{{")?;
                for (i, (key, value)) in keys.iter().zip(values).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn union_flattens_and_dedupes() {
        let nested = Type::union([
            Type::String,
            Type::Union(vec![Type::Integer, Type::String]),
            Type::Null,
        ]);
        assert_eq!(nested, Type::Union(vec![Type::String, Type::Integer, Type::Null]));
    }

    #[test]
    fn union_unwraps_single_and_empty() {
        assert_eq!(Type::union([Type::String, Type::String]), Type::String);
        assert_eq!(Type::union(Vec::new()), Type::Mixed);
    }

    #[test]
    fn class_string_predicates() {
        assert!(Type::ClassString.is_class_string());
        assert!(Type::generic_class_string("App\\User").is_class_string());
        assert!(!Type::String.is_class_string());
        assert_eq!(Type::object("\\App\\User").object_class_name(), Some("App\\User"));
    }

    #[test]
    fn describe() {
        let ty = Type::array(
            Type::Mixed,
            Type::union([Type::generic_class_string("A"), Type::ConstantInteger(1)]),
        );
        assert_eq!(ty.to_string(), "array<mixed, class-string<A>|1>");

        let shape = Type::ConstantArray {
            keys: vec![Type::ConstantInteger(0)],
            values: vec![Type::constant_string("x")],
        };
        assert_eq!(shape.to_string(), "array{0: 'x'}");
    }

    #[test]
    fn map_children_recanonicalises_unions() {
        let ty = Type::Union(vec![Type::ConstantString("a".into()), Type::ConstantString("b".into())]);
        assert_eq!(ty.map_children(&|_| Type::String), Type::String);
    }

    #[test]
    fn types_serialize() {
        let ty = Type::generic_class_string("App\\User");
        let json = serde_json::to_string(&ty).unwrap();
        let back: Type = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}
