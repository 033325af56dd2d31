//! Reflection oracle
//!
//! Answers class existence and member questions for the normaliser and the
//! rule matchers. [`InMemoryReflectionProvider`] is the bundled
//! implementation, filled from parsed sources or test fixtures.

use std::collections::HashMap;
use std::sync::Arc;

/// Declared parameter of a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterReflection {
    name: String,
    default_value: Option<String>,
}

impl ParameterReflection {
    /// Parameter without a default
    #[inline]
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
        }
    }

    /// Parameter with a default, given as source text
    #[inline]
    #[must_use]
    pub fn optional(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: Some(default_value.into()),
        }
    }

    /// Parameter name without `$`
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default value source text
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Whether the parameter may be omitted
    #[inline]
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

/// Declared method of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodReflection {
    name: String,
    parameters: Vec<ParameterReflection>,
}

impl MethodReflection {
    /// Create method without parameters
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Add parameter (builder)
    #[inline]
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterReflection) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[ParameterReflection] {
        &self.parameters
    }
}

/// Known class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassReflection {
    name: String,
    is_built_in: bool,
    methods: Vec<MethodReflection>,
}

impl ClassReflection {
    /// Create user-land class
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim_start_matches('\\').to_string(),
            is_built_in: false,
            methods: Vec::new(),
        }
    }

    /// Mark as shipped with the runtime (builder)
    #[inline]
    #[must_use]
    pub fn built_in(mut self) -> Self {
        self.is_built_in = true;
        self
    }

    /// Add method (builder)
    #[inline]
    #[must_use]
    pub fn with_method(mut self, method: MethodReflection) -> Self {
        self.methods.push(method);
        self
    }

    /// Fully qualified name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the class ships with the runtime
    #[inline]
    #[must_use]
    pub fn is_built_in(&self) -> bool {
        self.is_built_in
    }

    /// Declared methods
    #[inline]
    #[must_use]
    pub fn methods(&self) -> &[MethodReflection] {
        &self.methods
    }

    /// Look up a method; names are case-insensitive
    #[must_use]
    pub fn get_method(&self, name: &str) -> Option<&MethodReflection> {
        self.methods.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Whether the class declares `name`
    #[inline]
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.get_method(name).is_some()
    }

    /// `__construct`, if declared
    #[inline]
    #[must_use]
    pub fn constructor(&self) -> Option<&MethodReflection> {
        self.get_method("__construct")
    }
}

/// Class lookup oracle
pub trait ReflectionProvider: Send + Sync {
    /// Whether a class of that name is known
    fn has_class(&self, name: &str) -> bool;

    /// Get class by name
    fn get_class(&self, name: &str) -> Option<&ClassReflection>;
}

impl<T: ReflectionProvider + ?Sized> ReflectionProvider for &T {
    fn has_class(&self, name: &str) -> bool {
        (**self).has_class(name)
    }

    fn get_class(&self, name: &str) -> Option<&ClassReflection> {
        (**self).get_class(name)
    }
}

impl<T: ReflectionProvider + ?Sized> ReflectionProvider for Arc<T> {
    fn has_class(&self, name: &str) -> bool {
        (**self).has_class(name)
    }

    fn get_class(&self, name: &str) -> Option<&ClassReflection> {
        (**self).get_class(name)
    }
}

/// Classes every PHP runtime ships
const BUILT_IN_CLASSES: &[&str] = &[
    "stdClass",
    "Exception",
    "Error",
    "Closure",
    "DateTime",
    "DateTimeImmutable",
    "ArrayObject",
    "ArrayIterator",
    "SplObjectStorage",
];

/// Map-backed reflection provider
///
/// Lookups are case-insensitive and ignore a leading `\`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReflectionProvider {
    classes: HashMap<String, ClassReflection>,
}

impl InMemoryReflectionProvider {
    /// Create empty provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create provider knowing the common runtime classes
    #[must_use]
    pub fn with_builtins() -> Self {
        BUILT_IN_CLASSES
            .iter()
            .fold(Self::new(), |provider, name| {
                provider.with_class(ClassReflection::new(*name).built_in())
            })
    }

    /// Add class (builder)
    #[inline]
    #[must_use]
    pub fn with_class(mut self, class: ClassReflection) -> Self {
        self.add_class(class);
        self
    }

    /// Add or replace class
    pub fn add_class(&mut self, class: ClassReflection) {
        self.classes.insert(lookup_key(class.name()), class);
    }

    /// Merge all classes of `other`; `other` wins on conflicts
    pub fn extend(&mut self, other: InMemoryReflectionProvider) {
        self.classes.extend(other.classes);
    }

    /// Number of known classes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no class is known
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate known classes in no particular order
    pub fn classes(&self) -> impl Iterator<Item = &ClassReflection> {
        self.classes.values()
    }
}

impl ReflectionProvider for InMemoryReflectionProvider {
    fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(&lookup_key(name))
    }

    fn get_class(&self, name: &str) -> Option<&ClassReflection> {
        self.classes.get(&lookup_key(name))
    }
}

fn lookup_key(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> InMemoryReflectionProvider {
        InMemoryReflectionProvider::with_builtins().with_class(
            ClassReflection::new("\\App\\Entity\\User")
                .with_method(
                    MethodReflection::new("__construct")
                        .with_parameter(ParameterReflection::required("name"))
                        .with_parameter(ParameterReflection::optional("active", "true")),
                )
                .with_method(MethodReflection::new("getName")),
        )
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let provider = provider();
        assert!(provider.has_class("App\\Entity\\User"));
        assert!(provider.has_class("\\app\\entity\\USER"));
        assert!(provider.has_class("stdclass"));
        assert!(!provider.has_class("App\\Entity\\Post"));
        assert_eq!(provider.get_class("app\\entity\\user").unwrap().name(), "App\\Entity\\User");
    }

    #[test]
    fn class_members() {
        let provider = provider();
        let user = provider.get_class("App\\Entity\\User").unwrap();
        assert!(!user.is_built_in());
        assert!(user.has_method("getname"));
        assert!(!user.has_method("setName"));

        let constructor = user.constructor().unwrap();
        let defaults: Vec<_> = constructor.parameters().iter().map(ParameterReflection::has_default).collect();
        assert_eq!(defaults, vec![false, true]);
        assert_eq!(constructor.parameters()[1].default_value(), Some("true"));

        assert!(provider.get_class("Exception").unwrap().is_built_in());
    }

    #[test]
    fn shared_providers_delegate() {
        let shared = Arc::new(provider());
        assert!(shared.has_class("App\\Entity\\User"));
        let by_ref: &InMemoryReflectionProvider = &shared;
        assert!(ReflectionProvider::has_class(&by_ref, "Closure"));
    }
}
