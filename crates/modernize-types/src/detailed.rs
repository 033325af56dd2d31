//! Detail thresholds for inferred types

use crate::types::Type;

/// Decides when a type is too precise to be worth keeping
pub trait TooDetailed {
    /// Whether `ty` should be coarsened
    fn is_too_detailed(&self, ty: &Type) -> bool;
}

impl<F: Fn(&Type) -> bool> TooDetailed for F {
    fn is_too_detailed(&self, ty: &Type) -> bool {
        self(ty)
    }
}

/// Counts union members and array-shape entries against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailedTypeAnalyzer {
    threshold: usize,
}

impl DetailedTypeAnalyzer {
    /// Members at which a union counts as too detailed
    pub const DEFAULT_THRESHOLD: usize = 4;

    /// Create analyzer; unions or shapes with at least `threshold` members
    /// are too detailed
    #[inline]
    #[must_use]
    pub const fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Configured threshold
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for DetailedTypeAnalyzer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl TooDetailed for DetailedTypeAnalyzer {
    fn is_too_detailed(&self, ty: &Type) -> bool {
        match ty {
            Type::Union(members) => members.len() >= self.threshold,
            Type::ConstantArray { keys, .. } => keys.len() >= self.threshold,
            _ => false,
        }
    }
}
