//! Type metadata for classes outside the catalog.
//!
//! Calls routinely pass platform objects (`java.lang.String`, boxed primitives, collections)
//! whose classes are not part of the analysed code. A [`TypeMetadataProvider`] answers
//! whether such a class is declared `final`, keyed by its qualified name.

use rustc_hash::FxHashMap;

/// Source of "is this class final?" answers for types not in the catalog.
///
/// Implementations must be pure: the same name always yields the same answer during a pass.
///
/// # Implementing Custom Providers
///
/// ```rust
/// use dexsimplify::mutability::TypeMetadataProvider;
///
/// struct SealedPackage;
///
/// impl TypeMetadataProvider for SealedPackage {
///     fn is_final(&self, qualified_name: &str) -> Option<bool> {
///         qualified_name.starts_with("com.vendor.sealed.").then_some(true)
///     }
/// }
///
/// assert_eq!(SealedPackage.is_final("com.vendor.sealed.Key"), Some(true));
/// assert_eq!(SealedPackage.is_final("com.other.Key"), None);
/// ```
pub trait TypeMetadataProvider: Send + Sync {
    /// Returns whether the class is declared `final`, or `None` if the class is unknown.
    fn is_final(&self, qualified_name: &str) -> Option<bool>;
}

/// Provider that knows no classes.
///
/// Every type outside the catalog is then treated as mutable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeMetadata;

impl TypeMetadataProvider for NoTypeMetadata {
    fn is_final(&self, _qualified_name: &str) -> Option<bool> {
        None
    }
}

/// Final platform classes known out of the box.
const FINAL_CLASSES: &[&str] = &[
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Class",
    "java.lang.Double",
    "java.lang.Float",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Math",
    "java.lang.Short",
    "java.lang.StrictMath",
    "java.lang.String",
    "java.lang.StringBuffer",
    "java.lang.StringBuilder",
    "java.lang.System",
    "java.lang.Void",
    "java.util.Arrays",
    "java.util.Objects",
    "java.util.Optional",
    "java.util.UUID",
];

/// Non-final platform classes known out of the box.
const OPEN_CLASSES: &[&str] = &[
    "java.io.InputStream",
    "java.io.OutputStream",
    "java.lang.ClassLoader",
    "java.lang.Enum",
    "java.lang.Exception",
    "java.lang.Number",
    "java.lang.Object",
    "java.lang.RuntimeException",
    "java.lang.Thread",
    "java.lang.Throwable",
    "java.math.BigDecimal",
    "java.math.BigInteger",
    "java.util.AbstractList",
    "java.util.ArrayList",
    "java.util.Collections",
    "java.util.HashMap",
    "java.util.HashSet",
    "java.util.LinkedList",
    "java.util.Random",
];

/// Table-driven provider for well-known platform classes.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::mutability::{PlatformTypes, TypeMetadataProvider};
///
/// let types = PlatformTypes::new().with_type("android.util.Base64", true);
/// assert_eq!(types.is_final("java.lang.String"), Some(true));
/// assert_eq!(types.is_final("java.util.ArrayList"), Some(false));
/// assert_eq!(types.is_final("android.util.Base64"), Some(true));
/// assert_eq!(types.is_final("com.example.Unknown"), None);
/// ```
#[derive(Debug, Clone)]
pub struct PlatformTypes {
    classes: FxHashMap<String, bool>,
}

impl PlatformTypes {
    /// Creates a provider preloaded with common `java.lang`, `java.util` and `java.io` classes.
    #[must_use]
    pub fn new() -> Self {
        let classes = FINAL_CLASSES
            .iter()
            .map(|name| ((*name).to_string(), true))
            .chain(OPEN_CLASSES.iter().map(|name| ((*name).to_string(), false)))
            .collect();
        PlatformTypes { classes }
    }

    /// Creates a provider that knows no classes.
    #[must_use]
    pub fn empty() -> Self {
        PlatformTypes {
            classes: FxHashMap::default(),
        }
    }

    /// Adds or overrides a class.
    #[must_use]
    pub fn with_type(mut self, qualified_name: impl Into<String>, is_final: bool) -> Self {
        self.classes.insert(qualified_name.into(), is_final);
        self
    }

    /// Number of known classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no classes are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for PlatformTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMetadataProvider for PlatformTypes {
    fn is_final(&self, qualified_name: &str) -> Option<bool> {
        self.classes.get(qualified_name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_do_not_overlap() {
        for name in FINAL_CLASSES {
            assert!(!OPEN_CLASSES.contains(name), "{name} listed twice");
        }
        assert_eq!(
            PlatformTypes::new().len(),
            FINAL_CLASSES.len() + OPEN_CLASSES.len()
        );
    }

    #[test]
    fn test_override() {
        let types = PlatformTypes::new().with_type("java.lang.Object", true);
        assert_eq!(types.is_final("java.lang.Object"), Some(true));
    }

    #[test]
    fn test_empty_providers() {
        assert!(PlatformTypes::empty().is_empty());
        assert_eq!(PlatformTypes::empty().is_final("java.lang.String"), None);
        assert_eq!(NoTypeMetadata.is_final("java.lang.String"), None);
    }
}
