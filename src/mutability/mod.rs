//! Immutability decisions for call parameters.
//!
//! When a call cannot be computed exactly, every reference it receives may have been mutated
//! through. The [`MutabilityOracle`] decides which argument types make that impossible, so
//! the caller can keep those registers' values.
//!
//! # Resolution Order
//!
//! First match wins:
//!
//! 1. Primitive descriptor (`Z B S C I J F D`) - immutable
//! 2. Class in the catalog - immutable iff declared `final`
//! 3. Class known to the [`TypeMetadataProvider`] - immutable iff declared `final`
//! 4. Anything else (arrays, unresolved types, unknown classes) - mutable
//!
//! Failing to resolve a type never fails the pass; it only makes the answer conservative.

mod metadata;

pub use metadata::{NoTypeMetadata, PlatformTypes, TypeMetadataProvider};

use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    catalog::ClassCatalog,
    dalvik::types::{is_primitive, qualified_name},
};

/// Which rule decided a [`Verdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictSource {
    /// Primitive descriptor.
    Primitive,
    /// Class definition in the catalog.
    Catalog,
    /// Type metadata provider.
    Platform,
    /// Nothing could resolve the type.
    Unresolved,
}

/// Answer of the [`MutabilityOracle`] for one type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Verdict {
    /// Values of this type cannot be changed through a reference.
    pub immutable: bool,
    /// The rule that produced the answer.
    pub source: VerdictSource,
}

impl Verdict {
    const fn new(immutable: bool, source: VerdictSource) -> Self {
        Verdict { immutable, source }
    }
}

/// Decides whether values of a type are immutable.
///
/// The oracle is `Sync`; its memo cache is a concurrent map so one oracle can serve
/// several methods analysed in parallel.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dexsimplify::catalog::{AccessFlags, ClassCatalog, ClassDef};
/// use dexsimplify::mutability::{MutabilityOracle, PlatformTypes};
///
/// let catalog = Arc::new(ClassCatalog::new(vec![
///     ClassDef::new("Lcom/example/Token;", AccessFlags::FINAL),
///     ClassDef::new("Lcom/example/Buffer;", AccessFlags::PUBLIC),
/// ]));
/// let oracle = MutabilityOracle::new(catalog, Arc::new(PlatformTypes::new()));
///
/// assert!(oracle.is_immutable("I"));
/// assert!(oracle.is_immutable("Lcom/example/Token;"));
/// assert!(!oracle.is_immutable("Lcom/example/Buffer;"));
/// assert!(oracle.is_immutable("Ljava/lang/String;"));
/// assert!(!oracle.is_immutable("[I"));
/// ```
pub struct MutabilityOracle {
    catalog: Arc<ClassCatalog>,
    metadata: Arc<dyn TypeMetadataProvider>,
    cache: Option<DashMap<String, Verdict>>,
}

impl MutabilityOracle {
    /// Creates an oracle with memoization enabled.
    #[must_use]
    pub fn new(catalog: Arc<ClassCatalog>, metadata: Arc<dyn TypeMetadataProvider>) -> Self {
        MutabilityOracle {
            catalog,
            metadata,
            cache: Some(DashMap::new()),
        }
    }

    /// Enables or disables memoization.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(DashMap::new);
        self
    }

    /// Returns `true` if values of `descriptor` are provably immutable.
    #[must_use]
    pub fn is_immutable(&self, descriptor: &str) -> bool {
        self.verdict(descriptor).immutable
    }

    /// Resolves `descriptor`, reporting which rule decided.
    #[must_use]
    pub fn verdict(&self, descriptor: &str) -> Verdict {
        if is_primitive(descriptor) {
            return Verdict::new(true, VerdictSource::Primitive);
        }

        let Some(cache) = &self.cache else {
            return self.resolve(descriptor);
        };

        if let Some(verdict) = cache.get(descriptor) {
            return *verdict;
        }

        let verdict = self.resolve(descriptor);
        cache.insert(descriptor.to_string(), verdict);
        verdict
    }

    /// Number of memoized descriptors.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }

    fn resolve(&self, descriptor: &str) -> Verdict {
        if let Some(class) = self.catalog.class(descriptor) {
            return Verdict::new(class.is_final(), VerdictSource::Catalog);
        }

        qualified_name(descriptor)
            .and_then(|name| self.metadata.is_final(&name))
            .map_or(Verdict::new(false, VerdictSource::Unresolved), |is_final| {
                Verdict::new(is_final, VerdictSource::Platform)
            })
    }
}

impl std::fmt::Debug for MutabilityOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutabilityOracle")
            .field("classes", &self.catalog.len())
            .field("cached", &self.cached())
            .finish()
    }
}
