//! The set of classes and methods under analysis.
//!
//! The catalog is supplied by the container reader and is read-only for the duration of a
//! pass. It is closed-world only for the classes it contains: types outside of it fall back
//! to platform type metadata (see [`crate::mutability`]).
//!
//! Lookups by type and by method descriptor happen for every call site, so both are indexed
//! once at construction instead of scanning the class list.
//!
//! # Examples
//!
//! ```rust
//! use dexsimplify::catalog::{AccessFlags, ClassCatalog, ClassDef, MethodDef};
//! use dexsimplify::dalvik::MethodReference;
//!
//! let helper = MethodReference::parse("Lcom/example/Helper;->decode(Ljava/lang/String;)Ljava/lang/String;")?;
//! let catalog = ClassCatalog::new(vec![
//!     ClassDef::new("Lcom/example/Helper;", AccessFlags::PUBLIC)
//!         .with_method(MethodDef::new(helper.clone(), AccessFlags::STATIC)),
//! ]);
//!
//! assert!(catalog.contains_method(&helper.descriptor()));
//! assert!(!catalog.class("Lcom/example/Helper;").unwrap().is_final());
//! # Ok::<(), dexsimplify::Error>(())
//! ```

mod class;

pub use class::{AccessFlags, ClassDef, MethodDef};

use rustc_hash::FxHashMap;

/// Indexed, ordered collection of the classes under analysis.
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: Vec<ClassDef>,
    /// Class descriptor -> index into `classes`
    by_type: FxHashMap<String, usize>,
    /// Method descriptor -> (class index, method index)
    by_method: FxHashMap<String, (usize, usize)>,
}

impl ClassCatalog {
    /// Builds a catalog from class definitions, preserving their order.
    ///
    /// When a descriptor occurs more than once, the first definition wins, matching what a
    /// front-to-back scan of the class list would find.
    #[must_use]
    pub fn new(classes: Vec<ClassDef>) -> Self {
        let mut by_type = FxHashMap::default();
        let mut by_method = FxHashMap::default();

        for (class_index, class) in classes.iter().enumerate() {
            by_type.entry(class.descriptor.clone()).or_insert(class_index);
            for (method_index, method) in class.methods.iter().enumerate() {
                by_method
                    .entry(method.descriptor())
                    .or_insert((class_index, method_index));
            }
        }

        ClassCatalog {
            classes,
            by_type,
            by_method,
        }
    }

    /// An empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a class by its type descriptor.
    #[must_use]
    pub fn class(&self, descriptor: &str) -> Option<&ClassDef> {
        self.by_type
            .get(descriptor)
            .map(|index| &self.classes[*index])
    }

    /// Looks up a declared method by its full descriptor.
    #[must_use]
    pub fn method(&self, descriptor: &str) -> Option<&MethodDef> {
        self.by_method
            .get(descriptor)
            .map(|(class, method)| &self.classes[*class].methods[*method])
    }

    /// Returns `true` if a method with this exact descriptor is declared in the catalog.
    #[must_use]
    pub fn contains_method(&self, descriptor: &str) -> bool {
        self.by_method.contains_key(descriptor)
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the catalog has no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates over the classes in their original order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.iter()
    }
}

impl FromIterator<ClassDef> for ClassCatalog {
    fn from_iter<T: IntoIterator<Item = ClassDef>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
