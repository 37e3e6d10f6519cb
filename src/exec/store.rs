//! Immutable register snapshots.

use std::sync::Arc;

use crate::{
    dalvik::types::UNRESOLVED_TYPE,
    exec::value::{UnknownValue, Value},
};

/// Snapshot of one register: its type descriptor and its value.
///
/// A store is never modified after creation. Writing a register creates a new store that
/// supersedes the previous one from a given program point onward, so stores are shared
/// freely between contexts behind an [`Arc`].
///
/// # Examples
///
/// ```rust
/// use dexsimplify::exec::{RegisterStore, Value};
///
/// let store = RegisterStore::new("I", Value::Int(7));
/// assert_eq!(store.ty(), "I");
/// assert_eq!(store.value(), &Value::Int(7));
/// assert!(!store.is_unknown());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterStore {
    ty: String,
    value: Value,
}

/// Shared handle to a register store.
pub type RegisterStoreRc = Arc<RegisterStore>;

impl RegisterStore {
    /// Creates a store holding `value` with the type descriptor `ty`.
    #[must_use]
    pub fn new(ty: impl Into<String>, value: Value) -> Self {
        RegisterStore {
            ty: ty.into(),
            value,
        }
    }

    /// Creates a store holding an unknown value of type `ty`.
    #[must_use]
    pub fn unknown(ty: impl Into<String>, unknown: UnknownValue) -> Self {
        Self::new(ty, Value::Unknown(unknown))
    }

    /// Unknown value with the unresolved type marker, as produced by opaque calls.
    #[must_use]
    pub fn unresolved(unknown: UnknownValue) -> Self {
        Self::unknown(UNRESOLVED_TYPE, unknown)
    }

    /// The type descriptor. Always set.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The value, possibly [`Value::Unknown`].
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns `true` if the value is not statically known.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.value.is_unknown()
    }
}
