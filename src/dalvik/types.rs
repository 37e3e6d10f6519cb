//! Type descriptor helpers.
//!
//! Dalvik names types with compact descriptor strings:
//!
//! | Descriptor | Meaning |
//! |------------|---------|
//! | `V` | void (return types only) |
//! | `Z` `B` `S` `C` `I` `F` | 32-bit primitives |
//! | `J` `D` | 64-bit primitives, occupying two registers |
//! | `Lpkg/Name;` | class or interface |
//! | `[T` | array of `T` |
//!
//! The helpers in this module are purely lexical; they never consult a class catalog.

use crate::{Error, Result};

/// Descriptor of the `void` return type.
pub const VOID: &str = "V";

/// Placeholder type given to registers whose type could not be resolved.
pub const UNRESOLVED_TYPE: &str = "?";

const PRIMITIVES: &[u8] = b"ZBSCIJFD";

/// Returns `true` if `descriptor` names a primitive value type.
///
/// `V` is not a value type and the [`UNRESOLVED_TYPE`] marker is not a primitive either,
/// even though both are single characters.
#[must_use]
pub fn is_primitive(descriptor: &str) -> bool {
    descriptor.len() == 1 && PRIMITIVES.contains(&descriptor.as_bytes()[0])
}

/// Returns `true` for `J` (long) and `D` (double).
#[must_use]
pub fn is_wide(descriptor: &str) -> bool {
    matches!(descriptor, "J" | "D")
}

/// Returns `true` if `descriptor` is an array type.
#[must_use]
pub fn is_array(descriptor: &str) -> bool {
    descriptor.starts_with('[')
}

/// Returns `true` if `descriptor` is a class or interface type.
#[must_use]
pub fn is_class(descriptor: &str) -> bool {
    descriptor.len() > 2 && descriptor.starts_with('L') && descriptor.ends_with(';')
}

/// Returns `true` for the `void` descriptor.
#[must_use]
pub fn is_void(descriptor: &str) -> bool {
    descriptor == VOID
}

/// Number of registers a value of this type occupies.
#[must_use]
pub fn register_width(descriptor: &str) -> u16 {
    if is_wide(descriptor) {
        2
    } else {
        1
    }
}

/// Converts a class descriptor into its fully-qualified dotted name.
///
/// `Ljava/lang/String;` becomes `java.lang.String`. Primitives and arrays have no
/// qualified class name and yield `None`.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::dalvik::types::qualified_name;
///
/// assert_eq!(qualified_name("Ljava/lang/String;").as_deref(), Some("java.lang.String"));
/// assert_eq!(qualified_name("I"), None);
/// ```
#[must_use]
pub fn qualified_name(descriptor: &str) -> Option<String> {
    if !is_class(descriptor) {
        return None;
    }

    Some(descriptor[1..descriptor.len() - 1].replace('/', "."))
}

/// Splits a concatenated list of parameter descriptors.
///
/// This is the format found between the parentheses of a method descriptor,
/// e.g. `ILjava/lang/String;[J` yields `["I", "Ljava/lang/String;", "[J"]`.
///
/// # Errors
///
/// Returns [`Error::InvalidDescriptor`] if the list contains an unknown type code,
/// an unterminated class name or a dangling array prefix.
pub fn split_type_list(list: &str) -> Result<Vec<String>> {
    let bytes = list.as_bytes();
    let mut types = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        while pos < bytes.len() && bytes[pos] == b'[' {
            pos += 1;
        }

        match bytes.get(pos) {
            Some(b'L') => {
                let end = list[pos..]
                    .find(';')
                    .ok_or_else(|| Error::InvalidDescriptor(list.to_string()))?;
                pos += end + 1;
            }
            Some(code) if PRIMITIVES.contains(code) => pos += 1,
            _ => return Err(Error::InvalidDescriptor(list.to_string())),
        }

        types.push(list[start..pos].to_string());
    }

    Ok(types)
}

/// Validates a single type descriptor, allowing `V` when `allow_void` is set.
pub(crate) fn validate(descriptor: &str, allow_void: bool) -> Result<()> {
    if allow_void && is_void(descriptor) {
        return Ok(());
    }

    match split_type_list(descriptor)?.len() {
        1 => Ok(()),
        _ => Err(Error::InvalidDescriptor(descriptor.to_string())),
    }
}
