//! Register values tracked by the symbolic pass.

use std::fmt;

/// Why a value is not statically known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnknownOrigin {
    /// The register was never assigned by the analysed code, e.g. a method parameter
    /// at the entry of the analysed method.
    Unanalyzed,
    /// Returned by a call whose effect could not be computed.
    OpaqueResult,
    /// Passed to a call that may have mutated it; the prior value was discarded.
    Invalidated,
}

/// Marker for a value that exists at runtime but is not statically known.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::exec::{UnknownOrigin, UnknownValue};
///
/// let unknown = UnknownValue::invalidated();
/// assert_eq!(unknown.origin(), UnknownOrigin::Invalidated);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownValue {
    origin: UnknownOrigin,
}

impl UnknownValue {
    /// Creates an unknown value with the given origin.
    #[must_use]
    pub const fn new(origin: UnknownOrigin) -> Self {
        UnknownValue { origin }
    }

    /// A value that was never analysed.
    #[must_use]
    pub const fn unanalyzed() -> Self {
        Self::new(UnknownOrigin::Unanalyzed)
    }

    /// The result of an opaque call.
    #[must_use]
    pub const fn opaque_result() -> Self {
        Self::new(UnknownOrigin::OpaqueResult)
    }

    /// A value discarded because a call may have mutated it.
    #[must_use]
    pub const fn invalidated() -> Self {
        Self::new(UnknownOrigin::Invalidated)
    }

    /// Why this value is unknown.
    #[must_use]
    pub const fn origin(&self) -> UnknownOrigin {
        self.origin
    }
}

/// A register value: either a concrete constant or [`Value::Unknown`].
///
/// Object references other than strings and `null` are never concrete in this model; they
/// are carried as [`Value::Unknown`] alongside their declared type in the register store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `Z`
    Boolean(bool),
    /// `B`
    Byte(i8),
    /// `S`
    Short(i16),
    /// `C`
    Char(u16),
    /// `I`
    Int(i32),
    /// `J`
    Long(i64),
    /// `F`
    Float(f32),
    /// `D`
    Double(f64),
    /// `Ljava/lang/String;` constant
    String(String),
    /// The `null` reference.
    Null,
    /// Not statically known.
    Unknown(UnknownValue),
}

impl Value {
    /// Returns `true` if the value is not statically known.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown(_))
    }

    /// Returns `true` if the value is statically known.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !self.is_unknown()
    }

    /// The unknown marker, if this value is unknown.
    #[must_use]
    pub fn as_unknown(&self) -> Option<UnknownValue> {
        match self {
            Value::Unknown(unknown) => Some(*unknown),
            _ => None,
        }
    }

    /// Interprets the value as a 32-bit integer, widening narrower integral values.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Short(v) => Some(i32::from(*v)),
            Value::Byte(v) => Some(i32::from(*v)),
            Value::Char(v) => Some(i32::from(*v)),
            Value::Boolean(v) => Some(i32::from(*v)),
            _ => None,
        }
    }

    /// Interprets the value as a string constant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<UnknownValue> for Value {
    fn from(value: UnknownValue) -> Self {
        Value::Unknown(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'\\u{v:04x}'"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}L"),
            Value::Float(v) => write!(f, "{v}f"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Null => f.write_str("null"),
            Value::Unknown(_) => f.write_str("<unknown>"),
        }
    }
}
