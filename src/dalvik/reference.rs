//! Method references and their descriptor strings.

use std::fmt;

use crate::{
    dalvik::types::{self, register_width},
    Error, Result,
};

/// A reference to a method as it appears in an invoke instruction.
///
/// A method is identified by its owner type, its name, its ordered parameter types and its
/// return type. The canonical string form ([`MethodReference::descriptor`]) is what the
/// emulation registry and the class catalog are keyed by:
///
/// ```text
/// Lcom/example/Foo;->bar(ILjava/lang/String;)V
/// ```
///
/// # Examples
///
/// ```rust
/// use dexsimplify::dalvik::MethodReference;
///
/// let method = MethodReference::new("Ljava/lang/Math;", "max", ["I", "I"], "I");
/// assert_eq!(method.descriptor(), "Ljava/lang/Math;->max(II)I");
///
/// let parsed = MethodReference::parse("Ljava/lang/Math;->max(II)I")?;
/// assert_eq!(parsed, method);
/// # Ok::<(), dexsimplify::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodReference {
    owner: String,
    name: String,
    parameter_types: Vec<String>,
    return_type: String,
}

impl MethodReference {
    /// Creates a new method reference from its components.
    ///
    /// No validation is performed; use [`MethodReference::parse`] for untrusted input.
    pub fn new<I, S>(
        owner: impl Into<String>,
        name: impl Into<String>,
        parameter_types: I,
        return_type: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MethodReference {
            owner: owner.into(),
            name: name.into(),
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
            return_type: return_type.into(),
        }
    }

    /// Parses a full method descriptor of the form `Lowner;->name(params)ret`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if the text does not follow the descriptor grammar.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let invalid = || Error::InvalidDescriptor(descriptor.to_string());

        let (owner, rest) = descriptor.split_once("->").ok_or_else(invalid)?;
        let (name, signature) = rest.split_once('(').ok_or_else(invalid)?;
        let (params, return_type) = signature.split_once(')').ok_or_else(invalid)?;

        if name.is_empty() || !(types::is_class(owner) || types::is_array(owner)) {
            return Err(invalid());
        }
        types::validate(owner, false).map_err(|_| invalid())?;
        types::validate(return_type, true).map_err(|_| invalid())?;
        let parameter_types = types::split_type_list(params).map_err(|_| invalid())?;

        Ok(MethodReference {
            owner: owner.to_string(),
            name: name.to_string(),
            parameter_types,
            return_type: return_type.to_string(),
        })
    }

    /// The declaring type descriptor.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameter type descriptors, excluding the instance.
    #[must_use]
    pub fn parameter_types(&self) -> &[String] {
        &self.parameter_types
    }

    /// The declared return type descriptor.
    #[must_use]
    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    /// Returns `true` if the method returns `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        types::is_void(&self.return_type)
    }

    /// Number of registers the declared parameters occupy, excluding the instance.
    ///
    /// Wide parameters (`J`, `D`) count twice.
    #[must_use]
    pub fn parameter_register_count(&self) -> usize {
        self.parameter_types
            .iter()
            .map(|ty| usize::from(register_width(ty)))
            .sum()
    }

    /// The canonical descriptor string, `Lowner;->name(params)ret`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MethodReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}(", self.owner, self.name)?;
        for ty in &self.parameter_types {
            f.write_str(ty)?;
        }
        write!(f, "){}", self.return_type)
    }
}
