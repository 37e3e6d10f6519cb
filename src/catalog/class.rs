//! Class and method definitions as exposed by the catalog provider.

use bitflags::bitflags;

use crate::dalvik::MethodReference;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Access flags shared by class and method definitions
    pub struct AccessFlags: u32 {
        /// Visible everywhere
        const PUBLIC = 0x0001;
        /// Only visible to the defining class
        const PRIVATE = 0x0002;
        /// Visible to the package and subclasses
        const PROTECTED = 0x0004;
        /// Not constructed with a `this` reference
        const STATIC = 0x0008;
        /// Not subclassable (classes) or not overridable (methods)
        const FINAL = 0x0010;
        /// Associated lock automatically acquired around calls
        const SYNCHRONIZED = 0x0020;
        /// Compiler-generated bridge method
        const BRIDGE = 0x0040;
        /// Last argument treated as a rest argument
        const VARARGS = 0x0080;
        /// Implemented in native code
        const NATIVE = 0x0100;
        /// Multiply-implementable abstract class
        const INTERFACE = 0x0200;
        /// Not directly instantiable / unimplemented
        const ABSTRACT = 0x0400;
        /// Strict floating point rules
        const STRICT = 0x0800;
        /// Not directly defined in source
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation class
        const ANNOTATION = 0x2000;
        /// Declared as an enumerated type
        const ENUM = 0x4000;
        /// Constructor method
        const CONSTRUCTOR = 0x0001_0000;
        /// Declared `synchronized`
        const DECLARED_SYNCHRONIZED = 0x0002_0000;
    }
}

/// A method declared by a class in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    /// The method's identity. Its owner is the declaring class.
    pub reference: MethodReference,
    /// Method access flags.
    pub access_flags: AccessFlags,
}

impl MethodDef {
    /// Creates a new method definition.
    #[must_use]
    pub fn new(reference: MethodReference, access_flags: AccessFlags) -> Self {
        MethodDef {
            reference,
            access_flags,
        }
    }

    /// The full descriptor used for exact-match lookups.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.reference.descriptor()
    }

    /// Returns `true` if the method is static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(AccessFlags::STATIC)
    }
}

/// A class definition under analysis.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::catalog::{AccessFlags, ClassDef};
///
/// let class = ClassDef::new("Lcom/example/Key;", AccessFlags::PUBLIC | AccessFlags::FINAL);
/// assert!(class.is_final());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Type descriptor of the class, e.g. `Lcom/example/Foo;`.
    pub descriptor: String,
    /// Class access flags.
    pub access_flags: AccessFlags,
    /// Declared methods, in definition order.
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Creates a class definition without methods.
    #[must_use]
    pub fn new(descriptor: impl Into<String>, access_flags: AccessFlags) -> Self {
        ClassDef {
            descriptor: descriptor.into(),
            access_flags,
            methods: Vec::new(),
        }
    }

    /// Adds a declared method, builder style.
    #[must_use]
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Returns `true` if the class cannot be subclassed.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.access_flags.contains(AccessFlags::FINAL)
    }
}
