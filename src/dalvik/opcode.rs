//! Invoke opcodes and their addressing modes.

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// The dispatch flavour of an invoke instruction.
///
/// Only [`InvokeKind::Static`] lacks an instance register; every other kind passes
/// the receiver as the first argument register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokeKind {
    /// Virtual dispatch on the receiver's runtime class.
    Virtual,
    /// Call to the superclass implementation.
    Super,
    /// Non-virtual call (constructors, private methods).
    Direct,
    /// Call without a receiver.
    Static,
    /// Interface dispatch on the receiver.
    Interface,
}

/// The ten Dalvik method invocation opcodes.
///
/// Each kind exists in two arity classes: the compact form (format `35c`), which names up to
/// five argument registers individually, and the `/range` form (format `3rc`), which names a
/// contiguous span of registers.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::dalvik::{InvokeKind, Opcode};
///
/// let op = Opcode::from_byte(0x77).unwrap();
/// assert_eq!(op, Opcode::InvokeStaticRange);
/// assert_eq!(op.name(), "invoke-static/range");
/// assert!(op.is_range());
/// assert_eq!(op.kind(), InvokeKind::Static);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr,
)]
pub enum Opcode {
    /// `invoke-virtual` (0x6e)
    #[strum(serialize = "invoke-virtual")]
    InvokeVirtual,
    /// `invoke-super` (0x6f)
    #[strum(serialize = "invoke-super")]
    InvokeSuper,
    /// `invoke-direct` (0x70)
    #[strum(serialize = "invoke-direct")]
    InvokeDirect,
    /// `invoke-static` (0x71)
    #[strum(serialize = "invoke-static")]
    InvokeStatic,
    /// `invoke-interface` (0x72)
    #[strum(serialize = "invoke-interface")]
    InvokeInterface,
    /// `invoke-virtual/range` (0x74)
    #[strum(serialize = "invoke-virtual/range")]
    InvokeVirtualRange,
    /// `invoke-super/range` (0x75)
    #[strum(serialize = "invoke-super/range")]
    InvokeSuperRange,
    /// `invoke-direct/range` (0x76)
    #[strum(serialize = "invoke-direct/range")]
    InvokeDirectRange,
    /// `invoke-static/range` (0x77)
    #[strum(serialize = "invoke-static/range")]
    InvokeStaticRange,
    /// `invoke-interface/range` (0x78)
    #[strum(serialize = "invoke-interface/range")]
    InvokeInterfaceRange,
}

impl Opcode {
    /// Decodes a raw opcode byte, returning `None` for anything that is not an invoke.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x6e => Opcode::InvokeVirtual,
            0x6f => Opcode::InvokeSuper,
            0x70 => Opcode::InvokeDirect,
            0x71 => Opcode::InvokeStatic,
            0x72 => Opcode::InvokeInterface,
            0x74 => Opcode::InvokeVirtualRange,
            0x75 => Opcode::InvokeSuperRange,
            0x76 => Opcode::InvokeDirectRange,
            0x77 => Opcode::InvokeStaticRange,
            0x78 => Opcode::InvokeInterfaceRange,
            _ => return None,
        })
    }

    /// The raw opcode byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        match self {
            Opcode::InvokeVirtual => 0x6e,
            Opcode::InvokeSuper => 0x6f,
            Opcode::InvokeDirect => 0x70,
            Opcode::InvokeStatic => 0x71,
            Opcode::InvokeInterface => 0x72,
            Opcode::InvokeVirtualRange => 0x74,
            Opcode::InvokeSuperRange => 0x75,
            Opcode::InvokeDirectRange => 0x76,
            Opcode::InvokeStaticRange => 0x77,
            Opcode::InvokeInterfaceRange => 0x78,
        }
    }

    /// The smali mnemonic, e.g. `invoke-virtual/range`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns `true` for the contiguous-register `/range` forms.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(
            self,
            Opcode::InvokeVirtualRange
                | Opcode::InvokeSuperRange
                | Opcode::InvokeDirectRange
                | Opcode::InvokeStaticRange
                | Opcode::InvokeInterfaceRange
        )
    }

    /// Returns `true` if the call has no instance register.
    #[must_use]
    pub const fn is_static(self) -> bool {
        matches!(self, Opcode::InvokeStatic | Opcode::InvokeStaticRange)
    }

    /// The dispatch flavour, independent of the addressing mode.
    #[must_use]
    pub const fn kind(self) -> InvokeKind {
        match self {
            Opcode::InvokeVirtual | Opcode::InvokeVirtualRange => InvokeKind::Virtual,
            Opcode::InvokeSuper | Opcode::InvokeSuperRange => InvokeKind::Super,
            Opcode::InvokeDirect | Opcode::InvokeDirectRange => InvokeKind::Direct,
            Opcode::InvokeStatic | Opcode::InvokeStaticRange => InvokeKind::Static,
            Opcode::InvokeInterface | Opcode::InvokeInterfaceRange => InvokeKind::Interface,
        }
    }
}
