//! Dalvik bytecode model for invoke instructions.
//!
//! This module provides the parts of the Dalvik instruction set the symbolic pass needs to
//! reason about method calls. Decoding of the surrounding container format is assumed to have
//! happened already; instructions are constructed from their already-decoded fields.
//!
//! # Key Components
//!
//! - [`Opcode`] / [`InvokeKind`] - The ten invoke opcodes and their dispatch flavour
//! - [`InvokeInstruction`] - An invoke with its operand encoding and target method
//! - [`Format35c`] / [`Format3rc`] - Compact and range operand encodings
//! - [`invoke_registers`] - Argument register decoding for both encodings
//! - [`MethodReference`] - Owner, name, parameter and return types of a call target
//! - [`types`] - Lexical helpers for type descriptors
//!
//! # Examples
//!
//! ```rust
//! use dexsimplify::dalvik::{InvokeInstruction, MethodReference, Opcode};
//!
//! let method = MethodReference::parse("Lcom/example/Util;->mix(IJ)I")?;
//! let invoke = InvokeInstruction::range(Opcode::InvokeStaticRange, 4, 3, method)?;
//! assert_eq!(invoke.registers(), vec![4, 5, 6]);
//! # Ok::<(), dexsimplify::Error>(())
//! ```

mod instruction;
mod opcode;
mod reference;
pub mod types;

pub use instruction::{
    invoke_registers, Format35c, Format3rc, InvokeInstruction, InvokeOperands, COMPACT_SLOTS,
};
pub use opcode::{InvokeKind, Opcode};
pub use reference::MethodReference;
