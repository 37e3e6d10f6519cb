//! # dexsimplify Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dexsimplify library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dexsimplify operations
pub use crate::Error;

/// The result type used throughout dexsimplify
pub use crate::Result;

// ================================================================================================
// Instructions and Descriptors
// ================================================================================================

pub use crate::dalvik::{
    invoke_registers, Format35c, Format3rc, InvokeInstruction, InvokeKind, InvokeOperands,
    MethodReference, Opcode,
};

// ================================================================================================
// Class Catalog
// ================================================================================================

pub use crate::catalog::{AccessFlags, ClassCatalog, ClassDef, MethodDef};

// ================================================================================================
// Execution
// ================================================================================================

pub use crate::exec::{
    CallSite, DispatchOutcome, Disposition, EventKind, EventLevel, EventLog, ExecutionConfig,
    ExecutionContext, InvokeDispatcher, MethodActivation, RegisterStore, UnknownValue, Value,
    ENTRY_POINT,
};

// ================================================================================================
// Emulation and Mutability
// ================================================================================================

pub use crate::emulate::{EmulationCall, EmulationRegistry, MethodEmulator};

pub use crate::mutability::{MutabilityOracle, NoTypeMetadata, PlatformTypes, TypeMetadataProvider};
