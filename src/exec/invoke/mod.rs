//! Invoke instruction handling.
//!
//! An invoke is never stepped into. Instead the [`InvokeDispatcher`] builds the context the
//! callee would start with, decides whether the call can be computed exactly, and otherwise
//! approximates its effect on the caller conservatively.
//!
//! # Dispositions
//!
//! 1. **Emulated** - the [`crate::emulate::MethodEmulator`] knows the method; its return
//!    store becomes the caller's result and nothing else changes.
//! 2. **Deferred-known** - the method is declared in the [`crate::catalog::ClassCatalog`]
//!    but is not executed; a warning is recorded and the opaque effect applies.
//! 3. **Opaque** - anything else. The result becomes unknown and every argument register
//!    whose type the [`crate::mutability::MutabilityOracle`] cannot prove immutable becomes
//!    unknown at the call's program point.
//!
//! Both approximations assume the callee may have written through any mutable reference
//! it received.
//!
//! # Call Budget
//!
//! Callee contexts get one less call budget than their caller. A call made from a context
//! whose budget is already zero is handled as opaque, and its callee context is built with
//! a budget of zero.

mod callee;
mod dispatcher;


pub use callee::build_callee_context;
pub use dispatcher::{DispatchOutcome, Disposition, InvokeDispatcher};
