//! Symbolic execution state and the invoke dispatcher.
//!
//! This module holds everything a forward pass over one method needs to track registers
//! across invoke instructions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   invoke   ┌──────────────────┐
//! │ ExecutionContext │ ─────────▶ │ InvokeDispatcher │
//! │   (caller)       │ ◀───────── │                  │
//! └──────────────────┘  effects   └────────┬─────────┘
//!                                          │
//!            ┌───────────────┬─────────────┼────────────────┐
//!            ▼               ▼             ▼                ▼
//!     callee context   MethodEmulator  ClassCatalog  MutabilityOracle
//! ```
//!
//! # Key Components
//!
//! - [`ExecutionContext`] - Register file indexed by register and program point
//! - [`RegisterStore`] / [`Value`] - Typed register contents, possibly unknown
//! - [`InvokeDispatcher`] - Applies invoke instructions to a caller context
//! - [`MethodActivation`] - Unit of work for [`InvokeDispatcher::dispatch_batch`]
//! - [`ExecutionConfig`] - Call budget and diagnostic settings
//! - [`EventLog`] - Structured diagnostics
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use dexsimplify::catalog::ClassCatalog;
//! use dexsimplify::dalvik::{InvokeInstruction, MethodReference, Opcode};
//! use dexsimplify::emulate::EmulationRegistry;
//! use dexsimplify::exec::{Disposition, ExecutionConfig, ExecutionContext, InvokeDispatcher, Value};
//!
//! let config = ExecutionConfig::default();
//! let dispatcher = InvokeDispatcher::new(
//!     Arc::new(ClassCatalog::empty()),
//!     Arc::new(EmulationRegistry::new()),
//! )
//! .with_config(config.clone());
//!
//! let mut caller = ExecutionContext::for_method(2, 0, &config);
//! caller.add_register(0, "[I", Value::Null, 1)?;
//!
//! let sort = MethodReference::parse("Ljava/util/Arrays;->sort([I)V")?;
//! let instruction = InvokeInstruction::compact(Opcode::InvokeStatic, &[0], sort)?;
//! let outcome = dispatcher.dispatch(&mut caller, &instruction, 2)?;
//!
//! // Arrays are mutable, so the argument is no longer known after the call
//! assert_eq!(outcome.disposition, Disposition::Opaque);
//! assert!(caller.register_value(0, 2).is_unknown());
//! assert_eq!(caller.register_value(0, 1), Value::Null);
//! # Ok::<(), dexsimplify::Error>(())
//! ```

mod batch;
mod config;
mod context;
mod events;
mod invoke;
mod store;
mod value;

pub use batch::{CallSite, MethodActivation};
pub use config::ExecutionConfig;
pub use context::{ExecutionContext, ENTRY_POINT};
pub use events::{Event, EventKind, EventLevel, EventLog};
pub use invoke::{build_callee_context, DispatchOutcome, Disposition, InvokeDispatcher};
pub use store::{RegisterStore, RegisterStoreRc};
pub use value::{UnknownOrigin, UnknownValue, Value};
