// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dexsimplify
//!
//! Symbolic handling of Dalvik method invocations for bytecode simplification passes.
//!
//! A forward pass over a method tracks what every register holds at every program point.
//! Invoke instructions are where that tracking gets hard: the callee may compute a value
//! the pass could know exactly, or it may scribble over every object it receives. This
//! crate decides, per call site, which of the two applies and updates the caller's
//! register file accordingly.
//!
//! ## Features
//!
//! - **Both addressing modes** - Compact (`35c`) and range (`3rc`) invoke operands,
//!   including wide `long`/`double` arguments
//! - **Exact pure calls** - Registered emulation handlers compute return values
//! - **Sound approximation** - Arguments of mutable types are invalidated after calls
//!   the pass cannot compute, immutable ones keep their values
//! - **Parallel batches** - One dispatcher serves many methods across threads
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use dexsimplify::prelude::*;
//!
//! let catalog = Arc::new(ClassCatalog::new(vec![
//!     ClassDef::new("Lcom/example/Box;", AccessFlags::PUBLIC),
//! ]));
//! let dispatcher = InvokeDispatcher::new(catalog, Arc::new(EmulationRegistry::with_builtins()));
//!
//! // v0 = 42, v1 = some Box
//! let mut caller = ExecutionContext::new(2, 0, 16);
//! caller.add_register(0, "I", Value::Int(42), 1)?;
//! caller.add_register(1, "Lcom/example/Box;", Value::Null, 2)?;
//!
//! let fill = MethodReference::parse("Lcom/other/Filler;->fill(ILcom/example/Box;)V")?;
//! let instruction = InvokeInstruction::compact(Opcode::InvokeStatic, &[0, 1], fill)?;
//! let outcome = dispatcher.dispatch(&mut caller, &instruction, 3)?;
//!
//! assert_eq!(outcome.disposition, Disposition::Opaque);
//! assert_eq!(caller.register_value(0, 3), Value::Int(42));
//! assert!(caller.register_value(1, 3).is_unknown());
//! # Ok::<(), dexsimplify::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`dalvik`] - Invoke opcodes, operand formats, descriptors and method references
//! - [`catalog`] - Class definitions of the code under analysis
//! - [`exec`] - Register files, values and the [`exec::InvokeDispatcher`]
//! - [`emulate`] - Exact computation of known pure methods
//! - [`mutability`] - Immutability decisions for argument types
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Errors only surface for structurally invalid input. Anything the analysis cannot
//! decide precisely is approximated instead; see [`Error`] for the categories.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dexsimplify::prelude::*;
///
/// let method = MethodReference::parse("Ljava/lang/Math;->abs(I)I")?;
/// assert_eq!(method.parameter_register_count(), 1);
/// # Ok::<(), dexsimplify::Error>(())
/// ```
pub mod prelude;

/// Dalvik invoke instructions, type descriptors and method references.
pub mod dalvik;

/// Class definitions of the code under analysis, indexed by descriptor.
pub mod catalog;

/// Execution contexts, values and the invoke dispatcher.
pub mod exec;

/// Exact computation of calls to known pure methods.
pub mod emulate;

/// Immutability decisions for argument types.
pub mod mutability;

/// `dexsimplify` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use dexsimplify::{dalvik::MethodReference, Result};
///
/// fn arity(descriptor: &str) -> Result<usize> {
///     Ok(MethodReference::parse(descriptor)?.parameter_register_count())
/// }
///
/// assert_eq!(arity("La;->f(JI)V").unwrap(), 3);
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dexsimplify` Error type
///
/// # Examples
///
/// ```rust
/// use dexsimplify::{dalvik::{Format35c}, Error};
///
/// match Format35c::new(6, [0; 5]) {
///     Ok(_) => println!("decoded"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;
