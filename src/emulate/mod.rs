//! Exact computation of calls to known pure methods.
//!
//! The dispatcher consults a [`MethodEmulator`] by method descriptor before anything else.
//! When the emulator recognises the descriptor, the call's return value is computed from the
//! callee context without executing any bytecode, and no other caller register is touched.
//!
//! # Key Components
//!
//! - [`MethodEmulator`] - The oracle interface (`can_emulate` / `emulate`)
//! - [`EmulationRegistry`] - Closure handlers keyed by descriptor
//! - [`EmulationCall`] - Argument access for handlers
//!
//! # Examples
//!
//! ```rust
//! use dexsimplify::emulate::{EmulationRegistry, MethodEmulator};
//!
//! let registry = EmulationRegistry::with_builtins();
//! assert!(registry.can_emulate("Ljava/lang/Math;->abs(I)I"));
//! ```

mod builtins;
mod registry;

pub use registry::{EmulationCall, EmulationFn, EmulationRegistry, MethodEmulator};
