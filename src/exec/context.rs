//! Per-activation register file.
//!
//! The [`ExecutionContext`] holds every register store written during the symbolic
//! execution of one method activation, indexed by register and program point.
//!
//! # Register Layout
//!
//! ```text
//! v0 .. v(start-1)           locals
//! v(start) .. v(count-1)     parameters (instance first for non-static methods)
//! ```
//!
//! # Program Points
//!
//! A write at point `p` supersedes earlier stores of the same register from `p` onward
//! without discarding them, so a register can be read as it was at any earlier point.
//! Parameters are bound at point 0.
//!
//! # Copy-on-Write
//!
//! Per-register histories are `imbl` vectors, so [`ExecutionContext::fork`] shares all
//! stores with the original and only copies what either side writes afterwards.

use std::sync::Arc;

use imbl::Vector;

use crate::{
    exec::{
        config::ExecutionConfig,
        store::{RegisterStore, RegisterStoreRc},
        value::{UnknownValue, Value},
    },
    Error, Result,
};

/// Program point at which parameters are bound.
pub const ENTRY_POINT: usize = 0;

/// Register file and call budget of a single method activation.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::exec::{ExecutionContext, Value};
///
/// // Three registers, the last one is a parameter
/// let mut ctx = ExecutionContext::new(3, 1, 10);
/// ctx.add_parameter_register(0, "I", Value::Int(1))?;
/// ctx.add_register(2, "I", Value::Int(5), 4)?;
///
/// assert_eq!(ctx.parameter_start(), 2);
/// assert_eq!(ctx.register_value(2, 3), Value::Int(1));
/// assert_eq!(ctx.register_value(2, 4), Value::Int(5));
/// # Ok::<(), dexsimplify::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Per-register history, sorted by program point.
    registers: Vec<Vector<(usize, RegisterStoreRc)>>,
    parameter_size: u16,
    remaining_call_depth: u32,
    result_register: Option<RegisterStoreRc>,
    return_register: Option<RegisterStoreRc>,
}

impl ExecutionContext {
    /// Creates an empty context.
    ///
    /// # Arguments
    ///
    /// * `register_count` - Total number of registers in the frame
    /// * `parameter_size` - Number of trailing registers holding parameters; clamped to
    ///   `register_count`
    /// * `remaining_call_depth` - How many nested call contexts may still be built below
    ///   this one
    #[must_use]
    pub fn new(register_count: u16, parameter_size: u16, remaining_call_depth: u32) -> Self {
        ExecutionContext {
            registers: vec![Vector::new(); usize::from(register_count)],
            parameter_size: parameter_size.min(register_count),
            remaining_call_depth,
            result_register: None,
            return_register: None,
        }
    }

    /// Creates a top-level context for an analysis entry, taking the call budget from `config`.
    #[must_use]
    pub fn for_method(register_count: u16, parameter_size: u16, config: &ExecutionConfig) -> Self {
        Self::new(register_count, parameter_size, config.max_call_depth)
    }

    /// Total number of registers.
    #[must_use]
    pub fn register_count(&self) -> u16 {
        // Length comes from a u16 in `new`
        #[allow(clippy::cast_possible_truncation)]
        let count = self.registers.len() as u16;
        count
    }

    /// Number of parameter registers.
    #[must_use]
    pub fn parameter_size(&self) -> u16 {
        self.parameter_size
    }

    /// Index of the first parameter register.
    #[must_use]
    pub fn parameter_start(&self) -> u16 {
        self.register_count() - self.parameter_size
    }

    /// How many nested call contexts may still be built below this one.
    #[must_use]
    pub fn remaining_call_depth(&self) -> u32 {
        self.remaining_call_depth
    }

    /// Writes a new store for `register`, effective from `point` onward.
    ///
    /// A store previously written at exactly `point` is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegisterOutOfRange`] if `register` is outside the frame.
    pub fn set_register(
        &mut self,
        register: u16,
        store: RegisterStoreRc,
        point: usize,
    ) -> Result<()> {
        let count = self.register_count();
        let history = self
            .registers
            .get_mut(usize::from(register))
            .ok_or(Error::RegisterOutOfRange { register, count })?;

        match history.binary_search_by(|(at, _)| at.cmp(&point)) {
            Ok(index) => {
                history.set(index, (point, store));
            }
            Err(index) => history.insert(index, (point, store)),
        }
        Ok(())
    }

    /// Writes `value` of type `ty` to `register`, effective from `point` onward.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegisterOutOfRange`] if `register` is outside the frame.
    pub fn add_register(
        &mut self,
        register: u16,
        ty: impl Into<String>,
        value: Value,
        point: usize,
    ) -> Result<()> {
        self.set_register(register, Arc::new(RegisterStore::new(ty, value)), point)
    }

    /// Binds parameter `index` (0 = first parameter register) to an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegisterOutOfRange`] if `index` is outside the parameter region.
    pub fn add_parameter_store(&mut self, index: u16, store: RegisterStoreRc) -> Result<()> {
        if index >= self.parameter_size {
            return Err(Error::RegisterOutOfRange {
                register: self.parameter_start().saturating_add(index),
                count: self.register_count(),
            });
        }

        self.set_register(self.parameter_start() + index, store, ENTRY_POINT)
    }

    /// Binds parameter `index` (0 = first parameter register) to `value` of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegisterOutOfRange`] if `index` is outside the parameter region.
    pub fn add_parameter_register(
        &mut self,
        index: u16,
        ty: impl Into<String>,
        value: Value,
    ) -> Result<()> {
        self.add_parameter_store(index, Arc::new(RegisterStore::new(ty, value)))
    }

    /// The store in effect for `register` at `point`, i.e. the latest store written at or
    /// before `point`.
    ///
    /// Returns `None` if the register was never written up to that point or is outside
    /// the frame.
    #[must_use]
    pub fn register(&self, register: u16, point: usize) -> Option<RegisterStoreRc> {
        let history = self.registers.get(usize::from(register))?;
        let index = match history.binary_search_by(|(at, _)| at.cmp(&point)) {
            Ok(index) => index,
            Err(0) => return None,
            Err(index) => index - 1,
        };
        history.get(index).map(|(_, store)| Arc::clone(store))
    }

    /// The value in effect for `register` at `point`.
    ///
    /// Registers never written up to that point read as unanalysed unknowns.
    #[must_use]
    pub fn register_value(&self, register: u16, point: usize) -> Value {
        self.register(register, point)
            .map_or(Value::Unknown(UnknownValue::unanalyzed()), |store| {
                store.value().clone()
            })
    }

    /// Every store ever written to `register`, in program-point order.
    pub fn history(&self, register: u16) -> impl Iterator<Item = (usize, &RegisterStore)> + '_ {
        self.registers
            .get(usize::from(register))
            .into_iter()
            .flat_map(|history| history.iter().map(|(at, store)| (*at, store.as_ref())))
    }

    /// Sets the pending result of the most recent call, consumed by `move-result`.
    pub fn set_result_register(&mut self, store: RegisterStoreRc) {
        self.result_register = Some(store);
    }

    /// The pending result of the most recent call, if any.
    #[must_use]
    pub fn result_register(&self) -> Option<&RegisterStoreRc> {
        self.result_register.as_ref()
    }

    /// Records the value this activation returns to its caller.
    pub fn set_return_register(&mut self, store: RegisterStoreRc) {
        self.return_register = Some(store);
    }

    /// The value this activation returns, if one was recorded.
    #[must_use]
    pub fn return_register(&self) -> Option<&RegisterStoreRc> {
        self.return_register.as_ref()
    }

    /// Creates an independent copy sharing all existing stores.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }
}
