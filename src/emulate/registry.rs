//! Descriptor-keyed emulation handlers.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
    dalvik::MethodReference,
    exec::{ExecutionContext, RegisterStore, UnknownValue, Value, ENTRY_POINT},
    Error, Result,
};

/// Computes exact return values for a fixed set of methods.
///
/// Methods answered by an emulator are pure with respect to their arguments: the dispatcher
/// assumes an emulated call changes nothing but the caller's result register.
pub trait MethodEmulator: Send + Sync {
    /// Returns `true` if `descriptor` can be emulated.
    fn can_emulate(&self, descriptor: &str) -> bool;

    /// Computes the return store of `descriptor` from the callee's bound parameters.
    ///
    /// The store is only consulted for non-void methods.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Emulation`] if the method cannot produce a result for these
    /// arguments (the real method would throw).
    fn emulate(&self, callee: &ExecutionContext, descriptor: &str) -> Result<RegisterStore>;
}

/// Arguments of an emulated call, as bound in the callee context.
pub struct EmulationCall<'a> {
    context: &'a ExecutionContext,
    method: &'a MethodReference,
}

impl<'a> EmulationCall<'a> {
    /// Wraps a callee context for `method`.
    #[must_use]
    pub fn new(context: &'a ExecutionContext, method: &'a MethodReference) -> Self {
        EmulationCall { context, method }
    }

    /// The emulated method.
    #[must_use]
    pub fn method(&self) -> &MethodReference {
        self.method
    }

    /// The callee context.
    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        self.context
    }

    /// Value of callee parameter register `index`.
    ///
    /// For instance methods index 0 is the receiver. Wide arguments occupy two indices.
    #[must_use]
    pub fn argument(&self, index: u16) -> Value {
        self.context
            .register_value(self.context.parameter_start() + index, ENTRY_POINT)
    }

    /// An unknown result, for arguments the handler cannot compute with.
    #[must_use]
    pub fn unknown(&self) -> Value {
        Value::Unknown(UnknownValue::opaque_result())
    }

    /// A failure for arguments the real method rejects.
    #[must_use]
    pub fn fail(&self, message: impl Into<String>) -> Error {
        Error::Emulation {
            descriptor: self.method.descriptor(),
            message: message.into(),
        }
    }
}

/// Handler computing an emulated method's return value.
pub type EmulationFn = dyn Fn(&EmulationCall<'_>) -> Result<Value> + Send + Sync;

struct Registration {
    method: MethodReference,
    handler: Box<EmulationFn>,
}

/// [`MethodEmulator`] backed by a map from method descriptor to handler.
///
/// The returned store carries the method's declared return type.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::emulate::{EmulationRegistry, MethodEmulator};
/// use dexsimplify::exec::Value;
///
/// let mut registry = EmulationRegistry::new();
/// registry.register("Lcom/example/Keys;->seed()I", |_call| Ok(Value::Int(0x5eed)))?;
///
/// assert!(registry.can_emulate("Lcom/example/Keys;->seed()I"));
/// assert!(!registry.can_emulate("Lcom/example/Keys;->other()I"));
/// # Ok::<(), dexsimplify::Error>(())
/// ```
#[derive(Default)]
pub struct EmulationRegistry {
    handlers: FxHashMap<String, Registration>,
}

impl EmulationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in platform handlers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtins::install(&mut registry);
        registry
    }

    /// Registers `handler` for the method named by `descriptor`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if `descriptor` cannot be parsed.
    pub fn register<F>(&mut self, descriptor: &str, handler: F) -> Result<()>
    where
        F: Fn(&EmulationCall<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(MethodReference::parse(descriptor)?, handler);
        Ok(())
    }

    /// Registers `handler` for an already parsed `method`, replacing any previous one.
    pub(super) fn insert<F>(&mut self, method: MethodReference, handler: F)
    where
        F: Fn(&EmulationCall<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.handlers.insert(
            method.descriptor(),
            Registration {
                method,
                handler: Box::new(handler),
            },
        );
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered descriptors, in no particular order.
    pub fn descriptors(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl MethodEmulator for EmulationRegistry {
    fn can_emulate(&self, descriptor: &str) -> bool {
        self.handlers.contains_key(descriptor)
    }

    fn emulate(&self, callee: &ExecutionContext, descriptor: &str) -> Result<RegisterStore> {
        let registration = self.handlers.get(descriptor).ok_or_else(|| Error::Emulation {
            descriptor: descriptor.to_string(),
            message: "no handler registered".to_string(),
        })?;

        let call = EmulationCall::new(callee, &registration.method);
        let value = (registration.handler)(&call)?;
        Ok(RegisterStore::new(registration.method.return_type(), value))
    }
}

impl fmt::Debug for EmulationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmulationRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_normalizes_and_rejects() {
        let mut registry = EmulationRegistry::new();
        assert!(registry.register("bogus", |_| Ok(Value::Null)).is_err());
        assert!(registry.is_empty());

        registry
            .register("La;->f(I)I", |call| {
                Ok(call.argument(0).as_int().map_or(call.unknown(), |v| Value::Int(v * 2)))
            })
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.descriptors().collect::<Vec<_>>(), vec!["La;->f(I)I"]);
    }

    #[test]
    fn test_emulate_uses_declared_return_type() {
        let mut registry = EmulationRegistry::new();
        registry
            .register("La;->f(I)I", |call| {
                Ok(call.argument(0).as_int().map_or(call.unknown(), |v| Value::Int(v * 2)))
            })
            .unwrap();

        let mut callee = ExecutionContext::new(1, 1, 0);
        callee.add_parameter_register(0, "I", Value::Int(21)).unwrap();

        let store = registry.emulate(&callee, "La;->f(I)I").unwrap();
        assert_eq!(store.ty(), "I");
        assert_eq!(store.value(), &Value::Int(42));
    }

    #[test]
    fn test_emulate_unregistered_fails() {
        let registry = EmulationRegistry::new();
        let callee = ExecutionContext::new(0, 0, 0);
        assert!(matches!(
            registry.emulate(&callee, "La;->f()V"),
            Err(Error::Emulation { .. })
        ));
    }
}
