//! The invocation dispatcher.

use std::{fmt, sync::Arc};

use crate::{
    catalog::ClassCatalog,
    dalvik::{invoke_registers, InvokeInstruction},
    emulate::MethodEmulator,
    exec::{
        invoke::callee::build_callee_context, Event, EventKind, EventLevel, EventLog,
        ExecutionConfig, ExecutionContext, RegisterStore, RegisterStoreRc, UnknownValue, Value,
        ENTRY_POINT,
    },
    mutability::{MutabilityOracle, PlatformTypes, TypeMetadataProvider},
    Result,
};

/// How a call site was handled.
///
/// [`Disposition::DeferredKnown`] and [`Disposition::Opaque`] have the same effect on the
/// caller today; they are kept apart so callers can tell calls into analysed code from
/// calls into the unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Disposition {
    /// The return value was computed exactly by the emulator.
    Emulated,
    /// The target is declared in the catalog but was not executed.
    DeferredKnown,
    /// Nothing is known about the target.
    Opaque,
}

/// Effect of one dispatched call site on its caller.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// How the call was handled.
    pub disposition: Disposition,
    /// Store written to the caller's result register, `None` for void calls.
    pub result: Option<RegisterStoreRc>,
    /// Caller registers that kept their value across the call.
    pub retained: Vec<u16>,
    /// Caller registers replaced by an unknown value.
    pub invalidated: Vec<u16>,
}

impl DispatchOutcome {
    fn new(disposition: Disposition) -> Self {
        DispatchOutcome {
            disposition,
            result: None,
            retained: Vec::new(),
            invalidated: Vec::new(),
        }
    }
}

/// Applies invoke instructions to a caller's [`ExecutionContext`].
///
/// For every call site the dispatcher builds the callee's context, picks a [`Disposition`]
/// and applies its effect:
///
/// | Disposition | Result register | Argument registers |
/// |-------------|-----------------|--------------------|
/// | `Emulated` | emulated store (non-void) | untouched |
/// | `DeferredKnown` | unknown, type `?` (non-void) | mutable types invalidated |
/// | `Opaque` | unknown, type `?` (non-void) | mutable types invalidated |
///
/// A call reached with an exhausted call budget, or whose emulation handler fails, is
/// handled as `Opaque`.
///
/// The dispatcher only holds shared, read-only state plus the append-only event log, so a
/// single instance can serve many method activations at once (see
/// [`InvokeDispatcher::dispatch_batch`]).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dexsimplify::catalog::ClassCatalog;
/// use dexsimplify::dalvik::{InvokeInstruction, MethodReference, Opcode};
/// use dexsimplify::emulate::EmulationRegistry;
/// use dexsimplify::exec::{Disposition, ExecutionContext, InvokeDispatcher, Value};
///
/// let dispatcher = InvokeDispatcher::new(
///     Arc::new(ClassCatalog::empty()),
///     Arc::new(EmulationRegistry::with_builtins()),
/// );
///
/// let mut caller = ExecutionContext::new(2, 0, 8);
/// caller.add_register(0, "I", Value::Int(-5), 1)?;
///
/// let abs = MethodReference::parse("Ljava/lang/Math;->abs(I)I")?;
/// let instruction = InvokeInstruction::compact(Opcode::InvokeStatic, &[0], abs)?;
///
/// let outcome = dispatcher.dispatch(&mut caller, &instruction, 2)?;
/// assert_eq!(outcome.disposition, Disposition::Emulated);
/// assert_eq!(caller.result_register().map(|s| s.value().clone()), Some(Value::Int(5)));
/// # Ok::<(), dexsimplify::Error>(())
/// ```
pub struct InvokeDispatcher {
    catalog: Arc<ClassCatalog>,
    emulator: Arc<dyn MethodEmulator>,
    metadata: Arc<dyn TypeMetadataProvider>,
    oracle: MutabilityOracle,
    config: ExecutionConfig,
    events: Arc<EventLog>,
}

impl InvokeDispatcher {
    /// Creates a dispatcher with the default configuration and the built-in platform type
    /// table.
    #[must_use]
    pub fn new(catalog: Arc<ClassCatalog>, emulator: Arc<dyn MethodEmulator>) -> Self {
        let metadata: Arc<dyn TypeMetadataProvider> = Arc::new(PlatformTypes::new());
        let config = ExecutionConfig::default();
        InvokeDispatcher {
            oracle: Self::oracle_for(&catalog, &metadata, &config),
            catalog,
            emulator,
            metadata,
            config,
            events: Arc::new(EventLog::new()),
        }
    }

    /// Replaces the runtime type metadata used for classes outside the catalog.
    #[must_use]
    pub fn with_type_metadata(mut self, metadata: Arc<dyn TypeMetadataProvider>) -> Self {
        self.metadata = metadata;
        self.oracle = Self::oracle_for(&self.catalog, &self.metadata, &self.config);
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self.oracle = Self::oracle_for(&self.catalog, &self.metadata, &self.config);
        self
    }

    /// Records diagnostics into `events` instead of a private log.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventLog>) -> Self {
        self.events = events;
        self
    }

    fn oracle_for(
        catalog: &Arc<ClassCatalog>,
        metadata: &Arc<dyn TypeMetadataProvider>,
        config: &ExecutionConfig,
    ) -> MutabilityOracle {
        MutabilityOracle::new(Arc::clone(catalog), Arc::clone(metadata))
            .with_cache(config.cache_mutability)
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The mutability oracle consulted for opaque calls.
    #[must_use]
    pub fn oracle(&self) -> &MutabilityOracle {
        &self.oracle
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// The disposition a call to `descriptor` from `caller` receives.
    ///
    /// Emulation is checked before the catalog, so a catalog method with a registered
    /// handler is emulated. A failing handler can still turn an `Emulated` answer into
    /// `Opaque` during [`InvokeDispatcher::dispatch`].
    #[must_use]
    pub fn disposition(&self, caller: &ExecutionContext, descriptor: &str) -> Disposition {
        if caller.remaining_call_depth() == 0 {
            Disposition::Opaque
        } else if self.emulator.can_emulate(descriptor) {
            Disposition::Emulated
        } else if self.catalog.contains_method(descriptor) {
            Disposition::DeferredKnown
        } else {
            Disposition::Opaque
        }
    }

    /// Processes the invoke `instruction` found at program `point` of `caller`.
    ///
    /// Argument registers are read as they are at `point`; invalidations are written at
    /// `point`. Dispatching the same call site twice against the same caller state yields
    /// the same disposition and the same invalidated registers.
    ///
    /// # Errors
    ///
    /// Returns an error only for structurally invalid input, such as argument registers
    /// outside the caller's register file.
    pub fn dispatch(
        &self,
        caller: &mut ExecutionContext,
        instruction: &InvokeInstruction,
        point: usize,
    ) -> Result<DispatchOutcome> {
        let method = instruction.method();
        let descriptor = method.descriptor();

        self.record(
            EventLevel::Info,
            EventKind::InvokeProcessed,
            &descriptor,
            None,
            format!("{} {}", instruction.opcode(), descriptor),
        );

        let arguments = invoke_registers(instruction);
        if let Some(register) = arguments
            .iter()
            .copied()
            .find(|r| *r >= caller.register_count())
        {
            return Err(crate::Error::RegisterOutOfRange {
                register,
                count: caller.register_count(),
            });
        }

        let mut callee = build_callee_context(caller, instruction, point)?;

        let disposition = self.disposition(caller, &descriptor);
        if caller.remaining_call_depth() == 0 {
            self.record(
                EventLevel::Warn,
                EventKind::DepthExhausted,
                &descriptor,
                None,
                format!("Call depth exhausted at {descriptor}, treating it as opaque"),
            );
        }

        match disposition {
            Disposition::Emulated => match self.emulator.emulate(&callee, &descriptor) {
                Ok(store) => {
                    let store = Arc::new(store);
                    callee.set_return_register(Arc::clone(&store));

                    let mut outcome = DispatchOutcome::new(Disposition::Emulated);
                    if !method.is_void() {
                        caller.set_result_register(Arc::clone(&store));
                        outcome.result = Some(store);
                    }
                    Ok(outcome)
                }
                Err(error) => {
                    self.record(
                        EventLevel::Warn,
                        EventKind::EmulationFailed,
                        &descriptor,
                        None,
                        format!("Emulating {descriptor} failed ({error}), treating it as opaque"),
                    );
                    self.apply_opaque(
                        caller,
                        &callee,
                        instruction,
                        &arguments,
                        point,
                        Disposition::Opaque,
                    )
                }
            },
            Disposition::DeferredKnown => {
                self.record(
                    EventLevel::Warn,
                    EventKind::DeferredKnown,
                    &descriptor,
                    None,
                    format!("Found {descriptor} but holding off on executing it"),
                );
                self.apply_opaque(
                    caller,
                    &callee,
                    instruction,
                    &arguments,
                    point,
                    Disposition::DeferredKnown,
                )
            }
            Disposition::Opaque => self.apply_opaque(
                caller,
                &callee,
                instruction,
                &arguments,
                point,
                Disposition::Opaque,
            ),
        }
    }

    /// Result register becomes unknown, arguments of mutable types become unknown.
    fn apply_opaque(
        &self,
        caller: &mut ExecutionContext,
        callee: &ExecutionContext,
        instruction: &InvokeInstruction,
        arguments: &[u16],
        point: usize,
        disposition: Disposition,
    ) -> Result<DispatchOutcome> {
        let method = instruction.method();
        let descriptor = method.descriptor();
        let mut outcome = DispatchOutcome::new(disposition);

        if !method.is_void() {
            let store = Arc::new(RegisterStore::unresolved(UnknownValue::opaque_result()));
            caller.set_result_register(Arc::clone(&store));
            outcome.result = Some(store);
        }

        for (register, ty, immutable) in self.parameter_verdicts(callee, arguments) {
            if immutable {
                outcome.retained.push(register);
                self.record_parameter(
                    EventKind::ParameterRetained,
                    &descriptor,
                    register,
                    format!("v{register} ({ty}) is immutable and passed as a parameter, keeping its value"),
                );
            } else {
                caller.add_register(
                    register,
                    &ty,
                    Value::Unknown(UnknownValue::invalidated()),
                    point,
                )?;
                outcome.invalidated.push(register);
                self.record_parameter(
                    EventKind::ParameterInvalidated,
                    &descriptor,
                    register,
                    format!("v{register} ({ty}) is mutable and passed as a parameter, marking as unknown"),
                );
            }
        }

        Ok(outcome)
    }

    /// One `(register, type, immutable)` entry per distinct caller register, in first-use order.
    ///
    /// Callee parameter `i` was bound from caller register `arguments[i]`. A register passed
    /// in several slots is immutable only if every slot is; it then carries the type of its
    /// first mutable slot.
    fn parameter_verdicts(
        &self,
        callee: &ExecutionContext,
        arguments: &[u16],
    ) -> Vec<(u16, String, bool)> {
        let mut verdicts: Vec<(u16, String, bool)> = Vec::with_capacity(arguments.len());

        for (index, register) in (callee.parameter_start()..callee.register_count()).zip(arguments) {
            let Some(store) = callee.register(index, ENTRY_POINT) else {
                continue;
            };
            let ty = store.ty();
            let immutable = self.oracle.is_immutable(ty);

            match verdicts.iter_mut().find(|(r, _, _)| r == register) {
                Some(entry) => {
                    if entry.2 && !immutable {
                        *entry = (*register, ty.to_string(), false);
                    }
                }
                None => verdicts.push((*register, ty.to_string(), immutable)),
            }
        }

        verdicts
    }

    fn record_parameter(&self, kind: EventKind, descriptor: &str, register: u16, message: String) {
        if self.config.verbose_parameters {
            self.record(EventLevel::Fine, kind, descriptor, Some(register), message);
        }
    }

    fn record(
        &self,
        level: EventLevel,
        kind: EventKind,
        descriptor: &str,
        register: Option<u16>,
        message: String,
    ) {
        let mut event = Event::new(level, kind, message).with_method(descriptor);
        if let Some(register) = register {
            event = event.with_register(register);
        }
        self.events.record(event);
    }
}

impl fmt::Debug for InvokeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeDispatcher")
            .field("classes", &self.catalog.len())
            .field("config", &self.config)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}
