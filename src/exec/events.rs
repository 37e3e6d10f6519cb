//! Structured diagnostics for the symbolic pass.
//!
//! Diagnostics are observability side effects only; nothing in the pass branches on them.
//! An [`EventLog`] is handed to the dispatcher by reference, so each host decides where
//! events go and no process-wide logger state exists. The log is append-only and can be
//! shared between threads analysing different methods.

use std::fmt;

/// Severity of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventLevel {
    /// Per-register detail.
    Fine,
    /// Normal progress.
    Info,
    /// Something the analysis could not do precisely.
    Warn,
}

/// What an [`Event`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// An invoke instruction was processed.
    InvokeProcessed,
    /// A call target is declared in the catalog but was not executed.
    DeferredKnown,
    /// A parameter register kept its value across an opaque call.
    ParameterRetained,
    /// A parameter register was invalidated by an opaque call.
    ParameterInvalidated,
    /// The call budget was exhausted; the call was treated as opaque.
    DepthExhausted,
    /// An emulation handler failed; the call was treated as opaque.
    EmulationFailed,
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Severity.
    pub level: EventLevel,
    /// Category.
    pub kind: EventKind,
    /// Descriptor of the invoked method, if the event concerns a call.
    pub method: Option<String>,
    /// Caller register concerned, if any.
    pub register: Option<u16>,
    /// Human readable description.
    pub message: String,
}

impl Event {
    /// Creates an event not tied to a method or register.
    #[must_use]
    pub fn new(level: EventLevel, kind: EventKind, message: impl Into<String>) -> Self {
        Event {
            level,
            kind,
            method: None,
            register: None,
            message: message.into(),
        }
    }

    /// Attaches the invoked method descriptor.
    #[must_use]
    pub fn with_method(mut self, descriptor: impl Into<String>) -> Self {
        self.method = Some(descriptor.into());
        self
    }

    /// Attaches the concerned caller register.
    #[must_use]
    pub fn with_register(mut self, register: u16) -> Self {
        self.register = Some(register);
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.message)
    }
}

/// Append-only, thread-safe collection of [`Event`]s.
///
/// # Examples
///
/// ```rust
/// use dexsimplify::exec::{Event, EventKind, EventLevel, EventLog};
///
/// let log = EventLog::new();
/// log.record(Event::new(EventLevel::Info, EventKind::InvokeProcessed, "invoke-static"));
/// assert_eq!(log.len(), 1);
/// assert_eq!(log.count_kind(EventKind::InvokeProcessed), 1);
/// ```
#[derive(Default)]
pub struct EventLog {
    events: boxcar::Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        EventLog {
            events: boxcar::Vec::new(),
        }
    }

    /// Appends an event.
    pub fn record(&self, event: Event) {
        self.events.push(event);
    }

    /// Appends an `Info` event.
    pub fn info(&self, kind: EventKind, message: impl Into<String>) {
        self.record(Event::new(EventLevel::Info, kind, message));
    }

    /// Appends a `Warn` event.
    pub fn warn(&self, kind: EventKind, message: impl Into<String>) {
        self.record(Event::new(EventLevel::Warn, kind, message));
    }

    /// Appends a `Fine` event.
    pub fn fine(&self, kind: EventKind, message: impl Into<String>) {
        self.record(Event::new(EventLevel::Fine, kind, message));
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.count()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the recorded events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, event)| event)
    }

    /// Number of events of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.iter().filter(|event| event.kind == kind).count()
    }

    /// Events at or above `level`.
    #[must_use]
    pub fn at_least(&self, level: EventLevel) -> Vec<&Event> {
        self.iter().filter(|event| event.level >= level).collect()
    }

    /// Events concerning the given caller register.
    #[must_use]
    pub fn for_register(&self, register: u16) -> Vec<&Event> {
        self.iter()
            .filter(|event| event.register == Some(register))
            .collect()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(EventLevel::Warn > EventLevel::Info);
        assert!(EventLevel::Info > EventLevel::Fine);
    }

    #[test]
    fn test_filters() {
        let log = EventLog::new();
        assert!(log.is_empty());

        log.info(EventKind::InvokeProcessed, "invoke-virtual");
        log.warn(EventKind::DeferredKnown, "found but not executed");
        log.record(
            Event::new(EventLevel::Fine, EventKind::ParameterInvalidated, "v3")
                .with_register(3)
                .with_method("La;->b()V"),
        );

        assert_eq!(log.len(), 3);
        assert_eq!(log.at_least(EventLevel::Info).len(), 2);
        assert_eq!(log.at_least(EventLevel::Warn).len(), 1);
        assert_eq!(log.for_register(3).len(), 1);
        assert_eq!(
            log.for_register(3)[0].method.as_deref(),
            Some("La;->b()V")
        );
        assert_eq!(log.count_kind(EventKind::DeferredKnown), 1);
    }

    #[test]
    fn test_shared_between_threads() {
        let log = EventLog::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        log.fine(EventKind::ParameterRetained, "retained");
                    }
                });
            }
        });
        assert_eq!(log.len(), 100);
    }
}
