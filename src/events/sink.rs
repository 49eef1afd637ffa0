//! Notification sinks.
//!
//! A sink is an injected, optional observer. Publishing is best effort:
//! by the time an event is published the game state it describes has
//! already been committed, so a failing sink is logged and ignored.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::SinkError;

use super::ArenaEvent;

/// Receives arena events.
///
/// Closures of the right shape are sinks:
///
/// ```
/// use rps_arena::core::SinkError;
/// use rps_arena::events::{ArenaEvent, Notifier};
///
/// let mut seen = 0;
/// {
///     let mut notifier = Notifier::new(|_: &ArenaEvent| -> Result<(), SinkError> {
///         seen += 1;
///         Ok(())
///     });
///     notifier.publish(ArenaEvent::Initialized);
/// }
/// assert_eq!(seen, 1);
/// ```
pub trait NotificationSink {
    /// Deliver one event.
    fn publish(&mut self, event: &ArenaEvent) -> Result<(), SinkError>;
}

impl<F> NotificationSink for F
where
    F: FnMut(&ArenaEvent) -> Result<(), SinkError>,
{
    fn publish(&mut self, event: &ArenaEvent) -> Result<(), SinkError> {
        self(event)
    }
}

/// Optional sink handle.
///
/// All publishing goes through here so the "no sink" case is checked
/// in exactly one place.
#[derive(Default)]
pub struct Notifier<'a> {
    sink: Option<Box<dyn NotificationSink + 'a>>,
}

impl<'a> Notifier<'a> {
    /// Create a notifier delivering to `sink`.
    pub fn new(sink: impl NotificationSink + 'a) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    /// Create a notifier that drops every event.
    #[must_use]
    pub fn silent() -> Self {
        Self { sink: None }
    }

    /// Check if a sink is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Publish an event, swallowing sink failures.
    pub fn publish(&mut self, event: ArenaEvent) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(err) = sink.publish(&event) {
            tracing::warn!(event = event.name(), %err, "dropping failed notification");
        }
    }
}

impl std::fmt::Debug for Notifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Recording sink with a shared handle.
///
/// Clone the log before handing it to a session; the clone keeps
/// seeing every event the session publishes.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ArenaEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded event, in publish order.
    #[must_use]
    pub fn events(&self) -> Vec<ArenaEvent> {
        self.events.borrow().clone()
    }

    /// Recorded events whose `name()` matches.
    #[must_use]
    pub fn named(&self, name: &str) -> Vec<ArenaEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name() == name)
            .cloned()
            .collect()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl NotificationSink for EventLog {
    fn publish(&mut self, event: &ArenaEvent) -> Result<(), SinkError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

/// Sink that writes every event to the `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&mut self, event: &ArenaEvent) -> Result<(), SinkError> {
        tracing::info!(target: "rps_arena::events", event = event.name(), "{event}");
        Ok(())
    }
}
