use std::{fmt, sync::Arc};

use crate::{Error, EventType, Result};

/// Dispatch state shared by every event: the owning type and the
/// cancelled/propagation-stopped flags.
///
/// Embed it in your event type and expose it through [`Event::state`] and
/// [`Event::state_mut`] (or let `#[derive(Event)]` do that).
pub struct EventState<E: Event> {
    event_type: Arc<EventType<E>>,
    cancelled: bool,
    propagation_stopped: bool,
}

impl<E: Event> EventState<E> {
    /// Creates the state for an event of the given type.
    pub fn new(event_type: &Arc<EventType<E>>) -> Self {
        Self {
            event_type: event_type.clone(),
            cancelled: false,
            propagation_stopped: false,
        }
    }

    #[inline]
    pub fn event_type(&self) -> &Arc<EventType<E>> {
        &self.event_type
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Fails on non-cancellable types, even when clearing the flag.
    pub fn set_cancelled(&mut self, cancelled: bool) -> Result<()> {
        if !self.event_type.is_cancellable() {
            return Err(Error::NotCancellable(self.event_type.name_arc()));
        }
        self.cancelled = cancelled;
        Ok(())
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Fails on types that cannot stop propagation, even when clearing the flag.
    pub fn set_propagation_stopped(&mut self, stopped: bool) -> Result<()> {
        if !self.event_type.can_stop_propagation() {
            return Err(Error::PropagationNotStoppable(self.event_type.name_arc()));
        }
        self.propagation_stopped = stopped;
        Ok(())
    }
}

impl<E: Event> fmt::Debug for EventState<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventState")
            .field("event_type", &self.event_type.name())
            .field("cancelled", &self.cancelled)
            .field("propagation_stopped", &self.propagation_stopped)
            .finish()
    }
}

/// An event instance, passed to and possibly modified by callbacks.
///
/// Implementors only provide access to their [`EventState`]; everything else
/// has a default implementation. Extra context goes into additional fields.
///
/// # Propagation
///
/// [`must_propagate`](Event::must_propagate) is consulted by the dispatch
/// loop after every callback. Override it for a custom strategy, e.g. to stop
/// once the event is cancelled:
///
/// ```rust
/// use evented::{Event, EventState};
///
/// struct Request {
///     state: EventState<Request>,
/// }
///
/// impl Event for Request {
///     fn state(&self) -> &EventState<Self> {
///         &self.state
///     }
///
///     fn state_mut(&mut self) -> &mut EventState<Self> {
///         &mut self.state
///     }
///
///     fn must_propagate(&self) -> bool {
///         !self.is_cancelled() && !self.is_propagation_stopped()
///     }
/// }
/// ```
///
/// # Binding
///
/// An event can only be bound to an event type of its own Rust type:
///
/// ```rust,compile_fail
/// use evented::{Event, EventState, EventType};
///
/// struct Saved { state: EventState<Saved> }
/// struct Loaded { state: EventState<Loaded> }
/// # impl Event for Saved {
/// #     fn state(&self) -> &EventState<Self> { &self.state }
/// #     fn state_mut(&mut self) -> &mut EventState<Self> { &mut self.state }
/// # }
/// # impl Event for Loaded {
/// #     fn state(&self) -> &EventState<Self> { &self.state }
/// #     fn state_mut(&mut self) -> &mut EventState<Self> { &mut self.state }
/// # }
///
/// let saved = EventType::<Saved>::builder("saved").build();
/// let loaded = Loaded { state: EventState::new(&saved) };
/// ```
pub trait Event: Sized + 'static {
    fn state(&self) -> &EventState<Self>;

    fn state_mut(&mut self) -> &mut EventState<Self>;

    /// Returns whether subsequent callbacks must still be invoked.
    ///
    /// By default true, unless propagation was stopped on a type that allows it.
    fn must_propagate(&self) -> bool {
        if self.can_stop_propagation() {
            !self.is_propagation_stopped()
        } else {
            true
        }
    }

    fn event_type(&self) -> &Arc<EventType<Self>> {
        self.state().event_type()
    }

    fn name(&self) -> &str {
        self.event_type().name()
    }

    /// True when this event's type has the given name.
    fn is_type_named(&self, name: &str) -> bool {
        self.name() == name
    }

    /// True when this event was created for exactly this type instance.
    fn is_type<F: Event>(&self, event_type: &EventType<F>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(self.event_type()), event_type as *const EventType<F>)
    }

    /// Runs `f` with this event if its type is the given instance.
    fn if_type<R>(
        &mut self,
        event_type: &EventType<Self>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> Option<R> {
        if self.is_type(event_type) {
            Some(f(self))
        } else {
            None
        }
    }

    /// Runs `f` with this event if its type has the given name.
    fn if_type_named<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        if self.is_type_named(name) {
            Some(f(self))
        } else {
            None
        }
    }

    fn is_cancellable(&self) -> bool {
        self.event_type().is_cancellable()
    }

    /// Always false for non-cancellable types.
    fn is_cancelled(&self) -> bool {
        self.state().is_cancelled()
    }

    fn set_cancelled(&mut self, cancelled: bool) -> Result<()> {
        self.state_mut().set_cancelled(cancelled)
    }

    fn cancel(&mut self) -> Result<()> {
        self.set_cancelled(true)
    }

    fn can_stop_propagation(&self) -> bool {
        self.event_type().can_stop_propagation()
    }

    /// Always false for types that cannot stop propagation.
    fn is_propagation_stopped(&self) -> bool {
        self.state().is_propagation_stopped()
    }

    fn set_propagation_stopped(&mut self, stopped: bool) -> Result<()> {
        self.state_mut().set_propagation_stopped(stopped)
    }

    fn stop_propagation(&mut self) -> Result<()> {
        self.set_propagation_stopped(true)
    }
}

/// An event without extra context, for types that only signal that
/// something happened.
#[derive(Debug)]
pub struct SimpleEvent {
    state: EventState<SimpleEvent>,
}

impl SimpleEvent {
    pub fn new(event_type: &Arc<EventType<SimpleEvent>>) -> Self {
        Self {
            state: EventState::new(event_type),
        }
    }
}

impl Event for SimpleEvent {
    fn state(&self) -> &EventState<Self> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EventState<Self> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_type(cancellable: bool, stoppable: bool) -> Arc<EventType<SimpleEvent>> {
        EventType::builder("test")
            .cancellable(cancellable)
            .can_stop_propagation(stoppable)
            .build()
    }

    #[test]
    fn test_cancel_on_cancellable_type() {
        let ty = event_type(true, false);
        let mut event = SimpleEvent::new(&ty);
        assert!(!event.is_cancelled());

        event.cancel().unwrap();
        assert!(event.is_cancelled());

        event.set_cancelled(false).unwrap();
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_cancel_on_non_cancellable_type_fails_both_ways() {
        let ty = event_type(false, true);
        let mut event = SimpleEvent::new(&ty);

        assert!(matches!(event.cancel(), Err(Error::NotCancellable(_))));
        assert!(matches!(
            event.set_cancelled(false),
            Err(Error::NotCancellable(_))
        ));
        assert!(!event.is_cancelled());
        assert!(!event.is_cancellable());
    }

    #[test]
    fn test_stop_propagation_on_non_stoppable_type_fails() {
        let ty = event_type(true, false);
        let mut event = SimpleEvent::new(&ty);

        assert!(matches!(
            event.stop_propagation(),
            Err(Error::PropagationNotStoppable(_))
        ));
        assert!(matches!(
            event.set_propagation_stopped(false),
            Err(Error::PropagationNotStoppable(_))
        ));
        assert!(event.must_propagate());
    }

    #[test]
    fn test_must_propagate_follows_stop_flag() {
        let ty = event_type(false, true);
        let mut event = SimpleEvent::new(&ty);
        assert!(event.must_propagate());

        event.stop_propagation().unwrap();
        assert!(event.is_propagation_stopped());
        assert!(!event.must_propagate());

        event.set_propagation_stopped(false).unwrap();
        assert!(event.must_propagate());
    }

    #[test]
    fn test_cancel_does_not_affect_propagation() {
        let ty = event_type(true, true);
        let mut event = SimpleEvent::new(&ty);
        event.cancel().unwrap();
        assert!(event.must_propagate());
    }

    #[test]
    fn test_type_matching_by_name_and_identity() {
        let ty = event_type(false, false);
        let twin = event_type(false, false);
        let mut event = SimpleEvent::new(&ty);

        assert!(event.is_type_named("test"));
        assert!(!event.is_type_named("other"));
        assert!(event.is_type(&ty));
        assert!(!event.is_type(&twin));

        assert_eq!(event.if_type(&ty, |e| e.name().to_string()).as_deref(), Some("test"));
        assert_eq!(event.if_type(&twin, |_| ()), None);
        assert_eq!(event.if_type_named("test", |_| 7), Some(7));
        assert_eq!(event.if_type_named("nope", |_| 7), None);
    }

    #[test]
    fn test_error_names_the_event() {
        let ty = EventType::<SimpleEvent>::builder("closing").build();
        let mut event = SimpleEvent::new(&ty);
        let err = event.cancel().unwrap_err();
        assert_eq!(err.to_string(), "Event 'closing' is not cancellable");
    }
}
