use std::{cell::RefCell, fmt, sync::Arc};

use parking_lot::ReentrantMutex;

use crate::{
    BoxError, CallbackResult, Error, Event, EventClass, EventException, EventTypeBuilder,
    ExceptionHandler, Result, SharedCallback, callback,
    internal::{CallbackSet, catch_failure},
};

/// A named, typed event channel: owns the callbacks registered for events of
/// type `E` and dispatches events to them.
///
/// - Register callbacks with [`add_callback`](Self::add_callback) or [`add_fn`](Self::add_fn).
/// - Dispatch with [`trigger`](Self::trigger), [`trigger_in_place`](Self::trigger_in_place)
///   or [`trigger_with`](Self::trigger_with).
/// - Configure with [`EventType::builder`]; configuration is fixed once built.
///
/// Callbacks run synchronously on the calling thread, in registration order.
/// A per-type reentrant lock serializes dispatch and registration, so two
/// `trigger` calls on the same type never interleave, while a callback may
/// trigger the same type again on its own thread.
///
/// # Examples
///
/// ```rust
/// use evented::{Event, EventType, SimpleEvent};
///
/// let started = EventType::<SimpleEvent>::builder("started")
///     .can_stop_propagation(true)
///     .build();
///
/// started.add_fn(|event: &mut SimpleEvent| {
///     event.stop_propagation()?;
///     Ok(())
/// });
/// started.add_fn(|_: &mut SimpleEvent| unreachable!("propagation was stopped"));
///
/// let event = started.trigger_with(SimpleEvent::new)?;
/// assert!(event.is_propagation_stopped());
/// # Ok::<(), evented::Error>(())
/// ```
pub struct EventType<E: Event> {
    name: Arc<str>,
    class: EventClass,
    cancellable: bool,
    propagation_stoppable: bool,
    exception_handler: Arc<dyn ExceptionHandler<E>>,
    callbacks: ReentrantMutex<RefCell<CallbackSet<E>>>,
}

impl<E: Event> EventType<E> {
    /// Creates a builder for an event type with the given name.
    pub fn builder(name: &str) -> EventTypeBuilder<E> {
        EventTypeBuilder::new(name)
    }

    pub(crate) fn from_builder(
        name: Arc<str>,
        cancellable: bool,
        propagation_stoppable: bool,
        exception_handler: Arc<dyn ExceptionHandler<E>>,
    ) -> Self {
        Self {
            name,
            class: EventClass::of::<E>(),
            cancellable,
            propagation_stoppable,
            exception_handler,
            callbacks: ReentrantMutex::new(RefCell::new(CallbackSet::new())),
        }
    }

    /// Dispatches the event to all callbacks and returns it.
    ///
    /// Fails with [`Error::ForeignEvent`] when the event was created for
    /// another `EventType` instance, even one with the same name. Fails with
    /// [`Error::Dispatch`] when the exception handler failed for any callback;
    /// that failure is reported only after the loop finished.
    pub fn trigger(&self, mut event: E) -> Result<E> {
        self.trigger_in_place(&mut event)?;
        Ok(event)
    }

    /// Creates the event with `factory` and dispatches it.
    pub fn trigger_with<F>(self: &Arc<Self>, factory: F) -> Result<E>
    where
        F: FnOnce(&Arc<Self>) -> E,
    {
        self.trigger(factory(self))
    }

    /// Dispatches an event the caller keeps ownership of.
    ///
    /// After every callback, successful or not, [`Event::must_propagate`]
    /// decides whether the remaining callbacks run. A failing callback never
    /// stops the loop by itself.
    pub fn trigger_in_place(&self, event: &mut E) -> Result<()> {
        if !event.is_type(self) {
            return Err(Error::ForeignEvent {
                expected: self.name.clone(),
                actual: event.event_type().name_arc(),
            });
        }

        let mut failure: Option<EventException> = None;

        {
            let guard = self.callbacks.lock();
            let callbacks = guard.borrow().snapshot();
            tracing::trace!(event = %self.name, callbacks = callbacks.len(), "Dispatching event");

            for (idx, cb) in callbacks.iter().enumerate() {
                if let Err(cb_failure) = catch_failure(|| cb.handle(event)) {
                    tracing::trace!(event = %self.name, callback = idx, "Callback failed");
                    let handled = catch_failure(|| {
                        self.exception_handler.handle_exception(event, cb_failure)
                    });
                    if let Err(handler_failure) = handled {
                        let err = handler_failure.into_error();
                        match failure.as_mut() {
                            Some(primary) => primary.add_suppressed(err),
                            None => failure = Some(self.wrap_failure(err)),
                        }
                    }
                }

                if !event.must_propagate() {
                    tracing::trace!(event = %self.name, callback = idx, "Propagation stopped");
                    break;
                }
            }
        }

        match failure {
            Some(exc) => Err(Error::Dispatch(exc)),
            None => Ok(()),
        }
    }

    fn wrap_failure(&self, err: BoxError) -> EventException {
        match err.downcast::<EventException>() {
            Ok(exc) => *exc,
            Err(err) => EventException::new(
                format!("Exception while invoking event '{}'", self.name),
                err,
            ),
        }
    }

    /// Registers a callback. Callbacks run in the order they were added;
    /// adding an already registered callback moves it to the end.
    pub fn add_callback(&self, callback: SharedCallback<E>) {
        let guard = self.callbacks.lock();
        let moved = guard.borrow_mut().insert_last(callback);
        tracing::debug!(event = %self.name, moved, "Callback added");
    }

    /// Registers a closure and returns its handle for later removal.
    pub fn add_fn<F>(&self, f: F) -> SharedCallback<E>
    where
        F: Fn(&mut E) -> CallbackResult + Send + Sync + 'static,
    {
        let cb = callback(f);
        self.add_callback(cb.clone());
        cb
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn remove_callback(&self, callback: &SharedCallback<E>) -> bool {
        let guard = self.callbacks.lock();
        let removed = guard.borrow_mut().remove(callback);
        if removed {
            tracing::debug!(event = %self.name, "Callback removed");
        }
        removed
    }

    pub fn contains_callback(&self, callback: &SharedCallback<E>) -> bool {
        self.callbacks.lock().borrow().contains(callback)
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.lock().borrow().len()
    }

    pub fn has_callbacks(&self) -> bool {
        !self.callbacks.lock().borrow().is_empty()
    }

    /// The Rust type every event of this type has.
    pub fn event_class(&self) -> EventClass {
        self.class
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    /// Whether a callback may prevent subsequent callbacks from being invoked.
    pub fn can_stop_propagation(&self) -> bool {
        self.propagation_stoppable
    }
}

impl<E: Event> fmt::Debug for EventType<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventType")
            .field("name", &self.name)
            .field("class", &self.class.name())
            .field("cancellable", &self.cancellable)
            .field("propagation_stoppable", &self.propagation_stoppable)
            .finish_non_exhaustive()
    }
}

impl<E: Event> fmt::Display for EventType<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
