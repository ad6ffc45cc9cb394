use std::sync::Arc;

use crate::{BoxError, CallbackFailure, Event, EventType, ExceptionHandler, Rethrow};

/// Configures an [`EventType`] before it is built.
///
/// All options are fixed once [`build`](Self::build) is called.
///
/// # Examples
///
/// ```rust
/// use evented::{EventType, LogFailures, SimpleEvent};
///
/// let closing = EventType::<SimpleEvent>::builder("window-closing")
///     .cancellable(true)
///     .can_stop_propagation(true)
///     .exception_handler(LogFailures)
///     .build();
///
/// assert!(closing.is_cancellable());
/// ```
pub struct EventTypeBuilder<E: Event> {
    name: Arc<str>,
    cancellable: bool,
    propagation_stoppable: bool,
    exception_handler: Arc<dyn ExceptionHandler<E>>,
}

impl<E: Event> EventTypeBuilder<E> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            cancellable: false,
            propagation_stoppable: false,
            exception_handler: Arc::new(Rethrow),
        }
    }

    /// Sets whether events of this type may be cancelled. Default: false.
    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.cancellable = cancellable;
        self
    }

    /// Sets whether a callback may prevent subsequent callbacks from being
    /// invoked. Default: false.
    pub fn can_stop_propagation(mut self, stoppable: bool) -> Self {
        self.propagation_stoppable = stoppable;
        self
    }

    /// Sets the policy for callback failures. Default: [`Rethrow`].
    pub fn exception_handler<H>(mut self, handler: H) -> Self
    where
        H: ExceptionHandler<E> + 'static,
    {
        self.exception_handler = Arc::new(handler);
        self
    }

    /// Sets an already shared exception handler, e.g. one used by several types.
    pub fn shared_exception_handler(mut self, handler: Arc<dyn ExceptionHandler<E>>) -> Self {
        self.exception_handler = handler;
        self
    }

    /// Sets a closure as the exception handler.
    pub fn on_exception<F>(self, f: F) -> Self
    where
        F: Fn(&mut E, CallbackFailure) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.exception_handler(f)
    }

    pub fn build(self) -> Arc<EventType<E>> {
        Arc::new(EventType::from_builder(
            self.name,
            self.cancellable,
            self.propagation_stoppable,
            self.exception_handler,
        ))
    }
}
