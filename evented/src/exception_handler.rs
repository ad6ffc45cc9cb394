use std::error::Error as StdError;

use crate::{BoxError, CallbackFailure, Event};

/// Handles failures of callbacks during dispatch.
///
/// Returning `Err` from a handler makes the dispatch fail: the first handler
/// error of a [`trigger`](crate::EventType::trigger) call becomes the primary
/// [`EventException`](crate::EventException), later ones are attached as
/// suppressed. Dispatch still continues with the remaining callbacks.
///
/// The handler gets the live event, so it may cancel it or stop its
/// propagation; [`Event::must_propagate`] is checked right after it returns.
///
/// Closures `Fn(&mut E, CallbackFailure) -> Result<(), BoxError>` implement this
/// trait; see also [`EventTypeBuilder::on_exception`](crate::EventTypeBuilder::on_exception).
pub trait ExceptionHandler<E: Event>: Send + Sync {
    fn handle_exception(&self, event: &mut E, failure: CallbackFailure) -> Result<(), BoxError>;
}

impl<E, F> ExceptionHandler<E> for F
where
    E: Event,
    F: Fn(&mut E, CallbackFailure) -> Result<(), BoxError> + Send + Sync,
{
    fn handle_exception(&self, event: &mut E, failure: CallbackFailure) -> Result<(), BoxError> {
        self(event, failure)
    }
}

/// Passes every callback failure on as a dispatch failure. The default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rethrow;

impl<E: Event> ExceptionHandler<E> for Rethrow {
    fn handle_exception(&self, _event: &mut E, failure: CallbackFailure) -> Result<(), BoxError> {
        Err(failure.into_error())
    }
}

/// Logs callback failures, including their source chain, and carries on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFailures;

impl<E: Event> ExceptionHandler<E> for LogFailures {
    fn handle_exception(&self, event: &mut E, failure: CallbackFailure) -> Result<(), BoxError> {
        match failure.backtrace() {
            Some(backtrace) => tracing::error!(
                event = %event.name(),
                panic = failure.is_panic(),
                trace = %render_chain(&failure),
                backtrace = %backtrace,
                "Exception while invoking event"
            ),
            None => tracing::error!(
                event = %event.name(),
                panic = failure.is_panic(),
                trace = %render_chain(&failure),
                "Exception while invoking event"
            ),
        }
        Ok(())
    }
}

/// Silently discards callback failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Suppress;

impl<E: Event> ExceptionHandler<E> for Suppress {
    fn handle_exception(&self, _event: &mut E, _failure: CallbackFailure) -> Result<(), BoxError> {
        Ok(())
    }
}

fn render_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
