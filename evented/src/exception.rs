use std::{
    any::Any,
    backtrace::{Backtrace, BacktraceStatus},
    error::Error as StdError,
    fmt,
};

/// Boxed, thread-safe error used for callback and handler failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Outcome of a single callback invocation.
pub type CallbackResult = std::result::Result<(), BoxError>;

/// A failure produced by a callback while handling an event.
///
/// Callbacks fail either by returning `Err` or by panicking. Both are caught
/// by the dispatch loop and handed to the event type's
/// [`ExceptionHandler`](crate::ExceptionHandler).
///
/// The backtrace of a panic is captured where the unwind was caught, following
/// `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`; it shows the dispatch path that led
/// to the failing callback.
#[derive(Debug)]
pub enum CallbackFailure {
    Error(BoxError),
    Panic {
        message: String,
        backtrace: Backtrace,
    },
}

impl CallbackFailure {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        CallbackFailure::Panic {
            message,
            backtrace: Backtrace::capture(),
        }
    }

    /// A panic failure without a backtrace.
    pub fn panic(message: impl Into<String>) -> Self {
        CallbackFailure::Panic {
            message: message.into(),
            backtrace: Backtrace::disabled(),
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, CallbackFailure::Panic { .. })
    }

    /// The captured backtrace, if this is a panic and capturing was enabled.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            CallbackFailure::Panic { backtrace, .. }
                if backtrace.status() == BacktraceStatus::Captured =>
            {
                Some(backtrace)
            }
            _ => None,
        }
    }

    /// Converts the failure into a boxed error, unwrapping `Error` as-is.
    pub fn into_error(self) -> BoxError {
        match self {
            CallbackFailure::Error(err) => err,
            panic @ CallbackFailure::Panic { .. } => Box::new(panic),
        }
    }
}

impl fmt::Display for CallbackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackFailure::Error(err) => write!(f, "{err}"),
            CallbackFailure::Panic { message, .. } => write!(f, "panicked: {message}"),
        }
    }
}

impl StdError for CallbackFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CallbackFailure::Error(err) => err.source(),
            CallbackFailure::Panic { .. } => None,
        }
    }
}

/// Failure surfaced by [`EventType::trigger`](crate::EventType::trigger) when
/// the exception handler failed for one or more callbacks.
///
/// The first handler failure of a dispatch is the cause; every later one is
/// kept in [`suppressed`](EventException::suppressed), in the order it occurred.
/// Exception handlers may also return an `EventException` themselves, in which
/// case it is used as the primary failure without further wrapping.
///
/// An `EventException` always has a cause.
#[derive(Debug)]
pub struct EventException {
    message: Option<String>,
    cause: BoxError,
    suppressed: Vec<BoxError>,
}

impl EventException {
    pub fn new(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: Some(message.into()),
            cause: cause.into(),
            suppressed: Vec::new(),
        }
    }

    /// Wraps a cause without an additional message.
    pub fn from_cause(cause: impl Into<BoxError>) -> Self {
        Self {
            message: None,
            cause: cause.into(),
            suppressed: Vec::new(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    pub fn into_cause(self) -> BoxError {
        self.cause
    }

    pub fn suppressed(&self) -> &[BoxError] {
        &self.suppressed
    }

    pub fn add_suppressed(&mut self, err: impl Into<BoxError>) {
        self.suppressed.push(err.into());
    }
}

impl fmt::Display for EventException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{msg}: {}", self.cause)?,
            None => write!(f, "{}", self.cause)?,
        }
        for err in &self.suppressed {
            write!(f, "\n  suppressed: {err}")?;
        }
        Ok(())
    }
}

impl StdError for EventException {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct Fire;

    #[test]
    fn test_display_includes_message_cause_and_suppressed() {
        let mut exc = EventException::new("Exception while invoking event 'save'", Fire);
        exc.add_suppressed("second");
        exc.add_suppressed("third");

        assert_eq!(
            exc.to_string(),
            "Exception while invoking event 'save': disk on fire\n  suppressed: second\n  suppressed: third"
        );
        assert_eq!(exc.suppressed().len(), 2);
    }

    #[test]
    fn test_source_is_cause() {
        let exc = EventException::from_cause(Fire);
        let source = exc.source().expect("cause must be present");
        assert!(source.downcast_ref::<Fire>().is_some());
        assert_eq!(exc.message(), None);
        assert_eq!(exc.to_string(), "disk on fire");
    }

    #[test]
    fn test_failure_into_error_unwraps_callback_error() {
        let failure = CallbackFailure::Error(Box::new(Fire));
        assert!(failure.into_error().downcast_ref::<Fire>().is_some());

        let panic = CallbackFailure::panic("boom");
        assert!(panic.is_panic());
        assert!(panic.backtrace().is_none());
        assert_eq!(panic.into_error().to_string(), "panicked: boom");
    }

    #[test]
    fn test_backtrace_only_when_captured() {
        let captured = CallbackFailure::Panic {
            message: "boom".into(),
            backtrace: Backtrace::force_capture(),
        };
        assert!(captured.backtrace().is_some());
        assert!(CallbackFailure::Error("plain".into()).backtrace().is_none());
    }

    #[test]
    fn test_panic_payload_message() {
        let failure = CallbackFailure::from_panic(Box::new("static str"));
        assert_eq!(failure.to_string(), "panicked: static str");

        let failure = CallbackFailure::from_panic(Box::new(String::from("owned")));
        assert_eq!(failure.to_string(), "panicked: owned");

        let failure = CallbackFailure::from_panic(Box::new(42_u8));
        assert_eq!(failure.to_string(), "panicked: non-string panic payload");
    }
}
