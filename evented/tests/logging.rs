//! The logging exception policy reports failures through `tracing`.

use std::{
    io,
    sync::{Arc, Mutex},
};

use std::backtrace::Backtrace;

use evented::{CallbackFailure, EventType, ExceptionHandler, LogFailures, SimpleEvent, Suppress};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn capture_all(out: &Captured) -> impl tracing::Subscriber + Send + Sync + use<> {
    let writer = out.clone();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish()
}

#[derive(Debug, thiserror::Error)]
#[error("could not persist")]
struct PersistFailed(#[source] io::Error);

#[test]
fn test_log_policy_records_event_and_chain() {
    let out = Captured::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::ERROR)
        .with_writer(move || writer.clone())
        .finish();

    let ty = EventType::<SimpleEvent>::builder("closing")
        .exception_handler(LogFailures)
        .build();
    ty.add_fn(|_: &mut SimpleEvent| Err(PersistFailed(io::Error::other("disk full")).into()));
    ty.add_fn(|_: &mut SimpleEvent| panic!("callback bug"));

    let result = tracing::subscriber::with_default(subscriber, || ty.trigger_with(SimpleEvent::new));
    assert!(result.is_ok());

    let logged = out.text();
    assert_eq!(logged.matches("Exception while invoking event").count(), 2);
    assert!(logged.contains("closing"));
    assert!(logged.contains("could not persist"));
    assert!(logged.contains("disk full"));
    assert!(logged.contains("callback bug"));
}

#[test]
fn test_suppress_policy_logs_no_failure_text() {
    let out = Captured::default();
    let ty = EventType::<SimpleEvent>::builder("quiet")
        .exception_handler(Suppress)
        .build();
    ty.add_fn(|_: &mut SimpleEvent| Err("secret failure".into()));
    ty.add_fn(|_: &mut SimpleEvent| panic!("secret panic"));

    let result = tracing::subscriber::with_default(capture_all(&out), || ty.trigger_with(SimpleEvent::new));
    assert!(result.is_ok());

    let logged = out.text();
    assert!(!logged.contains("secret failure"));
    assert!(!logged.contains("secret panic"));
    assert!(!logged.contains("ERROR"));
    assert!(!logged.contains("WARN"));
}

#[test]
fn test_log_policy_reports_each_failure_once() {
    let out = Captured::default();
    let ty = EventType::<SimpleEvent>::builder("once")
        .exception_handler(LogFailures)
        .build();
    ty.add_fn(|_: &mut SimpleEvent| Err("flush failed".into()));

    tracing::subscriber::with_default(capture_all(&out), || ty.trigger_with(SimpleEvent::new)).unwrap();

    let logged = out.text();
    assert_eq!(logged.matches("flush failed").count(), 1);
    assert_eq!(logged.matches("Exception while invoking event").count(), 1);
}

#[test]
fn test_log_policy_includes_panic_backtrace() {
    let out = Captured::default();
    let ty = EventType::<SimpleEvent>::builder("crashing").build();
    let mut event = SimpleEvent::new(&ty);
    let failure = CallbackFailure::Panic {
        message: "index out of bounds".into(),
        backtrace: Backtrace::force_capture(),
    };

    let result = tracing::subscriber::with_default(capture_all(&out), || {
        LogFailures.handle_exception(&mut event, failure)
    });
    assert!(result.is_ok());

    let logged = out.text();
    assert!(logged.contains("index out of bounds"));
    assert!(logged.contains("backtrace="));
}
