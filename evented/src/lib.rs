//! Evented - typed, ordered, synchronous event dispatch
//!
//! An [`EventType`] is a named channel for events of one Rust type. Callbacks
//! registered on it run in insertion order whenever an event is triggered.
//! Types can allow callbacks to cancel events or stop them from reaching the
//! remaining callbacks, and they own the policy that decides what happens
//! when a callback fails.
//!
//! ```rust
//! use evented::{Event, EventState, EventType};
//!
//! #[derive(Event)]
//! struct Saved {
//!     #[event]
//!     state: EventState<Saved>,
//!     path: String,
//! }
//!
//! let saved = EventType::<Saved>::builder("saved").cancellable(true).build();
//! saved.add_fn(|e: &mut Saved| {
//!     if e.path.ends_with(".tmp") {
//!         e.cancel()?;
//!     }
//!     Ok(())
//! });
//!
//! let event = saved.trigger_with(|ty| Saved {
//!     state: EventState::new(ty),
//!     path: "notes.tmp".into(),
//! })?;
//! assert!(event.is_cancelled());
//! # Ok::<(), evented::Error>(())
//! ```
//!
//! See `examples/hello-world.rs` and `examples/cancellation.rs`.

mod callback;
mod error;
mod event;
mod event_class;
mod event_type;
mod event_type_builder;
mod exception;
mod exception_handler;

mod internal;

pub use callback::{Callback, SharedCallback, callback};
pub use error::Error;
pub use event::{Event, EventState, SimpleEvent};
pub use event_class::EventClass;
pub use event_type::EventType;
pub use event_type_builder::EventTypeBuilder;
pub use exception::{BoxError, CallbackFailure, CallbackResult, EventException};
pub use exception_handler::{ExceptionHandler, LogFailures, Rethrow, Suppress};

#[cfg(feature = "macros")]
pub use evented_macros::Event;

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::callback::{SharedCallback, callback};
    pub use crate::error::Error as EventedError;
    pub use crate::Event;
    pub use crate::event::EventState;
    pub use crate::event_type::EventType;
    pub use crate::exception::{CallbackFailure, CallbackResult};
    pub use crate::exception_handler::{ExceptionHandler, LogFailures, Rethrow, Suppress};
}
