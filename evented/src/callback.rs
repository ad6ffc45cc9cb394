use std::sync::Arc;

use crate::{CallbackResult, Event};

/// A unit of application logic invoked with an event during dispatch.
///
/// Closures of the form `Fn(&mut E) -> CallbackResult` implement this trait.
/// Callbacks are registered as [`SharedCallback`]s and identified by their
/// allocation: registering the same `Arc` twice moves it instead of adding
/// a second entry.
pub trait Callback<E: Event>: Send + Sync {
    fn handle(&self, event: &mut E) -> CallbackResult;
}

impl<E, F> Callback<E> for F
where
    E: Event,
    F: Fn(&mut E) -> CallbackResult + Send + Sync,
{
    fn handle(&self, event: &mut E) -> CallbackResult {
        self(event)
    }
}

pub type SharedCallback<E> = Arc<dyn Callback<E>>;

/// Wraps a closure into a [`SharedCallback`].
///
/// Keep the returned handle to remove the callback later.
pub fn callback<E, F>(f: F) -> SharedCallback<E>
where
    E: Event,
    F: Fn(&mut E) -> CallbackResult + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn same_callback<E: Event>(a: &SharedCallback<E>, b: &SharedCallback<E>) -> bool {
    // Vtable pointers may differ across codegen units; compare the data address only.
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
