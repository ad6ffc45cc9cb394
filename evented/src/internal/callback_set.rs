use crate::{Event, SharedCallback, callback::same_callback};

/// Insertion-ordered set of callbacks, unique by allocation.
pub(crate) struct CallbackSet<E: Event> {
    callbacks: Vec<SharedCallback<E>>,
}

impl<E: Event> CallbackSet<E> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Appends the callback, moving it to the end if already present.
    /// Returns true if the callback was already registered.
    pub fn insert_last(&mut self, callback: SharedCallback<E>) -> bool {
        let moved = self.remove(&callback);
        self.callbacks.push(callback);
        moved
    }

    pub fn remove(&mut self, callback: &SharedCallback<E>) -> bool {
        match self.position(callback) {
            Some(idx) => {
                self.callbacks.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, callback: &SharedCallback<E>) -> bool {
        self.position(callback).is_some()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Clones the handles in invocation order.
    pub fn snapshot(&self) -> Vec<SharedCallback<E>> {
        self.callbacks.clone()
    }

    fn position(&self, callback: &SharedCallback<E>) -> Option<usize> {
        self.callbacks.iter().position(|c| same_callback(c, callback))
    }
}
