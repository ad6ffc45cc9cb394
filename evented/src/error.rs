use std::sync::Arc;

use crate::EventException;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot trigger event '{expected}' with an event created for another type ('{actual}')")]
    ForeignEvent { expected: Arc<str>, actual: Arc<str> },

    #[error("Event '{0}' is not cancellable")]
    NotCancellable(Arc<str>),

    #[error("Event '{0}' cannot be stopped from propagation")]
    PropagationNotStoppable(Arc<str>),

    #[error(transparent)]
    Dispatch(#[from] EventException),
}

impl Error {
    /// Returns the aggregated dispatch failure, if this is one.
    pub fn as_dispatch(&self) -> Option<&EventException> {
        match self {
            Error::Dispatch(exc) => Some(exc),
            _ => None,
        }
    }

    /// True for contract violations by the caller, as opposed to callback failures.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, Error::Dispatch(_))
    }
}
