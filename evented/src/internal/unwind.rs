use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::{BoxError, CallbackFailure};

/// Runs `f`, turning both an `Err` and a panic into a [`CallbackFailure`].
pub(crate) fn catch_failure<F>(f: F) -> Result<(), CallbackFailure>
where
    F: FnOnce() -> Result<(), BoxError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(CallbackFailure::Error(err)),
        Err(payload) => Err(CallbackFailure::from_panic(payload)),
    }
}
