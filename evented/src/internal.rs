mod callback_set;
mod unwind;

pub(crate) use callback_set::CallbackSet;
pub(crate) use unwind::catch_failure;
