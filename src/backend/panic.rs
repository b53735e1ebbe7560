use super::Backend;
use core::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

/// The std panic runtime.
///
/// [`resume_unwind`] skips the panic hook, so thrown values don't print panic messages.
pub(crate) struct ActiveBackend;

impl Backend for ActiveBackend {
    fn resume(payload: Box<dyn Any + Send>) -> ! {
        resume_unwind(payload)
    }

    fn intercept<Func: FnOnce() -> R, R>(func: Func) -> Result<R, Box<dyn Any + Send>> {
        // Handlers and finalizers may observe state `func` left half-updated.
        catch_unwind(AssertUnwindSafe(func))
    }
}
