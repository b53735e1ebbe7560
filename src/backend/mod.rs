use core::any::Any;

/// An unwinding backend.
///
/// Unwinding is a mechanism of forcefully "returning" through multiple call frames, called
/// *raising*, up until a special call frame, called *interceptor*. This roughly corresponds to the
/// `resume_unwind`/`catch_unwind` pair on Rust and `throw`/`catch` pair on C++.
///
/// It's crucial that unwinding doesn't require (source-level) cooperation from the intermediate
/// call frames.
///
/// Backends treat payloads as opaque. Whether a payload is an [`Exception`](crate::Exception)
/// thrown by this crate or a foreign panic is decided by the caller of [`Backend::intercept`].
///
/// Implementations must ensure that a raised payload is delivered to the closest (most nested)
/// `intercept` frame, exactly once, and that all destructors of locals are run during unwinding, as
/// if `return` was called.
pub trait Backend {
    /// Abort the current call chain, carrying `payload` to the closest interceptor.
    fn resume(payload: Box<dyn Any + Send>) -> !;

    /// Run `func`, stopping any unwinding that escapes it.
    ///
    /// This function returns `Ok` if the function returns normally, or `Err` with the payload if
    /// it unwinds.
    fn intercept<Func: FnOnce() -> R, R>(func: Func) -> Result<R, Box<dyn Any + Send>>;
}

#[path = "panic.rs"]
mod imp;

pub(crate) use imp::ActiveBackend;
