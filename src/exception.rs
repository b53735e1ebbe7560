use super::{
    backend::{ActiveBackend, Backend},
    trace::Trace,
};
use core::any::Any;
use core::fmt;

/// Qualified name of [`raise`], the function every throw ends in.
pub(crate) const UNWIND_ROOT: &str = concat!(module_path!(), "::raise");

/// A caught value, along with where it came from.
///
/// Values thrown by [`throw`](crate::throw) and friends travel through the panic runtime wrapped in
/// an `Exception`. [`Tryer`](crate::Tryer) unwraps them before calling handlers, so most code
/// never sees this type. It is only needed when a thrown value escapes to a plain
/// [`std::panic::catch_unwind`]:
///
/// ```rust
/// use tryer::{Exception, throw};
///
/// let payload = std::panic::catch_unwind(|| throw(404u16)).unwrap_err();
/// let exception = Exception::from_panic(payload);
/// assert!(exception.is_thrown());
/// assert_eq!(exception.downcast_ref::<u16>(), Some(&404));
/// ```
pub struct Exception {
    pub(crate) cause: Box<dyn Any + Send>,
    pub(crate) thrown: bool,
    pub(crate) trace: Option<Trace>,
}

impl Exception {
    /// Recover an exception from a panic payload.
    ///
    /// Payloads of panics that didn't go through this crate are wrapped as-is.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<Self>() {
            Ok(exception) => *exception,
            Err(payload) => Self {
                cause: payload,
                thrown: false,
                trace: None,
            },
        }
    }

    /// Whether the value was thrown by this crate, as opposed to a plain panic.
    #[must_use]
    pub const fn is_thrown(&self) -> bool {
        self.thrown
    }

    /// Borrow the thrown value.
    #[must_use]
    pub fn cause(&self) -> &(dyn Any + Send) {
        &*self.cause
    }

    /// Whether the thrown value is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.cause.is::<T>()
    }

    /// Borrow the thrown value as a `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.cause.downcast_ref()
    }

    /// Take the thrown value.
    #[must_use]
    pub fn into_cause(self) -> Box<dyn Any + Send> {
        self.cause
    }

    /// Continue unwinding with this exception, unchanged.
    ///
    /// Plain panics resume with their original payload, so outer code sees exactly what it would
    /// have seen without the interception.
    pub(crate) fn resume(self) -> ! {
        if self.thrown {
            ActiveBackend::resume(Box::new(self))
        } else {
            ActiveBackend::resume(self.cause)
        }
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exception")
            .field("cause", &self.cause)
            .field("thrown", &self.thrown)
            .finish_non_exhaustive()
    }
}

/// Start unwinding with `cause`.
///
/// This is the unwind root: origin tracing looks for this frame in the captured stack.
#[inline(never)]
pub(crate) fn raise(cause: Box<dyn Any + Send>) -> ! {
    let exception = Exception {
        cause,
        thrown: true,
        trace: Trace::capture(),
    };
    ActiveBackend::resume(Box::new(exception))
}
