use super::{exception::Exception, trace::Trace};
use core::cell::RefCell;
use core::marker::PhantomData;

std::thread_local! {
    /// Exceptions whose handlers or finalizers are currently running on this thread, innermost
    /// last. `None` marks an exception without a captured trace.
    static IN_FLIGHT: RefCell<Vec<Option<Trace>>> = const { RefCell::new(Vec::new()) };
}

/// Registration of a caught exception as being handled.
///
/// While this guard lives, [`find_origin`](crate::find_origin) reports on the exception it was
/// created for. Guards must be dropped in reverse order of creation, which holds as long as they
/// are bound to a scope.
// Type invariant: the entry pushed by `enter` is at the top of the stack until `drop`.
pub(crate) struct InFlight {
    _not_send: PhantomData<*const ()>,
}

impl InFlight {
    pub fn enter(exception: &Exception) -> Self {
        IN_FLIGHT.with_borrow_mut(|stack| stack.push(exception.trace.clone()));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        IN_FLIGHT.with_borrow_mut(|stack| {
            stack.pop();
        });
    }
}

/// Run `f` on the trace of the innermost exception being handled, if any.
pub(crate) fn with_innermost<R>(f: impl FnOnce(Option<&mut Trace>) -> R) -> R {
    IN_FLIGHT.with_borrow_mut(|stack| f(stack.last_mut().and_then(Option::as_mut)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::{ActiveBackend, Backend};

    fn depth() -> usize {
        IN_FLIGHT.with_borrow(Vec::len)
    }

    fn caught(f: impl FnOnce()) -> Exception {
        Exception::from_panic(ActiveBackend::intercept(f).unwrap_err())
    }

    #[test]
    fn nothing_in_flight() {
        assert!(with_innermost(|trace| trace.is_none()));
    }

    #[test]
    fn guards_nest() {
        let outer = caught(|| crate::throw(1i32));
        let inner = caught(|| std::panic::panic_any(2i32));
        assert_eq!(depth(), 0);
        {
            let _outer = InFlight::enter(&outer);
            assert_eq!(depth(), 1);
            #[cfg(feature = "origin")]
            assert!(with_innermost(|trace| trace.is_some()));
            {
                let _inner = InFlight::enter(&inner);
                assert_eq!(depth(), 2);
                assert!(with_innermost(|trace| trace.is_none()));
            }
            assert_eq!(depth(), 1);
        }
        assert_eq!(depth(), 0);
    }

    #[test]
    fn guard_pops_during_unwind() {
        let exception = caught(|| crate::throw(1i32));
        let _ = ActiveBackend::intercept(|| {
            let _guard = InFlight::enter(&exception);
            std::panic::panic_any(0u8);
        });
        assert_eq!(depth(), 0);
    }
}
