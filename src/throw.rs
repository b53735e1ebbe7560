use super::{exception::raise, trace::Frame};
use core::any::Any;

/// Functions whose frames sit between a throw's call site and the unwind root.
const THROW_HELPERS: &[&str] = &[
    "throw",
    "throw_if_false",
    "throw_if_false_with",
    "throw_if_error",
    "throw_if_error_with",
];

/// Whether `frame` belongs to one of the throw helpers in this module, closures and generic
/// instances included.
pub(crate) fn is_throw_helper(frame: &Frame) -> bool {
    let Some(rest) = frame
        .function
        .as_deref()
        .and_then(|name| name.strip_prefix(concat!(module_path!(), "::")))
    else {
        return false;
    };
    let helper = rest.split("::").next().unwrap_or(rest);
    THROW_HELPERS.contains(&helper)
}

// The helpers below are `#[inline(never)]` so that origin tracing can recognize their frames.

/// Throw an exception.
///
/// Any `Send + 'static` value can be thrown. It unwinds to the closest [`Tryer`](crate::Tryer),
/// which dispatches it to a handler.
///
/// If uncaught, exceptions eventually terminate the process or the thread. Unlike a panic, that
/// happens silently: the panic hook is not invoked, so no message is printed. A plain
/// [`std::panic::catch_unwind`] receives the value wrapped in an [`Exception`](crate::Exception).
///
/// # Example
///
/// ```should_panic
/// tryer::throw("Oops!");
/// ```
#[inline(never)]
pub fn throw<E: Any + Send>(cause: E) -> ! {
    raise(Box::new(cause))
}

/// Throw `cause` if `condition` is false.
///
/// ```rust
/// use tryer::{r#try, throw_if_false};
///
/// let mut caught = None;
/// r#try(|| throw_if_false(1 + 1 == 3, "math is broken"))
///     .catch(|message: &'static str| caught = Some(message))
///     .go();
/// assert_eq!(caught, Some("math is broken"));
/// ```
#[inline(never)]
pub fn throw_if_false<E: Any + Send>(condition: bool, cause: E) {
    if !condition {
        throw(cause);
    }
}

/// Throw the result of `factory` if `condition` is false.
///
/// `factory` is only called when the exception is actually thrown.
#[inline(never)]
pub fn throw_if_false_with<E: Any + Send>(condition: bool, factory: impl FnOnce() -> E) {
    if !condition {
        throw(factory());
    }
}

/// Unwrap `result`, throwing `cause` if it is an error.
///
/// ```rust
/// use tryer::{r#try, throw_if_error};
///
/// let mut port = 0;
/// r#try(|| port = throw_if_error("8080".parse::<u16>(), "bad port"))
///     .go();
/// assert_eq!(port, 8080);
/// ```
#[inline(never)]
pub fn throw_if_error<T, Err, E: Any + Send>(result: Result<T, Err>, cause: E) -> T {
    match result {
        Ok(value) => value,
        Err(_) => throw(cause),
    }
}

/// Unwrap `result`, throwing the value `factory` makes from the error if there is one.
///
/// `factory` is only called when the exception is actually thrown.
#[inline(never)]
pub fn throw_if_error_with<T, Err, E: Any + Send>(
    result: Result<T, Err>,
    factory: impl FnOnce(Err) -> E,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => throw(factory(err)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Exception, r#try};
    use core::cell::{Cell, RefCell};

    fn thrown<T: Any + Copy>(f: impl FnOnce()) -> Option<T> {
        let payload = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).err()?;
        Exception::from_panic(payload).downcast_ref::<T>().copied()
    }

    #[test]
    fn uncaught_throw_is_wrapped_for_catch_unwind() {
        let payload = std::panic::catch_unwind(|| throw(5u32)).unwrap_err();
        assert!(payload.downcast_ref::<u32>().is_none());
        let exception = Exception::from_panic(payload);
        assert!(exception.is_thrown());
        assert!(exception.is::<u32>());
    }

    fn named(function: &str) -> Frame {
        Frame {
            function: Some(function.into()),
            ..Frame::default()
        }
    }

    #[test]
    fn helper_frames() {
        assert!(is_throw_helper(&named("tryer::throw::throw")));
        assert!(is_throw_helper(&named("tryer::throw::throw_if_false_with")));
        assert!(is_throw_helper(&named("tryer::throw::throw_if_error::<u8, (), i32>")));
        assert!(is_throw_helper(&named("tryer::throw::throw_if_error_with::{{closure}}")));
        assert!(!is_throw_helper(&named("tryer::throw::test::helper_frames")));
        assert!(!is_throw_helper(&named("tryer::exception::raise")));
        assert!(!is_throw_helper(&named("user::throw")));
        assert!(!is_throw_helper(&Frame::default()));
    }

    #[test]
    fn throw_carries_value() {
        assert_eq!(thrown::<i32>(|| throw(3i32)), Some(3));
    }

    #[test]
    fn throw_if_false_only_on_false() {
        throw_if_false(true, 1i32);
        assert_eq!(thrown::<i32>(|| throw_if_false(false, 1i32)), Some(1));
    }

    #[test]
    fn throw_if_false_with_is_lazy() {
        let calls = Cell::new(0);
        let factory = || {
            calls.set(calls.get() + 1);
            2i32
        };
        throw_if_false_with(true, factory);
        assert_eq!(calls.get(), 0);
        assert_eq!(thrown::<i32>(|| throw_if_false_with(false, factory)), Some(2));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn throw_if_error_returns_ok_value() {
        assert_eq!(throw_if_error(Ok::<_, ()>(5u8), 1i32), 5);
        assert_eq!(
            thrown::<i32>(|| {
                throw_if_error(Err::<(), _>(anyhow::anyhow!("test")), 2i32);
            }),
            Some(2),
        );
    }

    #[test]
    fn throw_if_error_with_gets_error() {
        let seen = RefCell::new(None);
        let calls = Cell::new(0);
        throw_if_error_with(Ok::<_, std::io::Error>(()), |_| calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 0);

        r#try(|| {
            throw_if_error_with(Err::<(), _>("disk full"), |err| format!("write failed: {err}"));
        })
        .catch(|message: String| *seen.borrow_mut() = Some(message))
        .go();
        assert_eq!(seen.into_inner().as_deref(), Some("write failed: disk full"));
    }
}
