use super::{
    backend::{ActiveBackend, Backend},
    exception::Exception,
    handler::Handler,
    in_flight::InFlight,
};
use core::any::Any;

type CatchAll<'a> = Box<dyn FnOnce(Box<dyn Any + Send>) + 'a>;

/// How a thrown value is matched against typed handlers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Resolution {
    /// Exact type first, then the first handler whose parameter type the value converts to, then
    /// the catch-all.
    #[default]
    Coercing,
    /// Exact type, then the catch-all.
    Exact,
}

/// A protected call under construction.
///
/// Create one with [`r#try`] or [`Tryer::new`], register handlers with [`catch`](Tryer::catch)
/// and [`catch_all`](Tryer::catch_all), then run it with [`finally`](Tryer::finally) or
/// [`go`](Tryer::go). Running consumes the `Tryer`, so each one guards exactly one call.
///
/// Closures may borrow from the enclosing scope. Since handlers and the finalizer are alive at the
/// same time, state they share needs a [`Cell`](core::cell::Cell) or
/// [`RefCell`](core::cell::RefCell):
///
/// ```rust
/// use std::cell::RefCell;
/// use tryer::{r#try, throw};
///
/// let log = RefCell::new(String::new());
/// r#try(|| throw(1i32))
///     .catch(|_: i32| log.borrow_mut().push('C'))
///     .finally(|| log.borrow_mut().push('F'));
/// assert_eq!(log.into_inner(), "CF");
/// ```
///
/// Handlers take exactly one value, which the compiler enforces:
///
/// ```compile_fail
/// tryer::r#try(|| {}).catch(|| {}).go();
/// ```
#[must_use = "a Tryer does nothing until `finally` or `go` is called"]
pub struct Tryer<'a> {
    guarded: Box<dyn FnOnce() + 'a>,
    handlers: Vec<Handler<'a>>,
    catch_all: Option<CatchAll<'a>>,
    resolution: Resolution,
}

/// Start a protected call of `guarded`. Shorthand for [`Tryer::new`].
pub fn r#try<'a>(guarded: impl FnOnce() + 'a) -> Tryer<'a> {
    Tryer::new(guarded)
}

impl<'a> Tryer<'a> {
    /// Wrap `guarded` without running it.
    pub fn new(guarded: impl FnOnce() + 'a) -> Self {
        Self {
            guarded: Box::new(guarded),
            handlers: Vec::new(),
            catch_all: None,
            resolution: Resolution::default(),
        }
    }

    /// Handle values of type `T`.
    ///
    /// A later handler for the same `T` replaces an earlier one.
    ///
    /// # Panics
    ///
    /// Panics with a [`ConfigError`](crate::ConfigError) payload if `T` is `()` or the raw payload
    /// type (`Box<dyn Any + Send>` or [`Exception`]). Such handlers belong in
    /// [`catch_all`](Tryer::catch_all).
    pub fn catch<T: Any + Send>(mut self, handler: impl FnOnce(T) + 'a) -> Self {
        let handler = Handler::new(handler);
        match self
            .handlers
            .iter_mut()
            .find(|registered| registered.key() == handler.key())
        {
            Some(registered) => *registered = handler,
            None => self.handlers.push(handler),
        }
        self
    }

    /// Handle anything no typed handler takes, replacing the previous catch-all.
    ///
    /// Without a catch-all, unhandled values are re-raised to the caller once the finalizer has
    /// run. The handler receives the raw value, which is a panic message for ordinary panics.
    pub fn catch_all(mut self, handler: impl FnOnce(Box<dyn Any + Send>) + 'a) -> Self {
        self.catch_all = Some(Box::new(handler));
        self
    }

    /// Swallow anything no typed handler takes.
    pub fn ignore(self) -> Self {
        self.catch_all(drop)
    }

    /// Choose how thrown values are matched against typed handlers.
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Only dispatch to handlers of the exact thrown type, skipping conversions.
    pub fn exact_only(self) -> Self {
        self.resolution(Resolution::Exact)
    }

    /// Run the guarded function, dispatch what it throws, then run `finalizer`.
    ///
    /// `finalizer` runs exactly once on every path: after normal completion, after a handler
    /// returns, and after a handler threw or a value was re-raised. In the last two cases the
    /// escaping value continues to the caller once `finalizer` returns. If `finalizer` itself
    /// throws, its value replaces the escaping one.
    pub fn finally(self, finalizer: impl FnOnce()) {
        let Self {
            guarded,
            handlers,
            catch_all,
            resolution,
        } = self;

        let exception = match ActiveBackend::intercept(guarded) {
            Ok(()) => return finalizer(),
            Err(payload) => Exception::from_panic(payload),
        };
        log::trace!(
            "intercepted {}",
            if exception.is_thrown() { "thrown value" } else { "panic" }
        );
        let in_flight = InFlight::enter(&exception);
        let escaped =
            ActiveBackend::intercept(|| dispatch(handlers, catch_all, resolution, exception));
        finalizer();
        drop(in_flight);
        if let Err(payload) = escaped {
            ActiveBackend::resume(payload);
        }
    }

    /// Run with an empty finalizer.
    pub fn go(self) {
        self.finally(|| {});
    }
}

/// Which handler a value goes to.
#[derive(Debug)]
enum Resolved {
    Exact(usize),
    Coerced(usize, Box<dyn Any + Send>),
    Fallback,
}

fn resolve(
    handlers: &[Handler<'_>],
    cause: &(dyn Any + Send),
    resolution: Resolution,
) -> Resolved {
    if let Some(index) = handlers.iter().position(|handler| handler.key().matches(cause)) {
        return Resolved::Exact(index);
    }
    if resolution == Resolution::Coercing {
        if let Some((index, value)) = handlers
            .iter()
            .enumerate()
            .find_map(|(index, handler)| Some((index, handler.coerce(cause)?)))
        {
            return Resolved::Coerced(index, value);
        }
    }
    Resolved::Fallback
}

fn dispatch(
    mut handlers: Vec<Handler<'_>>,
    catch_all: Option<CatchAll<'_>>,
    resolution: Resolution,
    exception: Exception,
) {
    let exception = match resolve(&handlers, exception.cause(), resolution) {
        Resolved::Exact(index) => {
            let handler = handlers.swap_remove(index);
            log::trace!("dispatching to handler for `{}`", handler.key().name());
            match handler.invoke(exception.cause) {
                Ok(()) => return,
                Err(cause) => Exception { cause, ..exception },
            }
        }
        Resolved::Coerced(index, value) => {
            let handler = handlers.swap_remove(index);
            log::trace!("dispatching converted value to handler for `{}`", handler.key().name());
            match handler.invoke(value) {
                Ok(()) => return,
                Err(_) => exception,
            }
        }
        Resolved::Fallback => exception,
    };

    match catch_all {
        Some(catch_all) => {
            log::trace!("dispatching to catch-all");
            catch_all(exception.into_cause());
        }
        None => {
            log::debug!("no handler matched; re-raising");
            exception.resume();
        }
    }
}
