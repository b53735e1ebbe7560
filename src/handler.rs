use super::{coerce::coerce, error::ConfigError, exception::Exception};
use core::any::{Any, TypeId, type_name};

/// Runtime identity of a handler's parameter type.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized>() -> Self {
        Self {
            id: typeid::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn is<T: ?Sized>(&self) -> bool {
        self.id == typeid::of::<T>()
    }

    /// Whether `cause` is exactly of this type.
    pub fn matches(&self, cause: &(dyn Any + Send)) -> bool {
        self.id == cause.type_id()
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

type Payload = Box<dyn Any + Send>;
type Invoke<'a> = Box<dyn FnOnce(Payload) -> Result<(), Payload> + 'a>;

/// A typed handler with its parameter type erased.
pub(crate) struct Handler<'a> {
    key: TypeKey,
    invoke: Invoke<'a>,
    coerce: fn(&(dyn Any + Send)) -> Option<Payload>,
}

impl<'a> Handler<'a> {
    /// Wrap `handler`, panicking with a [`ConfigError`] if it can never be called.
    pub fn new<T: Any + Send, F: FnOnce(T) + 'a>(handler: F) -> Self {
        let key = TypeKey::of::<T>();
        if let Some(error) = check_shape(key) {
            log::error!("rejecting handler registration: {error}");
            std::panic::panic_any(error);
        }
        Self {
            key,
            invoke: Box::new(move |cause: Payload| -> Result<(), Payload> {
                let cause = cause.downcast::<T>()?;
                handler(*cause);
                Ok(())
            }),
            coerce: |cause| coerce::<T>(cause).map(|value| Box::new(value) as Payload),
        }
    }

    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// Convert `cause` into this handler's parameter type.
    pub fn coerce(&self, cause: &(dyn Any + Send)) -> Option<Payload> {
        (self.coerce)(cause)
    }

    /// Call the handler. A value of the wrong type is handed back untouched.
    pub fn invoke(self, cause: Payload) -> Result<(), Payload> {
        (self.invoke)(cause)
    }
}

fn check_shape(key: TypeKey) -> Option<ConfigError> {
    if key.is::<()>() {
        Some(ConfigError::UnitParameter(key.name()))
    } else if key.is::<Box<dyn Any + Send>>() || key.is::<Exception>() {
        Some(ConfigError::RawPayload(key.name()))
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::cell::Cell;

    fn config_error(f: impl FnOnce()) -> Option<ConfigError> {
        let payload = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).err()?;
        payload.downcast_ref::<ConfigError>().cloned()
    }

    #[test]
    fn keys() {
        let key = TypeKey::of::<u32>();
        assert!(key.is::<u32>());
        assert!(!key.is::<i32>());
        assert!(key.matches(&5u32));
        assert!(!key.matches(&5i32));
        assert_eq!(key, TypeKey::of::<u32>());
        assert_eq!(key.name(), "u32");
    }

    #[test]
    fn invoke_matching() {
        let seen = Cell::new(0);
        let handler = Handler::new(|value: u32| seen.set(value));
        assert!(handler.invoke(Box::new(9u32)).is_ok());
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn invoke_mismatch_hands_value_back() {
        let handler = Handler::new(|_: u32| unreachable!());
        let cause = handler.invoke(Box::new("nope")).unwrap_err();
        assert_eq!(*cause.downcast::<&'static str>().unwrap(), "nope");
    }

    #[test]
    fn coerce_through_table() {
        let handler = Handler::new(|_: i64| {});
        let value = handler.coerce(&7u8).unwrap();
        assert_eq!(*value.downcast::<i64>().unwrap(), 7);
        assert!(handler.coerce(&"7").is_none());
    }

    #[test]
    fn unit_parameter_is_rejected() {
        assert_eq!(
            config_error(|| drop(Handler::new(|(): ()| {}))),
            Some(ConfigError::UnitParameter("()")),
        );
    }

    #[test]
    fn raw_payload_is_rejected() {
        assert!(matches!(
            config_error(|| drop(Handler::new(|_: Box<dyn Any + Send>| {}))),
            Some(ConfigError::RawPayload(_)),
        ));
        assert!(matches!(
            config_error(|| drop(Handler::new(|_: Exception| {}))),
            Some(ConfigError::RawPayload(_)),
        ));
    }
}
