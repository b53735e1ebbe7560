use thiserror::Error;

/// A handler that can never be dispatched to was registered.
///
/// Registration panics with this value as payload (see [`std::panic::panic_any`]), so it can be
/// told apart from thrown values.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The handler's parameter is `()`, i.e. it takes no value.
    #[error("handler for `{0}` takes no value; a handler needs exactly one parameter")]
    UnitParameter(&'static str),

    /// The handler's parameter is the raw panic payload.
    #[error("handler for `{0}` takes the raw payload; register it with `catch_all` instead")]
    RawPayload(&'static str),
}
