//! Try/catch/finally on top of Rust unwinding.
//!
//! Tryer lets code throw values of any type and handle them by type, with cleanup that always runs.
//! It is built on the std panic runtime, so thrown values cross ordinary Rust frames, destructors
//! run on the way, and plain panics can be caught the same way.
//!
//!
//! # Usage
//!
//! Throw with [`throw`] or one of its conditional variants. Guard a call with [`r#try`], register
//! handlers by parameter type with [`Tryer::catch`], a fallback with [`Tryer::catch_all`], and run
//! it with [`Tryer::finally`] or [`Tryer::go`]:
//!
//! ```rust
//! use std::cell::RefCell;
//! use tryer::{r#try, throw_if_false};
//!
//! #[derive(Debug)]
//! struct Timeout {
//!     after_ms: u64,
//! }
//!
//! let events = RefCell::new(Vec::new());
//! r#try(|| {
//!     throw_if_false(false, Timeout { after_ms: 500 });
//!     events.borrow_mut().push("unreachable".to_owned());
//! })
//! .catch(|message: String| events.borrow_mut().push(message))
//! .catch(|timeout: Timeout| events.borrow_mut().push(format!("timed out after {}ms", timeout.after_ms)))
//! .finally(|| events.borrow_mut().push("closed".to_owned()));
//!
//! assert_eq!(events.into_inner(), ["timed out after 500ms", "closed"]);
//! ```
//!
//!
//! # Dispatch
//!
//! A caught value goes to the handler taking exactly its type. Failing that, it goes to the first
//! registered handler whose parameter type it converts to: numeric primitives convert into each
//! other, and text converts into `String` and `Box<dyn Error + Send + Sync>`. Failing that, it goes
//! to the catch-all. Without a catch-all, it is re-raised to the caller after the finalizer has
//! run. [`Tryer::exact_only`] disables the conversion step.
//!
//! Plain panics are caught too. Their payload is the panic message, usually a `&'static str` or a
//! `String`.
//!
//!
//! # Origins
//!
//! Inside a handler or finalizer, [`find_origin`] tells where the value was thrown: the file and
//! line of the call to [`throw`] (or a variant) in user code. The stack is captured when the value
//! is thrown and symbolized only if asked. This requires the `origin` feature (on by default) and
//! debug info.
//!
//!
//! # Threads
//!
//! A [`Tryer`] is built and run on one thread, and each one guards a single call: running it
//! consumes it. Values thrown on one thread are caught on the same thread.

#![forbid(unsafe_code)]
#![warn(
    clippy::cargo,
    clippy::pedantic,
    clippy::missing_const_for_fn,
    clippy::alloc_instead_of_core,
    clippy::allow_attributes,
    clippy::as_underscore,
    clippy::assertions_on_result_states,
    clippy::clone_on_ref_ptr,
    clippy::default_numeric_fallback,
    clippy::deref_by_slicing,
    clippy::else_if_without_else,
    clippy::empty_drop,
    clippy::empty_enum_variants_with_brackets,
    clippy::empty_structs_with_brackets,
    clippy::exhaustive_enums,
    clippy::exhaustive_structs,
    clippy::format_push_string,
    clippy::infinite_loop,
    clippy::mem_forget,
    clippy::missing_assert_message,
    clippy::mixed_read_write_in_expression,
    clippy::needless_raw_strings,
    clippy::pub_without_shorthand,
    clippy::redundant_type_annotations,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_name_method,
    clippy::self_named_module_files,
    clippy::semicolon_inside_block,
    clippy::separated_literal_suffix,
    clippy::string_lit_chars_any,
    clippy::string_to_string,
    clippy::tests_outside_test_module,
    clippy::try_err,
    clippy::unneeded_field_pattern,
    clippy::unused_result_ok,
    clippy::wildcard_enum_match_arm,
)]

extern crate alloc;

mod backend;
mod coerce;
mod dispatcher;
mod error;
mod exception;
mod handler;
mod in_flight;
mod origin;
mod throw;
mod trace;

pub use dispatcher::{Resolution, Tryer, r#try};
pub use error::ConfigError;
pub use exception::Exception;
pub use origin::{Origin, find_origin};
pub use throw::{throw, throw_if_error, throw_if_error_with, throw_if_false, throw_if_false_with};
