/*
 * exception.rs
 *
 * What got raised, and how we recognize it again from a panic payload.
 *
 * "Standard error" means: something that can tell us a type tag and a
 * message. RuntimeError and boxed StandardError payloads do that directly.
 * The &str / String payloads of a plain panic!() count too, tagged with
 * their own type name. Anything else is a foreign value we can't read.
 */

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::panic;

pub const UNKNOWN_TYPE: &str = "Unknown";
pub const UNKNOWN_MESSAGE: &str = "No exception information available";
pub const FOREIGN_TYPE: &str = "Unknown C++ Exception";
pub const FOREIGN_MESSAGE: &str = "Non-std::exception caught";

/// An error that exposes a type tag and a message.
///
/// Raise implementors with [`raise`]. A bare `panic_any(err)` hides the
/// trait behind a concrete type the observer can't name, so it gets
/// reported as a foreign value.
pub trait StandardError: Any + Send + Sync {
    fn type_tag(&self) -> &str;
    fn what(&self) -> &str;
}

/// Raise `err` as an uncaught exception the observer can identify.
///
/// The payload is `Box<dyn StandardError>`, so any implementor keeps its
/// own type tag and message in the report.
///
/// ```
/// use std::panic;
/// use cppdemo::exception::{ExceptionInfo, raise};
/// use cppdemo::RuntimeError;
///
/// let payload = panic::catch_unwind(|| raise(RuntimeError::new("boom"))).unwrap_err();
/// let info = ExceptionInfo::from_payload(Some(payload.as_ref()));
/// assert_eq!(info.message, "boom");
/// ```
pub fn raise(err: impl StandardError) -> ! {
    let payload: Box<dyn StandardError> = Box::new(err);
    panic::panic_any(payload)
}

/// The runtime-error kind raised by the demo.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuntimeError {
    message: Cow<'static, str>,
}

impl RuntimeError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl StandardError for RuntimeError {
    fn type_tag(&self) -> &str {
        type_name::<Self>()
    }

    fn what(&self) -> &str {
        &self.message
    }
}

/// Exception identity as the observer reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub ty: String,
    pub message: String,
}

impl ExceptionInfo {
    fn new(ty: &str, message: &str) -> Self {
        Self {
            ty: ty.to_owned(),
            message: message.to_owned(),
        }
    }

    /// Nothing in flight: termination was requested directly.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TYPE, UNKNOWN_MESSAGE)
    }

    /// Identify the in-flight payload, if any.
    #[must_use]
    pub fn from_payload(payload: Option<&(dyn Any + Send)>) -> Self {
        let Some(payload) = payload else {
            return Self::unknown();
        };

        if let Some(err) = payload.downcast_ref::<RuntimeError>() {
            Self::new(err.type_tag(), err.what())
        } else if let Some(err) = payload.downcast_ref::<Box<dyn StandardError>>() {
            Self::new(err.type_tag(), err.what())
        } else if let Some(msg) = payload.downcast_ref::<&'static str>() {
            Self::new(type_name::<&str>(), msg)
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            Self::new(type_name::<String>(), msg)
        } else {
            Self::new(FOREIGN_TYPE, FOREIGN_MESSAGE)
        }
    }
}
