/*
 * demo.rs
 *
 * The failure modes the host can ask for. Each is one call into a system
 * facility: the logger, abort(), or a panic that nobody catches.
 *
 * The throw path goes through three extra frames on purpose, so the
 * observer's backtrace has some depth to show. #[inline(never)] keeps the
 * optimizer from folding them away.
 */

use std::panic;

use crate::exception::{self, RuntimeError};
use crate::logger::Logger;

pub const GREETING: &str = "Hello from C++";
pub const GREETINGS_MESSAGE: &str = "Greetings from C++!";
pub const ABORT_MESSAGE: &str = "Before call abort()";
pub const THROW_MESSAGE: &str = "Before throw a C++ exception";
pub const EXCEPTION_MESSAGE: &str = "Uncaught C++ exception!";

#[must_use]
pub fn greet() -> &'static str {
    GREETING
}

pub fn log_greeting(logger: &Logger) {
    logger.log(GREETINGS_MESSAGE);
}

/// Log, then abort(). Does not unwind and never reaches the observer.
pub fn call_abort(logger: &Logger) -> ! {
    internal_call_abort(logger)
}

#[inline(never)]
fn internal_call_abort(logger: &Logger) -> ! {
    logger.log(ABORT_MESSAGE);
    // SAFETY: abort() has no preconditions and never returns.
    unsafe { libc::abort() }
}

/// Raise a [`RuntimeError`] four frames down. If nothing catches it, the
/// installed observer sees it.
pub fn throw_exception(logger: &Logger) -> ! {
    throw_exception_deep_one(logger)
}

#[inline(never)]
fn throw_exception_deep_one(logger: &Logger) -> ! {
    throw_exception_deep_two(logger)
}

#[inline(never)]
fn throw_exception_deep_two(logger: &Logger) -> ! {
    throw_exception_deep_three(logger)
}

#[inline(never)]
fn throw_exception_deep_three(logger: &Logger) -> ! {
    internal_throw_exception(logger)
}

#[inline(never)]
fn internal_throw_exception(logger: &Logger) -> ! {
    logger.log(THROW_MESSAGE);
    exception::raise(RuntimeError::new(EXCEPTION_MESSAGE))
}

/// Raise a value that is not a standard error.
pub fn throw_foreign(logger: &Logger) -> ! {
    logger.log("Before throw a non-standard value");
    panic::panic_any(0xDEAD_u32)
}
