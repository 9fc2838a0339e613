/*
 * lib.rs
 *
 * libcppdemo: the native half of the crash-mode demo. The Android activity
 * loads the cdylib and calls the JNI exports in bindings.rs; cppdemo-host
 * and the tests link the rlib and call the same functions directly.
 */

//! # cppdemo
//!
//! Native entry points that exercise failure modes on purpose: logging,
//! `abort()`, and a panic nobody catches. A termination observer, installed
//! once as the process panic hook, reports the exception type, message and
//! raw backtrace to an optional sink before handing over to the hook that
//! was there before it.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cppdemo::chain::Terminal;
//! use cppdemo::config::Config;
//! use cppdemo::testing::{MemoryLog, RecordingSink};
//! use cppdemo::{InstallOutcome, NativeContext};
//!
//! let config = Config { terminal: Terminal::Return, ..Config::default() };
//! let log = Arc::new(MemoryLog::default());
//! let sink = Arc::new(RecordingSink::default());
//! let ctx = NativeContext::new(config, log.clone(), Some(sink.clone()));
//!
//! assert_eq!(ctx.initialize(), InstallOutcome::Installed);
//! assert_eq!(ctx.initialize(), InstallOutcome::AlreadyInstalled);
//!
//! ctx.terminate();
//! let event = &sink.events()[0];
//! assert_eq!(event.exceptions[0].ty, "Unknown");
//! assert_eq!(event.exceptions[0].mechanism.ty, "cpp_terminate");
//! # let _ = std::panic::take_hook();
//! ```

pub mod args;
pub mod bindings;
pub mod capture;
pub mod chain;
pub mod config;
pub mod context;
pub mod demo;
pub mod duration;
pub mod error;
pub mod exception;
pub mod logger;
pub mod observer;
pub mod platform_log;
pub mod report;
#[cfg(feature = "sentry")]
pub mod sentry_sink;
pub mod testing;

pub use context::{InstallOutcome, NativeContext};
pub use error::{DemoError, Result, exit_codes};
pub use exception::{RuntimeError, StandardError};
pub use logger::Logger;
pub use observer::{TerminationEvent, TerminationObserver};
pub use report::{JsonLinesSink, ReportSink};
