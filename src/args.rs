/*
 * args.rs
 *
 * Clap derive for cppdemo-host. Actions run in the order given, the way
 * the Android activity's buttons would be pressed:
 *
 *   cppdemo-host initialize log-greeting throw
 *
 * Anything after abort/throw/throw-foreign/terminate never runs.
 */

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "cppdemo-host",
    version,
    about = "Drive the cppdemo native entry points from the command line",
    long_about = "Runs each ACTION in order against one native context, the way the\n\
                  Android demo activity calls into libcppdemo.\n\n\
                  Breadcrumbs and termination events are written to stderr as\n\
                  JSON lines unless --no-sink is given.",
    after_help = "Environment:\n\
                  CPPDEMO_LOG_TAG         platform log tag (default CppDemo)\n\
                  CPPDEMO_MAX_FRAMES      backtrace frame cap, 1..=256 (default 64)\n\
                  CPPDEMO_FLUSH_TIMEOUT   sink flush wait, e.g. 2000ms, 2s (default 2000ms)\n\
                  RUST_LOG                internal diagnostics filter"
)]
pub struct Args {
    /// Run without a reporting sink.
    #[arg(long = "no-sink")]
    pub no_sink: bool,

    /// Sink flush wait, e.g. 2000ms, 2s, 1m.
    ///
    /// Falls back to CPPDEMO_FLUSH_TIMEOUT environment variable.
    #[arg(
        long = "flush-timeout",
        value_name = "DURATION",
        env = "CPPDEMO_FLUSH_TIMEOUT"
    )]
    pub flush_timeout: Option<String>,

    /// Return from the observer instead of aborting once it has reported.
    ///
    /// In dev builds the panic then unwinds out of main like any other.
    /// Release builds are compiled with panic=abort, so an uncaught panic
    /// still aborts after the report; `terminate` returns in both.
    #[arg(long = "no-abort")]
    pub no_abort: bool,

    /// Entry points to call, in order.
    #[arg(value_enum, required = true, value_name = "ACTION")]
    pub actions: Vec<Action>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Install the termination observer (idempotent)
    Initialize,
    /// Print the greeting string to stdout
    Greet,
    /// Log the greeting through the native logger
    LogGreeting,
    /// Log, then abort() - bypasses the observer
    Abort,
    /// Raise a runtime error four frames deep
    Throw,
    /// Raise a value that is not a standard error
    ThrowForeign,
    /// Terminate with no exception in flight
    Terminate,
}
