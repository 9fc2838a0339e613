/*
 * main.rs
 *
 * cppdemo-host: stands in for the Android activity. Build one context,
 * run the requested actions, let whatever happens happen.
 *
 * The platform log and the JSON-lines sink both write to stderr, so the
 * integration tests can read the whole story from one stream.
 */

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cppdemo::args::{Action, Args};
use cppdemo::chain::Terminal;
use cppdemo::config::{Config, ENV_FLUSH_TIMEOUT};
use cppdemo::context::NativeContext;
use cppdemo::demo;
use cppdemo::duration::parse_duration;
use cppdemo::error::DemoError;
use cppdemo::platform_log::SystemLog;
use cppdemo::report::{JsonLinesSink, ReportSink};

fn build_config(args: &Args) -> Result<Config, DemoError> {
    /* clap already folded CPPDEMO_FLUSH_TIMEOUT into --flush-timeout */
    let mut config = Config::from_lookup(|key| {
        (key != ENV_FLUSH_TIMEOUT)
            .then(|| std::env::var(key).ok())
            .flatten()
    })?;
    if let Some(timeout) = &args.flush_timeout {
        config.flush_timeout = parse_duration(timeout)?;
    }
    if args.no_abort {
        config.terminal = Terminal::Return;
    }
    Ok(config)
}

fn run(ctx: &NativeContext, action: Action) {
    match action {
        Action::Initialize => {
            ctx.initialize();
        }
        Action::Greet => println!("{}", demo::greet()),
        Action::LogGreeting => demo::log_greeting(ctx.logger()),
        Action::Abort => demo::call_abort(ctx.logger()),
        Action::Throw => demo::throw_exception(ctx.logger()),
        Action::ThrowForeign => demo::throw_foreign(ctx.logger()),
        Action::Terminate => ctx.terminate(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("cppdemo-host: {err}");
            return ExitCode::from(err.exit_code());
        }
    };

    let sink: Option<Arc<dyn ReportSink>> = if args.no_sink {
        None
    } else {
        Some(Arc::new(JsonLinesSink::stderr()))
    };

    let ctx = NativeContext::new(config, Arc::new(SystemLog), sink);
    for &action in &args.actions {
        run(&ctx, action);
    }

    ExitCode::SUCCESS
}
