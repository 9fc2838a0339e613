/*
 * sentry_sink.rs
 *
 * ReportSink backed by the sentry SDK. Only built with the "sentry"
 * feature, only active when CPPDEMO_SENTRY_DSN is set.
 *
 * The SDK's own panic integration is compiled out (see Cargo.toml): the
 * observer is the one panic hook that reports.
 */

use std::time::Duration;

use sentry::protocol::{self, Event, Exception, Frame, Mechanism, Stacktrace};
use uuid::Uuid;

use crate::error::Result;
use crate::report::{Breadcrumb, EventId, EventRecord, Level, ReportSink};

pub const ENV_SENTRY_DSN: &str = "CPPDEMO_SENTRY_DSN";

pub struct SentrySink {
    /* keeps the client bound; dropping it would flush and unbind */
    _guard: sentry::ClientInitGuard,
}

impl SentrySink {
    /// Initialize the SDK from `CPPDEMO_SENTRY_DSN`. None when unset, empty,
    /// or rejected by the SDK.
    pub fn from_env() -> Option<Self> {
        let dsn = std::env::var(ENV_SENTRY_DSN).ok()?;
        Self::init(&dsn)
    }

    pub fn init(dsn: &str) -> Option<Self> {
        let guard = sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ));
        if !guard.is_enabled() {
            tracing::warn!("sentry client disabled, check {ENV_SENTRY_DSN}");
            return None;
        }
        Some(Self { _guard: guard })
    }
}

fn level(level: Level) -> sentry::Level {
    match level {
        Level::Debug => sentry::Level::Debug,
        Level::Info => sentry::Level::Info,
        Level::Warning => sentry::Level::Warning,
        Level::Error => sentry::Level::Error,
        Level::Fatal => sentry::Level::Fatal,
    }
}

/* sentry wants frames oldest first; ours are innermost first */
fn stacktrace(ips: &[usize]) -> Stacktrace {
    let frames = ips
        .iter()
        .rev()
        .map(|&ip| Frame {
            instruction_addr: Some(protocol::Addr(ip as u64)),
            ..Default::default()
        })
        .collect();
    Stacktrace {
        frames,
        ..Default::default()
    }
}

impl ReportSink for SentrySink {
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        sentry::add_breadcrumb(sentry::Breadcrumb {
            category: Some(breadcrumb.category),
            level: level(breadcrumb.level),
            message: Some(breadcrumb.message),
            ..Default::default()
        });
    }

    fn capture_event(&self, event: EventRecord) -> Result<EventId> {
        let exceptions: Vec<Exception> = event
            .exceptions
            .into_iter()
            .map(|e| Exception {
                ty: e.ty,
                value: Some(e.message),
                stacktrace: Some(stacktrace(&e.stacktrace)),
                mechanism: Some(Mechanism {
                    ty: e.mechanism.ty,
                    handled: Some(e.mechanism.handled),
                    description: e.mechanism.note,
                    ..Default::default()
                }),
                ..Default::default()
            })
            .collect();

        let id = sentry::capture_event(Event {
            level: level(event.level),
            message: Some(event.message),
            exception: exceptions.into(),
            ..Default::default()
        });
        Ok(Uuid::from_bytes(*id.as_bytes()))
    }

    fn flush(&self, timeout: Duration) -> bool {
        sentry::Hub::current()
            .client()
            .is_some_and(|client| client.flush(Some(timeout)))
    }
}
