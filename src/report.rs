/*
 * report.rs
 *
 * The reporting sink and the records we hand it. The sink is optional and
 * external: breadcrumbs go into its trail, events get an id back, flush
 * blocks for at most the timeout we give it.
 *
 * JsonLinesSink is the one the host binary uses: one JSON object per line,
 * easy to grep in integration tests and easy to pipe into anything else.
 */

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;

/// Mechanism tag attached to every termination event.
pub const MECHANISM_TERMINATE: &str = "cpp_terminate";

/// Opaque identifier the sink returns for a captured event.
pub type EventId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub category: String,
    pub level: Level,
    pub message: String,
}

/* how the exception was captured */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mechanism {
    #[serde(rename = "type")]
    pub ty: String,
    pub handled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedException {
    #[serde(rename = "type")]
    pub ty: String,
    pub message: String,
    /// raw instruction pointers, innermost first
    pub stacktrace: Vec<usize>,
    pub mechanism: Mechanism,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub level: Level,
    pub message: String,
    pub exceptions: Vec<ReportedException>,
}

/// External service that receives breadcrumbs and events.
///
/// Called from inside the panic hook, so implementations report failure
/// through the return value and never panic.
pub trait ReportSink: Send + Sync {
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb);

    fn capture_event(&self, event: EventRecord) -> Result<EventId>;

    /// Block until queued records are delivered or `timeout` elapses.
    /// Returns false on timeout.
    fn flush(&self, timeout: Duration) -> bool;
}

/* kind-tagged lines so breadcrumbs and events share one stream */
#[derive(Serialize)]
struct BreadcrumbLine<'a> {
    kind: &'static str,
    #[serde(flatten)]
    breadcrumb: &'a Breadcrumb,
}

#[derive(Serialize)]
struct EventLine<'a> {
    kind: &'static str,
    id: EventId,
    #[serde(flatten)]
    event: &'a EventRecord,
}

/// Sink that writes every record as a JSON line to `W`.
pub struct JsonLinesSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, line: &impl Serialize) -> Result<()> {
        let mut buf = serde_json::to_vec(line)?;
        buf.push(b'\n');
        /* a panic while holding the lock must not silence the observer */
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(&buf)?;
        Ok(())
    }
}

impl JsonLinesSink<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> ReportSink for JsonLinesSink<W> {
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        let line = BreadcrumbLine {
            kind: "breadcrumb",
            breadcrumb: &breadcrumb,
        };
        if let Err(err) = self.write_line(&line) {
            tracing::debug!(%err, "dropping breadcrumb");
        }
    }

    fn capture_event(&self, event: EventRecord) -> Result<EventId> {
        let id = Uuid::new_v4();
        self.write_line(&EventLine {
            kind: "event",
            id,
            event: &event,
        })?;
        Ok(id)
    }

    fn flush(&self, _timeout: Duration) -> bool {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.flush().is_ok()
    }
}
