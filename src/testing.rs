/*
 * testing.rs
 *
 * In-memory log and sink. Used by our own tests and by hosts that want to
 * assert on what the observer did without a real backend.
 */

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use uuid::Uuid;

use crate::error::{DemoError, Result};
use crate::platform_log::{PlatformLog, Severity};
use crate::report::{Breadcrumb, EventId, EventRecord, ReportSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
}

/// Platform log that keeps every line.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

impl PlatformLog for MemoryLog {
    fn write(&self, severity: Severity, tag: &str, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                severity,
                tag: tag.to_string(),
                message: message.to_string(),
            });
    }
}

#[derive(Debug, Default)]
struct Recorded {
    breadcrumbs: Vec<Breadcrumb>,
    events: Vec<EventRecord>,
    flushes: Vec<Duration>,
}

/// Sink that keeps every record. `failing()` makes capture and flush fail
/// while still recording the attempt.
#[derive(Debug, Default)]
pub struct RecordingSink {
    recorded: Mutex<Recorded>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            recorded: Mutex::default(),
            fail: true,
        }
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.lock().breadcrumbs.clone()
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.lock().events.clone()
    }

    /// Timeouts passed to `flush`, in call order.
    pub fn flushes(&self) -> Vec<Duration> {
        self.lock().flushes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReportSink for RecordingSink {
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.lock().breadcrumbs.push(breadcrumb);
    }

    fn capture_event(&self, event: EventRecord) -> Result<EventId> {
        self.lock().events.push(event);
        if self.fail {
            return Err(DemoError::Sink("recording sink set to fail".to_string()));
        }
        Ok(Uuid::new_v4())
    }

    fn flush(&self, timeout: Duration) -> bool {
        self.lock().flushes.push(timeout);
        !self.fail
    }
}
