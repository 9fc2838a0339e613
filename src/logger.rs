/*
 * logger.rs
 *
 * Every message goes to the platform log at the configured severity, and
 * to the sink's breadcrumb trail when a sink exists. The sink decides how
 * many breadcrumbs it keeps.
 *
 * Messages are capped at 1023 bytes: the demo's formatting buffer is 1 KiB
 * including the terminator, and logcat would cut it anyway.
 */

use std::fmt;
use std::sync::Arc;

use crate::platform_log::{PlatformLog, Severity};
use crate::report::{Breadcrumb, Level, ReportSink};

pub const MAX_MESSAGE_LEN: usize = 1023;

const BREADCRUMB_CATEGORY: &str = "native";

#[derive(Clone)]
pub struct Logger {
    log: Arc<dyn PlatformLog>,
    sink: Option<Arc<dyn ReportSink>>,
    tag: String,
    severity: Severity,
}

impl Logger {
    pub fn new(
        log: Arc<dyn PlatformLog>,
        sink: Option<Arc<dyn ReportSink>>,
        tag: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            log,
            sink,
            tag: tag.into(),
            severity,
        }
    }

    pub fn log(&self, message: &str) {
        let message = truncate(message, MAX_MESSAGE_LEN);
        self.log.write(self.severity, &self.tag, message);

        if let Some(sink) = &self.sink {
            sink.add_breadcrumb(Breadcrumb {
                category: BREADCRUMB_CATEGORY.to_string(),
                level: Level::Debug,
                message: message.to_string(),
            });
        }
    }

    /// Format then log. Use through [`native_log!`](crate::native_log).
    pub fn log_fmt(&self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(s) => self.log(s),
            None => self.log(&args.to_string()),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn sink(&self) -> Option<&Arc<dyn ReportSink>> {
        self.sink.as_ref()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("tag", &self.tag)
            .field("severity", &self.severity)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Cut `s` at the last char boundary at or below `max` bytes.
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Log a formatted message through a [`Logger`].
///
/// ```
/// use std::sync::Arc;
/// use cppdemo::{native_log, Logger};
/// use cppdemo::platform_log::Severity;
/// use cppdemo::testing::MemoryLog;
///
/// let log = Arc::new(MemoryLog::default());
/// let logger = Logger::new(log.clone(), None, "CppDemo", Severity::Warn);
/// native_log!(logger, "frames: {}", 3);
/// assert_eq!(log.messages(), ["frames: 3"]);
/// ```
#[macro_export]
macro_rules! native_log {
    ($logger:expr, $($arg:tt)*) => {{
        $logger.log_fmt(format_args!($($arg)*));
    }};
}
