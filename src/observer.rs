/*
 * observer.rs
 *
 * The termination observer. Runs inside the panic hook (or from an explicit
 * terminate() with nothing in flight), reports what it can, then hands over
 * to the handler chain.
 *
 * We are already dying here. A panic inside a panic hook aborts on the spot,
 * so no step may panic: each one degrades to a default (empty backtrace,
 * "Unknown" exception, dropped event) and the chain always runs.
 */

use std::any::Any;
use std::panic::PanicHookInfo;
use std::sync::Arc;
use std::time::Duration;

use crate::capture::{capture_frames, promote_throw_site};
use crate::chain::HandlerChain;
use crate::exception::ExceptionInfo;
use crate::logger::Logger;
use crate::native_log;
use crate::report::{
    EventRecord, Level, MECHANISM_TERMINATE, Mechanism, ReportSink, ReportedException,
};

const SWAP_NOTE: &str = "frame 0 swapped with frame n-2 to surface the likely throw site";

/// Transient record built when the observer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationEvent {
    pub exception_type: String,
    pub exception_message: String,
    /// innermost first, after throw-site promotion
    pub backtrace: Vec<usize>,
    pub frame_count: usize,
}

impl TerminationEvent {
    /// Wrap into the record the sink takes. `promoted` adds the swap note.
    #[must_use]
    pub fn into_record(self, promoted: bool) -> EventRecord {
        let mechanism = Mechanism {
            ty: MECHANISM_TERMINATE.to_string(),
            handled: true,
            note: promoted.then(|| SWAP_NOTE.to_string()),
        };

        EventRecord {
            level: Level::Fatal,
            message: self.exception_message.clone(),
            exceptions: vec![ReportedException {
                ty: self.exception_type,
                message: self.exception_message,
                stacktrace: self.backtrace,
                mechanism,
            }],
        }
    }
}

pub struct TerminationObserver {
    logger: Logger,
    sink: Option<Arc<dyn ReportSink>>,
    max_frames: usize,
    flush_timeout: Duration,
    chain: HandlerChain,
}

impl TerminationObserver {
    pub fn new(
        logger: Logger,
        sink: Option<Arc<dyn ReportSink>>,
        max_frames: usize,
        flush_timeout: Duration,
        chain: HandlerChain,
    ) -> Self {
        Self {
            logger,
            sink,
            max_frames,
            flush_timeout,
            chain,
        }
    }

    /// Panic hook entry.
    pub fn on_panic(&self, info: &PanicHookInfo<'_>) {
        self.observe(Some(info.payload()));
        self.chain.run(Some(info));
    }

    /// Termination requested with no panic in flight.
    pub fn on_terminate(&self) {
        self.observe(None);
        self.chain.run(None);
    }

    /// Steps 1-6: log, capture, identify, report, flush. Never panics,
    /// never skips the chain.
    #[inline(never)]
    pub fn observe(&self, payload: Option<&(dyn Any + Send)>) -> TerminationEvent {
        self.logger.log("Custom terminate lambda handler (!)");

        let mut backtrace = capture_frames(self.max_frames);
        let promoted = promote_throw_site(&mut backtrace);

        let exception = ExceptionInfo::from_payload(payload);
        native_log!(
            self.logger,
            "  .exception(.type: {}, message: {})",
            exception.ty,
            exception.message
        );

        let event = TerminationEvent {
            exception_type: exception.ty,
            exception_message: exception.message,
            frame_count: backtrace.len(),
            backtrace,
        };

        if let Some(sink) = &self.sink {
            match sink.capture_event(event.clone().into_record(promoted)) {
                Ok(id) => {
                    tracing::debug!(%id, frames = event.frame_count, "termination event captured");
                }
                Err(err) => tracing::warn!(%err, "termination event dropped"),
            }
            if !sink.flush(self.flush_timeout) {
                tracing::warn!(
                    timeout = ?self.flush_timeout,
                    "report sink did not drain before termination"
                );
            }
        }

        event
    }

    #[inline]
    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Terminal;
    use crate::exception::RuntimeError;
    use crate::platform_log::Severity;
    use crate::testing::{MemoryLog, RecordingSink};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        log: Arc<MemoryLog>,
        sink: Arc<RecordingSink>,
        chained: Arc<AtomicUsize>,
        observer: TerminationObserver,
    }

    fn fixture_with(sink: RecordingSink) -> Fixture {
        let log = Arc::new(MemoryLog::default());
        let sink = Arc::new(sink);
        let chained = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&chained);

        let logger = Logger::new(log.clone(), Some(sink.clone()), "CppDemo", Severity::Warn);
        let chain = HandlerChain::new(Terminal::Return).with_callback(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let observer = TerminationObserver::new(
            logger,
            Some(sink.clone()),
            64,
            Duration::from_millis(2000),
            chain,
        );

        Fixture {
            log,
            sink,
            chained,
            observer,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingSink::default())
    }

    #[test]
    fn test_runtime_error_reported_once() {
        let fx = fixture();
        let payload: Box<dyn Any + Send> = Box::new(RuntimeError::new("Uncaught C++ exception!"));

        fx.observer.observe(Some(payload.as_ref()));

        let events = fx.sink.events();
        assert_eq!(events.len(), 1);
        let exc = &events[0].exceptions[0];
        assert_eq!(events[0].level, Level::Fatal);
        assert_eq!(events[0].message, "Uncaught C++ exception!");
        assert_eq!(exc.message, "Uncaught C++ exception!");
        assert_eq!(exc.ty, std::any::type_name::<RuntimeError>());
        assert_eq!(exc.mechanism.ty, "cpp_terminate");
        assert!(exc.mechanism.handled);
    }

    #[test]
    fn test_log_lines_in_order() {
        let fx = fixture();
        let payload: Box<dyn Any + Send> = Box::new(42u32);

        fx.observer.observe(Some(payload.as_ref()));

        assert_eq!(
            fx.log.messages(),
            [
                "Custom terminate lambda handler (!)",
                "  .exception(.type: Unknown C++ Exception, message: Non-std::exception caught)",
            ]
        );
    }

    #[test]
    fn test_terminate_without_payload() {
        let fx = fixture();

        fx.observer.on_terminate();

        let exc = &fx.sink.events()[0].exceptions[0];
        assert_eq!(exc.ty, "Unknown");
        assert_eq!(exc.message, "No exception information available");
        assert_eq!(fx.chained.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_flush_uses_configured_timeout() {
        let fx = fixture();
        fx.observer.observe(None);
        assert_eq!(fx.sink.flushes(), [Duration::from_millis(2000)]);
    }

    #[test]
    fn test_swap_note_matches_frame_count() {
        let fx = fixture();
        let event = fx.observer.observe(None);

        let exc = &fx.sink.events()[0].exceptions[0];
        assert_eq!(event.frame_count, event.backtrace.len());
        assert_eq!(exc.stacktrace, event.backtrace);
        assert_eq!(exc.mechanism.note.is_some(), event.frame_count > 2);
    }

    #[test]
    fn test_sink_failure_still_chains() {
        let fx = fixture_with(RecordingSink::failing());

        fx.observer.on_terminate();

        /* attempt was made, flush reported failure, chain still ran */
        assert_eq!(fx.sink.events().len(), 1);
        assert_eq!(fx.sink.flushes().len(), 1);
        assert_eq!(fx.chained.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_sink_still_logs_and_chains() {
        let log = Arc::new(MemoryLog::default());
        let logger = Logger::new(log.clone(), None, "CppDemo", Severity::Warn);
        let chained = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&chained);
        let chain = HandlerChain::new(Terminal::Return).with_callback(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let observer = TerminationObserver::new(logger, None, 64, Duration::ZERO, chain);

        observer.on_terminate();

        assert_eq!(log.messages().len(), 2);
        assert_eq!(chained.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_into_record_without_promotion() {
        let event = TerminationEvent {
            exception_type: "T".into(),
            exception_message: "M".into(),
            backtrace: vec![1, 2],
            frame_count: 2,
        };
        let record = event.into_record(false);
        assert_eq!(record.exceptions[0].mechanism.note, None);
        assert_eq!(record.exceptions[0].stacktrace, [1, 2]);
    }
}
