/*
 * context.rs
 *
 * A NativeContext bundles config, logger and optional sink. Entry points
 * get it passed in; the JNI layer keeps exactly one in a OnceLock.
 *
 * The panic hook is process state, so the install guard is too: a static
 * AtomicBool swapped on install. Two threads, or two contexts, racing
 * through initialize() still install exactly one hook. The installed
 * observer lives in a static OnceLock next to it.
 */

use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::chain::HandlerChain;
use crate::config::Config;
use crate::logger::Logger;
use crate::observer::TerminationObserver;
use crate::platform_log::PlatformLog;
use crate::report::ReportSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
}

static INSTALLED: AtomicBool = AtomicBool::new(false);
static OBSERVER: OnceLock<Arc<TerminationObserver>> = OnceLock::new();

pub struct NativeContext {
    config: Config,
    logger: Logger,
    sink: Option<Arc<dyn ReportSink>>,
}

impl NativeContext {
    pub fn new(
        config: Config,
        log: Arc<dyn PlatformLog>,
        sink: Option<Arc<dyn ReportSink>>,
    ) -> Self {
        let logger = Logger::new(log, sink.clone(), config.log_tag.clone(), config.severity);
        Self {
            config,
            logger,
            sink,
        }
    }

    /// Install the termination observer as the process panic hook.
    ///
    /// The first call in the process takes the current hook and keeps it as
    /// the chain's fallback. Every later call, from this context or any
    /// other, only logs.
    pub fn initialize(&self) -> InstallOutcome {
        if INSTALLED.swap(true, Ordering::AcqRel) {
            self.logger.log("Native already initialized");
            return InstallOutcome::AlreadyInstalled;
        }

        self.logger.log("Initializing native code");

        let previous = panic::take_hook();
        let chain = HandlerChain::new(self.config.terminal).with_hook(previous);
        let observer = Arc::new(TerminationObserver::new(
            self.logger.clone(),
            self.sink.clone(),
            self.config.max_frames,
            self.config.flush_timeout,
            chain,
        ));

        /* only this call got past the swap, so the cell is still empty */
        let _ = OBSERVER.set(Arc::clone(&observer));
        panic::set_hook(Box::new(move |info| observer.on_panic(info)));

        tracing::debug!(tag = %self.config.log_tag, "termination observer installed");
        InstallOutcome::Installed
    }

    /// Whether any context in this process has installed the observer.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        INSTALLED.load(Ordering::Acquire)
    }

    /// Terminate with no panic in flight. Goes through the process observer
    /// when one is installed, straight to this context's terminal otherwise.
    pub fn terminate(&self) {
        match OBSERVER.get() {
            Some(observer) => observer.on_terminate(),
            None => HandlerChain::new(self.config.terminal).run(None),
        }
    }

    #[inline]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Terminal;
    use crate::testing::{MemoryLog, RecordingSink};

    fn returning_config() -> Config {
        Config {
            terminal: Terminal::Return,
            ..Config::default()
        }
    }

    #[test]
    fn test_terminate_before_initialize_skips_observer() {
        let log = Arc::new(MemoryLog::default());
        let sink = Arc::new(RecordingSink::default());
        let ctx = NativeContext::new(returning_config(), log.clone(), Some(sink.clone()));

        ctx.terminate();

        assert!(!ctx.is_initialized());
        assert!(sink.events().is_empty());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_logger_uses_config_tag() {
        let config = Config {
            log_tag: "Other".into(),
            ..returning_config()
        };
        let ctx = NativeContext::new(config, Arc::new(MemoryLog::default()), None);
        assert_eq!(ctx.logger().tag(), "Other");
        assert_eq!(ctx.config().terminal, Terminal::Return);
    }
}
