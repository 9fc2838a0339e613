/*
 * chain.rs
 *
 * What runs after the observer has done its reporting: every fallback in
 * install order, then exactly one terminal.
 *
 * The panic hook that was installed before ours is the usual fallback. It
 * needs the PanicHookInfo, so it is skipped when termination was requested
 * without a panic in flight.
 */

use std::fmt;
use std::panic::PanicHookInfo;

/// A panic hook as returned by `std::panic::take_hook`.
pub type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// A fallback that doesn't care about panic details.
pub type Callback = Box<dyn Fn() + Sync + Send + 'static>;

pub enum Fallback {
    Hook(PanicHook),
    Callback(Callback),
}

/// The last thing the chain does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// `abort()`. No unwinding, no atexit handlers.
    Abort,
    /// Return to the caller: the panic keeps unwinding, or `terminate()`
    /// returns. For embedding hosts that own process exit, and for tests.
    Return,
}

pub struct HandlerChain {
    fallbacks: Vec<Fallback>,
    terminal: Terminal,
}

impl HandlerChain {
    #[must_use]
    pub fn new(terminal: Terminal) -> Self {
        Self {
            fallbacks: Vec::new(),
            terminal,
        }
    }

    #[must_use]
    pub fn with_hook(mut self, hook: PanicHook) -> Self {
        self.fallbacks.push(Fallback::Hook(hook));
        self
    }

    #[must_use]
    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.fallbacks.push(Fallback::Callback(callback));
        self
    }

    #[inline]
    pub fn terminal(&self) -> Terminal {
        self.terminal
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fallbacks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fallbacks.is_empty()
    }

    /// Run every fallback in order, then the terminal.
    pub fn run(&self, info: Option<&PanicHookInfo<'_>>) {
        for fallback in &self.fallbacks {
            match (fallback, info) {
                (Fallback::Hook(hook), Some(info)) => hook(info),
                (Fallback::Hook(_), None) => {}
                (Fallback::Callback(callback), _) => callback(),
            }
        }

        match self.terminal {
            // SAFETY: abort() has no preconditions and never returns.
            Terminal::Abort => unsafe { libc::abort() },
            Terminal::Return => {}
        }
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("fallbacks", &self.fallbacks.len())
            .field("terminal", &self.terminal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Callback {
        let log = Arc::clone(log);
        Box::new(move || log.lock().unwrap().push(name))
    }

    #[test]
    fn test_callbacks_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = HandlerChain::new(Terminal::Return)
            .with_callback(recorder(&log, "first"))
            .with_callback(recorder(&log, "second"));

        chain.run(None);
        assert_eq!(*log.lock().unwrap(), ["first", "second"]);
    }

    #[test]
    fn test_hooks_skipped_without_panic_info() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hook_log = Arc::clone(&log);
        let chain = HandlerChain::new(Terminal::Return)
            .with_hook(Box::new(move |_| hook_log.lock().unwrap().push("hook")))
            .with_callback(recorder(&log, "callback"));

        chain.run(None);
        assert_eq!(*log.lock().unwrap(), ["callback"]);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_empty_chain_returns() {
        let chain = HandlerChain::new(Terminal::Return);
        assert!(chain.is_empty());
        chain.run(None);
        assert_eq!(chain.terminal(), Terminal::Return);
    }
}
