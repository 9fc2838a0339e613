/*
 * install.rs
 *
 * Installs the observer as this test binary's real panic hook, so it gets
 * its own binary and a single test: nothing else here may race on the hook.
 */

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use cppdemo::chain::Terminal;
use cppdemo::config::Config;
use cppdemo::demo;
use cppdemo::exception::ExceptionInfo;
use cppdemo::testing::{MemoryLog, RecordingSink};
use cppdemo::{InstallOutcome, NativeContext, RuntimeError};

#[test]
fn install_once_then_observe_uncaught_panic() {
    let config = Config {
        terminal: Terminal::Return,
        ..Config::default()
    };
    let log = Arc::new(MemoryLog::default());
    let sink = Arc::new(RecordingSink::default());
    let ctx = NativeContext::new(config, log.clone(), Some(sink.clone()));

    /* N calls, one install */
    assert_eq!(ctx.initialize(), InstallOutcome::Installed);
    assert_eq!(ctx.initialize(), InstallOutcome::AlreadyInstalled);
    assert_eq!(ctx.initialize(), InstallOutcome::AlreadyInstalled);
    assert!(ctx.is_initialized());

    let messages = log.messages();
    assert_eq!(
        messages
            .iter()
            .filter(|m| *m == "Initializing native code")
            .count(),
        1
    );
    assert_eq!(
        messages
            .iter()
            .filter(|m| *m == "Native already initialized")
            .count(),
        2
    );

    /* the chain terminal returns, so the panic keeps unwinding to us */
    let logger = ctx.logger().clone();
    let raise = panic::AssertUnwindSafe(move || demo::throw_exception(&logger));
    let payload = panic::catch_unwind(raise).unwrap_err();
    let raised = ExceptionInfo::from_payload(Some(payload.as_ref()));
    assert_eq!(raised.message, "Uncaught C++ exception!");

    let events = sink.events();
    assert_eq!(events.len(), 1);
    let exc = &events[0].exceptions[0];
    assert_eq!(exc.message, "Uncaught C++ exception!");
    assert_eq!(exc.ty, std::any::type_name::<RuntimeError>());
    assert_eq!(exc.mechanism.ty, "cpp_terminate");
    assert!(exc.mechanism.handled);
    assert_eq!(sink.flushes(), [Duration::from_millis(2000)]);

    /* log order: install, raise site, observer */
    let messages = log.messages();
    let throw_at = messages
        .iter()
        .position(|m| m == "Before throw a C++ exception")
        .unwrap();
    let observer_at = messages
        .iter()
        .position(|m| m == "Custom terminate lambda handler (!)")
        .unwrap();
    assert!(throw_at < observer_at);

    /* every log line also became a breadcrumb */
    let crumbs: Vec<String> = sink.breadcrumbs().into_iter().map(|b| b.message).collect();
    assert_eq!(crumbs, messages);

    /* explicit terminate goes through the same observer */
    ctx.terminate();
    assert_eq!(sink.events().len(), 2);
    assert_eq!(sink.events()[1].exceptions[0].ty, "Unknown");

    let _ = panic::take_hook();
}