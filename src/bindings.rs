/*
 * bindings.rs
 *
 * JNI exports for com.example.cppdemo.MainActivity. Thin on purpose: each
 * one fetches the process context and calls into demo.rs.
 *
 * Nothing here catches panics. An uncaught panic reaching an extern
 * "system" boundary cannot unwind into the JVM; the observer's hook runs
 * first and its chain ends the process.
 */

use std::sync::{Arc, OnceLock};

use jni::JNIEnv;
use jni::objects::JObject;
use jni::sys::jstring;

use crate::config::Config;
use crate::context::NativeContext;
use crate::demo;
use crate::platform_log::SystemLog;
use crate::report::ReportSink;

static CONTEXT: OnceLock<NativeContext> = OnceLock::new();

/// The process-wide context the JNI entry points share.
pub fn process_context() -> &'static NativeContext {
    CONTEXT.get_or_init(|| {
        let config = Config::from_env().unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring CPPDEMO_* environment, using defaults");
            Config::default()
        });
        NativeContext::new(config, Arc::new(SystemLog), default_sink())
    })
}

#[cfg(feature = "sentry")]
fn default_sink() -> Option<Arc<dyn ReportSink>> {
    let sink = crate::sentry_sink::SentrySink::from_env()?;
    Some(Arc::new(sink))
}

#[cfg(not(feature = "sentry"))]
fn default_sink() -> Option<Arc<dyn ReportSink>> {
    None
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_cppdemo_MainActivity_nativeInitialization<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    process_context().initialize();
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_cppdemo_MainActivity_stringHello<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    match env.new_string(demo::greet()) {
        Ok(s) => s.into_raw(),
        Err(err) => {
            /* a pending OutOfMemoryError is already set on the Java side */
            tracing::error!(%err, "failed to allocate greeting string");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_cppdemo_MainActivity_printGreetings<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    demo::log_greeting(process_context().logger());
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_cppdemo_MainActivity_callAbort<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    demo::call_abort(process_context().logger());
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_cppdemo_MainActivity_throwCppException<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    demo::throw_exception(process_context().logger());
}
