/*
 * platform_log.rs
 *
 * Where log lines end up. On Android that's logcat via liblog. Everywhere
 * else it's stderr, one write(2) per line so lines from a dying process
 * don't interleave or sit in a buffer nobody will flush.
 *
 * No allocation-free guarantees here. The observer runs in a panic hook,
 * not a signal handler, so the allocator is still fair game.
 */

use std::ffi::CString;
use std::fmt;

/* android_LogPriority values from <android/log.h> */
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum Severity {
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    Fatal = 7,
}

impl Severity {
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /* logcat's single-letter priority */
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Verbose => 'V',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
            Self::Fatal => 'F',
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Platform log facility: accepts (severity, tag, message).
///
/// Implementations must not panic. `write` is called from inside the panic
/// hook, and a second panic there aborts before the observer finishes.
pub trait PlatformLog: Send + Sync {
    fn write(&self, severity: Severity, tag: &str, message: &str);
}

/// The real platform log: logcat on Android, stderr elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLog;

impl PlatformLog for SystemLog {
    #[cfg(target_os = "android")]
    fn write(&self, severity: Severity, tag: &str, message: &str) {
        let tag = c_string_lossy(tag);
        let text = c_string_lossy(message);
        // SAFETY: both pointers come from live CStrings that outlive the call.
        // __android_log_write copies the strings before returning.
        unsafe {
            android::__android_log_write(severity.as_raw(), tag.as_ptr(), text.as_ptr());
        }
    }

    #[cfg(not(target_os = "android"))]
    fn write(&self, severity: Severity, tag: &str, message: &str) {
        let line = format!("{}/{tag}: {message}\n", severity.letter());
        write_stderr(line.as_bytes());
    }
}

#[cfg(target_os = "android")]
mod android {
    use libc::{c_char, c_int};

    unsafe extern "C" {
        pub fn __android_log_write(prio: c_int, tag: *const c_char, text: *const c_char) -> c_int;
    }
}

/// Write bytes to stderr with a single syscall.
#[inline]
pub fn write_stderr(s: &[u8]) {
    // SAFETY: s is a valid byte slice, fd 2 is always valid (write fails
    // with EBADF if the host closed it, which we ignore)
    unsafe {
        libc::write(libc::STDERR_FILENO, s.as_ptr().cast(), s.len());
    }
}

/* interior NULs would make CString::new fail; drop them instead */
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
fn c_string_lossy(s: &str) -> CString {
    CString::new(s).unwrap_or_else(|_| {
        let cleaned: Vec<u8> = s.bytes().filter(|&b| b != 0).collect();
        CString::new(cleaned).unwrap_or_default()
    })
}
