/*
 * config.rs
 *
 * Knobs for the logger and the observer. Defaults are what the Android
 * demo ships with; CPPDEMO_* environment variables override them so a
 * desktop run can shorten the flush wait or change the tag.
 */

use std::time::Duration;

use crate::capture::DEFAULT_MAX_FRAMES;
use crate::chain::Terminal;
use crate::duration::parse_duration;
use crate::error::{DemoError, Result};
use crate::platform_log::Severity;

pub const ENV_LOG_TAG: &str = "CPPDEMO_LOG_TAG";
pub const ENV_MAX_FRAMES: &str = "CPPDEMO_MAX_FRAMES";
pub const ENV_FLUSH_TIMEOUT: &str = "CPPDEMO_FLUSH_TIMEOUT";

pub const DEFAULT_LOG_TAG: &str = "CppDemo";
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_millis(2000);

/* backtrace(3)-style buffers above this are pointless for a demo */
const MAX_FRAMES_LIMIT: usize = 256;

/* logcat truncates tags longer than this */
const MAX_TAG_LEN: usize = 23;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_tag: String,
    pub severity: Severity,
    pub max_frames: usize,
    pub flush_timeout: Duration,
    pub terminal: Terminal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_tag: DEFAULT_LOG_TAG.to_string(),
            severity: Severity::Warn,
            max_frames: DEFAULT_MAX_FRAMES,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            terminal: Terminal::Abort,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each CPPDEMO_* key.
    ///
    /// ```
    /// use cppdemo::config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "CPPDEMO_FLUSH_TIMEOUT" => Some("250ms".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.flush_timeout, Duration::from_millis(250));
    /// assert_eq!(config.max_frames, 64);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(tag) = lookup(ENV_LOG_TAG) {
            config.log_tag = parse_log_tag(&tag)?;
        }
        if let Some(frames) = lookup(ENV_MAX_FRAMES) {
            config.max_frames = parse_max_frames(&frames)?;
        }
        if let Some(timeout) = lookup(ENV_FLUSH_TIMEOUT) {
            config.flush_timeout = parse_duration(&timeout)?;
        }

        Ok(config)
    }
}

pub fn parse_max_frames(input: &str) -> Result<usize> {
    let input = input.trim();
    let frames: usize = input
        .parse()
        .map_err(|_| DemoError::InvalidFrameLimit(format!("not a number: '{input}'")))?;

    if frames == 0 || frames > MAX_FRAMES_LIMIT {
        return Err(DemoError::InvalidFrameLimit(format!(
            "{frames} is outside 1..={MAX_FRAMES_LIMIT}"
        )));
    }
    Ok(frames)
}

pub fn parse_log_tag(input: &str) -> Result<String> {
    let tag = input.trim();
    if tag.is_empty() {
        return Err(DemoError::InvalidLogTag("empty tag".to_string()));
    }
    if tag.len() > MAX_TAG_LEN {
        return Err(DemoError::InvalidLogTag(format!(
            "'{tag}' is longer than {MAX_TAG_LEN} bytes"
        )));
    }
    Ok(tag.to_string())
}
