/*
 * error.rs
 *
 * Everything outside the observer that can go wrong. The observer itself
 * never returns these to anyone: it logs them and moves on.
 *
 * Exit codes follow sysexits.h so the host binary reads like any other
 * unix tool in a script.
 */

/// exit codes for cppdemo-host. sysexits.h values.
pub mod exit_codes {
    /// Bad CPPDEMO_* environment or command-line configuration
    pub const CONFIG_ERROR: u8 = 78;
    /// Sink or JNI failure outside the termination path
    pub const INTERNAL_ERROR: u8 = 70;
}

/* everything that can go wrong */
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("invalid duration: negative values not allowed")]
    NegativeDuration,
    #[error("invalid duration: value too large")]
    DurationOverflow,
    #[error("invalid frame limit: {0}")]
    InvalidFrameLimit(String),
    #[error("invalid log tag: {0}")]
    InvalidLogTag(String),
    #[error("report sink failure: {0}")]
    Sink(String),
    #[error("report sink i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("report serialization: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("jni call failed: {0}")]
    Jni(#[from] jni::errors::Error),
}

impl DemoError {
    /* configuration problems vs. everything else */
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidDuration(_)
            | Self::NegativeDuration
            | Self::DurationOverflow
            | Self::InvalidFrameLimit(_)
            | Self::InvalidLogTag(_) => exit_codes::CONFIG_ERROR,
            Self::Sink(_) | Self::Io(_) | Self::Serialize(_) | Self::Jni(_) => {
                exit_codes::INTERNAL_ERROR
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, DemoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_code() {
        assert_eq!(
            DemoError::NegativeDuration.exit_code(),
            exit_codes::CONFIG_ERROR
        );
        assert_eq!(
            DemoError::InvalidFrameLimit("0".into()).exit_code(),
            exit_codes::CONFIG_ERROR
        );
    }

    #[test]
    fn test_sink_error_exit_code() {
        let err = DemoError::Sink("closed".into());
        assert_eq!(err.exit_code(), exit_codes::INTERNAL_ERROR);
        assert_eq!(err.to_string(), "report sink failure: closed");
    }
}
