/*
 * duration.rs
 *
 * Parse the flush timeout: "2000ms", "2s", "0.5", "1m". No suffix means
 * seconds. Zero means don't wait for the sink at all. Case insensitive.
 *
 * Capped at one hour. The observer blocks a dying process for this long,
 * anything bigger is a typo.
 */

use std::time::Duration;

use crate::error::{DemoError, Result};

const MAX_SECONDS: f64 = 3600.0;

/// Parse "2000ms", "2", "2s", "1.5m". No suffix = seconds.
///
/// # Examples
///
/// ```
/// use cppdemo::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("2000ms").unwrap(), Duration::from_secs(2));
/// assert_eq!(parse_duration("2").unwrap(), Duration::from_secs(2));
/// assert_eq!(parse_duration("0.5s").unwrap(), Duration::from_millis(500));
/// assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
/// assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();

    if input.is_empty() {
        return Err(DemoError::InvalidDuration("empty duration".to_string()));
    }

    let (num_str, suffix) = split_number_and_suffix(input);

    if num_str.is_empty() {
        return Err(DemoError::InvalidDuration(format!(
            "no numeric value in '{input}'"
        )));
    }

    let value: f64 = num_str
        .parse()
        .map_err(|_| DemoError::InvalidDuration(format!("invalid number '{num_str}'")))?;

    if value < 0.0 {
        return Err(DemoError::NegativeDuration);
    }
    if value.is_nan() {
        return Err(DemoError::InvalidDuration("NaN is not allowed".to_string()));
    }
    if value.is_infinite() {
        return Err(DemoError::DurationOverflow);
    }

    /* divide for ms so "2000ms" lands on exactly 2s */
    let total_seconds = match suffix.to_ascii_lowercase().as_str() {
        "ms" => value / 1000.0,
        "" | "s" => value,
        "m" => value * 60.0,
        _ => {
            return Err(DemoError::InvalidDuration(format!(
                "invalid suffix '{suffix}'"
            )));
        }
    };

    if total_seconds > MAX_SECONDS {
        return Err(DemoError::DurationOverflow);
    }

    Ok(Duration::from_secs_f64(total_seconds))
}

/* find where the number ends and suffix begins */
fn split_number_and_suffix(input: &str) -> (&str, &str) {
    let suffix_start = input
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_ascii_digit() || *c == '.')
        .map_or(0, |(i, c)| i + c.len_utf8());

    (&input[..suffix_start], &input[suffix_start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_milliseconds() {
        assert_eq!(parse_duration("2000ms").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("250MS").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_duration("2").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("2S").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("0.5m").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0ms").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(parse_duration("  2s  ").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_empty() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("   ").is_err());
    }

    #[test]
    fn test_invalid_suffix() {
        assert!(parse_duration("2x").is_err());
        assert!(parse_duration("2h").is_err());
    }

    #[test]
    fn test_invalid_negative() {
        assert!(matches!(
            parse_duration("-5"),
            Err(DemoError::NegativeDuration)
        ));
    }

    #[test]
    fn test_over_cap() {
        assert!(matches!(
            parse_duration("61m"),
            Err(DemoError::DurationOverflow)
        ));
    }

    #[test]
    fn test_invalid_format() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("ms").is_err());
    }
}
