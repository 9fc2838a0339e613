/*
 * fuzz_targets/parse_duration.rs
 *
 * CPPDEMO_FLUSH_TIMEOUT comes straight from the environment, so the parser
 * sees whatever the launcher sets. It must return Ok or Err, never panic,
 * and never hand back more than the one-hour cap.
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = core::str::from_utf8(data) {
        if let Ok(d) = cppdemo::duration::parse_duration(s) {
            assert!(d.as_secs() <= 3600);
        }
    }
});
