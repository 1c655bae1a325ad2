//! Fuzz target: `w1_slave` parser
//!
//! Feeds arbitrary bytes (lossily decoded) to `parse_w1_slave` and checks:
//! - No panics, including on huge or malformed `t=` values
//! - Text without a `YES` first line is always `NotReady`
//! - Any value returned is finite
//!
//! cargo fuzz run fuzz_w1_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermotrack::error::SensorError;
use thermotrack::sensors::parse_w1_slave;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let ready = text
        .lines()
        .next()
        .is_some_and(|line| line.trim().ends_with("YES"));

    match parse_w1_slave(&text) {
        Ok(Some(celsius)) => {
            assert!(ready, "value parsed from a not-ready snapshot");
            assert!(celsius.is_finite());
        }
        Ok(None) => assert!(ready),
        Err(SensorError::NotReady) => assert!(!ready),
        Err(other) => panic!("parser returned {other:?}"),
    }
});
