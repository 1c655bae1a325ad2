//! Fuzz target: `StabilityDetector`
//!
//! Drives the rolling window with arbitrary readings and checks:
//! - The window never holds more than its capacity
//! - A baseline is only reported for a full window
//! - The reported spread is below the tolerance and the mean lies
//!   within the window's range
//!
//! cargo fuzz run fuzz_stability

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermotrack::stability::{MAX_BASE_WINDOW, StabilityDetector};

fuzz_target!(|data: &[u8]| {
    let Some((&head, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(head) % MAX_BASE_WINDOW.min(64) + 1;
    let Ok(mut detector) = StabilityDetector::new(capacity, 0.5) else {
        return;
    };

    for chunk in rest.chunks_exact(2) {
        let raw = i16::from_le_bytes([chunk[0], chunk[1]]);
        let reading = f64::from(raw) / 100.0;
        let found = detector.push(reading);
        assert!(detector.len() <= capacity);

        if let Some(baseline) = found {
            assert!(detector.is_full());
            assert!(baseline.spread_c < 0.5);
            let lo = detector.readings().fold(f64::INFINITY, f64::min);
            let hi = detector.readings().fold(f64::NEG_INFINITY, f64::max);
            assert!(baseline.value_c >= lo - 1e-9 && baseline.value_c <= hi + 1e-9);
        }
    }
});
