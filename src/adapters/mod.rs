//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                    |
//! |-------------|----------------|--------------------------------|
//! | `console`   | EventSink      | Operator banners, progress dots|
//! | `hardware`  | SensorPort     | w1 thermometer driver          |
//! |             | IndicatorPort  | LED / buzzer driver            |
//! | `log_sink`  | EventSink      | `log` facade                   |
//! | `time`      | TimePort       | `std::time::Instant`           |
//! | `tsv_sink`  | RecordSink     | Tab-separated data file        |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod tsv_sink;
