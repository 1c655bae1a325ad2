//! Tab-separated record sink.
//!
//! ```text
//! time	temperature
//! 1.004511	21.437
//! 2.008926	21.437
//! ```
//!
//! Every line is flushed as written so a crash or `kill` loses nothing
//! already measured.

use std::io::Write;

use crate::app::ports::RecordSink;
use crate::error::OutputError;

pub const HEADER: &str = "time\ttemperature\n";

pub struct TsvRecordSink<W> {
    writer: W,
    records: u64,
}

impl<W: Write> TsvRecordSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, records: 0 }
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for TsvRecordSink<W> {
    fn write_header(&mut self) -> Result<(), OutputError> {
        self.writer.write_all(HEADER.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn record(&mut self, timestamp: f64, temperature_c: f64) -> Result<(), OutputError> {
        // `{:?}` keeps a trailing `.0` on whole numbers.
        writeln!(self.writer, "{:?}\t{:?}", timestamp, temperature_c)?;
        self.writer.flush()?;
        self.records += 1;
        Ok(())
    }
}
