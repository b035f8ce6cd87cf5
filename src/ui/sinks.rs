//! Record sinks for terminal display and JSON export.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use crate::core::system_monitor::{Record, Sink};
use crate::error::{GroferError, Result};
use crate::ui::system_formatters::format_record;

fn write_failed(e: io::Error) -> GroferError {
    GroferError::sink(format!("write failed: {}", e))
}

/// Human-readable sections, one per record.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn consume(&mut self, record: Record) -> Result<()> {
        self.out
            .write_all(format_record(&record).as_bytes())
            .map_err(write_failed)
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(write_failed)
    }
}

/// One JSON object per line: `{"field_set":"MEM","payload":{...}}`.
pub struct JsonSink<W: Write> {
    out: W,
}

impl JsonSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl JsonSink<BufWriter<File>> {
    /// Export to a file, appending so repeated rounds accumulate.
    pub fn file(path: &Path) -> Result<Self> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Sink for JsonSink<W> {
    fn consume(&mut self, record: Record) -> Result<()> {
        serde_json::to_writer(&mut self.out, &record)
            .map_err(|e| GroferError::sink(format!("cannot encode {}: {}", record.field_set(), e)))?;
        self.out.write_all(b"\n").map_err(write_failed)
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(write_failed)
    }
}
