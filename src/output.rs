//! Record writers.
//!
//! Records can be written as NDJSON (one object per line), a compact JSON
//! array, or a pretty-printed JSON document.

use crate::error::OutputError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output encoding for extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact JSON array
    Json,
    /// Indented JSON
    #[default]
    Pretty,
    /// One JSON object per line
    Ndjson,
}

/// NDJSON (Newline Delimited JSON) writer
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single record as an NDJSON line
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), OutputError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn write_all<T: Serialize>(&mut self, records: &[T]) -> Result<(), OutputError> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Streams records into a JSON array.
pub struct JsonArrayWriter<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonArrayWriter<W> {
    /// Writes the opening bracket.
    pub fn new(mut writer: W) -> Result<Self, OutputError> {
        write!(writer, "[")?;
        Ok(Self {
            writer,
            first: true,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), OutputError> {
        if !self.first {
            write!(self.writer, ",")?;
        }
        self.first = false;

        serde_json::to_writer(&mut self.writer, record)?;
        Ok(())
    }

    /// Closes the array and flushes.
    pub fn finish(mut self) -> Result<(), OutputError> {
        writeln!(self.writer, "]")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes `records` to `writer` in `format`.
pub fn write_records<W, T>(writer: W, records: &[T], format: OutputFormat) -> Result<(), OutputError>
where
    W: Write,
    T: Serialize,
{
    match format {
        OutputFormat::Ndjson => {
            let mut out = NdjsonWriter::new(writer);
            out.write_all(records)?;
            out.flush()
        }
        OutputFormat::Json => {
            let mut out = JsonArrayWriter::new(writer)?;
            for record in records {
                out.write(record)?;
            }
            out.finish()
        }
        OutputFormat::Pretty => write_value(writer, &records, format),
    }
}

/// Writes a single serializable value. NDJSON writes it as one line.
pub fn write_value<W, T>(mut writer: W, value: &T, format: OutputFormat) -> Result<(), OutputError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Pretty => serde_json::to_writer_pretty(&mut writer, value)?,
        OutputFormat::Json | OutputFormat::Ndjson => serde_json::to_writer(&mut writer, value)?,
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
