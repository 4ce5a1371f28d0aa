//! Output formats for timing records
//!
//! Text output is `;`-separated with a header before the first record:
//!
//! ```text
//! timer; reason; time; difference
//! general; starting process; 0.000; +0.000
//! app; Using Wayland-EGL; 0.412; +0.412
//! ```
//!
//! JSON output writes one object per line and no header. Each record is
//! flushed immediately so a tail of the sink follows the target in real time.

use crate::anchor::TimingRecord;
use clap::ValueEnum;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

pub const HEADER: &str = "timer; reason; time; difference";

/// Output format for timing records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Semicolon-separated text with a header line (default)
    #[default]
    Text,
    /// JSON lines for machine parsing
    Json,
}

/// Render a record as a text line, without terminator
pub fn format_record(record: &TimingRecord) -> String {
    format!(
        "{}; {}; {:.3}; {:+.3}",
        record.name, record.reason, record.since_start, record.since_last
    )
}

/// Writes timing records to one sink, tracking that sink's header
#[derive(Debug)]
pub struct TimingWriter<W: Write> {
    sink: W,
    format: OutputFormat,
    header_written: bool,
    records: usize,
}

impl<W: Write> TimingWriter<W> {
    pub fn new(sink: W, format: OutputFormat) -> Self {
        Self {
            sink,
            format,
            header_written: false,
            records: 0,
        }
    }

    /// Write and flush one record, preceded by the header the first time
    pub fn write_record(&mut self, record: &TimingRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                if !self.header_written {
                    writeln!(self.sink, "{}", HEADER)?;
                    self.header_written = true;
                }
                writeln!(self.sink, "{}", format_record(record))?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.sink, record)?;
                self.sink.write_all(b"\n")?;
            }
        }
        self.records += 1;
        self.sink.flush()
    }

    /// Number of records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Destination of timing records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    Stderr,
    /// Created or truncated on open
    File(PathBuf),
}

impl OutputTarget {
    /// `-o FILE` when given, else `default`
    pub fn from_option(path: Option<PathBuf>, default: OutputTarget) -> Self {
        path.map(OutputTarget::File).unwrap_or(default)
    }

    pub fn open(&self) -> io::Result<Box<dyn Write>> {
        Ok(match self {
            OutputTarget::Stdout => Box::new(io::stdout()),
            OutputTarget::Stderr => Box::new(io::stderr()),
            OutputTarget::File(path) => Box::new(File::create(path)?),
        })
    }

    /// Stream for lines that are not timing records
    ///
    /// The complementary standard stream, or stderr when records go to a file.
    pub fn passthrough(&self) -> Box<dyn Write> {
        match self {
            OutputTarget::Stderr => Box::new(io::stdout()),
            OutputTarget::Stdout | OutputTarget::File(_) => Box::new(io::stderr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, reason: &str, since_start: f64, since_last: f64) -> TimingRecord {
        TimingRecord {
            name: name.to_string(),
            reason: reason.to_string(),
            since_start,
            since_last,
        }
    }

    #[test]
    fn test_format_record_precision_and_sign() {
        assert_eq!(
            format_record(&record("general", "starting process", 0.0, 0.0)),
            "general; starting process; 0.000; +0.000"
        );
        assert_eq!(
            format_record(&record("app", "Frame prepared", 1.23456, 0.5)),
            "app; Frame prepared; 1.235; +0.500"
        );
        assert_eq!(
            format_record(&record("app", "late", 2.0, -0.25)),
            "app; late; 2.000; -0.250"
        );
    }

    #[test]
    fn test_header_written_once() {
        let mut writer = TimingWriter::new(Vec::new(), OutputFormat::Text);
        writer.write_record(&record("a", "x", 0.0, 0.0)).unwrap();
        writer.write_record(&record("b", "y", 1.0, 1.0)).unwrap();
        assert_eq!(writer.records(), 2);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "timer; reason; time; difference\n\
             a; x; 0.000; +0.000\n\
             b; y; 1.000; +1.000\n"
        );
    }

    #[test]
    fn test_no_records_no_header() {
        let writer = TimingWriter::new(Vec::new(), OutputFormat::Text);
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_header_tracked_per_sink() {
        let mut first = TimingWriter::new(Vec::new(), OutputFormat::Text);
        let mut second = TimingWriter::new(Vec::new(), OutputFormat::Text);
        first.write_record(&record("a", "x", 0.0, 0.0)).unwrap();
        second.write_record(&record("b", "y", 0.0, 0.0)).unwrap();

        for writer in [first, second] {
            let text = String::from_utf8(writer.into_inner()).unwrap();
            assert_eq!(text.matches(HEADER).count(), 1);
            assert!(text.starts_with(HEADER));
        }
    }

    #[test]
    fn test_json_lines_without_header() {
        let mut writer = TimingWriter::new(Vec::new(), OutputFormat::Json);
        writer
            .write_record(&record("general", "starting process", 0.0, 0.0))
            .unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(!text.contains(HEADER));

        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["name"], "general");
        assert_eq!(value["reason"], "starting process");
        assert_eq!(value["since_start"], 0.0);
    }

    #[test]
    fn test_output_target_from_option() {
        assert_eq!(
            OutputTarget::from_option(None, OutputTarget::Stderr),
            OutputTarget::Stderr
        );
        assert_eq!(
            OutputTarget::from_option(Some("out.txt".into()), OutputTarget::Stderr),
            OutputTarget::File("out.txt".into())
        );
    }
}
