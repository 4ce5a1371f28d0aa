//! Journal-capture mode: classify pre-recorded lines
//!
//! Input is typically `journalctl -o short-iso-precise` output, either a
//! saved file or a live pipe. Unmatched lines are dropped.

use crate::anchor::{wall_clock, TimestampSource};
use crate::classifier::Classifier;
use crate::error::Result;
use crate::output::TimingWriter;
use std::io::{BufRead, Write};

/// Classify every line of `reader`, writing records as they are found
///
/// With `use_journal` the journal timestamp in each line is preferred and
/// lines without one are timed on read. Returns the number of lines read.
pub fn parse_stream<R: BufRead, W: Write>(
    mut reader: R,
    classifier: &mut Classifier,
    timing: &mut TimingWriter<W>,
    use_journal: bool,
) -> Result<usize> {
    let mut buf = Vec::new();
    let mut lines = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lines += 1;

        let read_time = wall_clock();
        let source = if use_journal {
            TimestampSource::PreferJournal(read_time)
        } else {
            TimestampSource::Captured(read_time)
        };

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        if let Some(record) = classifier.classify(line, source) {
            timing.write_record(&record)?;
        }
    }
    tracing::debug!("Parsed {} lines, {} records", lines, timing.records());
    Ok(lines)
}
