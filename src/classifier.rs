//! Line classification: grammar match, recognizer dispatch, timing
//!
//! The classifier owns the registry and the timestamp anchor, so all state
//! mutated while classifying lives in one value on one thread.

use crate::anchor::{parse_journal_timestamp, TimestampAnchor, TimestampSource, TimingRecord};
use crate::matcher::{LineMatcher, ParsedLine};
use crate::recognizer::RecognizerRegistry;

/// Turns raw log lines into timing records
#[derive(Debug)]
pub struct Classifier {
    matcher: LineMatcher,
    registry: RecognizerRegistry,
    anchor: TimestampAnchor,
}

impl Classifier {
    pub fn new(registry: RecognizerRegistry) -> Self {
        Self {
            matcher: LineMatcher::new(),
            registry,
            anchor: TimestampAnchor::new(),
        }
    }

    /// Classify one line (without its terminator)
    ///
    /// Returns `None` when the grammar rejects the line, the identifier is
    /// unknown, no fallback fires, or a filtered recognizer suppresses a
    /// repeated key. The anchor only moves when a record is produced.
    pub fn classify(&mut self, line: &str, source: TimestampSource) -> Option<TimingRecord> {
        let parsed = self.matcher.parse(line)?;
        let milestone = self.registry.dispatch(&parsed)?;
        let timestamp = resolve_timestamp(&parsed, source);
        Some(
            self.anchor
                .record(milestone.name, milestone.reason, timestamp),
        )
    }

    pub fn anchor(&self) -> &TimestampAnchor {
        &self.anchor
    }
}

fn resolve_timestamp(parsed: &ParsedLine<'_>, source: TimestampSource) -> f64 {
    match source {
        TimestampSource::Captured(timestamp) => timestamp,
        TimestampSource::PreferJournal(read_time) => match parsed.journal_timestamp {
            Some(text) => parse_journal_timestamp(text).unwrap_or_else(|| {
                tracing::warn!(
                    "Unparsable journal timestamp '{}', using read time instead",
                    text
                );
                read_time
            }),
            None => read_time,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(RecognizerRegistry::builtin().unwrap())
    }

    #[test]
    fn test_general_line_first_record_is_zero() {
        let mut classifier = classifier();
        let record = classifier
            .classify("[general] starting process", TimestampSource::Captured(1234.5))
            .unwrap();
        assert_eq!(record.name, "general");
        assert_eq!(record.reason, "starting process");
        assert_eq!(record.since_start, 0.0);
        assert_eq!(record.since_last, 0.0);
    }

    #[test]
    fn test_unrecognized_line_does_not_move_anchor() {
        let mut classifier = classifier();
        assert!(classifier
            .classify("random chatter", TimestampSource::Captured(1.0))
            .is_none());
        assert!(!classifier.anchor().is_anchored());

        let record = classifier
            .classify("[general] starting process", TimestampSource::Captured(5.0))
            .unwrap();
        assert_eq!(record.since_start, 0.0);
    }

    #[test]
    fn test_deltas_across_records() {
        let mut classifier = classifier();
        classifier.classify("[general] starting process", TimestampSource::Captured(100.0));
        let egl = classifier
            .classify("[default] Using Wayland-EGL", TimestampSource::Captured(100.75))
            .unwrap();
        assert_eq!(egl.since_start, 0.75);
        assert_eq!(egl.since_last, 0.75);

        let end = classifier
            .classify("[general] ended process", TimestampSource::Captured(101.0))
            .unwrap();
        assert_eq!(end.since_start, 1.0);
        assert_eq!(end.since_last, 0.25);
    }

    #[test]
    fn test_semicolon_line_unmatched() {
        let mut classifier = classifier();
        assert!(classifier
            .classify("[general] a; b", TimestampSource::Captured(1.0))
            .is_none());
    }

    #[test]
    fn test_captured_overrides_journal() {
        let mut classifier = classifier();
        classifier.classify(
            "2021-03-04T12:00:00.000000+0200 host app[1]: [general] a",
            TimestampSource::Captured(10.0),
        );
        let record = classifier
            .classify(
                "2021-03-04T12:00:05.000000+0200 host app[1]: [general] b",
                TimestampSource::Captured(10.5),
            )
            .unwrap();
        assert_eq!(record.since_start, 0.5);
    }

    #[test]
    fn test_journal_timestamps_drive_deltas() {
        let mut classifier = classifier();
        classifier.classify(
            "2021-03-04T12:00:00.000000+0200 host app[1]: [general] a",
            TimestampSource::PreferJournal(0.0),
        );
        let record = classifier
            .classify(
                "2021-03-04T12:00:02.500000+0200 host app[1]: [general] b",
                TimestampSource::PreferJournal(0.0),
            )
            .unwrap();
        assert!((record.since_start - 2.5).abs() < 1e-6);
        assert!((record.since_last - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_journal_out_of_order_is_negative() {
        let mut classifier = classifier();
        classifier.classify(
            "2021-03-04T12:00:02.000000 host app[1]: [general] a",
            TimestampSource::PreferJournal(0.0),
        );
        let record = classifier
            .classify(
                "2021-03-04T12:00:01.000000 host app[1]: [general] b",
                TimestampSource::PreferJournal(0.0),
            )
            .unwrap();
        assert!((record.since_last + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_journal_uses_read_time() {
        let mut classifier = classifier();
        classifier.classify("[general] a", TimestampSource::PreferJournal(50.0));
        let record = classifier
            .classify("[general] b", TimestampSource::PreferJournal(53.0))
            .unwrap();
        assert_eq!(record.since_start, 3.0);
    }

    #[test]
    fn test_malformed_journal_does_not_panic() {
        let mut classifier = classifier();
        let record = classifier
            .classify(
                "2021-02-30T25:61:00.000 host app[1]: [general] a",
                TimestampSource::PreferJournal(7.0),
            )
            .unwrap();
        assert_eq!(record.since_start, 0.0);
    }
}
