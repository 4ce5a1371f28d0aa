//! Line grammar for target-process log output
//!
//! A line decomposes into an optional journal timestamp block, an optional
//! bracketed identifier and a mandatory reason:
//!
//! ```text
//! 2021-03-04T12:34:56.123456+0200 host app[42]: [general] starting process
//! └──────────── journal ────────────┘              └identifier┘ └─ reason ─┘
//! ```
//!
//! Matching is all-or-nothing. A `;` anywhere in the reason rejects the
//! whole line because `;` is the output field separator.

use regex::Regex;

const LINE_GRAMMAR: &str = r"(?x)
    ^
    # journalctl -o short-iso-precise prefix: timestamp, host, unit
    (?:(?P<journal>\d+-\d+-\d+T\d+:\d+:\d+\.\d+)(?:\+\d+)?\s\w+\s[^:]+:\s)?
    # category or similar, absent for lines handled by fallback recognizers
    (?:\[(?P<identifier>[^;\]]+)\]\s+)?
    (?P<reason>[^;]+)
    $";

/// Structural decomposition of one log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub journal_timestamp: Option<&'a str>,
    pub identifier: Option<&'a str>,
    pub reason: &'a str,
}

/// Compiled line grammar
#[derive(Debug, Clone)]
pub struct LineMatcher {
    grammar: Regex,
}

impl LineMatcher {
    pub fn new() -> Self {
        Self {
            grammar: Regex::new(LINE_GRAMMAR).expect("line grammar is a valid regex"),
        }
    }

    /// Decompose `line`, or return `None` when the grammar rejects it
    pub fn parse<'a>(&self, line: &'a str) -> Option<ParsedLine<'a>> {
        let caps = self.grammar.captures(line)?;
        Some(ParsedLine {
            journal_timestamp: caps.name("journal").map(|m| m.as_str()),
            identifier: caps.name("identifier").map(|m| m.as_str()),
            reason: caps.name("reason")?.as_str(),
        })
    }
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self::new()
    }
}
