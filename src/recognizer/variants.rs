use crate::matcher::ParsedLine;
use regex::Regex;
use std::collections::HashSet;

/// Name and reason of a recognized line, before it is timed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub name: String,
    pub reason: String,
}

/// A matching rule that turns a parsed line into at most one milestone
#[derive(Debug, Clone)]
pub enum Recognizer {
    /// Fires for every line routed to it; the reason is kept as-is
    Unconditional { name: Option<String> },
    /// Fires on the first occurrence of each captured key
    Filtered(FilteredRecognizer),
}

impl Recognizer {
    pub fn unconditional(name: Option<String>) -> Self {
        Recognizer::Unconditional { name }
    }

    /// Try to recognize `line`
    ///
    /// The record name is the configured name, or the line's identifier when
    /// none is configured. With neither there is nothing to call the
    /// milestone and the line is not recognized.
    pub fn attempt(&mut self, line: &ParsedLine<'_>) -> Option<Milestone> {
        match self {
            Recognizer::Unconditional { name } => Some(Milestone {
                name: resolve_name(name.as_deref(), line)?,
                reason: line.reason.to_string(),
            }),
            Recognizer::Filtered(filtered) => filtered.attempt(line),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Recognizer::Unconditional { name } => name.as_deref(),
            Recognizer::Filtered(filtered) => filtered.name.as_deref(),
        }
    }
}

/// Secondary-pattern recognizer with at-most-once semantics per key
#[derive(Debug, Clone)]
pub struct FilteredRecognizer {
    name: Option<String>,
    pattern: Regex,
    seen: HashSet<String>,
}

impl FilteredRecognizer {
    /// Wrap an already anchored pattern
    pub fn new(name: Option<String>, pattern: Regex) -> Self {
        Self {
            name,
            pattern,
            seen: HashSet::new(),
        }
    }

    /// Key of the match: first capture group if the pattern has one and it
    /// participated, otherwise the whole match
    fn key<'a>(&self, reason: &'a str) -> Option<&'a str> {
        let caps = self.pattern.captures(reason)?;
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str())
    }

    pub fn attempt(&mut self, line: &ParsedLine<'_>) -> Option<Milestone> {
        let key = self.key(line.reason)?;
        if self.seen.contains(key) {
            tracing::debug!("Suppressing repeated milestone key '{}'", key);
            return None;
        }
        let name = resolve_name(self.name.as_deref(), line)?;
        self.seen.insert(key.to_string());
        Some(Milestone {
            name,
            reason: key.to_string(),
        })
    }

    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

fn resolve_name(configured: Option<&str>, line: &ParsedLine<'_>) -> Option<String> {
    configured.or(line.identifier).map(str::to_string)
}
