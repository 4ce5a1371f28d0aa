// Recognizer registry: identifier-keyed dispatch plus an ordered fallback chain
//
// A recognizer turns a parsed log line into at most one milestone. The
// unconditional variant fires for every line routed to it; the filtered
// variant matches a secondary pattern against the reason and fires once per
// distinct captured key.
//
// Tables are data: the built-in set ships as recognizers-default.toml and a
// user table can replace it without recompiling.

mod definition;
mod registry;
mod variants;

pub use definition::{RecognizerDefinition, RecognizerTable};
pub use registry::RecognizerRegistry;
pub use variants::{FilteredRecognizer, Milestone, Recognizer};
