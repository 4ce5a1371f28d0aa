//! launchtime - application launch time measurement from log milestones
//!
//! This library runs a target process (or reads captured journal output),
//! classifies each log line against a table of recognizers, and emits a
//! timing record for every milestone with its time since start and since
//! the previous milestone.

pub mod anchor;
pub mod classifier;
pub mod cli;
pub mod driver;
pub mod environment;
pub mod error;
pub mod journal;
pub mod launcher;
pub mod matcher;
pub mod output;
pub mod recognizer;
