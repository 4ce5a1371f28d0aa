use crate::error::LaunchError;
use crate::matcher::ParsedLine;
use crate::recognizer::{Milestone, Recognizer, RecognizerTable};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../recognizers-default.toml");

/// Identifier-keyed recognizers plus the ordered fallback chain
///
/// Built once at startup and never patched afterwards. Recognizers own
/// their seen keys, so dispatch takes `&mut self`.
///
/// # Example Usage
/// ```
/// use launchtime::matcher::LineMatcher;
/// use launchtime::recognizer::RecognizerRegistry;
///
/// let mut registry = RecognizerRegistry::builtin()?;
/// let line = LineMatcher::new().parse("[general] starting process").unwrap();
/// let milestone = registry.dispatch(&line).unwrap();
/// assert_eq!(milestone.name, "general");
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct RecognizerRegistry {
    recognizers: Vec<Recognizer>,

    /// Identifier → index into `recognizers`
    by_identifier: HashMap<String, usize>,

    fallbacks: Vec<Recognizer>,
}

impl RecognizerRegistry {
    /// Load a recognizer table from a TOML file
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid TOML, or
    /// fails table validation (see [`RecognizerRegistry::from_table`]).
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read recognizer table: {}",
                path.as_ref().display()
            )
        })?;
        Self::from_toml_str(&content).with_context(|| {
            format!(
                "Invalid recognizer table: {}",
                path.as_ref().display()
            )
        })
    }

    /// Parse a recognizer table from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: RecognizerTable =
            toml::from_str(content).context("Failed to parse TOML recognizer definitions")?;
        Ok(Self::from_table(&table)?)
    }

    /// Built-in table compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_TOML).context("Failed to load embedded recognizers-default.toml")
    }

    /// Compile and validate a table
    ///
    /// Every keyed recognizer needs at least one identifier, identifiers
    /// must be unique across the table, and fallbacks must carry a name
    /// because their lines have no identifier to borrow one from.
    pub fn from_table(table: &RecognizerTable) -> crate::error::Result<Self> {
        let mut recognizers = Vec::with_capacity(table.recognizer.len());
        let mut by_identifier = HashMap::new();

        for (index, def) in table.recognizer.iter().enumerate() {
            if def.identifiers.is_empty() {
                return Err(LaunchError::NoIdentifiers(index));
            }
            let label = def.identifiers.join(",");
            recognizers.push(def.build(&label)?);

            for identifier in &def.identifiers {
                if by_identifier.insert(identifier.clone(), index).is_some() {
                    return Err(LaunchError::DuplicateIdentifier(identifier.clone()));
                }
            }
        }

        let mut fallbacks = Vec::with_capacity(table.fallback.len());
        for (index, def) in table.fallback.iter().enumerate() {
            let Some(name) = &def.name else {
                return Err(LaunchError::UnnamedFallback(index));
            };
            fallbacks.push(def.build(name)?);
        }

        tracing::debug!(
            "Loaded {} recognizers for {} identifiers, {} fallbacks",
            recognizers.len(),
            by_identifier.len(),
            fallbacks.len()
        );

        Ok(Self {
            recognizers,
            by_identifier,
            fallbacks,
        })
    }

    /// Route a parsed line to its recognizer
    ///
    /// Lines with an identifier go only to that identifier's recognizer;
    /// unknown identifiers are not recognized. Lines without one walk the
    /// fallback chain and stop at the first recognizer that fires.
    pub fn dispatch(&mut self, line: &ParsedLine<'_>) -> Option<Milestone> {
        match line.identifier {
            Some(identifier) => {
                let index = *self.by_identifier.get(identifier)?;
                self.recognizers[index].attempt(line)
            }
            None => self
                .fallbacks
                .iter_mut()
                .find_map(|recognizer| recognizer.attempt(line)),
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.by_identifier.contains_key(identifier)
    }

    /// Recognizer handling `identifier`, if any
    pub fn get(&self, identifier: &str) -> Option<&Recognizer> {
        let index = *self.by_identifier.get(identifier)?;
        self.recognizers.get(index)
    }

    pub fn fallbacks(&self) -> &[Recognizer] {
        &self.fallbacks
    }
}
