//! Session history: recent inputs plus named variables

use std::collections::{HashMap, VecDeque};
use std::fmt;
use quanta_core::{QuantaError, Result};
use quanta_units::Value;

/// Entries kept before the oldest is evicted
pub const HISTORY_CAPACITY: usize = 200;

/// Bounded log of raw inputs, oldest first, with the variables a session
/// has defined.
#[derive(Debug, Clone, Default)]
pub struct ParseHistory {
    entries: VecDeque<String>,
    defined_variables: HashMap<String, Value>,
}

impl ParseHistory {
    pub fn new() -> Self {
        ParseHistory::default()
    }

    /// Append an entry, evicting the oldest past capacity
    pub fn add(&mut self, entry: impl Into<String>) {
        self.entries.push_back(entry.into());
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// The `index`th entry, 0 being the oldest kept
    pub fn read(&self, index: usize) -> Result<&str> {
        self.entries
            .get(index)
            .map(|s| s.as_str())
            .ok_or(QuantaError::HistoryOutOfRange { index, len: self.entries.len() })
    }

    /// Remove the `index`th entry; later entries shift down by one
    pub fn delete(&mut self, index: usize) -> Result<String> {
        let len = self.entries.len();
        self.entries
            .remove(index)
            .ok_or(QuantaError::HistoryOutOfRange { index, len })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }

    /// Independent snapshot of entries and variables
    pub fn copy(&self) -> ParseHistory {
        self.clone()
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.defined_variables.insert(name.into(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.defined_variables.get(name)
    }

    pub fn defined_variables(&self) -> &HashMap<String, Value> {
        &self.defined_variables
    }
}

impl fmt::Display for ParseHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{}: {}", i, entry)?;
        }
        Ok(())
    }
}
