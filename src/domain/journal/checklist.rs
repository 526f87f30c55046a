//! Checklist state captured on the form: the confluence list and the four
//! approach sub-checklists.

use crate::domain::errors::JournalError;
use serde::{Deserialize, Serialize};

const CONFLUENCE_DELIMITER: &str = ", ";
const APPROACH_DELIMITER: &str = "; ";

/// Confluences the trader marked as observed, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confluences {
    items: Vec<String>,
}

impl Confluences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a confluence. Blank names and repeats are ignored.
    pub fn select(&mut self, name: impl AsRef<str>) {
        let name = name.as_ref().trim();
        if name.is_empty() || self.items.iter().any(|c| c == name) {
            return;
        }
        self.items.push(name.to_string());
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn serialize(&self) -> String {
        self.items.join(CONFLUENCE_DELIMITER)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Confluences {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut confluences = Confluences::new();
        for name in iter {
            confluences.select(name);
        }
        confluences
    }
}

/// One approach sub-checklist: ordered `key=value` answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproachChecklist {
    entries: Vec<(String, String)>,
}

impl ApproachChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`. Re-setting a key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Parses a `key=value` form answer. A bare key is a ticked checkbox.
    pub fn set_from_entry(&mut self, entry: &str) -> Result<(), JournalError> {
        let (key, value) = match entry.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (entry.trim(), "true"),
        };
        if key.is_empty() {
            return Err(JournalError::InvalidField {
                field: "approach",
                value: entry.to_string(),
            });
        }
        self.set(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(APPROACH_DELIMITER)
    }
}
