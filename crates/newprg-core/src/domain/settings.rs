//! Line-oriented `key=value` settings, the legacy `.cfg` format.
//!
//! ```text
//! # who writes the program
//! author=Jane Doe
//! email=jane@example.org
//! ```

use std::collections::BTreeMap;

use crate::domain::error::DomainError;
use crate::text::Buffer;

/// Ordered `key=value` map. A key given twice keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueConfig {
    entries: BTreeMap<String, String>,
}

impl KeyValueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, DomainError> {
        Self::from_buffer(Buffer::from(text))
    }

    /// Parse settings out of an already loaded buffer.
    ///
    /// Comments start with `#`; blank lines are skipped; keys and values are
    /// trimmed. Values may contain `=`.
    pub fn from_buffer(mut buffer: Buffer) -> Result<Self, DomainError> {
        buffer.append_eol(1)?;
        buffer.strip_delimited("#", "\n", false);
        buffer.lines_to_records();

        let mut config = Self::new();
        for record in buffer.records() {
            let line = String::from_utf8_lossy(record);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(DomainError::MalformedSetting { line: line.into() });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(DomainError::MalformedSetting { line: line.into() });
            }
            config.insert(key, value.trim());
        }
        Ok(config)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing or empty value is an error.
    pub fn require(&self, key: &str) -> Result<&str, DomainError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DomainError::MissingSetting { key: key.into() })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render back to `key=value` lines, sorted by key.
    pub fn to_text(&self) -> Result<String, DomainError> {
        let mut buffer = Buffer::new();
        for (key, value) in self.iter() {
            buffer.push_record(&format!("{key}={value}"), 64)?;
        }
        buffer.records_to_lines();
        Ok(buffer.to_string_lossy())
    }
}
