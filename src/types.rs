//! Core data types: preference values, records and files

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A scalar preference value
///
/// The prefs.js format admits exactly one scalar type per entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PrefValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in summaries
    pub fn type_name(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::Integer(_) => "integer",
            PrefValue::String(_) => "string",
        }
    }
}

impl From<bool> for PrefValue {
    fn from(b: bool) -> Self {
        PrefValue::Bool(b)
    }
}

impl From<i64> for PrefValue {
    fn from(n: i64) -> Self {
        PrefValue::Integer(n)
    }
}

impl From<i32> for PrefValue {
    fn from(n: i32) -> Self {
        PrefValue::Integer(i64::from(n))
    }
}

impl From<&str> for PrefValue {
    fn from(s: &str) -> Self {
        PrefValue::String(s.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(s: String) -> Self {
        PrefValue::String(s)
    }
}

/// The statement function that introduced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefType {
    /// `user_pref(...)`
    #[default]
    User,
    /// `pref(...)`
    Default,
    /// `lock_pref(...)`
    Locked,
    /// `sticky_pref(...)`
    Sticky,
}

impl PrefType {
    /// Function name as written in prefs.js
    pub fn function_name(self) -> &'static str {
        match self {
            PrefType::User => "user_pref",
            PrefType::Default => "pref",
            PrefType::Locked => "lock_pref",
            PrefType::Sticky => "sticky_pref",
        }
    }

    pub fn from_function_name(name: &str) -> Option<Self> {
        match name {
            "user_pref" => Some(PrefType::User),
            "pref" => Some(PrefType::Default),
            "lock_pref" => Some(PrefType::Locked),
            "sticky_pref" => Some(PrefType::Sticky),
            _ => None,
        }
    }
}

impl fmt::Display for PrefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

/// A single preference record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PrefEntry {
    pub key: String,
    pub value: PrefValue,
    pub pref_type: PrefType,
}

impl PrefEntry {
    /// Create a `user_pref` record
    pub fn new(key: impl Into<String>, value: impl Into<PrefValue>) -> Self {
        PrefEntry {
            key: key.into(),
            value: value.into(),
            pref_type: PrefType::User,
        }
    }
}

/// An ordered set of preference records with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefFile {
    entries: Vec<PrefEntry>,
}

impl PrefFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a file from records, rejecting duplicate or empty keys
    pub fn from_entries(entries: Vec<PrefEntry>) -> Result<Self> {
        let mut file = PrefFile::new();
        for entry in entries {
            file.push(entry)?;
        }
        Ok(file)
    }

    /// Append a record; the key must not already be present
    pub fn push(&mut self, entry: PrefEntry) -> Result<()> {
        if entry.key.is_empty() {
            return Err(Error::InvalidPreference(
                "preference key must not be empty".to_string(),
            ));
        }
        if self.get(&entry.key).is_some() {
            return Err(Error::DuplicateKey(entry.key));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&PrefEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entries(&self) -> &[PrefEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PrefEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Compare the key/value sets of two files, ignoring record order
    pub fn same_prefs(&self, other: &PrefFile) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let ours: HashSet<&PrefEntry> = self.entries.iter().collect();
        other.entries.iter().all(|e| ours.contains(e))
    }

    /// Count records by value type
    pub fn type_counts(&self) -> HashMap<&'static str, usize> {
        let mut counts = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.value.type_name()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(PrefValue::Bool(true).as_bool(), Some(true));
        assert_eq!(PrefValue::Integer(-1).as_i64(), Some(-1));
        assert_eq!(PrefValue::from("x").as_str(), Some("x"));
        assert_eq!(PrefValue::Integer(1).as_str(), None);
        assert_eq!(PrefValue::from(false).type_name(), "bool");
    }

    #[test]
    fn test_function_names() {
        for t in [
            PrefType::User,
            PrefType::Default,
            PrefType::Locked,
            PrefType::Sticky,
        ] {
            assert_eq!(PrefType::from_function_name(t.function_name()), Some(t));
        }
        assert_eq!(PrefType::from_function_name("key"), None);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = PrefFile::from_entries(vec![
            PrefEntry::new("a.b", 1),
            PrefEntry::new("a.c", 2),
            PrefEntry::new("a.b", true),
        ]);
        match result {
            Err(Error::DuplicateKey(key)) => assert_eq!(key, "a.b"),
            other => panic!("expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut file = PrefFile::new();
        assert!(file.push(PrefEntry::new("", 1)).is_err());
        assert!(file.is_empty());
    }

    #[test]
    fn test_same_prefs_ignores_order() {
        let a = PrefFile::from_entries(vec![
            PrefEntry::new("x", 1),
            PrefEntry::new("y", "two"),
        ])
        .unwrap();
        let b = PrefFile::from_entries(vec![
            PrefEntry::new("y", "two"),
            PrefEntry::new("x", 1),
        ])
        .unwrap();
        assert!(a.same_prefs(&b));
        assert_ne!(a, b);

        let c = PrefFile::from_entries(vec![
            PrefEntry::new("y", "two"),
            PrefEntry::new("x", 2),
        ])
        .unwrap();
        assert!(!a.same_prefs(&c));
    }

    #[test]
    fn test_value_serializes_untagged() {
        let entry = PrefEntry::new("network.proxy.type", 2);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["value"], serde_json::json!(2));
        assert_eq!(json["pref_type"], serde_json::json!("user"));
    }
}
