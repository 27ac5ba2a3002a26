//! Generic document model shared by every document store backend.
//!
//! A [`Document`] is what callers write: string fields plus
//! [`FieldValue::ServerTimestamp`] sentinels that the store replaces with its
//! own clock at write time. A [`StoredDocument`] is what a store holds and
//! returns, with every sentinel resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a field in a document being written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    /// Replaced by the store's current time when the write is applied
    ServerTimestamp,
}

/// Document to be written to a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string field
    pub fn with_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldValue::String(value.into()));
        self
    }

    /// Add a field set to the server's time at write
    pub fn with_server_timestamp(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldValue::ServerTimestamp);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve every sentinel against `server_time`
    pub fn resolve(self, server_time: DateTime<Utc>) -> StoredDocument {
        let fields = self
            .fields
            .into_iter()
            .map(|(name, value)| {
                let stored = match value {
                    FieldValue::String(s) => StoredValue::String(s),
                    FieldValue::ServerTimestamp => StoredValue::Timestamp(server_time),
                };
                (name, stored)
            })
            .collect();

        StoredDocument {
            fields,
            update_time: server_time,
        }
    }
}

/// Value of a field in a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    String(String),
    Timestamp(DateTime<Utc>),
}

impl StoredValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            StoredValue::Timestamp(_) => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredValue::Timestamp(t) => Some(*t),
            StoredValue::String(_) => None,
        }
    }
}

/// Document as held by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub fields: BTreeMap<String, StoredValue>,
    /// Server time of the last write
    pub update_time: DateTime<Utc>,
}

impl StoredDocument {
    pub fn get(&self, name: &str) -> Option<&StoredValue> {
        self.fields.get(name)
    }
}

/// Outcome of a successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    /// Server time at which the write was applied
    pub update_time: DateTime<Utc>,
}
