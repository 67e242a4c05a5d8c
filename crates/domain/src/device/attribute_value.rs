//! Typed values held in a device's `settings` and `data` maps.
//!
//! The hierarchy never interprets these values; they are stored and returned
//! verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`; without this they would decode as `Float`.
    UInt(u64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
}

/// String-keyed attribute map, ordered by key so serialization is stable.
pub type Attributes = BTreeMap<String, AttributeValue>;
