//! Match configuration store.
//!
//! Settings arrive from the wrapper during the setup handshake, one line
//! each, and are read by the concrete game afterwards (typically from
//! `Game::create_processor` and `Game::send_game_settings`).
//!
//! Keys are write-once for the run: a second write to the same name is
//! logged and ignored, so whatever the wrapper sent first stays authoritative.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A single setting value: plain text or a structured JSON value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Raw text, as received on the wire.
    Text(String),
    /// Structured value, for games that parse their settings into JSON.
    Structured(Value),
}

impl SettingValue {
    /// The value as text, if it is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            SettingValue::Structured(_) => None,
        }
    }

    /// The value as an integer, parsing text values on the fly.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Text(s) => s.trim().parse().ok(),
            SettingValue::Structured(v) => v.as_i64(),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

impl From<Value> for SettingValue {
    fn from(v: Value) -> Self {
        SettingValue::Structured(v)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Structured(Value::from(n))
    }
}

/// Name-to-value store for the settings received during setup.
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    settings: HashMap<String, SettingValue>,
}

impl Configuration {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a setting. The first write to a name wins.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SettingValue>) {
        let name = name.into();
        if self.settings.contains_key(&name) {
            warn!(setting = %name, "ignoring repeated write to setting");
            return;
        }
        self.settings.insert(name, value.into());
    }

    /// Look a setting up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.settings.get(name)
    }

    /// Text value of a setting, if present and textual.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SettingValue::as_text)
    }

    /// Integer value of a setting, parsing text on the fly.
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SettingValue::as_i64)
    }

    /// Whether a setting with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    /// Number of stored settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether no settings were stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Iterate over (name, value) pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v))
    }
}
