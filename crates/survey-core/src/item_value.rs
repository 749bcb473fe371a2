#![forbid(unsafe_code)]

//! Choice items.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One selectable choice: a JSON value plus an optional display text.
///
/// Two items denote the same choice when their values are equal; the text
/// is presentation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemValue {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ItemValue {
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            text: None,
        }
    }

    #[must_use]
    pub fn with_text(value: impl Into<Value>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: Some(text.into()),
        }
    }

    /// Parse a choice from JSON: either `{"value": .., "text": ..}` or a
    /// bare value.
    #[must_use]
    pub fn from_json(json: Value) -> Self {
        if json.as_object().is_some_and(|m| m.contains_key("value"))
            && let Ok(item) = serde_json::from_value::<Self>(json.clone())
        {
            return item;
        }
        Self::new(json)
    }

    /// Text shown to respondents; falls back to the value.
    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => value_to_string(&self.value),
        }
    }

    #[must_use]
    pub fn has_value(&self, value: &Value) -> bool {
        self.value == *value
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Value> for ItemValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// String form of a value as used for action ids and display fallback:
/// strings unquoted, everything else as JSON.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn position_of(items: &[ItemValue], value: &Value) -> Option<usize> {
    items.iter().position(|i| i.has_value(value))
}
