//! Problem-format error bodies.
//!
//! Backends answer failures with an RFC 7807 style object
//! (`type/title/status/detail/instance`) that may also carry the legacy
//! `code`/`message` pair and arbitrary extension members.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Structured failure payload as sent by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemBody {
    #[serde(rename = "type", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_u16", skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Business error code, e.g. `40904` for "already exists".
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Extension members not covered above.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ProblemBody {
    /// Parse a response body. Anything that is not a JSON object yields `None`.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        non_empty(self.detail.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        non_empty(self.message.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

// A member of the wrong JSON type is dropped on its own; the rest of the body
// still parses.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// Backends are inconsistent about numeric fields; a string "409" or a null is
// accepted rather than failing the whole body.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u16<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.and_then(|n| u16::try_from(n).ok()))
}
