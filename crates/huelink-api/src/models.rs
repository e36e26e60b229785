// Bridge resource records
//
// Bridges of different generations fill these objects loosely: numbers where
// strings are expected, missing `reachable`, float brightness. Every field is
// therefore read through a lenient deserializer that never rejects the
// record; the caller decides what a missing value means.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A group from `GET /api/{username}/groups[/{id}]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub lights: Vec<String>,
}

/// A light from `GET /api/{username}/lights[/{id}]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_state")]
    pub state: LightStateRecord,
}

/// The `state` object of a light.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightStateRecord {
    #[serde(default, deserialize_with = "truthy")]
    pub on: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bri: Option<serde_json::Number>,
    /// Absent on older firmware.
    #[serde(default, deserialize_with = "lenient_truthy")]
    pub reachable: Option<bool>,
}

impl LightStateRecord {
    /// Only an explicit falsy `reachable` counts as unreachable.
    pub fn is_unreachable(&self) -> bool {
        self.reachable == Some(false)
    }

    /// Brightness as a sample for averaging: any number, truncated toward zero.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn bri_sample(&self) -> Option<i64> {
        let bri = self.bri.as_ref()?;
        bri.as_i64().or_else(|| bri.as_f64().map(|f| f.trunc() as i64))
    }

    /// Brightness as reported for a single light: integers only.
    pub fn bri_exact(&self) -> Option<i64> {
        self.bri.as_ref().and_then(serde_json::Number::as_i64)
    }
}

/// A scene from `GET /api/{username}/scenes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: Option<String>,
}

impl GroupRecord {
    /// Parse one entry of a group map; `None` if it is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        parse_object(value)
    }
}

impl LightRecord {
    /// Parse one entry of a light map; `None` if it is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        parse_object(value)
    }
}

impl SceneRecord {
    /// Parse one entry of a scene map; `None` if it is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        parse_object(value)
    }
}

fn parse_object<T: for<'de> Deserialize<'de>>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    T::deserialize(value).ok()
}

// ── Write bodies ─────────────────────────────────────────────────────

/// Body of `PUT /api/{username}/lights/{id}/state`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LightStateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
}

/// Body of `PUT /api/{username}/groups/{id}/action`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
}

// ── Lenient field readers ────────────────────────────────────────────

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_ids<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_state<'de, D: Deserializer<'de>>(d: D) -> Result<LightStateRecord, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(parse_object(&value).unwrap_or_default())
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(is_truthy(&Value::deserialize(d)?))
}

fn lenient_truthy<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    // A present `null` is still "reported as false".
    Ok(Some(is_truthy(&Value::deserialize(d)?)))
}

fn lenient_number<'de, D>(d: D) -> Result<Option<serde_json::Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => Some(n),
        _ => None,
    })
}
