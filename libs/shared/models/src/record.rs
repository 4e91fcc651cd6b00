use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// A raw record as returned by the record store, before normalization.
///
/// The store serves two parallel naming conventions: a legacy camelCase
/// shape (`firstName`, `timeSlot`, ...) and an external `_c`-suffixed
/// snake_case shape (`first_name_c`, `time_slot_c`, ...). Every accessor
/// takes a priority-ordered key list and resolves the first key holding a
/// usable value, so each entity declares one explicit mapping table
/// instead of scattering fallback chains across call sites.
#[derive(Debug, Clone, Default)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wraps a JSON value. Non-objects normalize to the empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// First key in priority order holding a value. Null and empty-string
    /// values count as absent so a blank legacy field never shadows a
    /// populated external one.
    pub fn get(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| {
            self.0.get(*key).filter(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                _ => true,
            })
        })
    }

    /// The store-assigned integer primary identifier.
    pub fn id(&self) -> Option<i64> {
        self.int_of(&["Id"])
    }

    pub fn str_of(&self, keys: &[&str]) -> String {
        self.opt_str_of(keys).unwrap_or_default()
    }

    pub fn opt_str_of(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Integer resolution for numeric and relationship fields; accepts
    /// bare integers, floats, numeric strings, and `{"Id": n}` objects.
    pub fn int_of(&self, keys: &[&str]) -> Option<i64> {
        self.get(keys).and_then(RecordLink::resolve)
    }

    /// Ordered string sequence; the external source may flatten arrays to
    /// a comma-and-space-joined string.
    pub fn list_of(&self, keys: &[&str]) -> Vec<String> {
        match self.get(keys) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(joined)) => joined
                .split(", ")
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A JSON sub-object, stored either embedded or as a serialized
    /// string. Malformed data is logged and replaced with the default;
    /// it never aborts normalization of the rest of the record.
    pub fn sub_object<T>(&self, keys: &[&str], context: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let value = match self.get(keys) {
            Some(Value::String(serialized)) => match serde_json::from_str(serialized) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!("Malformed JSON in {}: {}", context, err);
                    return T::default();
                }
            },
            Some(other) => other.clone(),
            None => return T::default(),
        };

        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Unexpected shape in {}: {}", context, err);
                T::default()
            }
        }
    }

    /// Calendar date; accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
    /// (time-of-day ignored).
    pub fn date_of(&self, keys: &[&str]) -> Option<NaiveDate> {
        self.opt_str_of(keys).and_then(|raw| parse_date_loose(&raw))
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// A relationship field as the store may deliver it: a bare integer id
/// or an object carrying `Id`. Resolved through one function so call
/// sites never branch on the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordLink {
    Bare(i64),
    Object {
        #[serde(rename = "Id")]
        id: i64,
    },
}

impl RecordLink {
    pub fn id(&self) -> i64 {
        match self {
            RecordLink::Bare(id) => *id,
            RecordLink::Object { id } => *id,
        }
    }

    pub fn resolve(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            Value::Object(map) => map.get("Id").and_then(RecordLink::resolve),
            _ => None,
        }
    }
}

/// Parses a calendar date from either a date-only string or an RFC 3339
/// timestamp.
pub fn parse_date_loose(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
