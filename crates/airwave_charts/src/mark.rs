use airwave_core::Record;
use serde_json::Value;

use crate::geometry::{Color, Geometry};

/// One visual element a chart wants drawn, keyed by `id`.
///
/// `datum` is the full record the element represents; it is what click
/// subscribers receive.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    pub id: String,
    pub geometry: Geometry,
    pub fill: Color,
    pub label: Option<String>,
    pub datum: Record,
}

impl Mark {
    pub fn new(id: impl Into<String>, geometry: Geometry, fill: Color, datum: Record) -> Self {
        Self {
            id: id.into(),
            geometry,
            fill,
            label: None,
            datum,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Join key of a record: the string form of `record[id_attr]`.
///
/// Numbers are accepted as ids; anything else (missing, null, objects) is not
/// a usable identity.
pub fn record_id(record: &Record, id_attr: &str) -> Option<String> {
    match record.get(id_attr)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Display text of `record[attr]`.
pub fn record_text(record: &Record, attr: &str) -> Option<String> {
    record_id(record, attr)
}

/// Numeric value of `record[attr]` (numbers or numeric strings).
pub fn record_number(record: &Record, attr: &str) -> Option<f32> {
    airwave_core::distribution::numeric_field(record, attr).map(|v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_accept_strings_and_numbers_only() {
        let r = json!({"a": "x", "b": 7, "c": null, "d": {"k": 1}});
        let r = r.as_object().unwrap();
        assert_eq!(record_id(r, "a").as_deref(), Some("x"));
        assert_eq!(record_id(r, "b").as_deref(), Some("7"));
        assert_eq!(record_id(r, "c"), None);
        assert_eq!(record_id(r, "d"), None);
        assert_eq!(record_id(r, "missing"), None);
    }
}
