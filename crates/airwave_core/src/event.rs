//! Raw upstream rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A loosely typed upstream row (one JSON object).
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Timestamp as delivered by the upstream store.
///
/// Rows arrive either with ISO-like text or with epoch milliseconds; parsing
/// is deferred to [`Timestamp::date`] so that unparseable values can be
/// dropped by the aggregator instead of failing the whole decode. A missing
/// field, `null`, or any other JSON shape decodes to `Invalid`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    EpochMillis(i64),
    FractionalMillis(f64),
    Text(String),
    Invalid(serde_json::Value),
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::Invalid(serde_json::Value::Null)
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%#z"];

impl Timestamp {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// UTC calendar date of this timestamp, or `None` when it does not parse.
    ///
    /// Text without an offset is read as UTC.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::EpochMillis(ms) => date_from_millis(*ms),
            // Sub-millisecond fractions are truncated.
            Self::FractionalMillis(ms) if ms.is_finite() => date_from_millis(ms.trunc() as i64),
            Self::FractionalMillis(_) | Self::Invalid(_) => None,
            Self::Text(raw) => parse_text_date(raw.trim()),
        }
    }
}

fn date_from_millis(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|t| t.date_naive())
}

fn parse_text_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.naive_utc().date());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(t) = DateTime::parse_from_str(s, fmt) {
            return Some(t.naive_utc().date());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One upstream event, e.g. a single airplay spin.
///
/// `categories` is multi-valued (several credited artists); every entry is
/// counted separately by the aggregator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub timestamp: Timestamp,
    #[serde(alias = "artist_name", default)]
    pub categories: Vec<String>,
    #[serde(alias = "market_id", default)]
    pub group_key: String,
}

impl RawEvent {
    pub fn new<I, S>(timestamp: impl Into<Timestamp>, categories: I, group_key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            timestamp: timestamp.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            group_key: group_key.into(),
        }
    }

    /// Decode a row using the field names of the airplay table.
    pub fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        assert_eq!(Timestamp::text("2024-01-01T00:00:00Z").date(), ymd(2024, 1, 1));
        assert_eq!(Timestamp::text("2024-06-03T23:30:00-02:00").date(), ymd(2024, 6, 4));
        assert_eq!(Timestamp::text("2024-06-03 10:15:00+00").date(), ymd(2024, 6, 3));
        assert_eq!(Timestamp::text("2024-06-03 10:15:00.123").date(), ymd(2024, 6, 3));
        assert_eq!(Timestamp::text("2024-06-03T10:15:00").date(), ymd(2024, 6, 3));
        assert_eq!(Timestamp::text("2024-06-03").date(), ymd(2024, 6, 3));
        assert_eq!(Timestamp::EpochMillis(1_717_200_000_000).date(), ymd(2024, 6, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Timestamp::text("").date(), None);
        assert_eq!(Timestamp::text("not a date").date(), None);
        assert_eq!(Timestamp::text("2024-13-40").date(), None);
    }

    #[test]
    fn decodes_airplay_rows() {
        let row: Record = serde_json::from_str(
            r#"{"id":"1","song_title":"s","artist_name":["A","B"],
                "timestamp":"2024-06-01T12:00:00+00:00","market_id":"m1"}"#,
        )
        .unwrap();
        let ev = RawEvent::from_record(&row).unwrap();
        assert_eq!(ev.categories, vec!["A", "B"]);
        assert_eq!(ev.group_key, "m1");
        assert_eq!(ev.timestamp.date(), ymd(2024, 6, 1));
    }

    #[test]
    fn odd_timestamps_decode_but_have_no_date() {
        let rows: Vec<Record> = serde_json::from_str(
            r#"[{"artist_name":["A"],"market_id":"m1"},
                {"timestamp":null,"artist_name":["A"],"market_id":"m1"},
                {"timestamp":{"at":1},"artist_name":["A"],"market_id":"m1"},
                {"timestamp":true,"artist_name":["A"],"market_id":"m1"}]"#,
        )
        .unwrap();
        for row in &rows {
            let ev = RawEvent::from_record(row).unwrap();
            assert_eq!(ev.timestamp.date(), None);
            assert_eq!(ev.categories, vec!["A"]);
        }
    }

    #[test]
    fn float_epoch_millis_are_kept() {
        let row: Record =
            serde_json::from_str(r#"{"timestamp":1717200000000.0,"artist_name":["A"]}"#).unwrap();
        let ev = RawEvent::from_record(&row).unwrap();
        assert_eq!(ev.timestamp, Timestamp::FractionalMillis(1_717_200_000_000.0));
        assert_eq!(ev.timestamp.date(), ymd(2024, 6, 1));
        assert_eq!(Timestamp::FractionalMillis(f64::NAN).date(), None);
    }
}
