//! Percentage-of-total breakdowns for demographic rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DistributionError;
use crate::event::Record;

/// One slice of a distribution, e.g. `population_male → 49`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub key: String,
    pub value: i64,
}

impl DistributionEntry {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Round half up (`2.5 → 3`, `-2.5 → -2`).
///
/// Entries are not re-normalized, so a complete attribute set may sum to
/// 99 or 101.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Numeric value of `record[field]`; accepts JSON numbers and numeric strings.
pub fn numeric_field(record: &Record, field: &str) -> Option<f64> {
    let value = match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// `round(record[key] / record[total_field] * 100)` for every record and key.
///
/// Output is in record-then-key order. A missing, zero, or non-numeric
/// total (or a missing key value) fails the whole call.
pub fn percentages_of(
    records: &[Record],
    keys: &[&str],
    total_field: &str,
) -> Result<Vec<DistributionEntry>, DistributionError> {
    let mut out = Vec::with_capacity(records.len() * keys.len());
    for (idx, record) in records.iter().enumerate() {
        let total = numeric_field(record, total_field).ok_or_else(|| {
            DistributionError::InvalidInput(format!(
                "record {idx}: `{total_field}` is missing or not numeric"
            ))
        })?;
        if total == 0.0 {
            return Err(DistributionError::InvalidInput(format!(
                "record {idx}: `{total_field}` is zero"
            )));
        }

        for &key in keys {
            let value = numeric_field(record, key).ok_or_else(|| {
                DistributionError::InvalidInput(format!(
                    "record {idx}: `{key}` is missing or not numeric"
                ))
            })?;
            out.push(DistributionEntry::new(
                key,
                round_half_up(value / total * 100.0),
            ));
        }
    }
    Ok(out)
}
