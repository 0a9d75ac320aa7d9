//! DMA demographic summaries.

use serde::{Deserialize, Serialize};

use crate::distribution::{numeric_field, percentages_of, DistributionEntry};
use crate::error::DistributionError;
use crate::event::Record;

/// Age bracket columns of the `demographic_data` table.
pub const AGE_KEYS: [&str; 7] = [
    "population_under_18",
    "population_20_24",
    "population_25_34",
    "population_35_44",
    "population_45_54",
    "population_55_64",
    "population_65_plus",
];

/// Gender columns of the `demographic_data` table.
pub const GENDER_KEYS: [&str; 2] = ["population_male", "population_female"];

pub const TOTAL_FIELD: &str = "population_total";

/// Attribute sets used to build a [`DemographicSummary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicKeys {
    pub age: Vec<String>,
    pub gender: Vec<String>,
    pub total_field: String,
}

impl Default for DemographicKeys {
    fn default() -> Self {
        Self {
            age: AGE_KEYS.iter().map(|k| k.to_string()).collect(),
            gender: GENDER_KEYS.iter().map(|k| k.to_string()).collect(),
            total_field: TOTAL_FIELD.to_string(),
        }
    }
}

fn as_strs(keys: &[String]) -> Vec<&str> {
    keys.iter().map(String::as_str).collect()
}

pub fn age_distribution(
    records: &[Record],
    keys: &DemographicKeys,
) -> Result<Vec<DistributionEntry>, DistributionError> {
    percentages_of(records, &as_strs(&keys.age), &keys.total_field)
}

pub fn gender_distribution(
    records: &[Record],
    keys: &DemographicKeys,
) -> Result<Vec<DistributionEntry>, DistributionError> {
    percentages_of(records, &as_strs(&keys.gender), &keys.total_field)
}

/// Everything the demographic panel shows for one DMA.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemographicSummary {
    pub age: Vec<DistributionEntry>,
    pub gender: Vec<DistributionEntry>,
    pub population: f64,
    pub median_age: Option<f64>,
    pub rank: Option<i64>,
}

impl DemographicSummary {
    /// Build the summary from the rows returned for a DMA.
    ///
    /// Headline figures come from the first row.
    pub fn from_records(
        records: &[Record],
        keys: &DemographicKeys,
    ) -> Result<Self, DistributionError> {
        let first = records
            .first()
            .ok_or_else(|| DistributionError::InvalidInput("no demographic rows".into()))?;
        let population = numeric_field(first, &keys.total_field).ok_or_else(|| {
            DistributionError::InvalidInput(format!("`{}` is missing", keys.total_field))
        })?;

        Ok(Self {
            age: age_distribution(records, keys)?,
            gender: gender_distribution(records, keys)?,
            population,
            median_age: numeric_field(first, "median_age"),
            rank: numeric_field(first, "azimuth_rank").map(|r| r as i64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> Record {
        let v = json!({
            "id": "d1",
            "population_total": 1000,
            "population_under_18": 230,
            "population_20_24": 60,
            "population_25_34": 150,
            "population_35_44": 130,
            "population_45_54": 120,
            "population_55_64": 120,
            "population_65_plus": 90,
            "population_male": 500,
            "population_female": 500,
            "median_age": 37.2,
            "azimuth_rank": 10
        });
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn builds_summary_from_first_row() {
        let s = DemographicSummary::from_records(&[row()], &DemographicKeys::default()).unwrap();
        assert_eq!(s.age.len(), AGE_KEYS.len());
        assert_eq!(s.age[0], DistributionEntry::new("population_under_18", 23));
        assert_eq!(
            s.gender,
            vec![
                DistributionEntry::new("population_male", 50),
                DistributionEntry::new("population_female", 50)
            ]
        );
        assert_eq!(s.population, 1000.0);
        assert_eq!(s.median_age, Some(37.2));
        assert_eq!(s.rank, Some(10));
    }

    #[test]
    fn empty_rows_are_rejected() {
        assert!(DemographicSummary::from_records(&[], &DemographicKeys::default()).is_err());
    }
}
