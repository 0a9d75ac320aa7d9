use crate::rows::Dated;

/// Stable ascending sort by calendar date.
///
/// Charts interpolate between consecutive rows and assume monotonic dates.
pub fn sort_by_date<T: Dated>(mut rows: Vec<T>) -> Vec<T> {
    rows.sort_by_key(T::date);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::DayBucketRow;
    use chrono::NaiveDate;

    fn row(day: u32) -> DayBucketRow {
        DayBucketRow::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap())
    }

    #[test]
    fn sorts_ascending_and_is_idempotent() {
        let once = sort_by_date(vec![row(9), row(2), row(5)]);
        let days: Vec<_> = once.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(days, vec!["2024-03-02", "2024-03-05", "2024-03-09"]);
        assert_eq!(sort_by_date(once.clone()), once);
    }
}
