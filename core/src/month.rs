//! Time bucketing — calendar date to month grouping key.

use crate::types::MonthKey;
use chrono::{Datelike, NaiveDate};

/// Truncate a date to its "YYYY-MM" key.
///
/// Zero-padded and fixed-width so that string order matches
/// chronological order; every time series in the core sorts these
/// keys as plain strings.
pub fn month_key(date: NaiveDate) -> MonthKey {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn same_month_maps_to_same_key() {
        assert_eq!(month_key(date(2024, 1, 1)), month_key(date(2024, 1, 31)));
        assert_eq!(month_key(date(2024, 1, 15)), "2024-01");
    }

    #[test]
    fn string_order_matches_chronological_order() {
        let dates = [
            date(2023, 9, 30),
            date(2023, 10, 1),
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 2, 29),
            date(2024, 11, 5),
        ];

        for pair in dates.windows(2) {
            let (earlier, later) = (month_key(pair[0]), month_key(pair[1]));
            assert!(
                earlier <= later,
                "month keys out of order: {earlier} vs {later}"
            );
        }
    }

    #[test]
    fn keys_are_zero_padded() {
        assert_eq!(month_key(date(2024, 3, 7)), "2024-03");
        assert_eq!(month_key(date(987, 12, 1)), "0987-12");
    }
}
