use chrono::{DateTime, NaiveDate};

use crate::domain::market_data::{TimeInterval, Timestamp};

/// Parses a `YYYY-MM-DD` calendar date. Impossible dates (`2023-02-29`) are `None`.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Crosshair label in UTC.
///
/// - intraday intervals -> `YYYY-MM-DD HH:MM`
/// - daily and longer -> `YYYY-MM-DD`
pub fn format_crosshair_time(time: Timestamp, interval: TimeInterval) -> String {
    let Some(datetime) = i64::try_from(time.value()).ok().and_then(DateTime::from_timestamp_millis) else {
        return time.value().to_string();
    };
    let pattern = if interval.is_intraday() { "%Y-%m-%d %H:%M" } else { "%Y-%m-%d" };
    datetime.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_impossible_dates() {
        assert_eq!(parse_iso_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_iso_date(" 1970-01-02 "), NaiveDate::from_ymd_opt(1970, 1, 2));
        assert!(parse_iso_date("2023-02-29").is_none());
        assert!(parse_iso_date("2024-13-01").is_none());
        assert!(parse_iso_date("yesterday").is_none());
    }

    #[test]
    fn label_depends_on_interval() {
        // 2024-03-05 14:30 UTC
        let ts = Timestamp::from_millis(1_709_649_000_000);
        assert_eq!(format_crosshair_time(ts, TimeInterval::FiveMinutes), "2024-03-05 14:30");
        assert_eq!(format_crosshair_time(ts, TimeInterval::OneDay), "2024-03-05");
        assert_eq!(format_crosshair_time(Timestamp::from_millis(0), TimeInterval::OneWeek), "1970-01-01");
    }
}
