use chrono::{DateTime, SecondsFormat, Utc};

/// `2024-05-01 13:37:00`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `2024-05-01 13:37:00 UTC`, used by comment timestamps
pub fn format_timestamp_with_zone(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

pub fn format_rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formats() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 13, 37, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-05-01 13:37:00");
        assert_eq!(format_timestamp_with_zone(&ts), "2024-05-01 13:37:00 UTC");
        assert_eq!(format_rfc3339(&ts), "2024-05-01T13:37:00.000000Z");
    }
}
