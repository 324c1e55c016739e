use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Naive layouts accepted after RFC 3339 fails, most specific first.
/// `%.f` also matches when the fractional part is absent.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a lead submission timestamp into its wall-clock date and time.
///
/// Lead timestamps come from spreadsheets and web forms, so the offset is
/// optional. When an offset is present it is dropped rather than converted:
/// scoring and the dashboard care about the local time the lead was
/// submitted at, not about UTC.
///
/// Returns `None` for anything that is not ISO-8601-like. Callers treat that
/// as "no time information", never as an error.
pub fn parse_lead_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }

    // A bare date counts as midnight
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Timelike};

    fn time_of(raw: &str) -> Option<NaiveTime> {
        parse_lead_timestamp(raw).map(|dt| dt.time())
    }

    #[test]
    fn test_naive_iso_timestamp() {
        assert_eq!(time_of("2024-12-15T10:30:00"), NaiveTime::from_hms_opt(10, 30, 0));
    }

    #[test]
    fn test_space_separator_and_fraction() {
        let dt = parse_lead_timestamp("2024-12-15 18:00:00.250").unwrap();
        assert_eq!(dt.hour(), 18);
        assert_eq!(dt.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_without_seconds() {
        assert_eq!(time_of("2024-12-15T09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(time_of("2024-12-15 21:45"), NaiveTime::from_hms_opt(21, 45, 0));
    }

    #[test]
    fn test_offset_keeps_wall_clock_time() {
        // 08:00 in India stays 08:00, it is not shifted to UTC
        assert_eq!(
            time_of("2024-12-15T08:00:00+05:30"),
            NaiveTime::from_hms_opt(8, 0, 0)
        );
        assert_eq!(time_of("2024-12-15T23:10:00Z"), NaiveTime::from_hms_opt(23, 10, 0));
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(time_of("2024-12-15"), NaiveTime::from_hms_opt(0, 0, 0));
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(parse_lead_timestamp("").is_none());
        assert!(parse_lead_timestamp("   ").is_none());
        assert!(parse_lead_timestamp("yesterday at noon").is_none());
        assert!(parse_lead_timestamp("15/12/2024 10:30").is_none());
        assert!(parse_lead_timestamp("2024-13-40T10:30:00").is_none());
    }
}
