use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};

/// Month-first and two-digit-year formats are tried before `%Y/...`: `%Y`
/// accepts a single digit, so `1/5/24` would otherwise read as year 1.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a ticket date as spreadsheet exports spell it. Zone-less values are
/// read as UTC. Anything unparseable (including the `Unknown` sentinel) is `None`.
pub fn parse_ticket_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(s, fmt) {
            return day.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
        }
    }
    None
}

/// Calendar day of `dt` as `YYYY-MM-DD`.
pub fn day_key(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Strict `YYYY-MM-DD`.
pub fn parse_day_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Excel serial day number (1900 system) → timestamp.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc();
    let secs = ((serial - days) * 86_400.0).round();
    epoch
        .checked_add_signed(TimeDelta::try_days(days as i64)?)?
        .checked_add_signed(TimeDelta::try_seconds(secs as i64)?)
}

/// Render an Excel serial the way the sheet reader stores dates.
pub fn format_excel_serial(serial: f64) -> Option<String> {
    let dt = from_excel_serial(serial)?;
    if dt.time() == chrono::NaiveTime::MIN {
        Some(dt.format("%Y-%m-%d").to_string())
    } else {
        Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_common_spellings() {
        let iso = parse_ticket_date("2024-01-05").unwrap();
        assert_eq!((iso.year(), iso.month(), iso.day(), iso.hour()), (2024, 1, 5, 0));

        let with_time = parse_ticket_date("2024-01-05 14:30:00").unwrap();
        assert_eq!(with_time.hour(), 14);

        let zoned = parse_ticket_date("2024-01-05T23:30:00-02:00").unwrap();
        assert_eq!(day_key(&zoned), "2024-01-06");

        assert_eq!(day_key(&parse_ticket_date("1/5/24").unwrap()), "2024-01-05");
        assert_eq!(day_key(&parse_ticket_date("01/05/2024").unwrap()), "2024-01-05");
        assert_eq!(day_key(&parse_ticket_date("2024/01/05").unwrap()), "2024-01-05");
        assert_eq!(day_key(&parse_ticket_date("Jan 05, 2024").unwrap()), "2024-01-05");
    }

    #[test]
    fn sentinel_and_garbage_are_invalid() {
        assert!(parse_ticket_date("Unknown").is_none());
        assert!(parse_ticket_date("").is_none());
        assert!(parse_ticket_date("2024-13-40").is_none());
    }

    #[test]
    fn excel_serials() {
        assert_eq!(format_excel_serial(45296.0).as_deref(), Some("2024-01-05"));
        assert_eq!(format_excel_serial(45296.5).as_deref(), Some("2024-01-05T12:00:00"));
        assert_eq!(format_excel_serial(-1.0), None);
    }
}
