use chrono::{DateTime, Local, TimeZone, Utc};

/// Timestamp rendered two ways: for people and for file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTimestamp {
    /// e.g. "Oct 18, 2026, 14:03:22" (local time, 24h clock)
    pub formatted: String,
    /// e.g. "2026-10-18T12-03-22-123Z" (UTC, ':' and '.' replaced by '-')
    pub filename: String,
}

impl CaptureTimestamp {
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            formatted: format_display(at),
            filename: format_filename(&at.with_timezone(&Utc)),
        }
    }
}

pub fn format_display<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%b %-d, %Y, %H:%M:%S").to_string()
}

/// ISO-8601 UTC with millisecond precision, made filesystem safe
pub fn format_filename(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(format_display(&at), "Mar 7, 2026, 09:05:01");
    }

    #[test]
    fn test_filename_has_no_separators() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 14, 3, 22).unwrap();
        let name = format_filename(&at);
        assert_eq!(name, "2026-10-18T14-03-22-000Z");
        assert!(!name.contains(':'));
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_from_datetime_uses_utc_for_filename() {
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let ts = CaptureTimestamp::from_datetime(&at);
        assert_eq!(ts.formatted, "Dec 31, 2025, 23:59:59");
        assert!(ts.filename.starts_with("2025-12-31T23-59-59"));
    }
}
