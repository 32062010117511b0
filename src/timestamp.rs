//! Cache timestamp formatting and lenient parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

type Parser = fn(&str) -> Option<DateTime<Utc>>;

/// Attempted in order, first success wins
const PARSERS: [Parser; 5] = [
    parse_rfc3339,
    parse_rfc2822,
    parse_iso_space,
    parse_us_locale,
    parse_day_month_year_hour,
];

/// Render a timestamp the way reports store it (RFC 3339, whole seconds, UTC)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a stored timestamp. Naive formats are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    PARSERS.iter().find_map(|parse| parse(s))
}

/// Instant a cached entry was written. Unparseable timestamps map to the
/// oldest representable instant so the entry is always stale.
pub fn cached_at(s: &str) -> DateTime<Utc> {
    parse_timestamp(s).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether a cached entry is still usable at `now`. A lifetime reaching
/// past the representable range keeps every parseable entry.
pub fn is_fresh(last_updated: &str, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
    let cached = cached_at(last_updated);
    match now.checked_sub_signed(ttl) {
        Some(cutoff) => cached > cutoff,
        None => cached > DateTime::<Utc>::MIN_UTC,
    }
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_rfc2822(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_iso_space(s: &str) -> Option<DateTime<Utc>> {
    naive(s, "%Y-%m-%d %H:%M:%S")
}

/// `10/16/2026, 2:03:22 PM`
fn parse_us_locale(s: &str) -> Option<DateTime<Utc>> {
    naive(s, "%m/%d/%Y, %I:%M:%S %p")
}

/// `16. 10. 2026 14:03:22`; only day, month, year and hour are read
fn parse_day_month_year_hour(s: &str) -> Option<DateTime<Utc>> {
    let mut parts = s
        .split(|c: char| c == '.' || c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());

    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    let hour: u32 = parts.next()?.split(':').next()?.parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

fn naive(s: &str, format: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, format)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, sec).unwrap()
    }

    #[test]
    fn test_format_round_trips_to_the_second() {
        let at = utc(2026, 10, 16, 14, 3, 22) + Duration::milliseconds(750);
        let text = format_timestamp(at);
        assert_eq!(text, "2026-10-16T14:03:22Z");
        assert_eq!(parse_timestamp(&text), Some(utc(2026, 10, 16, 14, 3, 22)));
    }

    #[test]
    fn test_accepts_known_formats() {
        let expected = utc(2026, 10, 16, 14, 3, 22);
        assert_eq!(parse_timestamp("2026-10-16T16:03:22+02:00"), Some(expected));
        assert_eq!(parse_timestamp("Fri, 16 Oct 2026 14:03:22 +0000"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-16 14:03:22"), Some(expected));
        assert_eq!(parse_timestamp("10/16/2026, 2:03:22 PM"), Some(expected));
    }

    #[test]
    fn test_day_month_year_hour_fallback() {
        assert_eq!(
            parse_timestamp("16. 10. 2026 14:03:22"),
            Some(utc(2026, 10, 16, 14, 0, 0))
        );
        assert_eq!(parse_timestamp("1. 2. 2026 9"), Some(utc(2026, 2, 1, 9, 0, 0)));
    }

    #[test]
    fn test_garbage_is_oldest_instant() {
        assert_eq!(parse_timestamp("yesterday-ish"), None);
        assert_eq!(cached_at("yesterday-ish"), DateTime::<Utc>::MIN_UTC);
        assert_eq!(parse_timestamp("31. 2. 2026 10"), None);
    }

    #[test]
    fn test_freshness_window() {
        let now = utc(2026, 10, 16, 12, 0, 0);
        let ttl = Duration::days(7);

        assert!(is_fresh("2026-10-15T12:00:00Z", now, ttl));
        assert!(is_fresh("2026-10-09T12:00:01Z", now, ttl));
        // Exactly seven days old is already stale
        assert!(!is_fresh("2026-10-09T12:00:00Z", now, ttl));
        assert!(!is_fresh("2026-09-01T00:00:00Z", now, ttl));
        assert!(!is_fresh("not a date", now, ttl));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let now = utc(2026, 10, 16, 12, 0, 0);
        let ttl = Duration::days(100_000_000);

        assert!(is_fresh("2026-10-15T12:00:00Z", now, ttl));
        assert!(is_fresh("1970-01-01T00:00:00Z", now, ttl));
        assert!(!is_fresh("not a date", now, ttl));
    }
}
