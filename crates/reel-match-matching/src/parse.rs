//! Lenient parsing of the date and duration strings agent sites publish.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_YEAR_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());

static RE_HMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d{1,2}):)?(\d{1,3}):(\d{2})$").unwrap());

static RE_WORDED_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:(\d+)\s*(?:hrs?|hours?))?\s*(?:(\d+)\s*(?:mins?|minutes?))?").unwrap()
});

/// Parse a site's release-date string. Year-only dates default to Dec 31
/// (only the year is trustworthy, and the comparison tolerance absorbs
/// the rest). Returns None for anything unrecognized.
pub fn parse_site_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if RE_YEAR_ONLY.is_match(text) {
        let year: i32 = text.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 12, 31);
    }

    const FORMATS: [&str; 8] = [
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%b %e, %Y",
        "%B %e, %Y",
        "%b %e %Y",
        "%B %e %Y",
        "%e %b %Y",
        "%e %B %Y",
    ];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

/// Parse a duration string into whole minutes. Accepts `hh:mm:ss`,
/// `mm:ss`, worded forms ("1 hr 35 mins", "95 minutes"), and a bare
/// integer taken as minutes.
pub fn parse_duration_mins(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = RE_HMS.captures(text) {
        let hours: i64 = caps
            .get(1)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let minutes: i64 = caps[2].parse().ok()?;
        let seconds: i64 = caps[3].parse().ok()?;
        return Some((hours * 3600 + minutes * 60 + seconds) / 60);
    }

    if let Ok(minutes) = text.parse::<i64>() {
        return Some(minutes);
    }

    if let Some(caps) = RE_WORDED_DURATION.captures(text) {
        let hours: i64 = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        let minutes: i64 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        if hours > 0 || minutes > 0 {
            return Some(hours * 60 + minutes);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_only_defaults_to_december_31() {
        assert_eq!(parse_site_date("2019"), NaiveDate::from_ymd_opt(2019, 12, 31));
    }

    #[test]
    fn common_site_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 1, 3);
        assert_eq!(parse_site_date("2019-01-03"), expected);
        assert_eq!(parse_site_date("01/03/2019"), expected);
        assert_eq!(parse_site_date("Jan 3, 2019"), expected);
        assert_eq!(parse_site_date("January 3, 2019"), expected);
        assert_eq!(parse_site_date("3 Jan 2019"), expected);
    }

    #[test]
    fn unrecognized_dates_are_none() {
        assert_eq!(parse_site_date("soon"), None);
        assert_eq!(parse_site_date(""), None);
    }

    #[test]
    fn hms_durations_floor_to_minutes() {
        assert_eq!(parse_duration_mins("1:35:10"), Some(95));
        assert_eq!(parse_duration_mins("2:10:00"), Some(130));
        assert_eq!(parse_duration_mins("95:00"), Some(95));
    }

    #[test]
    fn worded_and_bare_durations() {
        assert_eq!(parse_duration_mins("95"), Some(95));
        assert_eq!(parse_duration_mins("95 min"), Some(95));
        assert_eq!(parse_duration_mins("1 hr 35 mins"), Some(95));
        assert_eq!(parse_duration_mins("2 hours"), Some(120));
        assert_eq!(parse_duration_mins("n/a"), None);
    }
}
