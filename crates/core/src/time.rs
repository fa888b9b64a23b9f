//! Time helpers shared by ingestion and the time triggers.
//!
//! Rule files carry bare local times with no zone. They are read in a single
//! fixed reference offset, which by default is EST (UTC-05:00) with no
//! daylight-saving adjustment.

use chrono::{DateTime, FixedOffset};

/// Default reference offset in seconds east of UTC (EST, no DST).
pub const DEFAULT_REFERENCE_OFFSET_SECS: i32 = -5 * 3600;

/// The reference zone used when no override is configured.
pub fn default_reference_zone() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_REFERENCE_OFFSET_SECS).expect("default offset is within ±24h")
}

/// Parse a UTC offset written as `±HH:MM`, `±HHMM`, `Z` or `UTC`.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => return None,
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Resolve a feed publication date to an absolute instant.
///
/// Accepts RFC 2822 dates with a zone name (`Tue, 04 Oct 2016 12:00:00 GMT`)
/// or a numeric offset (`... +0000`), and RFC 3339 / ISO 8601 timestamps such
/// as `2016-10-04T12:00:00Z`. Returns `None` when nothing matches.
pub fn parse_pubdate(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}
