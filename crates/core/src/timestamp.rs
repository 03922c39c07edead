//! Timestamp helpers: microsecond clock, ISO-8601 text form, datetime repr.

use chrono::{DateTime, Datelike, NaiveDateTime, SubsecRound, Timelike, Utc};

use crate::error::{DomainError, DomainResult};

/// Persisted timestamp layout. Always six fractional digits.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Accepted on input; the fractional part is optional.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Current time truncated to microseconds, the precision of the persisted form.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a persisted timestamp.
///
/// The naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` form is read as UTC. RFC 3339 strings carrying
/// an explicit offset are accepted as well and normalized to UTC.
pub fn parse_timestamp(raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, PARSE_FORMAT) {
        return Ok(naive.and_utc().trunc_subsecs(6));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).trunc_subsecs(6))
        .map_err(|e| DomainError::invalid_timestamp(format!("{raw}: {e}")))
}

/// Render a timestamp the way an interactive `datetime` repr shows it, e.g.
/// `datetime.datetime(2017, 9, 28, 21, 5, 54, 119427)`.
///
/// Trailing zero components (microseconds, then seconds) are omitted.
pub fn datetime_repr(ts: &DateTime<Utc>) -> String {
    let t = ts.naive_utc();
    let micros = t.nanosecond() / 1_000;
    let mut out = format!(
        "datetime.datetime({}, {}, {}, {}, {}",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute()
    );
    if micros != 0 {
        out.push_str(&format!(", {}, {}", t.second(), micros));
    } else if t.second() != 0 {
        out.push_str(&format!(", {}", t.second()));
    }
    out.push(')');
    out
}
