//! Conversions between Unix timestamps and the naive local timestamps stored in `metadata.json`.
//!
//! Run windows are recorded without a timezone. Both the exporter and the run browser interpret
//! them in the local timezone of the machine they run on, which is also what Grafana shows by
//! default.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Timelike};

/// Errors converting between Unix time and naive local time.
#[derive(Debug, thiserror::Error)]
pub enum LocalTimeError {
    #[error("Unix timestamp out of range: {0}")]
    OutOfRange(f64),
    #[error("Local time does not exist in the current timezone: {0}")]
    Nonexistent(NaiveDateTime),
    #[error("Invalid timestamp {0:?}, expected an ISO-8601 local date and time")]
    Parse(String),
}

/// Convert a Unix timestamp in (fractional) seconds to a naive local date and time.
///
/// Precision is rounded to microseconds.
pub fn unix_to_local_naive(ts: f64) -> Result<NaiveDateTime, LocalTimeError> {
    if !ts.is_finite() {
        return Err(LocalTimeError::OutOfRange(ts));
    }

    let secs = ts.floor();
    let micros = ((ts - secs) * 1_000_000.0).round() as u32;
    // Rounding can carry a full second
    let (secs, micros) = if micros >= 1_000_000 {
        (secs as i64 + 1, 0)
    } else {
        (secs as i64, micros)
    };

    let utc =
        DateTime::from_timestamp(secs, micros * 1_000).ok_or(LocalTimeError::OutOfRange(ts))?;
    Ok(utc.with_timezone(&Local).naive_local())
}

/// How far back to look for the offset in force before a DST gap
const GAP_LOOKBACK_HOURS: i64 = 24;

/// Convert a naive local date and time to milliseconds since the Unix epoch.
///
/// When the local time is ambiguous (clocks going back), the earlier instant is used. A local
/// time skipped by clocks going forward is read with the offset in force before the jump, so
/// `02:30` in a `02:00 → 03:00` gap becomes `03:30` after it.
pub fn naive_local_to_epoch_ms(dt: NaiveDateTime) -> Result<i64, LocalTimeError> {
    match Local.from_local_datetime(&dt) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
            Ok(local.timestamp_millis())
        }
        LocalResult::None => {
            let before = dt
                .checked_sub_signed(TimeDelta::hours(GAP_LOOKBACK_HOURS))
                .and_then(|before| Local.from_local_datetime(&before).earliest())
                .ok_or(LocalTimeError::Nonexistent(dt))?;
            let offset = TimeDelta::seconds(i64::from(before.offset().local_minus_utc()));
            dt.checked_sub_signed(offset)
                .map(|utc| utc.and_utc().timestamp_millis())
                .ok_or(LocalTimeError::Nonexistent(dt))
        }
    }
}

/// Render a naive timestamp as ISO-8601.
///
/// The fractional part is only written when non-zero, and then always with six digits.
pub fn format_iso(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Parse an ISO-8601 naive timestamp.
///
/// Accepts a `T` or space separator, optional fractional seconds and a bare date (midnight).
pub fn parse_iso(s: &str) -> Result<NaiveDateTime, LocalTimeError> {
    let s = s.trim();
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| LocalTimeError::Parse(s.to_string()))
}

pub(crate) mod iso_naive {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_iso, parse_iso};

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_iso(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_iso(&s).map_err(serde::de::Error::custom)
    }
}
