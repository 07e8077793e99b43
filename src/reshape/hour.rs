//! Canonical hour handling.
//!
//! Every timestamp the reshaper emits goes through [`canonical`], so the
//! merge key for points and the anomaly lookup key always agree.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Canonical text form: `YYYY-MM-DDTHH:MM:SSZ`.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn canonical(ts: &DateTime<Utc>) -> String {
    ts.format(CANONICAL_FORMAT).to_string()
}

/// True when `name` is `<prefix>` followed by 8 digits, `_`, 2 digits.
pub fn is_bucket_column(name: &str, prefix: &str) -> bool {
    split_bucket(name, prefix).is_some()
}

fn split_bucket<'a>(name: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let rest = name.strip_prefix(prefix)?;
    let (date8, hh) = rest.split_once('_')?;
    if date8.len() != 8 || hh.len() != 2 {
        return None;
    }
    if !date8.bytes().all(|b| b.is_ascii_digit()) || !hh.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((date8, hh))
}

/// Decode a bucket column name into its hour.
///
/// `Ok(None)` means the name is not a bucket column at all. `Err` means it
/// looks like one but the date or hour is out of range.
pub fn decode_bucket(name: &str, prefix: &str) -> Result<Option<DateTime<Utc>>, String> {
    let Some((date8, hh)) = split_bucket(name, prefix) else {
        return Ok(None);
    };
    let digits = |r: std::ops::Range<usize>| date8[r].parse::<u32>().unwrap_or(0);
    let year = digits(0..4) as i32;
    let (month, day) = (digits(4..6), digits(6..8));
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("bad date in {}: {}", name, date8))?;
    let hour: u32 = hh
        .parse()
        .map_err(|e| format!("bad hour in {}: {}", name, e))?;
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| format!("hour out of range in {}: {}", name, hour))?;
    Ok(Some(Utc.from_utc_datetime(&naive)))
}

/// Inverse of [`decode_bucket`] for whole hours.
pub fn bucket_column(prefix: &str, ts: &DateTime<Utc>) -> String {
    format!("{}{}", prefix, ts.format("%Y%m%d_%H"))
}

/// Parse a free-form anomaly timestamp.
///
/// Accepts `2025-10-24 09:00:00 UTC` (any case), `2025-10-24T09:00:00`, the
/// same with a trailing `Z`, RFC 3339 offsets, `+0000` style offsets and
/// fractional seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let s = match s.len().checked_sub(3).and_then(|at| s.get(at..).map(|tail| (at, tail))) {
        Some((at, tail)) if tail.eq_ignore_ascii_case("utc") => s[..at].trim_end(),
        _ => s,
    };
    let s = s.strip_suffix(|c: char| c == 'Z' || c == 'z').unwrap_or(s);
    let s = s.replacen(' ', "T", 1);
    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// [`parse_timestamp`] followed by [`canonical`].
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|ts| canonical(&ts))
}
