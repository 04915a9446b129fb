//! Raw field conversion with defined fallback semantics.
//!
//! `ps` hands back everything as text. These helpers turn the raw strings
//! into typed values and never fail: a value that cannot be parsed becomes
//! the documented default or `None`, depending on whether absence is
//! semantically meaningful for the field.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Parse a non-negative integer field, falling back to `default` when the
/// value is empty or malformed.
pub(crate) fn parse_int(value: &str, default: u32) -> u32 {
    value.trim().parse().unwrap_or(default)
}

/// Parse a non-negative integer field where "unknown" must stay distinct
/// from zero. Used for uid: uid 0 is root, `None` is "no discoverable uid".
pub(crate) fn parse_int_opt(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Parse a percentage field. Absent or malformed values are `None` rather
/// than zero, since a genuine 0.0 reading is common and meaningful.
pub(crate) fn parse_float_opt(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Parse a C-locale `lstart` timestamp, e.g. `Thu Aug 28 14:03:21 2025`.
///
/// `ps` pads single-digit days with an extra space (`Mon Sep  1 ...`), so the
/// value is whitespace-normalized before parsing. Anything that does not form
/// a valid calendar date is `None`.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(&normalized, "%a %b %e %H:%M:%S %Y").ok()?;
    Local.from_local_datetime(&naive).earliest()
}
