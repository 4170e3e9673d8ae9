//! Duration normalization.
//!
//! Durations are stored either as integer seconds or as legacy `MM:SS` /
//! `HH:MM:SS` strings. Everything above the store works with whole seconds.

use rusqlite::types::{FromSql, FromSqlResult, ValueRef};

/// A duration in whole seconds, decoded from whatever the column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredDuration(pub Option<u32>);

impl FromSql for StoredDuration {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let secs = match value {
            ValueRef::Null => None,
            ValueRef::Integer(i) => u32::try_from(i).ok(),
            ValueRef::Real(f) if f >= 0.0 && f <= u32::MAX as f64 => Some(f.round() as u32),
            ValueRef::Real(_) => None,
            ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_duration),
            ValueRef::Blob(_) => None,
        };
        Ok(StoredDuration(secs))
    }
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS` into seconds.
///
/// Returns `None` for anything else, including empty components and
/// minutes or seconds of 60 or more after the leading component.
pub fn parse_duration(s: &str) -> Option<u32> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut total: u32 = 0;
    for (index, part) in parts.iter().enumerate() {
        let value: u32 = part.trim().parse().ok()?;
        if index > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

/// Render seconds as `M:SS`, or `H:MM:SS` once past the hour.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
