//! Human-readable sizes and counts
//!
//! Parses strings such as `10M` or `2b` against one of two unit tables and
//! formats byte sizes and line counts for display.

use crate::core::error::{Error, ParseErrorKind, Result};

/// Unit table used to interpret a suffix letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitTable {
    /// Binary multiples for buffer sizes: `k` = 1024, `m` = 1024²
    Bytes,
    /// Decimal multiples for counts: `k` = 10³ up to `t` = 10¹²
    Count,
}

impl UnitTable {
    /// Multiplier for a (lowercase) unit letter, `None` for the bare number
    fn multiplier(self, unit: Option<char>) -> std::result::Result<u64, ParseErrorKind> {
        match (self, unit) {
            (_, None) => Ok(1),
            (UnitTable::Bytes, Some('k')) => Ok(1 << 10),
            (UnitTable::Bytes, Some('m')) => Ok(1 << 20),
            (UnitTable::Bytes, Some('g' | 't' | 'p')) => Err(ParseErrorKind::TooLarge),
            (UnitTable::Count, Some('k')) => Ok(1_000),
            (UnitTable::Count, Some('m')) => Ok(1_000_000),
            // "b" (billion) and "g" (giga) are the same magnitude for counts
            (UnitTable::Count, Some('b' | 'g')) => Ok(1_000_000_000),
            (UnitTable::Count, Some('t')) => Ok(1_000_000_000_000),
            _ => Err(ParseErrorKind::Unrecognized),
        }
    }
}

/// Parse `<digits><unit-letter?><'b'?>` (case-insensitive) against `table`.
///
/// The unit letter binds first, so `2b` is two billion in the count table and
/// `10mb` is the same as `10m`.
pub fn parse(text: &str, table: UnitTable) -> std::result::Result<u64, ParseErrorKind> {
    let lower = text.to_ascii_lowercase();
    let digits_end = lower
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(lower.len());
    let (digits, suffix) = lower.split_at(digits_end);
    if digits.is_empty() {
        return Err(ParseErrorKind::Unrecognized);
    }

    let mut letters = suffix.chars();
    let unit = letters.next();
    let trailing = letters.as_str();
    if !(trailing.is_empty() || trailing == "b") {
        return Err(ParseErrorKind::Unrecognized);
    }
    if unit.is_some_and(|c| !c.is_ascii_lowercase()) {
        return Err(ParseErrorKind::Unrecognized);
    }

    let multiplier = table.multiplier(unit)?;
    let value: u64 = digits.parse().map_err(|_| ParseErrorKind::TooLarge)?;
    value.checked_mul(multiplier).ok_or(ParseErrorKind::TooLarge)
}

/// Parse a buffer size such as `10M` into bytes
pub fn parse_buffer_size(text: &str) -> Result<u64> {
    parse(text, UnitTable::Bytes).map_err(|kind| Error::Parse {
        input: text.to_string(),
        kind,
    })
}

/// Parse a `--total` value such as `3t` into a count
pub fn parse_total(text: &str) -> Result<u64> {
    parse(text, UnitTable::Count).map_err(|_| Error::InvalidTotal(text.to_string()))
}

/// Pretty-print a size in bytes, e.g. `1536` -> `1.5KB`
pub fn format_size(size: u64) -> String {
    const SUFFIX: [&str; 5] = ["", "K", "M", "G", "T"];
    let mut value = size as f64;
    let mut i = 0;
    while value > 1024.0 && i < SUFFIX.len() - 1 {
        value /= 1024.0;
        i += 1;
    }
    format!("{:.1}{}B", value, SUFFIX[i])
}

/// Format a count with decimal (SI) prefixes and three significant digits.
///
/// Integral values below 1000 are printed as-is.
pub fn format_count(count: f64) -> String {
    if count.abs() < 999.5 && count.fract() == 0.0 {
        return format!("{}", count as i64);
    }

    let mut value = count;
    for unit in ["", "k", "M", "G", "T", "P", "E", "Z"] {
        if value.abs() < 999.5 {
            return if value.abs() < 9.995 {
                format!("{:.2}{}", value, unit)
            } else if value.abs() < 99.95 {
                format!("{:.1}{}", value, unit)
            } else {
                format!("{:.0}{}", value, unit)
            };
        }
        value /= 1000.0;
    }
    format!("{:.1}Y", value)
}
