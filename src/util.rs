//! Small shared helpers.

use std::fmt::Write as _;

/// What: Percent-encode a value for embedding in a URL query string.
///
/// Inputs:
/// - `input`: Raw value text.
///
/// Output:
/// - A string where every byte outside the RFC 3986 unreserved set is
///   written as an uppercase `%XX` triplet.
///
/// Details:
/// - Unreserved means `A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, and `~`; spaces
///   become `%20`, multi-byte UTF-8 sequences one triplet per byte.
#[must_use]
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

/// What: Format an optional Unix timestamp as a UTC date-time string.
///
/// Inputs:
/// - `ts`: Optional Unix timestamp in seconds since epoch.
///
/// Output:
/// - Returns a formatted string `YYYY-MM-DD HH:MM:SS` (UTC), or empty string
///   for `None`, or numeric string for negative timestamps.
///
/// Details:
/// - Used by the log timestamp formatter, so it must never panic on odd
///   inputs; anything unformattable falls back to the numeric string.
#[must_use]
pub fn ts_to_date(ts: Option<i64>) -> String {
    let Some(t) = ts else {
        return String::new();
    };
    if t < 0 {
        return t.to_string();
    }
    chrono::DateTime::<chrono::Utc>::from_timestamp(t, 0).map_or_else(
        || t.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Timestamp formatting covers the epoch, None, and negatives
    ///
    /// - Input: None, 0, -1
    /// - Output: "", the epoch string, "-1"
    fn ts_to_date_edges() {
        assert_eq!(ts_to_date(None), "");
        assert_eq!(ts_to_date(Some(0)), "1970-01-01 00:00:00");
        assert_eq!(ts_to_date(Some(-1)), "-1");
    }

    #[test]
    /// What: Encoding keeps unreserved bytes and escapes everything else
    ///
    /// - Input: Unreserved text, filter punctuation, a space, an umlaut
    /// - Output: Uppercase `%XX` triplets for the non-unreserved bytes
    fn percent_encode_escapes_reserved_bytes() {
        assert_eq!(percent_encode("A1-b.c_d~"), "A1-b.c_d~");
        assert_eq!(percent_encode("in.(\"A\")"), "in.%28%22A%22%29");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("M\u{fc}"), "M%C3%BC");
    }

    #[test]
    /// What: A leap-day timestamp formats to the right calendar date
    ///
    /// - Input: 2024-02-29 12:34:56 UTC as epoch seconds
    /// - Output: "2024-02-29 12:34:56"
    fn ts_to_date_leap_day() {
        assert_eq!(ts_to_date(Some(1_709_210_096)), "2024-02-29 12:34:56");
    }
}
