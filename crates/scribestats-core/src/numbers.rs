//! Numeric parsing helpers shared by the extraction cascade and the
//! enrichment scrapers.
//!
//! The source pages render counts as `1,234`, `12K`, `1.2K` and currency as
//! free-form `$`-prefixed strings. All parsers return `None` instead of
//! guessing when the input is not clearly a count — "not found" must stay
//! distinct from zero.

use regex::Regex;

/// Parse a plain count like `1234` or `1,234`. Rejects anything with a
/// suffix, sign, or decimal point.
#[must_use]
pub fn parse_count(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a count that may carry a `K` suffix meaning ×1000, e.g. `1.2K` → 1200.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_suffixed_count(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    if let Some(stripped) = cleaned.strip_suffix(['K', 'k']) {
        let base: f64 = stripped.trim().parse().ok()?;
        if base.is_sign_negative() || !base.is_finite() {
            return None;
        }
        return Some((base * 1000.0).round() as u64);
    }
    parse_count(&cleaned)
}

/// Whether a table cell looks like a count column value (`1,234`, `1.2K`).
#[must_use]
pub fn is_count_like(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty()
        && trimmed.bytes().next().is_some_and(|b| b.is_ascii_digit())
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b',' | b'.' | b'K' | b'k'))
}

/// First `$`-prefixed currency amount in `text`, as a display string.
#[must_use]
pub fn first_currency(text: &str) -> Option<String> {
    let re = Regex::new(r"\$[0-9][0-9,.]*").expect("valid regex");
    re.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_comma_counts() {
        assert_eq!(parse_count("1234"), Some(1234));
        assert_eq!(parse_count(" 1,234 "), Some(1234));
        assert_eq!(parse_count("0"), Some(0));
    }

    #[test]
    fn rejects_non_counts() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("--"), None);
        assert_eq!(parse_count("$1.23"), None);
        assert_eq!(parse_count("-5"), None);
    }

    #[test]
    fn parses_k_suffix() {
        assert_eq!(parse_suffixed_count("12K"), Some(12_000));
        assert_eq!(parse_suffixed_count("1.2K"), Some(1200));
        assert_eq!(parse_suffixed_count("3,400"), Some(3400));
    }

    #[test]
    fn suffixed_rejects_garbage() {
        assert_eq!(parse_suffixed_count("K"), None);
        assert_eq!(parse_suffixed_count("views"), None);
    }

    #[test]
    fn count_like_cells() {
        assert!(is_count_like("1,234"));
        assert!(is_count_like("1.2K"));
        assert!(!is_count_like("$1.23"));
        assert!(!is_count_like("My Title"));
        assert!(!is_count_like("--"));
    }

    #[test]
    fn finds_first_currency() {
        assert_eq!(
            first_currency("earned $1,234.56 this month").as_deref(),
            Some("$1,234.56")
        );
        assert_eq!(first_currency("no money here"), None);
    }
}
