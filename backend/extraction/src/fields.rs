//! Single-value format normalizers: capacity, battery, model number.
//!
//! These are best-effort string tighteners with no candidate reconciliation
//! and no warnings. Diagnostic-tool screenshots from Japanese locales often
//! carry full-width glyphs, so everything is folded to half-width ASCII
//! first.

use once_cell::sync::Lazy;
use regex::Regex;

static CAPACITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)(GB|TB)$").unwrap());

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)").unwrap());

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Fold full-width ASCII variants (U+FF01..U+FF5E) and the ideographic space
/// to their half-width equivalents (code-point shift of 0xFEE0).
fn fold_fullwidth(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            other => other,
        })
        .collect()
}

/// Normalize a storage-capacity reading to `<number>(GB|TB)`.
///
/// Unrecognized text passes through unchanged: capacity is not identity
/// critical, so it degrades silently to best-effort text.
pub fn normalize_capacity(raw: &str) -> String {
    let compact: String = fold_fullwidth(raw).split_whitespace().collect();

    if let Some(caps) = CAPACITY_RE.captures(&compact) {
        return format!("{}{}", &caps[1], caps[2].to_ascii_uppercase());
    }
    if let Some(caps) = LEADING_NUMBER_RE.captures(&compact) {
        return format!("{}GB", &caps[1]);
    }
    compact
}

/// Extract a battery percentage as `<digits>%`, or `None` when the reading
/// contains no 2-3 digit run.
pub fn normalize_battery(raw: &str) -> Option<String> {
    DIGIT_RUN_RE
        .find_iter(&fold_fullwidth(raw))
        .map(|m| m.as_str())
        .find(|run| (2..=3).contains(&run.len()))
        .map(|run| format!("{run}%"))
}

/// Normalize a model number: fold widths, collapse internal whitespace runs
/// to a single space, trim. The single space preserves region-suffix tokens
/// such as `J/A`.
pub fn normalize_model_number(raw: &str) -> String {
    fold_fullwidth(raw).split_whitespace().collect::<Vec<_>>().join(" ")
}
