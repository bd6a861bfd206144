//! Serial-number candidate selection.

use std::cmp::Ordering;

use crate::confusion::{normalize_serial_chars, same_confusion_class};
use crate::{Selection, Warning};

const SERIAL_LENGTH: usize = 12;

/// Position-wise cost of mistaking one character for another.
const CONFUSION_COST: f64 = 0.25;
/// Penalty per character of deviation from the expected serial length.
const LENGTH_DEVIATION_COST: f64 = 0.5;

/// Reconcile the scalar serial reading and any alternate candidates.
///
/// A reading of the expected length wins immediately. Otherwise every
/// reading is scored against the normalized scalar (confusable character
/// pairs cost less than plain mismatches) plus a penalty for deviating from
/// the expected length, and the cheapest reading is returned. When the
/// scalar is absent, scoring degrades to pure length proximity.
pub fn select_serial(raw: Option<&str>, candidates: &[String]) -> Selection {
    let provided = raw.is_some_and(|s| !s.trim().is_empty())
        || candidates.iter().any(|c| !c.trim().is_empty());
    if !provided {
        return Selection::absent();
    }

    let reference = raw.map(normalize_serial_chars).filter(|s| !s.is_empty());

    let mut pool: Vec<String> = Vec::new();
    for reading in raw.into_iter().chain(candidates.iter().map(String::as_str)) {
        let normalized = normalize_serial_chars(reading);
        if !normalized.is_empty() && !pool.contains(&normalized) {
            pool.push(normalized);
        }
    }
    if pool.is_empty() {
        return Selection::absent();
    }

    let value = match pool.iter().find(|s| s.len() == SERIAL_LENGTH) {
        Some(exact) => exact.clone(),
        None => pool
            .iter()
            .min_by(|a, b| {
                score(a, reference.as_deref())
                    .partial_cmp(&score(b, reference.as_deref()))
                    .unwrap_or(Ordering::Equal)
            })
            .cloned()
            .unwrap_or_default(),
    };

    let mut warnings = Vec::new();
    if value.len() != SERIAL_LENGTH {
        warnings.push(Warning::SerialLengthMismatch { length: value.len() });
    }
    if value.contains('Z') {
        warnings.push(Warning::SerialAmbiguousCharacter { value: value.clone() });
    }

    Selection { value: Some(value), warnings }
}

/// Distance of a candidate from the reference reading plus its deviation from
/// the expected length. Lower is better.
fn score(candidate: &str, reference: Option<&str>) -> f64 {
    let mut total =
        LENGTH_DEVIATION_COST * (candidate.len() as f64 - SERIAL_LENGTH as f64).abs();

    if let Some(reference) = reference {
        for (a, b) in candidate.chars().zip(reference.chars()) {
            if a == b {
                continue;
            }
            total += if same_confusion_class(a, b) { CONFUSION_COST } else { 1.0 };
        }
        total += (candidate.len() as f64 - reference.len() as f64).abs();
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_character_scalar_is_returned_unchanged() {
        let pick = select_serial(Some("C02XG1ZZJHD5"), &[]);
        assert_eq!(pick.value.as_deref(), Some("C02XG1ZZJHD5"));
        assert!(
            !pick
                .warnings
                .iter()
                .any(|w| matches!(w, Warning::SerialLengthMismatch { .. })),
            "expected no length warning for a 12-character serial"
        );
    }

    #[test]
    fn twelve_character_candidate_beats_shorter_scalar() {
        let candidates = vec!["C02XG1ABJHD5".to_string()];
        let pick = select_serial(Some("C02XG1ABJHD"), &candidates);
        assert_eq!(pick.value.as_deref(), Some("C02XG1ABJHD5"));
        assert!(pick.warnings.is_empty());
    }

    #[test]
    fn narrow_confusion_correction_is_applied() {
        let pick = select_serial(Some("co2xgIabjhd5"), &[]);
        assert_eq!(pick.value.as_deref(), Some("C02XG1ABJHD5"));
    }

    #[test]
    fn closest_reading_wins_when_no_exact_length_exists() {
        // Neither reading is 12 characters; the one closer to the scalar and
        // to the expected length must win.
        let candidates = vec!["C02XG1ABJ".to_string()];
        let pick = select_serial(Some("C02XG1ABJH"), &candidates);
        assert_eq!(pick.value.as_deref(), Some("C02XG1ABJH"));
        assert_eq!(pick.warnings, vec![Warning::SerialLengthMismatch { length: 10 }]);
    }

    #[test]
    fn confusable_mismatches_score_cheaper_than_plain_ones() {
        // One mismatch each against the reference: `Z` vs `2` is a known
        // confusion pair, `X` vs `2` is not.
        let z = score("C0ZXG1ABJHD", Some("C02XG1ABJHD"));
        let x = score("C0XXG1ABJHD", Some("C02XG1ABJHD"));
        assert!(z < x);
        assert!(z > score("C02XG1ABJHD", Some("C02XG1ABJHD")));
    }

    #[test]
    fn first_reading_wins_score_ties() {
        let candidates = vec!["C0ZXG1ABJHD".to_string(), "C0QXG1ABJHD".to_string()];
        let pick = select_serial(None, &candidates);
        assert_eq!(pick.value.as_deref(), Some("C0ZXG1ABJHD"));
    }

    #[test]
    fn length_proximity_decides_without_a_scalar() {
        let candidates = vec!["C02XG1".to_string(), "C02XG1ABJHD".to_string()];
        let pick = select_serial(None, &candidates);
        assert_eq!(pick.value.as_deref(), Some("C02XG1ABJHD"));
        assert_eq!(pick.warnings, vec![Warning::SerialLengthMismatch { length: 11 }]);
    }

    #[test]
    fn z_is_flagged_but_never_rewritten() {
        let pick = select_serial(Some("C02Z71ZZJHD5"), &[]);
        assert_eq!(pick.value.as_deref(), Some("C02Z71ZZJHD5"));
        assert_eq!(
            pick.warnings,
            vec![Warning::SerialAmbiguousCharacter { value: "C02Z71ZZJHD5".into() }]
        );
    }

    #[test]
    fn nothing_provided_yields_silence() {
        let pick = select_serial(None, &[]);
        assert!(pick.value.is_none());
        assert!(pick.warnings.is_empty());
    }
}
