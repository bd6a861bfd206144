//! IMEI candidate selection.

use crate::checksum::luhn15;
use crate::confusion::{correct_digit_confusions, digits_only};
use crate::{Selection, Warning};

const IMEI_LENGTH: usize = 15;

/// Reconcile the scalar IMEI reading and any alternate candidates into a
/// single best value.
///
/// Preference order: a checksum-valid 15-digit reading wins outright (OCR
/// often drops or doubles a digit in one reading while an alternate candidate
/// gets it right); any 15-digit reading comes next, flagged for the failed
/// checksum; finally the longest digit run, flagged with its actual count, so
/// the field stays populated for manual correction.
pub fn select_imei(raw: Option<&str>, candidates: &[String]) -> Selection {
    let provided = raw.is_some_and(|s| !s.trim().is_empty())
        || candidates.iter().any(|c| !c.trim().is_empty());
    if !provided {
        return Selection::absent();
    }

    // Scalar first, then candidates: the scalar is the operator-visible
    // primary reading, so it wins length ties in the fallback path.
    let mut pool: Vec<String> = Vec::new();
    for reading in raw.into_iter().chain(candidates.iter().map(String::as_str)) {
        let digits = digits_only(&correct_digit_confusions(reading));
        if !digits.is_empty() && !pool.contains(&digits) {
            pool.push(digits);
        }
    }

    if pool.is_empty() {
        return Selection {
            value: None,
            warnings: vec![Warning::ImeiMissing],
        };
    }

    if let Some(valid) = pool.iter().find(|d| d.len() == IMEI_LENGTH && luhn15(d)) {
        return Selection {
            value: Some(valid.clone()),
            warnings: Vec::new(),
        };
    }

    if let Some(fifteen) = pool.iter().find(|d| d.len() == IMEI_LENGTH) {
        return Selection {
            value: Some(fifteen.clone()),
            warnings: vec![Warning::ImeiChecksumMismatch { value: fifteen.clone() }],
        };
    }

    let mut longest = &pool[0];
    for digits in &pool[1..] {
        if digits.len() > longest.len() {
            longest = digits;
        }
    }
    Selection {
        value: Some(longest.clone()),
        warnings: vec![Warning::ImeiLengthMismatch { digits: longest.len() }],
    }
}
