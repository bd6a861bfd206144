//! Character-confusion tables for OCR misreads.
//!
//! Corrections are one-directional: letters are coerced toward digits, never
//! the reverse, since the target alphabets (IMEI digits, serial uppercase
//! alphanumerics) are known. The serial context uses a narrower table than
//! the IMEI context; `Z` in a serial is flagged by the caller, not rewritten.

/// Substitutions applied before extracting digits for an IMEI reading.
pub(crate) fn correct_digit_confusions(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'O' | 'o' => '0',
            'I' | 'L' | 'l' => '1',
            'S' => '5',
            other => other,
        })
        .collect()
}

/// The safer subset applied to serial numbers (input already uppercased).
pub(crate) fn correct_serial_confusions(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'O' => '0',
            'I' => '1',
            other => other,
        })
        .collect()
}

/// Strip a reading down to its ASCII digits.
pub(crate) fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Uppercase a serial reading, apply the narrow confusion table, and strip
/// everything outside `[A-Z0-9]`.
pub(crate) fn normalize_serial_chars(s: &str) -> String {
    correct_serial_confusions(&s.to_ascii_uppercase())
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Visually-confusable character classes used for distance scoring.
const CONFUSION_CLASSES: &[&[char]] = &[
    &['0', 'O'],
    &['1', 'I', 'L'],
    &['2', 'Z'],
    &['5', 'S'],
    &['8', 'B'],
];

/// Whether two distinct characters belong to the same confusion class.
pub(crate) fn same_confusion_class(a: char, b: char) -> bool {
    let (a, b) = (a.to_ascii_uppercase(), b.to_ascii_uppercase());
    a != b && CONFUSION_CLASSES.iter().any(|class| class.contains(&a) && class.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_context_coerces_letters_toward_digits() {
        assert_eq!(correct_digit_confusions("3S96O5O68I34l06"), "359605068134106");
        // Digits are never rewritten into letters.
        assert_eq!(correct_digit_confusions("0151"), "0151");
    }

    #[test]
    fn serial_context_only_fixes_o_and_i() {
        assert_eq!(correct_serial_confusions("CO2XGIZZ"), "C02XG1ZZ");
        // S and Z survive: a real serial may legitimately contain them.
        assert_eq!(correct_serial_confusions("SZ"), "SZ");
    }

    #[test]
    fn serial_normalization_uppercases_and_strips() {
        assert_eq!(normalize_serial_chars(" co2x-g1 zzjhd5 "), "C02XG1ZZJHD5");
        assert_eq!(normalize_serial_chars("!!"), "");
    }

    #[test]
    fn confusion_classes_are_symmetric() {
        assert!(same_confusion_class('O', '0'));
        assert!(same_confusion_class('0', 'O'));
        assert!(same_confusion_class('Z', '2'));
        assert!(same_confusion_class('l', '1'));
        assert!(!same_confusion_class('O', 'O'));
        assert!(!same_confusion_class('7', 'Z'));
    }
}
