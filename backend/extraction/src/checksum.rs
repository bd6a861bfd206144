//! IMEI check-digit validation.

/// Luhn checksum over exactly 15 ASCII digits, as used for IMEI validation.
///
/// Every digit at an odd 0-based position is doubled (minus 9 when the double
/// exceeds 9); the string is valid iff the sum of all transformed digits is
/// divisible by 10. Anything that is not 15 ASCII digits is invalid.
pub fn luhn15(digits: &str) -> bool {
    if digits.len() != 15 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let mut n = u32::from(b - b'0');
            if i % 2 == 1 {
                n *= 2;
                if n > 9 {
                    n -= 9;
                }
            }
            n
        })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_valid_imeis() {
        assert!(luhn15("490154203237518"));
        assert!(luhn15("359605068234106"));
        assert!(luhn15("353879234252633"));
    }

    #[test]
    fn rejects_known_invalid_imeis() {
        // Same digits as valid vectors with the check digit bumped.
        assert!(!luhn15("490154203237519"));
        assert!(!luhn15("359605068234107"));
        // A single transposition breaks the checksum.
        assert!(!luhn15("490154203237581"));
    }

    #[test]
    fn rejects_wrong_length_and_non_digits() {
        assert!(!luhn15(""));
        assert!(!luhn15("49015420323751")); // 14 digits
        assert!(!luhn15("4901542032375188")); // 16 digits
        assert!(!luhn15("49015420323751O")); // letter O, not zero
    }
}
