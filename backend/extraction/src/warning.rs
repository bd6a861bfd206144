use std::fmt;

use serde::Serialize;

/// Degraded-confidence conditions attached to a normalization result.
///
/// Warnings never block producing a value: the engine always returns its best
/// guess and lets a human operator correct the reading. `Display` yields the
/// text shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// An IMEI reading was supplied but no digits survived extraction.
    ImeiMissing,
    /// A 15-digit IMEI was found but it fails the Luhn check.
    ImeiChecksumMismatch { value: String },
    /// The best available IMEI reading is not 15 digits long.
    ImeiLengthMismatch { digits: usize },
    /// The selected serial is not 12 characters long.
    SerialLengthMismatch { length: usize },
    /// The selected serial contains `Z`, a plausible OCR misread of `2`.
    /// Advisory only; the value is never rewritten.
    SerialAmbiguousCharacter { value: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ImeiMissing => {
                write!(f, "no IMEI could be extracted from the provided readings")
            }
            Warning::ImeiChecksumMismatch { value } => {
                write!(f, "IMEI {value} failed checksum validation; verify manually")
            }
            Warning::ImeiLengthMismatch { digits } => {
                write!(f, "IMEI has {digits} digits, expected 15")
            }
            Warning::SerialLengthMismatch { length } => {
                write!(f, "serial number has {length} characters, expected 12")
            }
            Warning::SerialAmbiguousCharacter { value } => {
                write!(
                    f,
                    "serial number {value} contains 'Z' (often a misread '2'); verify that character"
                )
            }
        }
    }
}
