//! OCR field-extraction post-processing and reconciliation.
//!
//! Takes the noisy, possibly contradictory candidate strings produced by the
//! upstream recognizer and turns them into validated, normalized
//! device-identity fields plus a warning trail for the operator. Pure and
//! synchronous: no I/O, no shared state, safe to call concurrently.

mod checksum;
mod confusion;
mod fields;
mod imei;
mod serial;
mod warning;

pub use checksum::luhn15;
pub use fields::{normalize_battery, normalize_capacity, normalize_model_number};
pub use imei::select_imei;
pub use serial::select_serial;
pub use warning::Warning;

use tradeforge_core::{NormalizedExtraction, RawExtraction};

/// Result of a single field selector: a best-effort value (absent when no
/// usable reading existed) plus any degraded-confidence warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub value: Option<String>,
    pub warnings: Vec<Warning>,
}

impl Selection {
    fn absent() -> Self {
        Self { value: None, warnings: Vec::new() }
    }
}

/// Aggregate normalization result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub data: NormalizedExtraction,
    /// Warnings in field-processing order: IMEI first, then serial.
    pub warnings: Vec<Warning>,
}

/// Normalize every field of a raw extraction.
///
/// Idempotent: feeding the returned `data` back in reproduces it exactly.
/// Fields are present in the output only when a normalizer produced a
/// non-empty value.
pub fn normalize_extraction(raw: &RawExtraction) -> Normalized {
    let mut warnings = Vec::new();

    let imei = select_imei(raw.imei.as_deref(), &raw.imei_candidates);
    warnings.extend(imei.warnings);

    let serial = select_serial(raw.serial.as_deref(), &raw.serial_candidates);
    warnings.extend(serial.warnings);

    let capacity = raw
        .capacity
        .as_deref()
        .map(normalize_capacity)
        .filter(|s| !s.is_empty());

    let battery = raw.battery.as_deref().and_then(normalize_battery);

    // The scalar model number wins; the first non-blank candidate fills in
    // only when the scalar is absent.
    let model_number = raw
        .model_number
        .as_deref()
        .or_else(|| {
            raw.model_candidates
                .iter()
                .map(String::as_str)
                .find(|s| !s.trim().is_empty())
        })
        .map(normalize_model_number)
        .filter(|s| !s.is_empty());

    let model_name = passthrough(raw.model_name.as_deref());
    let color = passthrough(raw.color.as_deref());

    Normalized {
        data: NormalizedExtraction {
            model_name,
            capacity,
            color,
            model_number,
            imei: imei.value,
            serial: serial.value,
            battery,
        },
        warnings,
    }
}

fn passthrough(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
