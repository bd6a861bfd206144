use serde::{Deserialize, Serialize};

/// Untrusted device-identity readings as reported by the upstream recognizer.
///
/// Every field is optional: the recognizer returns whatever it could see.
/// Candidate lists are unordered alternative readings of the same field;
/// empty means "no alternatives, use the scalar only."
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawExtraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imei_candidates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub serial_candidates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub model_candidates: Vec<String>,
}

/// Validated, normalized device-identity fields.
///
/// A field is present only when a usable reading existed; absence is encoded
/// as `None`, never as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedExtraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
}

impl From<NormalizedExtraction> for RawExtraction {
    /// Feed a normalized record back through the pipeline, e.g. when a second
    /// OCR pass merges with an operator-corrected form.
    fn from(n: NormalizedExtraction) -> Self {
        Self {
            model_name: n.model_name,
            capacity: n.capacity,
            color: n.color,
            model_number: n.model_number,
            imei: n.imei,
            serial: n.serial,
            battery: n.battery,
            ..Self::default()
        }
    }
}
