use serde::{Deserialize, Serialize};

/// Customer details captured on the intake form. Wire names match the
/// original form payload (snake_case).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub name_kana: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub job: Option<String>,
}

/// Device details for one assessment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInput {
    pub model_name: Option<String>,
    pub model_number: Option<String>,
    pub imei: Option<String>,
    pub color: Option<String>,
    pub capacity: Option<String>,
    pub carrier: Option<String>,
    pub sim_lock: Option<String>,
    pub battery: Option<String>,
    pub condition: Option<String>,
    pub max_price: Option<i64>,
    pub estimated_price: Option<i64>,
    pub notes: Option<String>,
}

/// A stored customer row, newest-first in listings.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub name_kana: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub created_at: String,
}

/// Identifiers returned after persisting one assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReceipt {
    pub customer_id: String,
    pub device_id: String,
    pub assessment_id: String,
    pub assessed_at: String,
}
