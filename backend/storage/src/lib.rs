//! Durable storage for assessments, devices, and customers.

pub mod store;
pub mod types;

pub use store::AssessmentStore;
pub use types::{AssessmentReceipt, CustomerInput, CustomerRow, DeviceInput};
