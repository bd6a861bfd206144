//! Recognition client: vision-model OCR behind a capacity-1 admission gate.

pub mod gate;
pub mod parse;
pub mod vision;

pub use gate::AdmissionGate;
pub use parse::parse_reply;
pub use vision::{ImagePayload, VisionProvider, extract_fields};

use tradeforge_core::{RawExtraction, TradeError};

/// End-to-end recognizer: admission gate, provider call, defensive decode.
pub struct Recognizer {
    provider: VisionProvider,
    gate: AdmissionGate,
    client: reqwest::Client,
}

impl Recognizer {
    pub fn new(provider: VisionProvider) -> Self {
        Self { provider, gate: AdmissionGate::new(), client: reqwest::Client::new() }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Recognize one screenshot. Calls are serialized through the gate; a
    /// garbled model reply decodes to an empty extraction rather than an
    /// error.
    pub async fn recognize(&self, image: &ImagePayload) -> Result<RawExtraction, TradeError> {
        let _permit = self.gate.admit().await;
        let reply = extract_fields(&self.client, &self.provider, image).await?;
        Ok(parse_reply(&reply))
    }
}
