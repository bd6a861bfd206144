//! Vision-model field extraction.
//!
//! Sends the pasted diagnostic-tool screenshot to a vision LLM and returns
//! the raw reply text for defensive decoding. Provider errors and rate
//! limits map onto the typed error vocabulary so the gateway can surface
//! them to the intake form.

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::info;
use tradeforge_core::TradeError;

/// Information-extraction prompt sent alongside the screenshot.
const EXTRACTION_PROMPT: &str = "You are an OCR/IE agent. Extract fields from the image if present.\n\
- Return JSON with keys: imeiCandidates (array), serialCandidates (array), modelCandidates (array), batteryPercent (number or null)\n\
- IMEI should be 15 digits; provide multiple candidates if seen\n\
- Serial is ~12 alphanumerics; include ambiguous variants (Z/2, O/0)\n\
- Model number is the front part like MLJH3 (ignore suffix J/A)\n\
- Battery percent as integer if shown (0-100)\n\
Output only JSON.";

const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Supported vision providers.
pub enum VisionProvider {
    OpenAi { api_key: String, model: String },
    Gemini { api_key: String },
}

impl VisionProvider {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAi { api_key: api_key.into(), model: "gpt-4o-mini".to_string() }
    }

    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini { api_key: api_key.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Gemini { .. } => "gemini",
        }
    }
}

/// A screenshot payload, held as base64 with its MIME type.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: String,
    pub base64_data: String,
}

impl ImagePayload {
    /// Accepts either a browser-style data URL or bare base64 (assumed PNG).
    pub fn from_base64(input: &str) -> Self {
        if let Some(rest) = input.strip_prefix("data:") {
            if let Some((mime, data)) = rest.split_once(";base64,") {
                return Self { mime_type: mime.to_string(), base64_data: data.to_string() };
            }
        }
        Self { mime_type: "image/png".to_string(), base64_data: input.trim().to_string() }
    }

    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self { mime_type: mime_type.into(), base64_data: STANDARD.encode(bytes) }
    }

    fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// Run the extraction prompt against a provider, returning the reply text.
pub async fn extract_fields(
    client: &reqwest::Client,
    provider: &VisionProvider,
    image: &ImagePayload,
) -> Result<String, TradeError> {
    match provider {
        VisionProvider::OpenAi { api_key, model } => {
            extract_via_openai(client, api_key, model, image).await
        }
        VisionProvider::Gemini { api_key } => extract_via_gemini(client, api_key, image).await,
    }
}

async fn extract_via_openai(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    image: &ImagePayload,
) -> Result<String, TradeError> {
    info!("[Recognition] Extracting fields via OpenAI {}", model);
    let body = serde_json::json!({
        "model": model,
        "temperature": 0.2,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": EXTRACTION_PROMPT },
                { "type": "image_url", "image_url": { "url": image.data_url() } }
            ]
        }],
        "response_format": { "type": "json_object" }
    });
    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| provider_error("openai", e))?;

    check_status("openai", &resp)?;
    let json: serde_json::Value = resp.json().await.map_err(|e| provider_error("openai", e))?;
    Ok(json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

async fn extract_via_gemini(
    client: &reqwest::Client,
    api_key: &str,
    image: &ImagePayload,
) -> Result<String, TradeError> {
    info!("[Recognition] Extracting fields via Gemini");
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key={api_key}"
    );
    let body = serde_json::json!({
        "contents": [{ "parts": [
            { "text": EXTRACTION_PROMPT },
            { "inlineData": { "mimeType": image.mime_type, "data": image.base64_data } }
        ]}]
    });
    let resp = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| provider_error("gemini", e))?;

    check_status("gemini", &resp)?;
    let json: serde_json::Value = resp.json().await.map_err(|e| provider_error("gemini", e))?;
    Ok(json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

/// Map a non-success status onto the typed vocabulary; 429 carries the
/// provider's retry-after hint so the intake form can count down.
fn check_status(provider: &str, resp: &reqwest::Response) -> Result<(), TradeError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(TradeError::RateLimited { retry_after_secs });
    }
    if !status.is_success() {
        return Err(TradeError::Recognition {
            provider: provider.to_string(),
            message: format!("unexpected status {status}"),
        });
    }
    Ok(())
}

fn provider_error(provider: &str, err: reqwest::Error) -> TradeError {
    TradeError::Recognition { provider: provider.to_string(), message: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_payload_splits_data_urls() {
        let payload = ImagePayload::from_base64("data:image/jpeg;base64,AAAA");
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.base64_data, "AAAA");
        assert_eq!(payload.data_url(), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn bare_base64_defaults_to_png() {
        let payload = ImagePayload::from_base64("AAAA");
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.base64_data, "AAAA");
    }

    #[test]
    fn from_bytes_encodes_base64() {
        let payload = ImagePayload::from_bytes(b"\x89PNG", "image/png");
        assert_eq!(payload.base64_data, STANDARD.encode(b"\x89PNG"));
    }
}
