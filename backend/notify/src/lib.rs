//! Chatwork notifier.
//!
//! Posts assessment-request summaries to the team's Chatwork room using the
//! room-message REST endpoint.

use serde_json::Value;
use tracing::info;
use tradeforge_core::TradeError;

const CHATWORK_API_BASE: &str = "https://api.chatwork.com/v2";

#[derive(Debug, Clone)]
pub struct ChatworkConfig {
    pub api_token: String,
    pub room_id: String,
}

pub struct ChatworkNotifier {
    config: ChatworkConfig,
    client: reqwest::Client,
}

impl ChatworkNotifier {
    pub fn new(config: ChatworkConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    /// Post a message body to the configured room, returning the API reply.
    pub async fn post_message(&self, body: &str) -> Result<Value, TradeError> {
        info!(room_id = %self.config.room_id, "Posting Chatwork message");
        let url = format!("{CHATWORK_API_BASE}/rooms/{}/messages", self.config.room_id);
        let resp = self
            .client
            .post(&url)
            .header("X-ChatWorkToken", &self.config.api_token)
            .form(&[("body", body)])
            .send()
            .await
            .map_err(|e| TradeError::Notify(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(TradeError::Notify(format!("Chatwork error: {status} {text}")));
        }
        resp.json().await.map_err(|e| TradeError::Notify(e.to_string()))
    }
}

/// Fields summarized in an assessment-request message.
#[derive(Debug, Clone, Default)]
pub struct AssessmentSummary<'a> {
    pub model_name: Option<&'a str>,
    pub capacity: Option<&'a str>,
    pub imei: Option<&'a str>,
    pub condition: Option<&'a str>,
    pub battery: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Render the fixed six-line assessment-request summary the intake form
/// sends to the room.
pub fn format_assessment_request(summary: &AssessmentSummary<'_>) -> String {
    [
        "[Assessment request]".to_string(),
        format!(
            "{} {}",
            summary.model_name.unwrap_or(""),
            summary.capacity.unwrap_or("")
        )
        .trim()
        .to_string(),
        format!("IMEI: {}", summary.imei.unwrap_or("")),
        format!("Condition: {}", summary.condition.unwrap_or("N/A")),
        format!("Battery: {}", summary.battery.unwrap_or("N/A")),
        format!("Notes: {}", summary.notes.unwrap_or("none")),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_the_six_line_summary() {
        let summary = AssessmentSummary {
            model_name: Some("iPhone 13 Pro"),
            capacity: Some("256GB"),
            imei: Some("359605068234106"),
            condition: Some("B"),
            battery: Some("85%"),
            notes: Some("scratched screen"),
        };
        assert_eq!(
            format_assessment_request(&summary),
            "[Assessment request]\n\
             iPhone 13 Pro 256GB\n\
             IMEI: 359605068234106\n\
             Condition: B\n\
             Battery: 85%\n\
             Notes: scratched screen"
        );
    }

    #[test]
    fn missing_fields_fall_back_to_placeholders() {
        let text = format_assessment_request(&AssessmentSummary::default());
        assert_eq!(
            text,
            "[Assessment request]\n\nIMEI: \nCondition: N/A\nBattery: N/A\nNotes: none"
        );
    }
}
