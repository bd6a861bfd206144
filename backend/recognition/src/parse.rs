//! Decoding of the recognizer reply.
//!
//! The vision model is asked for strict JSON but replies vary: prose around
//! the payload, code fences, flat fields instead of candidate lists,
//! batteryPercent as a float. Everything is coerced into `RawExtraction` at
//! this boundary; untyped data never reaches the extraction engine.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tradeforge_core::RawExtraction;

static JSON_BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

/// Parse a model reply into a `RawExtraction`, tolerating malformed output.
/// An unreadable reply yields an empty extraction, never an error.
pub fn parse_reply(content: &str) -> RawExtraction {
    let value = serde_json::from_str::<Value>(content).ok().or_else(|| {
        // Salvage the outermost brace block from replies wrapped in prose
        // or markdown fences.
        JSON_BLOCK_RE
            .find(content)
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
    });

    match value {
        Some(value) => coerce(&value),
        None => RawExtraction::default(),
    }
}

fn coerce(value: &Value) -> RawExtraction {
    RawExtraction {
        model_name: string_field(value, &["modelName", "model_name"]),
        capacity: string_field(value, &["capacity"]),
        color: string_field(value, &["color"]),
        model_number: string_field(value, &["modelNumber", "model_number"]),
        imei: string_field(value, &["imei"]),
        serial: string_field(value, &["serial"]),
        battery: battery_field(value),
        imei_candidates: string_list(&value["imeiCandidates"]),
        serial_candidates: string_list(&value["serialCandidates"]),
        model_candidates: string_list(&value["modelCandidates"]),
    }
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value[*key].as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `batteryPercent` arrives as a number; round and clamp it to 0-100. A
/// pre-formatted `battery` string field is accepted as-is.
fn battery_field(value: &Value) -> Option<String> {
    if let Some(pct) = value["batteryPercent"].as_f64() {
        if pct.is_finite() {
            let clamped = pct.round().clamp(0.0, 100.0) as u32;
            return Some(clamped.to_string());
        }
    }
    string_field(value, &["battery"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_clean_reply() {
        let reply = r#"{
            "imeiCandidates": ["359605068234106", "35960506823410"],
            "serialCandidates": ["C02XG1ABJHD5"],
            "modelCandidates": ["MLJH3"],
            "batteryPercent": 87
        }"#;
        let raw = parse_reply(reply);
        assert_eq!(raw.imei_candidates.len(), 2);
        assert_eq!(raw.serial_candidates, vec!["C02XG1ABJHD5".to_string()]);
        assert_eq!(raw.model_candidates, vec!["MLJH3".to_string()]);
        assert_eq!(raw.battery.as_deref(), Some("87"));
    }

    #[test]
    fn salvages_json_from_a_fenced_reply() {
        let reply = "Here is the extraction:\n```json\n{\"imei\": \"359605068234106\"}\n```\n";
        let raw = parse_reply(reply);
        assert_eq!(raw.imei.as_deref(), Some("359605068234106"));
    }

    #[test]
    fn unreadable_replies_yield_an_empty_extraction() {
        assert_eq!(parse_reply("no json here"), RawExtraction::default());
        assert_eq!(parse_reply(""), RawExtraction::default());
    }

    #[test]
    fn battery_percent_is_rounded_and_clamped() {
        assert_eq!(parse_reply(r#"{"batteryPercent": 86.6}"#).battery.as_deref(), Some("87"));
        assert_eq!(parse_reply(r#"{"batteryPercent": 120}"#).battery.as_deref(), Some("100"));
        assert_eq!(parse_reply(r#"{"batteryPercent": -3}"#).battery.as_deref(), Some("0"));
        assert_eq!(parse_reply(r#"{"batteryPercent": null}"#).battery, None);
    }

    #[test]
    fn snake_case_scalars_are_accepted() {
        let raw = parse_reply(r#"{"model_name": "iPhone 13", "model_number": "MLJH3"}"#);
        assert_eq!(raw.model_name.as_deref(), Some("iPhone 13"));
        assert_eq!(raw.model_number.as_deref(), Some("MLJH3"));
    }

    #[test]
    fn candidate_lists_drop_non_string_entries() {
        let raw = parse_reply(r#"{"imeiCandidates": ["359605068234106", 42, null, " "]}"#);
        assert_eq!(raw.imei_candidates, vec!["359605068234106".to_string()]);
    }
}
