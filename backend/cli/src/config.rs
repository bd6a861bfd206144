use serde::Deserialize;

/// TradeForge runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// SQLite database path
    pub db_path: String,
    /// OpenAI API key (preferred vision provider)
    pub openai_api_key: Option<String>,
    /// Gemini API key (fallback vision provider)
    pub gemini_api_key: Option<String>,
    /// Base URL of the buy-back catalog site
    pub catalog_base_url: Option<String>,
    /// Log level
    pub log_level: String,

    // Chatwork
    pub chatwork_api_token: Option<String>,
    pub chatwork_room_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            db_path: "tradeforge.db".to_string(),
            openai_api_key: None,
            gemini_api_key: None,
            catalog_base_url: None,
            log_level: "info".to_string(),
            chatwork_api_token: None,
            chatwork_room_id: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("TRADEFORGE_BIND")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("TRADEFORGE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            db_path: std::env::var("TRADEFORGE_DB")
                .unwrap_or_else(|_| "tradeforge.db".to_string()),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            catalog_base_url: std::env::var("CATALOG_BASE_URL").ok(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            chatwork_api_token: std::env::var("CHATWORK_API_TOKEN").ok(),
            chatwork_room_id: std::env::var("CHATWORK_ROOM_ID").ok(),
        }
    }
}
