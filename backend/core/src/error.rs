use thiserror::Error;

/// Top-level error type for the TradeForge backend.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("recognition provider error ({provider}): {message}")]
    Recognition { provider: String, message: String },

    #[error("recognition provider rate-limited, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("price lookup error: {0}")]
    Pricing(String),

    #[error("notification error: {0}")]
    Notify(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
