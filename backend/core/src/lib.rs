pub mod error;
pub mod types;

pub use error::TradeError;
pub use types::{NormalizedExtraction, RawExtraction};
