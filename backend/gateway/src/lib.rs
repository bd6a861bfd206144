//! HTTP API for the intake form.

mod api;

pub use api::{AppState, build_router};
