//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod collect;
pub mod rankings;
pub mod score;

pub use collect::{get_collect, post_collect};
pub use rankings::{get_history, get_rankings};
pub use score::post_score;
