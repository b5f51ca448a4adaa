//! Work-pattern insight for worksync
//!
//! Sends a trailing slice of attendance records to an external
//! structured-response generator and parses the reply into an
//! [`AiInsight`]. Any failure degrades to "no insight available".

mod gemini;
mod mock;
mod panel;
mod request;

pub use gemini::*;
pub use mock::*;
pub use panel::*;
pub use request::*;

use async_trait::async_trait;
use thiserror::Error;
use worksync_api::AiInsight;

/// Insight errors
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Insight service is disabled")]
    Disabled,

    #[error("No API key found in ${0}")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Insight service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed insight response: {0}")]
    Malformed(String),

    #[error("Efficiency score {0} is outside 0-100")]
    ScoreOutOfRange(f64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Insight unavailable: {0}")]
    Unavailable(String),
}

pub type InsightResult<T> = Result<T, InsightError>;

/// A source of work-pattern insight
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn generate(&self, request: &InsightRequest) -> InsightResult<AiInsight>;
}
