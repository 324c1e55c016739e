use async_trait::async_trait;
use std::time::Duration;

/// Errors from a text-generation backend.
///
/// The message composer never surfaces these; they only decide which
/// fallback copy is used and what gets logged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation is not configured: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("circuit breaker open, provider calls suspended")]
    CircuitOpen,
}

/// A capability that turns a prompt into free-form text.
///
/// Implementations may suspend on network I/O and may fail; callers decide
/// how to degrade.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Stand-in used when no provider client could be built. Every call fails,
/// so callers always take their fallback path.
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(self.reason.clone()))
    }
}
