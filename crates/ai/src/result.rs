use async_trait::async_trait;
use thiserror::Error;

/// Text returned whenever the generation service has no usable answer.
pub const FALLBACK_MESSAGE: &str = "No response from Gemini.";

/// Outcome of a generation call.
///
/// A failed call is an expected outcome here, not an error: the caller still
/// answers the request, just with the fallback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    Fallback,
}

impl Generation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Generation::Text(text) => text,
            Generation::Fallback => FALLBACK_MESSAGE,
        }
    }

    /// Message to hand to the user.
    pub fn into_message(self) -> String {
        match self {
            Generation::Text(text) => text,
            Generation::Fallback => FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Why a generation call fell back. Reported, never returned to callers.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Carries no request URL; see the `From` impl below.
    #[error("Gemini request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Gemini API error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("Gemini response unreadable: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        // The URL is dropped so no credential can reach logs or error tracking.
        Self::Transport(err.without_url())
    }
}

/// Single-turn text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Generation;
}
