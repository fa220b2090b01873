use async_trait::async_trait;

/// Trait for generation backends — each backend implements this.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send one prompt and return the complete generated text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} — {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response line: {0}")]
    Parse(String),
}
