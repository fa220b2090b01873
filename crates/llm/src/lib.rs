pub mod provider;
pub mod providers;

pub use provider::{Generator, LlmError};
pub use providers::ollama::{MalformedLine, OllamaClient, NO_RESPONSE_FALLBACK};
