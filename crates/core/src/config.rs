use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub chunk: ChunkConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            ollama: OllamaConfig::from_env(),
            chunk: ChunkConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  ollama:  url={}, model={}", self.ollama.url, self.ollama.model);
        tracing::info!("  timeout: {}s", self.ollama.timeout_secs);
        tracing::info!("  chunk:   max_block_chars={}", self.chunk.max_block_chars);
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    /// Upper bound on one whole generate request, streaming included.
    pub timeout_secs: u64,
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        Self {
            url: env_or("OLLAMA_URL", "http://localhost:11434"),
            model: env_or("OLLAMA_MODEL", "deepseek-r1:1.5b"),
            timeout_secs: env_u64("OLLAMA_TIMEOUT_SECS", 600),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "deepseek-r1:1.5b".to_string(),
            timeout_secs: 600,
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per text block sent to the model.
    pub max_block_chars: usize,
}

impl ChunkConfig {
    pub fn from_env() -> Self {
        Self {
            max_block_chars: env_usize("PDFSUM_MAX_BLOCK_CHARS", 3000),
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { max_block_chars: 3000 }
    }
}
