pub mod config;

pub use config::{ChunkConfig, Config, OllamaConfig};
