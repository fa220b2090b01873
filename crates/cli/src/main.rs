mod pipeline;

use std::path::PathBuf;

use clap::Parser;

use pdfsum_core::config::{self, Config};
use pdfsum_llm::OllamaClient;

/// Summarize a PDF with a locally hosted Ollama model.
#[derive(Parser, Debug)]
#[command(name = "pdfsum", version, about)]
struct Cli {
    /// Path to the PDF file to process.
    pdf_path: PathBuf,

    /// Ollama server URL (overrides OLLAMA_URL).
    #[arg(long)]
    url: Option<String>,

    /// Model to run (overrides OLLAMA_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Maximum characters per block (overrides PDFSUM_MAX_BLOCK_CHARS).
    #[arg(long)]
    max_block_chars: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    config::load_dotenv();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.url {
        config.ollama.url = url;
    }
    if let Some(model) = cli.model {
        config.ollama.model = model;
    }
    if let Some(max) = cli.max_block_chars {
        config.chunk.max_block_chars = max;
    }
    config.log_summary();

    // Every failure path prints a diagnostic and exits normally.
    if !cli.pdf_path.is_file() {
        println!(
            "Error: PDF file '{}' not found. Check the path.",
            cli.pdf_path.display()
        );
        return Ok(());
    }

    let client = match OllamaClient::new(&config.ollama) {
        Ok(client) => client,
        Err(e) => {
            println!("Error creating the inference client: {e}");
            return Ok(());
        }
    };

    match pipeline::process(&cli.pdf_path, config.chunk.max_block_chars, &client).await {
        Ok(consolidated) => {
            println!("\nConsolidated model response:");
            println!("{consolidated}");
        }
        Err(e) => {
            println!("Error processing the PDF: {e:#}");
        }
    }

    Ok(())
}
