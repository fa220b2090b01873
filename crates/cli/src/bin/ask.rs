//! Send a single prompt to the local Ollama server and print the reply.

use clap::Parser;

use pdfsum_core::config::{self, Config};
use pdfsum_llm::{Generator, MalformedLine, OllamaClient};

const DEFAULT_PROMPT: &str = "Explain, in a few sentences, what a large language model is.";

#[derive(Parser, Debug)]
#[command(name = "ask", version, about)]
struct Cli {
    /// Prompt to send (defaults to a built-in demo prompt).
    prompt: Option<String>,
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
    let config = Config::from_env();

    // Malformed lines are logged and skipped here rather than aborting.
    let client = match OllamaClient::new(&config.ollama) {
        Ok(client) => client.with_malformed_line(MalformedLine::SkipAndLog),
        Err(e) => {
            println!("Error creating the inference client: {e}");
            return Ok(());
        }
    };

    let prompt = cli.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    match client.generate(prompt).await {
        Ok(reply) => println!("{reply}"),
        Err(e) => println!("Error communicating with the API: {e}"),
    }

    Ok(())
}
