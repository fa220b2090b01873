//! PDF → blocks → model pipeline.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use pdfsum_ingest::{extract_document, split_blocks};
use pdfsum_llm::Generator;

/// Prompt wrapped around each text block.
fn block_prompt(block: &str) -> String {
    format!(
        "Based on the following text:\n\n{block}\n\nSummarize the content or answer related questions."
    )
}

/// Run every block through the generator and concatenate the labeled
/// results. A failed block is rendered into the output in place of its
/// result; later blocks still run.
pub async fn summarize_blocks(blocks: &[String], generator: &dyn Generator) -> String {
    let total = blocks.len();
    let mut consolidated = String::new();

    for (i, block) in blocks.iter().enumerate() {
        info!("processing block {} of {}", i + 1, total);
        let result = match generator.generate(&block_prompt(block)).await {
            Ok(text) => text,
            Err(e) => format!("Error communicating with the API: {e}"),
        };
        consolidated.push_str(&format!("\n--- Block {} ---\n{}", i + 1, result));
    }

    consolidated.trim().to_string()
}

/// Process one PDF: extract text, split into bounded blocks, summarize
/// each block, return the consolidated response.
pub async fn process(
    path: &Path,
    max_block_chars: usize,
    generator: &dyn Generator,
) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");

    let document = extract_document(&bytes, filename).context("failed to extract PDF text")?;
    info!(
        pages = document.pages.len(),
        chars = document.total_chars(),
        "extracted document text"
    );

    let text = document.full_text();
    let blocks = split_blocks(&text, max_block_chars).context("failed to split text into blocks")?;
    info!(blocks = blocks.len(), "split text into blocks");

    Ok(summarize_blocks(&blocks, generator).await)
}
