use super::{ExtractionError, PageContent};

/// Split extracted text into pages on form feed characters (`\x0C`), which
/// pdf-extract emits between pages. Whitespace-only pages are dropped;
/// numbering is 1-based over the surviving pages' original positions.
fn pages_from_text(text: &str) -> Vec<PageContent> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if !text.contains('\x0C') {
        // No page breaks found — treat as single page.
        return vec![PageContent {
            page_number: 1,
            text: trimmed.to_string(),
        }];
    }

    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            text: page_text.trim().to_string(),
        })
        .collect()
}

/// Extract per-page text from PDF bytes.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let pages = pages_from_text(&text);
    if pages.is_empty() {
        // Extraction succeeded but no text found (scanned/image PDF).
        tracing::warn!("PDF contained no extractable text");
    }
    Ok(pages)
}
