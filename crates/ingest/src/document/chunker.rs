//! Greedy bounded-size block splitting.
//!
//! Splits document text into blocks of at most `max_chars` characters,
//! preferring the last whitespace inside the window so words survive the
//! cut. A window with no whitespace at all is hard-cut at the limit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("max_chars must be positive (got {0})")]
    InvalidMaxChars(usize),
}

/// Split `text` into trimmed blocks of at most `max_chars` characters each.
///
/// The limit is measured in characters, and cuts always land on a character
/// boundary, so multi-byte text is never split mid-character. Whitespace at
/// a cut point is discarded. Empty input yields an empty Vec.
pub fn split_blocks(text: &str, max_chars: usize) -> Result<Vec<String>, ChunkError> {
    if max_chars == 0 {
        return Err(ChunkError::InvalidMaxChars(max_chars));
    }

    let mut blocks = Vec::new();
    let mut rest = text;

    loop {
        // Byte offset just past the first `max_chars` characters of `rest`.
        let window_end = match rest.char_indices().nth(max_chars) {
            Some((idx, _)) => idx,
            None => {
                // Remainder fits in one block.
                let tail = rest.trim();
                if !tail.is_empty() {
                    blocks.push(tail.to_string());
                }
                return Ok(blocks);
            }
        };

        // Prefer the last whitespace in the window; hard-cut at the limit
        // when the window is one unbroken run.
        let cut = rest[..window_end]
            .rfind(char::is_whitespace)
            .unwrap_or(window_end);

        let head = rest[..cut].trim();
        if !head.is_empty() {
            blocks.push(head.to_string());
        }
        rest = rest[cut..].trim();
    }
}
