pub mod document;

pub use document::{extract_document, ExtractedDocument, ExtractionError, PageContent};
pub use document::chunker::{split_blocks, ChunkError};
