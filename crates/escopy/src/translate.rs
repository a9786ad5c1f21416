//! Page-to-bulk translation.

use crate::bulk::WriteOperation;
use crate::scroll::Document;

/// Maps a page of source documents into bulk write operations targeting
/// `destination_index`.
///
/// Structural carry-over only: identifier, type-tag, and body pass through
/// unchanged, in page order. No field mapping or timestamp normalization
/// happens here.
#[must_use]
pub fn translate_page(page: Vec<Document>, destination_index: &str) -> Vec<WriteOperation> {
    page.into_iter()
        .map(|doc| WriteOperation {
            index: destination_index.to_string(),
            doc_type: doc.doc_type,
            id: doc.id,
            source: doc.source,
        })
        .collect()
}
