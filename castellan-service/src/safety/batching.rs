//! Greedy grouping of documents into size- and count-bounded batches.

use std::collections::HashSet;

use crate::error::SafetyError;

use super::types::{Batch, Document};

/// Partition `documents` into batches of at most `max_documents` members and
/// at most `max_chars` aggregate content length, preserving input order.
///
/// Fails before building anything when a single document exceeds `max_chars`
/// (it could never be placed in any batch) or when two documents share an id
/// (the verdict map is keyed by id). Empty input yields zero batches.
pub(crate) fn build_batches(
    documents: Vec<Document>,
    max_documents: usize,
    max_chars: usize,
) -> Result<Vec<Batch>, SafetyError> {
    let mut seen_ids = HashSet::with_capacity(documents.len());
    for document in &documents {
        let size = document.chars();
        if size > max_chars {
            return Err(SafetyError::DocumentTooLarge {
                document_id: document.id.clone(),
                size,
                limit: max_chars,
            });
        }
        if !seen_ids.insert(document.id.clone()) {
            return Err(SafetyError::DuplicateDocumentId {
                document_id: document.id.clone(),
            });
        }
    }

    let mut batches = Vec::new();
    let mut current = Batch::new();

    for document in documents {
        let size = document.chars();
        let would_exceed_count = current.len() + 1 > max_documents;
        // A document exactly filling the remaining capacity stays in the
        // current batch.
        let would_exceed_chars = current.chars() + size > max_chars;

        if (would_exceed_count || would_exceed_chars) && !current.is_empty() {
            batches.push(std::mem::replace(&mut current, Batch::new()));
        }

        current.push(document);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    Ok(batches)
}
