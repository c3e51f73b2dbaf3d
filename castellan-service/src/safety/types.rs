//! Core data types for the document safety pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Atomic unit of content submitted for safety classification.
/// Ids must be unique within one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Content length in characters, the unit of the classifier's size limit.
    pub fn chars(&self) -> usize {
        self.content.chars().count()
    }
}

/// Bounded, ordered group of documents classified in one call.
///
/// Batches partition an analysis request: every document belongs to exactly
/// one batch, member order equals input order.
#[derive(Debug, Clone)]
pub struct Batch {
    documents: Vec<Document>,
    chars: usize,
}

impl Batch {
    pub(crate) fn new() -> Self {
        Self {
            documents: Vec::new(),
            chars: 0,
        }
    }

    pub(crate) fn push(&mut self, document: Document) {
        self.chars += document.chars();
        self.documents.push(document);
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Aggregate content length of all members, in characters
    pub fn chars(&self) -> usize {
        self.chars
    }

    /// Comma-joined member ids, for log fields
    pub fn document_ids(&self) -> String {
        self.documents
            .iter()
            .map(|d| d.id.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn contents(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.content.clone()).collect()
    }
}

/// Final per-document outcome of a safety analysis.
///
/// `success` is false when the document's batch failed or was canceled; such
/// documents always read as unsafe (fail closed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVerdict {
    pub success: bool,
    pub safe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DocumentVerdict {
    /// Verdict for a document the classifier actually scored
    pub(crate) fn classified(flagged: bool) -> Self {
        Self {
            success: true,
            safe: !flagged,
            details: None,
        }
    }

    /// Failed-unsafe verdict for a document whose batch did not complete
    pub(crate) fn failed(details: impl Into<String>) -> Self {
        Self {
            success: false,
            safe: false,
            details: Some(details.into()),
        }
    }
}

/// Result of one batched document analysis.
///
/// Top-level `success` means the pipeline ran to completion and every
/// document has a verdict, not that every document was judged safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub verdicts: HashMap<String, DocumentVerdict>,
}

impl DocumentAnalysis {
    /// The operation was aborted before any batch was dispatched
    pub(crate) fn aborted(details: String) -> Self {
        Self {
            success: false,
            details: Some(details),
            verdicts: HashMap::new(),
        }
    }

    pub(crate) fn completed(verdicts: HashMap<String, DocumentVerdict>) -> Self {
        Self {
            success: true,
            details: None,
            verdicts,
        }
    }

    /// Ids of documents that are unsafe or were never successfully scored
    pub fn unsafe_document_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .verdicts
            .iter()
            .filter(|(_, verdict)| !verdict.safe)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Outcome of a single-text safety check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextVerdict {
    pub safe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_chars_counts_scalar_values() {
        // 4 characters, 8 bytes in UTF-8
        let document = Document::new("doc-1", "日本語あ");
        assert_eq!(document.chars(), 4);
    }

    #[test]
    fn test_batch_tracks_aggregate_chars() {
        let mut batch = Batch::new();
        batch.push(Document::new("a", "12345"));
        batch.push(Document::new("b", "678"));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.chars(), 8);
        assert_eq!(batch.document_ids(), "a,b");
    }

    #[test]
    fn test_unsafe_document_ids() {
        let mut verdicts = HashMap::new();
        verdicts.insert("a".to_string(), DocumentVerdict::classified(false));
        verdicts.insert("b".to_string(), DocumentVerdict::classified(true));
        verdicts.insert("c".to_string(), DocumentVerdict::failed("boom"));

        let analysis = DocumentAnalysis::completed(verdicts);
        assert_eq!(analysis.unsafe_document_ids(), vec!["b", "c"]);
    }
}
