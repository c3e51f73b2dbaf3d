//! The externally visible document analysis operation.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ContentSafetyService;
use super::batching::build_batches;
use super::dispatch::dispatch_batches;
use super::types::{Document, DocumentAnalysis};
use super::verdicts::VerdictLedger;

impl ContentSafetyService {
    /// Analyze a set of documents for prompt injection attacks.
    ///
    /// Documents are grouped into bounded batches and classified concurrently.
    /// Batch-level classifier failures never fail the operation: the affected
    /// documents are reported failed-unsafe while every other batch keeps the
    /// classifier's real verdicts. Only validation failures (an oversized
    /// document, a duplicate id) abort the whole operation, before any
    /// dispatch.
    ///
    /// `context` labels the invocation in logs and in the cancellation
    /// registry; `cancel_token` stops further batch dispatch when signaled.
    pub async fn analyze_documents(
        &self,
        context: &str,
        documents: Vec<Document>,
        cancel_token: CancellationToken,
    ) -> DocumentAnalysis {
        info!(
            context = %context,
            document_count = documents.len(),
            "Starting document safety analysis"
        );

        let batching = &self.config.batching;
        let batches = match build_batches(documents, batching.max_documents, batching.max_chars) {
            Ok(batches) => batches,
            Err(e) => {
                warn!(context = %context, error = %e, "Document safety analysis aborted");
                return DocumentAnalysis::aborted(e.to_string());
            }
        };

        if batches.is_empty() {
            return DocumentAnalysis::completed(HashMap::new());
        }

        self.register_analysis_token(context, cancel_token.clone());

        let batch_count = batches.len();
        let mut ledger = VerdictLedger::new(&batches);
        let mut outcomes = dispatch_batches(
            batches,
            self.classifier.clone(),
            self.config.dispatch.max_concurrent_batches,
            cancel_token,
        );

        let mut settled = 0;
        while let Some(outcome) = outcomes.recv().await {
            settled += 1;
            ledger.record(&outcome);
        }
        if settled < batch_count {
            // Leftover pending slots resolve to failed-unsafe below.
            warn!(
                context = %context,
                settled,
                batch_count,
                "Dispatch ended before every batch settled"
            );
        }

        self.unregister_analysis_token(context);

        let verdicts = ledger.into_results();
        info!(
            context = %context,
            verdict_count = verdicts.len(),
            "Finished document safety analysis"
        );
        DocumentAnalysis::completed(verdicts)
    }
}
