//! Bounded-concurrency dispatch of batches to the classifier.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::classifier::ClassifierClient;
use crate::error::{ClassifierError, error_chain};

use super::types::Batch;

/// Why a batch failed classification. The distinction only affects logging;
/// both kinds produce the same failed-unsafe verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Client/transport-level classifier fault
    Transport,
    /// Anything else: malformed payloads, misaligned responses
    Unexpected,
}

/// Terminal outcome of one batch. Exactly one is produced per dispatched
/// batch, with no retries.
#[derive(Debug)]
pub enum BatchOutcome {
    /// The classifier returned one flag per member document, in member order
    Completed { batch: Batch, flags: Vec<bool> },
    /// The classify call failed for the whole batch
    Failed {
        batch: Batch,
        kind: FailureKind,
        message: String,
    },
    /// The batch was never attempted, or its call was aborted by cancellation
    Canceled { batch: Batch },
}

/// Run `batches` through the classifier with at most `max_concurrent` calls
/// in flight at once.
///
/// Returns a channel yielding exactly one outcome per batch; the channel
/// closes once every batch has settled. After `cancel_token` fires, no new
/// batch is scheduled and remaining batches settle as `Canceled`.
pub(crate) fn dispatch_batches(
    batches: Vec<Batch>,
    classifier: Arc<dyn ClassifierClient>,
    max_concurrent: usize,
    cancel_token: CancellationToken,
) -> mpsc::Receiver<BatchOutcome> {
    // Sized so classification tasks never block on a slow consumer.
    let (tx, rx) = mpsc::channel(batches.len().max(1));

    tokio::spawn(async move {
        let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

        for batch in batches {
            if cancel_token.is_cancelled() {
                let _ = tx.send(BatchOutcome::Canceled { batch }).await;
                continue;
            }

            let permit = tokio::select! {
                _ = cancel_token.cancelled() => {
                    let _ = tx.send(BatchOutcome::Canceled { batch }).await;
                    continue;
                }
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    // The semaphore is never closed while this loop runs
                    Err(_) => break,
                },
            };

            let tx = tx.clone();
            let classifier = classifier.clone();
            let cancel_token = cancel_token.clone();
            tokio::spawn(async move {
                // Held until the classify call settles
                let _permit = permit;
                let outcome = classify_batch(batch, classifier.as_ref(), &cancel_token).await;
                let _ = tx.send(outcome).await;
            });
        }
    });

    rx
}

async fn classify_batch(
    batch: Batch,
    classifier: &dyn ClassifierClient,
    cancel_token: &CancellationToken,
) -> BatchOutcome {
    let document_ids = batch.document_ids();
    debug!(
        document_ids = %document_ids,
        document_count = batch.len(),
        chars = batch.chars(),
        "Classifying batch"
    );

    match classifier
        .shield_documents(&batch.contents(), cancel_token)
        .await
    {
        // Order alignment with the batch's members is a hard contract; a
        // length mismatch invalidates the whole response.
        Ok(analyses) if analyses.len() == batch.len() => {
            let flags = analyses.iter().map(|a| a.attack_detected).collect();
            BatchOutcome::Completed { batch, flags }
        }
        Ok(analyses) => {
            let message = format!(
                "classifier returned {} analyses for {} documents",
                analyses.len(),
                batch.len()
            );
            error!(document_ids = %document_ids, message = %message, "Misaligned classifier response");
            BatchOutcome::Failed {
                batch,
                kind: FailureKind::Unexpected,
                message,
            }
        }
        Err(ClassifierError::Canceled) => {
            warn!(document_ids = %document_ids, "Batch classification canceled in flight");
            BatchOutcome::Canceled { batch }
        }
        Err(e) => {
            let message = error_chain(&e);
            let kind = if e.is_transport() {
                error!(
                    document_ids = %document_ids,
                    error = %message,
                    "Transport error classifying batch"
                );
                FailureKind::Transport
            } else {
                error!(
                    document_ids = %document_ids,
                    error = %message,
                    "Unexpected error classifying batch"
                );
                FailureKind::Unexpected
            };
            BatchOutcome::Failed {
                batch,
                kind,
                message,
            }
        }
    }
}
