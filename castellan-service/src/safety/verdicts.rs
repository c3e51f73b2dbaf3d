//! Aggregation of batch outcomes into the final verdict map.

use std::collections::HashMap;

use tracing::{error, warn};

use super::dispatch::BatchOutcome;
use super::types::{Batch, DocumentVerdict};

const CANCELED_DETAILS: &str = "classification was canceled before a verdict was produced";
const UNRESOLVED_DETAILS: &str = "no classification outcome was observed";

enum Slot {
    Pending,
    Done(DocumentVerdict),
}

/// Per-document outcome map, pending until a batch outcome is observed.
///
/// Slots start pending rather than optimistically safe, so a dispatch task
/// dying can only ever surface as an explicit failure, never as a false
/// "safe" verdict. Each verdict is written once; batches partition the input,
/// so writers for different batches target disjoint ids.
pub(crate) struct VerdictLedger {
    slots: HashMap<String, Slot>,
}

impl VerdictLedger {
    pub(crate) fn new(batches: &[Batch]) -> Self {
        let mut slots = HashMap::new();
        for batch in batches {
            for document in batch.documents() {
                slots.insert(document.id.clone(), Slot::Pending);
            }
        }
        Self { slots }
    }

    /// Merge one batch outcome. A failed or canceled batch marks every member
    /// failed-unsafe without touching any other batch's verdicts.
    pub(crate) fn record(&mut self, outcome: &BatchOutcome) {
        match outcome {
            BatchOutcome::Completed { batch, flags } => {
                for (document, flagged) in batch.documents().iter().zip(flags) {
                    self.write(&document.id, DocumentVerdict::classified(*flagged));
                }
            }
            BatchOutcome::Failed { batch, message, .. } => {
                for document in batch.documents() {
                    self.write(&document.id, DocumentVerdict::failed(message.clone()));
                }
            }
            BatchOutcome::Canceled { batch } => {
                for document in batch.documents() {
                    self.write(&document.id, DocumentVerdict::failed(CANCELED_DETAILS));
                }
            }
        }
    }

    fn write(&mut self, document_id: &str, verdict: DocumentVerdict) {
        match self.slots.get_mut(document_id) {
            Some(slot @ Slot::Pending) => *slot = Slot::Done(verdict),
            Some(Slot::Done(_)) => {
                warn!(document_id = %document_id, "Ignoring second verdict for document");
            }
            None => {
                warn!(document_id = %document_id, "Verdict for unknown document");
            }
        }
    }

    /// Hand back the final map. Every registered document gets exactly one
    /// verdict; slots still pending resolve to failed-unsafe.
    pub(crate) fn into_results(self) -> HashMap<String, DocumentVerdict> {
        self.slots
            .into_iter()
            .map(|(id, slot)| match slot {
                Slot::Done(verdict) => (id, verdict),
                Slot::Pending => {
                    error!(document_id = %id, "Document never received a classification outcome");
                    (id, DocumentVerdict::failed(UNRESOLVED_DETAILS))
                }
            })
            .collect()
    }
}
