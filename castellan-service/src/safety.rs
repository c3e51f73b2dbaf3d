//! Content safety screening: batched document shielding and single-text
//! checks against an external classifier.
//!
//! The document pipeline runs validate → group → dispatch → aggregate: the
//! input is partitioned into size- and count-bounded batches, batches are
//! classified concurrently under a fixed cap, and per-document verdicts are
//! merged with batch failures isolated to their own documents.

mod batching;
mod cancellation;
mod dispatch;
mod pipeline;
#[cfg(test)]
pub(crate) mod testing;
mod text;
mod types;
mod verdicts;

pub use dispatch::{BatchOutcome, FailureKind};
pub use types::{Batch, Document, DocumentAnalysis, DocumentVerdict, TextVerdict};

use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use crate::classifier::ClassifierClient;
use crate::config::SafetyConfig;

/// Content safety screening service.
///
/// Wraps an external classifier behind the batched document pipeline and the
/// single-text operations. One instance is shared across requests; all state
/// specific to an analysis lives for that invocation only.
pub struct ContentSafetyService {
    classifier: Arc<dyn ClassifierClient>,
    config: SafetyConfig,
    /// Cancellation tokens for analyses in flight, keyed by context label
    analysis_tokens: DashMap<String, CancellationToken>,
}

impl ContentSafetyService {
    /// Create a new service instance
    pub fn new(classifier: Arc<dyn ClassifierClient>, config: SafetyConfig) -> Self {
        Self {
            classifier,
            config,
            analysis_tokens: DashMap::new(),
        }
    }
}
