//! Scripted classifier fakes shared by the safety tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::classifier::{
    AnalyzeTextResponse, CategoryAnalysis, ClassifierClient, ShieldAnalysis, TextCategory,
};
use crate::config::SafetyConfig;
use crate::error::ClassifierError;

use super::ContentSafetyService;

/// Scripted behavior for one batch, selected by the batch's first document
/// content. Unscripted batches succeed with no flags.
pub(crate) enum Scripted {
    /// Return exactly these flags, order-aligned
    Flags(Vec<bool>),
    /// Fail with a transport-level status error
    Transport,
    /// Return a response with the wrong number of analyses
    Misaligned,
    /// Report the call as canceled in flight
    Canceled,
}

#[derive(Default)]
pub(crate) struct ScriptedClassifier {
    script: HashMap<String, Scripted>,
    severities: Vec<(TextCategory, u8)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedClassifier {
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Script the outcome for the batch whose first document content is `key`
    pub(crate) fn script(mut self, key: &str, outcome: Scripted) -> Self {
        self.script.insert(key.to_string(), outcome);
        self
    }

    /// Severities returned by `analyze_text`
    pub(crate) fn with_severities(mut self, severities: Vec<(TextCategory, u8)>) -> Self {
        self.severities = severities;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierClient for ScriptedClassifier {
    async fn shield_documents(
        &self,
        contents: &[String],
        _cancel_token: &CancellationToken,
    ) -> Result<Vec<ShieldAnalysis>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let key = contents.first().map(String::as_str).unwrap_or_default();
        match self.script.get(key) {
            None => Ok(contents
                .iter()
                .map(|_| ShieldAnalysis {
                    attack_detected: false,
                })
                .collect()),
            Some(Scripted::Flags(flags)) => Ok(flags
                .iter()
                .map(|&attack_detected| ShieldAnalysis { attack_detected })
                .collect()),
            Some(Scripted::Transport) => Err(ClassifierError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            }),
            Some(Scripted::Misaligned) => Ok(vec![ShieldAnalysis {
                attack_detected: false,
            }; contents.len() + 1]),
            Some(Scripted::Canceled) => Err(ClassifierError::Canceled),
        }
    }

    async fn shield_prompt(&self, prompt: &str) -> Result<ShieldAnalysis, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ShieldAnalysis {
            attack_detected: prompt.contains("ignore all previous instructions"),
        })
    }

    async fn analyze_text(&self, _text: &str) -> Result<AnalyzeTextResponse, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AnalyzeTextResponse {
            categories_analysis: self
                .severities
                .iter()
                .map(|&(category, severity)| CategoryAnalysis { category, severity })
                .collect(),
        })
    }
}

/// Service over a scripted classifier with default configuration
pub(crate) fn service_with(classifier: ScriptedClassifier) -> ContentSafetyService {
    ContentSafetyService::new(Arc::new(classifier), SafetyConfig::default())
}
