//! Classifier client seam and wire types.
//!
//! The pipeline only requires order-alignment between a shield request's
//! documents and the analyses in the response; the REST payload shapes live
//! here so the HTTP client and tests share them.

mod http;

pub use http::ShieldClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ClassifierError;

/// External content safety classifier.
///
/// Implementations:
/// - [`ShieldClient`]: the managed content safety REST service
/// - scripted in-process fakes in tests
#[async_trait]
pub trait ClassifierClient: Send + Sync {
    /// Scan an ordered set of document contents for prompt injection attacks.
    ///
    /// The returned analyses are order-aligned with `contents`. A signaled
    /// `cancel_token` aborts the call with [`ClassifierError::Canceled`].
    async fn shield_documents(
        &self,
        contents: &[String],
        cancel_token: &CancellationToken,
    ) -> Result<Vec<ShieldAnalysis>, ClassifierError>;

    /// Scan a single user prompt for prompt injection attacks.
    async fn shield_prompt(&self, prompt: &str) -> Result<ShieldAnalysis, ClassifierError>;

    /// Score a single text against the harm categories.
    async fn analyze_text(&self, text: &str) -> Result<AnalyzeTextResponse, ClassifierError>;
}

/// Harm categories reported by the text analysis endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCategory {
    Hate,
    Violence,
    SelfHarm,
    Sexual,
    /// Categories added by newer service versions deserialize here instead of
    /// failing the whole response.
    Unknown,
}

impl<'de> Deserialize<'de> for TextCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "Hate" => TextCategory::Hate,
            "Violence" => TextCategory::Violence,
            "SelfHarm" => TextCategory::SelfHarm,
            "Sexual" => TextCategory::Sexual,
            _ => TextCategory::Unknown,
        })
    }
}

/// Request payload for the shield endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    pub documents: Vec<String>,
}

/// Per-input analysis in a shield response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldAnalysis {
    pub attack_detected: bool,
}

/// Response payload from the shield endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldResponse {
    #[serde(default)]
    pub user_prompt_analysis: Option<ShieldAnalysis>,
    #[serde(default)]
    pub documents_analysis: Vec<ShieldAnalysis>,
}

/// Request payload for the text analysis endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

/// One category score in a text analysis response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub category: TextCategory,
    #[serde(default)]
    pub severity: u8,
}

/// Response payload from the text analysis endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextResponse {
    #[serde(default)]
    pub categories_analysis: Vec<CategoryAnalysis>,
}

impl AnalyzeTextResponse {
    /// Severity reported for `category`, or 0 when the category is absent.
    pub fn severity(&self, category: TextCategory) -> u8 {
        self.categories_analysis
            .iter()
            .find(|a| a.category == category)
            .map(|a| a.severity)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_request_omits_empty_prompt() {
        let request = ShieldRequest {
            user_prompt: None,
            documents: vec!["doc one".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("userPrompt").is_none());
        assert_eq!(json["documents"][0], "doc one");
    }

    #[test]
    fn test_shield_response_deserializes() {
        let response: ShieldResponse = serde_json::from_str(
            r#"{
                "userPromptAnalysis": { "attackDetected": true },
                "documentsAnalysis": [
                    { "attackDetected": false },
                    { "attackDetected": true }
                ]
            }"#,
        )
        .unwrap();

        assert!(response.user_prompt_analysis.unwrap().attack_detected);
        assert_eq!(response.documents_analysis.len(), 2);
        assert!(!response.documents_analysis[0].attack_detected);
        assert!(response.documents_analysis[1].attack_detected);
    }

    #[test]
    fn test_analyze_response_severity_lookup() {
        let response: AnalyzeTextResponse = serde_json::from_str(
            r#"{
                "categoriesAnalysis": [
                    { "category": "Hate", "severity": 4 },
                    { "category": "SelfHarm", "severity": 0 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(response.severity(TextCategory::Hate), 4);
        assert_eq!(response.severity(TextCategory::SelfHarm), 0);
        // Absent category reads as severity 0
        assert_eq!(response.severity(TextCategory::Sexual), 0);
    }

    #[test]
    fn test_unknown_category_does_not_fail_response() {
        let response: AnalyzeTextResponse = serde_json::from_str(
            r#"{
                "categoriesAnalysis": [
                    { "category": "Defamation", "severity": 6 },
                    { "category": "Violence", "severity": 1 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(response.severity(TextCategory::Violence), 1);
        assert_eq!(response.severity(TextCategory::Unknown), 6);
    }
}
