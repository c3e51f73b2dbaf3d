//! Single-text safety operations: category analysis and prompt shielding.

use crate::classifier::TextCategory;
use crate::error::SafetyResult;

use super::ContentSafetyService;
use super::types::TextVerdict;

impl ContentSafetyService {
    /// Score a single text against the configured category thresholds.
    ///
    /// The text is unsafe when any harm category's reported severity exceeds
    /// its threshold; the details name the offending categories.
    pub async fn analyze_text(&self, content: &str) -> SafetyResult<TextVerdict> {
        let analysis = self.classifier.analyze_text(content).await?;
        let thresholds = &self.config.thresholds;

        let mut flagged = Vec::new();
        if analysis.severity(TextCategory::Hate) > thresholds.hate {
            flagged.push("hate");
        }
        if analysis.severity(TextCategory::Violence) > thresholds.violence {
            flagged.push("violence");
        }
        if analysis.severity(TextCategory::SelfHarm) > thresholds.self_harm {
            flagged.push("self-harm");
        }
        if analysis.severity(TextCategory::Sexual) > thresholds.sexual {
            flagged.push("sexual");
        }

        if flagged.is_empty() {
            Ok(TextVerdict {
                safe: true,
                details: None,
            })
        } else {
            Ok(TextVerdict {
                safe: false,
                details: Some(format!(
                    "The text did not pass the content safety filter. Reason: {}",
                    flagged.join(" ")
                )),
            })
        }
    }

    /// Check a prompt for injection attacks via the shield endpoint.
    pub async fn detect_prompt_injection(&self, content: &str) -> SafetyResult<TextVerdict> {
        let analysis = self.classifier.shield_prompt(content).await?;

        if analysis.attack_detected {
            Ok(TextVerdict {
                safe: false,
                details: Some("A prompt injection attack was detected.".to_string()),
            })
        } else {
            Ok(TextVerdict {
                safe: true,
                details: None,
            })
        }
    }
}
