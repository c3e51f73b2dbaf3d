//! Cancellation token registry for analyses in flight.

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::ContentSafetyService;

impl ContentSafetyService {
    /// Register the cancellation token for an analysis starting under
    /// `context`.
    pub(crate) fn register_analysis_token(&self, context: &str, token: CancellationToken) {
        self.analysis_tokens.insert(context.to_string(), token);
    }

    /// Cancel the analysis running under `context`, if any. Returns whether
    /// an analysis was found.
    pub fn cancel_analysis(&self, context: &str) -> bool {
        if let Some((_, token)) = self.analysis_tokens.remove(context) {
            token.cancel();
            info!(context = %context, "Document safety analysis cancellation triggered");
            true
        } else {
            false
        }
    }

    /// Remove the token once an analysis completes normally.
    pub(crate) fn unregister_analysis_token(&self, context: &str) {
        self.analysis_tokens.remove(context);
    }
}
