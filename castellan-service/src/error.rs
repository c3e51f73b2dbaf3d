use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum SafetyError {
    #[error(
        "Document {document_id} is {size} characters, exceeding the {limit} character limit"
    )]
    DocumentTooLarge {
        document_id: String,
        size: usize,
        limit: usize,
    },

    #[error("Duplicate document id: {document_id}")]
    DuplicateDocumentId { document_id: String },

    #[error("Classifier request failed")]
    Classifier(#[from] ClassifierError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Content safety classifier client errors
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Connection failed to content safety service at {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Classification failed (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from content safety service")]
    InvalidResponse {
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from content safety service: {message}")]
    Malformed { message: String },

    #[error("Classification call canceled")]
    Canceled,
}

impl ClassifierError {
    /// Whether this is a client/transport-level fault, as opposed to a
    /// malformed payload or other unexpected failure. Only affects how the
    /// error is logged.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClassifierError::Connection { .. } | ClassifierError::Status { .. }
        )
    }
}

/// Result type alias for service operations
pub type SafetyResult<T> = Result<T, SafetyError>;

/// Render an error with its source chain, outermost first.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
