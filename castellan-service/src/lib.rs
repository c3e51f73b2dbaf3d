//! Castellan: content safety screening for LLM document pipelines.
//!
//! The crate wraps an external content safety classifier behind a batched,
//! bounded-concurrency document analysis pipeline with partial-failure
//! isolation, plus single-text category analysis and prompt shielding.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use castellan_service::{ContentSafetyService, Document, SafetyConfig, ShieldClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SafetyConfig::load()?;
//! let classifier = Arc::new(ShieldClient::new(config.classifier.clone())?);
//! let service = ContentSafetyService::new(classifier, config);
//!
//! let documents = vec![
//!     Document::new("chunk-1", "first retrieved passage"),
//!     Document::new("chunk-2", "second retrieved passage"),
//! ];
//! let analysis = service
//!     .analyze_documents("ingest-run-42", documents, CancellationToken::new())
//!     .await;
//!
//! for id in analysis.unsafe_document_ids() {
//!     println!("unsafe: {id}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod safety;

pub use classifier::{ClassifierClient, ShieldClient};
pub use config::SafetyConfig;
pub use error::{ClassifierError, SafetyError, SafetyResult};
pub use safety::{ContentSafetyService, Document, DocumentAnalysis, DocumentVerdict, TextVerdict};
