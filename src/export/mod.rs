//! Export functionality
//!
//! Adapters that turn generated target entity definitions into concrete output:
//! - JSON / YAML documents (any target-system adapter can consume them)
//! - Django `models.py` source

pub mod django;
pub mod document;
pub mod order;

/// Result of an export operation.
///
/// Contains the exported content and format identifier.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[must_use = "export results contain the exported content and should be used"]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Export error: {0}")]
    ExportError(String),
}

// Re-export for convenience
pub use django::DjangoExporter;
pub use document::{JsonExporter, YamlExporter};
pub use order::dependency_order;
