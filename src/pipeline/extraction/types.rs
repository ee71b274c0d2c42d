use serde_json::Value;

use super::ExtractionError;
use crate::models::DocumentType;
use crate::pipeline::import::UploadFormat;

/// OCR engine abstraction (allows mocking for tests)
///
/// Implementations block until the collaborator answers. Callers on the
/// async runtime run them through `spawn_blocking`.
pub trait OcrEngine: Send + Sync {
    /// Extract structured fields from one document.
    ///
    /// The returned value is untrusted: it may lack `points`, carry the
    /// wrong types, or not be an object at all.
    fn extract(
        &self,
        bytes: &[u8],
        format: UploadFormat,
        doc_type: DocumentType,
    ) -> Result<Value, ExtractionError>;
}
