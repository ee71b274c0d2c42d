use std::sync::Mutex;

use serde_json::Value;

use super::types::OcrEngine;
use super::ExtractionError;
use crate::models::DocumentType;
use crate::pipeline::import::UploadFormat;

/// Mock OCR engine for unit testing without the Python extractor.
pub struct MockOcrEngine {
    response: Result<Value, String>,
    calls: Mutex<Vec<(UploadFormat, DocumentType)>>,
}

impl MockOcrEngine {
    /// Answer every call with `value`.
    pub fn returning(value: Value) -> Self {
        Self {
            response: Ok(value),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with `ExtractionError::Unavailable`.
    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Format and document type of each call, in order.
    pub fn calls(&self) -> Vec<(UploadFormat, DocumentType)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl OcrEngine for MockOcrEngine {
    fn extract(
        &self,
        _bytes: &[u8],
        format: UploadFormat,
        doc_type: DocumentType,
    ) -> Result<Value, ExtractionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((format, doc_type));
        }
        self.response
            .clone()
            .map_err(ExtractionError::Unavailable)
    }
}
