use chrono::Utc;
use uuid::Uuid;

use super::format::{detect_format, sanitize_file_name, UploadFormat};
use super::ImportError;
use crate::models::{Document, DocumentType, ExtractedData, StudentInfo};
use crate::pipeline::extraction::OcrEngine;
use crate::pipeline::scoring::score_ocr_result;
use crate::store::DocumentStore;

/// One uploaded file with its form fields.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub doc_type: DocumentType,
    pub student: StudentInfo,
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Reject empty, oversized and unsupported files before any OCR work.
pub fn validate_upload(bytes: &[u8], max_bytes: usize) -> Result<UploadFormat, ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    if bytes.len() > max_bytes {
        return Err(ImportError::FileTooLarge {
            size_mb: bytes.len() as f64 / BYTES_PER_MB,
            max_mb: max_bytes as f64 / BYTES_PER_MB,
        });
    }
    detect_format(bytes).ok_or_else(|| {
        ImportError::UnsupportedFormat("expected a PDF, JPEG or PNG file".into())
    })
}

/// Validate, extract, score and store one upload.
///
/// An OCR failure is not an upload failure: the document is kept with empty
/// extracted data and zero points. Blocking; run off the async runtime.
pub fn import_upload(
    engine: &dyn OcrEngine,
    store: &DocumentStore,
    request: UploadRequest,
    max_bytes: usize,
) -> Result<Document, ImportError> {
    let format = validate_upload(&request.bytes, max_bytes)?;
    let file_name = sanitize_file_name(&request.file_name);

    tracing::info!(
        file = %file_name,
        doc_type = %request.doc_type,
        format = format.as_str(),
        size = request.bytes.len(),
        "Starting document import"
    );

    let (extracted_data, points) = match engine.extract(&request.bytes, format, request.doc_type) {
        Ok(raw) => score_ocr_result(request.doc_type, raw),
        Err(e) => {
            tracing::warn!(
                file = %file_name,
                error = %e,
                "OCR failed, storing document without extracted data"
            );
            (ExtractedData::empty(), 0)
        }
    };

    let student = &request.student;
    let document = Document {
        id: Uuid::new_v4(),
        doc_type: request.doc_type,
        file_name,
        extracted_data,
        points,
        uploaded_at: Utc::now(),
        uploaded_by: student.owner_id(),
        student_name: student.display_name(),
        roll_no: student.roll_no_or_default(),
        course: student.course_or_default(),
        year: student.year_or_default(),
    };

    store.append(document.clone())?;
    tracing::info!(
        document_id = %document.id,
        owner = %document.uploaded_by,
        points = document.points,
        "Document stored"
    );
    Ok(document)
}
