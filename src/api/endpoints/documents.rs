//! Student document endpoints.
//!
//! `POST /api/student/upload`: multipart upload, OCR, scoring, storage
//! `GET /api/student/documents`: a student's documents and point total
//! `DELETE /api/student/documents`: remove one document by id

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Document, DocumentType, StudentInfo};
use crate::pipeline::import::{import_upload, UploadRequest};

#[derive(Serialize)]
pub struct UploadResponse {
    pub document: Document,
    pub points: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsResponse {
    pub documents: Vec<Document>,
    pub total_points: u64,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsQuery {
    #[serde(default)]
    pub student_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub id: Option<String>,
}

/// `POST /api/student/upload`: fields `file`, `docType`, `userInfo`.
///
/// OCR runs on the blocking pool. An OCR failure still stores the document
/// with zero points.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut doc_type: Option<String> = None;
    let mut user_info: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, bytes.to_vec()));
            }
            "docType" => doc_type = Some(field.text().await.map_err(multipart_error)?),
            "userInfo" => user_info = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;
    let doc_type = parse_doc_type(doc_type.as_deref())?;
    let student = parse_user_info(user_info.as_deref())?;

    let request = UploadRequest {
        file_name,
        bytes,
        doc_type,
        student,
    };

    let core = ctx.core.clone();
    let ocr = ctx.ocr.clone();
    let document = tokio::task::spawn_blocking(move || {
        import_upload(
            ocr.as_ref(),
            &core.documents,
            request,
            core.config.max_upload_bytes,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(format!("upload task failed: {e}")))??;

    Ok(Json(UploadResponse {
        points: document.points,
        document,
    }))
}

/// `GET /api/student/documents?studentId=`: all documents when no id.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<DocumentsQuery>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let documents = match query.student_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => ctx.core.documents.list_for_owner(id)?,
        None => ctx.core.documents.list()?,
    };
    let total_points = documents.iter().map(|d| u64::from(d.points)).sum();

    Ok(Json(DocumentsResponse {
        documents,
        total_points,
    }))
}

/// `DELETE /api/student/documents?id=`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let raw = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing id".into()))?;
    // No document can carry an id that is not a UUID.
    let id = Uuid::parse_str(&raw)
        .map_err(|_| ApiError::NotFound(format!("Document not found: {raw}")))?;

    let removed = ctx.core.documents.remove(&id)?;
    tracing::info!(
        document_id = %removed.id,
        owner = %removed.uploaded_by,
        points = removed.points,
        "Document deleted"
    );
    Ok(Json(DeleteResponse { success: true }))
}

/// Absent or blank means marksheet; otherwise case-insensitive.
fn parse_doc_type(value: Option<&str>) -> Result<DocumentType, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DocumentType::Marksheet),
        Some(v) => Ok(v.parse::<DocumentType>()?),
    }
}

fn parse_user_info(value: Option<&str>) -> Result<StudentInfo, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(StudentInfo::default()),
        Some(v) => serde_json::from_str::<Option<StudentInfo>>(v)
            .map(Option::unwrap_or_default)
            .map_err(|e| ApiError::BadRequest(format!("Invalid userInfo: {e}"))),
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
