//! Teacher review endpoints.
//!
//! `GET /api/teacher/students`: per-student aggregates, optionally filtered
//! `GET /api/teacher/student-documents`: one student's documents

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Document, MeritFilter, StudentAggregate};
use crate::pipeline::ranking::aggregate_students;
use crate::store::StudentQuery;

#[derive(Debug, Default, Deserialize)]
pub struct StudentsQuery {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Serialize)]
pub struct StudentsResponse {
    pub students: Vec<StudentAggregate>,
}

#[derive(Serialize)]
pub struct StudentDocumentsResponse {
    pub documents: Vec<Document>,
}

/// `GET /api/teacher/students?course=&year=`: upload order, unranked.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<StudentsQuery>,
) -> Result<Json<StudentsResponse>, ApiError> {
    let filter = MeritFilter::new(query.course, query.year);
    let documents = ctx.core.documents.list()?;
    let students = aggregate_students(&documents)
        .into_iter()
        .filter(|s| filter.matches(s))
        .collect();

    Ok(Json(StudentsResponse { students }))
}

/// `GET /api/teacher/student-documents?studentId=&rollNo=&name=`
///
/// Any one criterion is enough for a document to match.
pub async fn documents(
    State(ctx): State<ApiContext>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<StudentDocumentsResponse>, ApiError> {
    if query.is_empty() {
        return Err(ApiError::BadRequest(
            "One of studentId, rollNo or name is required".into(),
        ));
    }
    let documents = ctx.core.documents.find_for_student(&query)?;
    Ok(Json(StudentDocumentsResponse { documents }))
}
