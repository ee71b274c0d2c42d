//! Merit list endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::students::StudentsQuery;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{MeritFilter, RankedEntry};
use crate::pipeline::export::{export_file_name, merit_list_csv};
use crate::pipeline::ranking::{generate_merit_list, ranked_students};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub student_ids: Option<Vec<String>>,
    #[serde(default)]
    pub filter_course: Option<String>,
    #[serde(default)]
    pub filter_year: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub merit_list: Vec<RankedEntry>,
    pub generated_at: DateTime<Utc>,
}

/// `POST /api/merit-list/generate`: an empty body ranks everyone.
pub async fn generate(
    State(ctx): State<ApiContext>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => GenerateRequest::default(),
        Err(e) => return Err(ApiError::BadRequest(e.body_text())),
    };

    let filter = MeritFilter::new(request.filter_course, request.filter_year)
        .with_student_ids(request.student_ids);
    let documents = ctx.core.documents.list()?;
    let list = generate_merit_list(&documents, &filter);

    Ok(Json(GenerateResponse {
        success: true,
        merit_list: list.merit_list,
        generated_at: list.generated_at,
    }))
}

/// `GET /api/merit-list/export?course=&year=`: CSV download.
pub async fn export(
    State(ctx): State<ApiContext>,
    Query(query): Query<StudentsQuery>,
) -> Result<Response, ApiError> {
    let filter = MeritFilter::new(query.course, query.year);
    let documents = ctx.core.documents.list()?;
    let entries = ranked_students(&documents, &filter);
    let csv = merit_list_csv(&entries)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now().date_naive())
    );
    tracing::info!(entries = entries.len(), "Merit list exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
