//! Portal API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Room for the non-file multipart fields and part headers.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the portal API router.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
/// The browser front end is served from another origin, so CORS is open.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn portal_router(ctx: ApiContext) -> Router {
    let body_limit = ctx
        .core
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/signup", post(endpoints::auth::signup))
        .route("/auth/login", post(endpoints::auth::login))
        .route("/student/upload", post(endpoints::documents::upload))
        .route(
            "/student/documents",
            get(endpoints::documents::list).delete(endpoints::documents::remove),
        )
        .route("/teacher/students", get(endpoints::students::list))
        .route(
            "/teacher/student-documents",
            get(endpoints::students::documents),
        )
        .route("/merit-list/generate", post(endpoints::merit::generate))
        .route("/merit-list/export", get(endpoints::merit::export))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::audit::log_access));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().nest("/api", api).layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::PortalConfig;
    use crate::core_state::CoreState;
    use crate::models::{Document, DocumentType, ExtractedData};
    use crate::pipeline::extraction::MockOcrEngine;
    use crate::store::DEMO_PASSWORD;

    const BOUNDARY: &str = "merit-test-boundary";
    const PDF: &[u8] = b"%PDF-1.7\n% test marksheet\n";

    fn test_ctx(ocr: MockOcrEngine) -> ApiContext {
        test_ctx_with_config(ocr, PortalConfig::default())
    }

    fn test_ctx_with_config(ocr: MockOcrEngine, config: PortalConfig) -> ApiContext {
        let core = Arc::new(CoreState::new(config).unwrap());
        ApiContext::new(core, Arc::new(ocr))
    }

    fn make_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    enum Part<'a> {
        File(&'a str, &'a [u8]),
        Text(&'a str, &'a str),
    }

    fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File(file_name, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/student/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: Response<Body>) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn aman_info() -> String {
        json!({
            "email": "aman@college.com",
            "name": "Aman Kumar",
            "rollNo": "2021001",
            "course": "B.Sc. Physics",
            "year": "3"
        })
        .to_string()
    }

    fn stored(owner: &str, course: &str, points: u32) -> Document {
        Document {
            id: Uuid::new_v4(),
            doc_type: DocumentType::Certificate,
            file_name: "cert.png".into(),
            extracted_data: ExtractedData::empty(),
            points,
            uploaded_at: Utc::now(),
            uploaded_by: owner.into(),
            student_name: owner.to_uppercase(),
            roll_no: format!("R-{owner}"),
            course: course.into(),
            year: "3".into(),
        }
    }

    #[tokio::test]
    async fn health_response_shape() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));

        let response = app.oneshot(make_request("GET", "/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["documents"], 0);
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));
        let response = app.oneshot(make_request("GET", "/api/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upload_scores_and_lists_document() {
        let ctx = test_ctx(MockOcrEngine::returning(json!({ "cgpa": "8.4", "points": 15 })));
        let app = portal_router(ctx.clone());
        let info = aman_info();

        let response = app
            .clone()
            .oneshot(multipart_request(&[
                Part::File("marks.pdf", PDF),
                Part::Text("docType", "marksheet"),
                Part::Text("userInfo", &info),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["points"], 15);
        assert_eq!(json["document"]["type"], "marksheet");
        assert_eq!(json["document"]["uploadedBy"], "aman@college.com");
        assert_eq!(json["document"]["extractedData"]["kind"], "marksheet");

        let response = app
            .oneshot(make_request("GET", "/api/student/documents?studentId=aman@college.com"))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["documents"].as_array().unwrap().len(), 1);
        assert_eq!(json["totalPoints"], 15);
        assert_eq!(ctx.core.documents.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn upload_without_file_is_bad_request() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));

        let response = app
            .oneshot(multipart_request(&[Part::Text("docType", "marksheet")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn upload_with_unknown_doc_type_is_bad_request() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));

        let response = app
            .oneshot(multipart_request(&[
                Part::File("marks.pdf", PDF),
                Part::Text("docType", "transcript"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_of_text_file_is_unsupported() {
        let ctx = test_ctx(MockOcrEngine::returning(json!({ "points": 5 })));
        let app = portal_router(ctx.clone());

        let response = app
            .oneshot(multipart_request(&[Part::File("notes.txt", b"just some notes")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(ctx.core.documents.is_empty().unwrap());
    }

    #[tokio::test]
    async fn upload_over_limit_is_payload_too_large() {
        let config = PortalConfig {
            max_upload_bytes: 8,
            ..PortalConfig::default()
        };
        let app = portal_router(test_ctx_with_config(
            MockOcrEngine::returning(json!({ "points": 5 })),
            config,
        ));

        let response = app
            .oneshot(multipart_request(&[Part::File("marks.pdf", PDF)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn ocr_failure_still_stores_document() {
        let ctx = test_ctx(MockOcrEngine::failing("python not found"));
        let app = portal_router(ctx.clone());

        let response = app
            .oneshot(multipart_request(&[
                Part::File("cert.pdf", PDF),
                Part::Text("docType", "Certificate"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["points"], 0);
        assert_eq!(json["document"]["type"], "certificate");
        assert_eq!(json["document"]["uploadedBy"], "unknown");
        assert_eq!(ctx.core.documents.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_requires_id() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));
        let response = app
            .oneshot(make_request("DELETE", "/api/student/documents"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));

        let uri = format!("/api/student/documents?id={}", Uuid::new_v4());
        let response = app.clone().oneshot(make_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(make_request("DELETE", "/api/student/documents?id=not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_document_from_aggregates() {
        let ctx = test_ctx(MockOcrEngine::returning(json!({})));
        let keep = stored("aman", "B.Sc. Physics", 10);
        let doomed = stored("aman", "B.Sc. Physics", 15);
        ctx.core.documents.append(keep).unwrap();
        ctx.core.documents.append(doomed.clone()).unwrap();
        let app = portal_router(ctx.clone());

        let uri = format!("/api/student/documents?id={}", doomed.id);
        let response = app.clone().oneshot(make_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await["success"], true);

        let response = app
            .oneshot(make_request("GET", "/api/teacher/students"))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["students"][0]["totalPoints"], 10);
        assert_eq!(json["students"][0]["documentsCount"], 1);
    }

    #[tokio::test]
    async fn signup_then_login() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));
        let account = json!({
            "email": "priya@college.com",
            "password": "hunter22",
            "name": "Priya Singh",
            "role": "student",
            "rollNo": "2021002",
            "course": "B.Sc. Chemistry",
            "year": "3"
        });

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/signup", account.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["rollNo"], "2021002");
        assert!(json["user"].get("password").is_none());

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/signup", account))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let login = json!({ "email": "priya@college.com", "password": "hunter22", "role": "student" });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/login", login))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await["user"]["name"], "Priya Singh");

        let wrong = json!({ "email": "priya@college.com", "password": "nope", "role": "student" });
        let response = app
            .oneshot(json_request("POST", "/api/auth/login", wrong))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response_json(response).await["error"]["code"], "AUTH_FAILED");
    }

    #[tokio::test]
    async fn demo_teacher_can_log_in() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));
        let login = json!({ "email": "teacher@college.com", "password": DEMO_PASSWORD, "role": "teacher" });

        let response = app
            .oneshot(json_request("POST", "/api/auth/login", login))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["user"]["role"], "teacher");
        assert_eq!(json["user"]["department"], "Physics");
    }

    #[tokio::test]
    async fn malformed_login_is_bad_request() {
        let app = portal_router(test_ctx(MockOcrEngine::returning(json!({}))));
        let response = app
            .oneshot(json_request("POST", "/api/auth/login", json!({ "email": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn teacher_students_filter_by_course() {
        let ctx = test_ctx(MockOcrEngine::returning(json!({})));
        ctx.core.documents.append(stored("aman", "B.Sc. Physics", 10)).unwrap();
        ctx.core.documents.append(stored("priya", "B.Sc. Chemistry", 12)).unwrap();
        let app = portal_router(ctx);

        let response = app
            .oneshot(make_request("GET", "/api/teacher/students?course=B.Sc.%20Physics&year="))
            .await
            .unwrap();
        let json = response_json(response).await;
        let students = json["students"].as_array().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0]["id"], "aman");
    }

    #[tokio::test]
    async fn student_documents_needs_a_criterion() {
        let ctx = test_ctx(MockOcrEngine::returning(json!({})));
        ctx.core.documents.append(stored("aman", "B.Sc. Physics", 10)).unwrap();
        ctx.core.documents.append(stored("priya", "B.Sc. Chemistry", 12)).unwrap();
        let app = portal_router(ctx);

        let response = app
            .clone()
            .oneshot(make_request("GET", "/api/teacher/student-documents"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(make_request(
                "GET",
                "/api/teacher/student-documents?rollNo=R-priya&name=aman",
            ))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["documents"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn merit_list_ranks_by_total_points() {
        let ctx = test_ctx(MockOcrEngine::returning(json!({})));
        ctx.core.documents.append(stored("1", "B.Sc. Physics", 10)).unwrap();
        ctx.core.documents.append(stored("1", "B.Sc. Physics", 15)).unwrap();
        ctx.core.documents.append(stored("2", "B.Sc. Physics", 32)).unwrap();
        let app = portal_router(ctx);

        let response = app
            .clone()
            .oneshot(make_request("POST", "/api/merit-list/generate"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json["generatedAt"].is_string());
        let list = json["meritList"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], "2");
        assert_eq!(list[0]["rank"], 1);
        assert_eq!(list[0]["totalPoints"], 32);
        assert_eq!(list[1]["id"], "1");
        assert_eq!(list[1]["rank"], 2);
        assert_eq!(list[1]["totalPoints"], 25);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/merit-list/generate",
                json!({ "studentIds": ["1"], "filterCourse": "B.Sc. Physics" }),
            ))
            .await
            .unwrap();
        let json = response_json(response).await;
        let list = json["meritList"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["rank"], 1);
    }

    #[tokio::test]
    async fn merit_list_export_is_csv() {
        let ctx = test_ctx(MockOcrEngine::returning(json!({})));
        ctx.core.documents.append(stored("aman", "B.Sc. Physics", 10)).unwrap();
        let app = portal_router(ctx);

        let response = app
            .oneshot(make_request("GET", "/api/merit-list/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/csv"));
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_some());

        let body = axum::body::to_bytes(response.into_body(), 65536).await.unwrap();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("rank,id,name,rollNo,course,year,totalPoints,documentsCount")
        );
        assert_eq!(lines.next(), Some("1,aman,AMAN,R-aman,B.Sc. Physics,3,10,1"));
    }
}
