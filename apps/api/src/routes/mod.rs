pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::applications::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Company dashboard API (company id via upstream auth header)
        .route(
            "/api/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/api/jobs/:job_id", delete(jobs::handle_delete_job))
        .route("/api/candidates", get(candidates::handle_list_candidates))
        .route("/api/candidates/:id", get(candidates::handle_get_candidate))
        .route(
            "/api/candidates/:id/resume",
            get(candidates::handle_download_resume),
        )
        .route(
            "/api/candidates/:id/status",
            put(candidates::handle_update_status),
        )
        .route("/api/stats", get(analytics::handle_company_stats))
        .route("/api/analytics/:form_id", get(analytics::handle_job_tiers))
        // Evaluator callback (out-of-band writer of scores/tier/payload)
        .route(
            "/api/candidates/:id/evaluation",
            put(candidates::handle_update_evaluation),
        )
        // Public application form, gated only by the unguessable form id
        .route(
            "/api/public/jobs/:form_id",
            get(candidates::handle_get_public_job),
        )
        .route(
            "/api/public/apply/:form_id",
            post(candidates::handle_apply),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::applications::memory::InMemoryApplicationRepository;
    use crate::config::Config;
    use crate::jobs::memory::InMemoryJobRepository;
    use crate::storage::InMemoryBlobStore;

    const BOUNDARY: &str = "----talentgate-test-boundary";

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            s3_bucket: "talentgate-test".to_string(),
            s3_endpoint: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            public_base_url: "http://localhost:8080".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    fn test_router() -> Router {
        build_router(AppState {
            jobs: Arc::new(InMemoryJobRepository::new()),
            applications: Arc::new(InMemoryApplicationRepository::new()),
            blobs: Arc::new(InMemoryBlobStore::new()),
            config: test_config(),
        })
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body reads");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_job(router: &Router, company: Uuid) -> String {
        let request = Request::post("/api/jobs")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-company-id", company.to_string())
            .body(Body::from(
                json!({
                    "jobTitle": "Backend Engineer",
                    "description": "Own the intake pipeline"
                })
                .to_string(),
            ))
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        body["publicFormId"].as_str().unwrap().to_string()
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; \
                     filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn apply_request(form_id: &str, file: Option<(&str, &str, &[u8])>) -> Request<Body> {
        let body = multipart_body(
            &[
                ("first_name", "Jane"),
                ("last_name", "Doe"),
                ("email", "jane@x.com"),
                ("linkedin", "https://linkedin.com/in/janedoe"),
            ],
            file,
        );
        Request::post(format!("/api/public/apply/{form_id}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn pdf_bytes() -> Vec<u8> {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.resize(10 * 1024, 0x20);
        bytes
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn full_candidate_lifecycle() {
        let router = test_router();
        let company = Uuid::new_v4();
        let form_id = create_job(&router, company).await;

        // Public form page resolves through the unguessable id.
        let (status, body) = send(
            &router,
            Request::get(format!("/api/public/jobs/{form_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobTitle"], "Backend Engineer");

        // Jane Doe applies with a 10KB PDF.
        let resume = pdf_bytes();
        let (status, body) = send(
            &router,
            apply_request(&form_id, Some(("jane-doe.pdf", "application/pdf", &resume))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
        let candidate_id = body["applicationId"].as_str().unwrap().to_string();

        // Freshly created record: pending, placeholder tier, zeroed scores.
        let (status, body) = send(
            &router,
            Request::get(format!("/api/candidates/{candidate_id}"))
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["tier"]["letter"], "pending");
        assert_eq!(body["scores"]["overallScore"], 0);
        assert_eq!(body["scores"]["contentScore"], 0);
        assert_eq!(body["resume"]["filename"], "jane-doe.pdf");

        // Evaluator calls back with scores and a tier.
        let (status, body) = send(
            &router,
            Request::put(format!("/api/candidates/{candidate_id}/evaluation"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "scores": {
                            "overallScore": 82,
                            "contentScore": 80,
                            "designScore": 78,
                            "projectsScore": 85,
                            "reasoningSummary": "Strong projects, clean resume"
                        },
                        "tier": { "letter": "A", "code": "A2", "level": 2 },
                        "evaluatorPayload": { "model": "v3" }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "evaluated");
        assert_eq!(body["scores"]["overallScore"], 82);
        assert_eq!(body["tier"]["code"], "A2");

        // The job's tier buckets now place the candidate under tier_a.
        let (status, body) = send(
            &router,
            Request::get(format!("/api/analytics/{form_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier_a"][0]["id"], candidate_id.as_str());
        assert_eq!(body["tier_a"][0]["name"], "Jane Doe");
        assert!(body["tier_pending"].as_array().unwrap().is_empty());

        // Recruiter accepts; the rollup counts by status.
        let (status, _) = send(
            &router,
            Request::put(format!("/api/candidates/{candidate_id}/status"))
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-company-id", company.to_string())
                .body(Body::from(json!({ "status": "accepted" }).to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &router,
            Request::get("/api/stats")
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs_posted"], 1);
        assert_eq!(body["applications_received"], 1);
        assert_eq!(body["applications_selected"], 1);
        assert_eq!(body["applications_rejected"], 0);
        assert_eq!(body["job_stats"][0]["selected"], 1);

        // Resume bytes round-trip exactly.
        let response = router
            .clone()
            .oneshot(
                Request::get(format!("/api/candidates/{candidate_id}/resume"))
                    .header("x-company-id", company.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let downloaded = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        assert_eq!(downloaded.as_ref(), resume.as_slice());
    }

    #[tokio::test]
    async fn apply_to_unknown_form_creates_nothing() {
        let router = test_router();
        let company = Uuid::new_v4();
        create_job(&router, company).await;

        let (status, body) = send(&router, apply_request("no-such-form", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "JOB_NOT_FOUND");

        let (_, stats) = send(
            &router,
            Request::get("/api/stats")
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(stats["applications_received"], 0);
    }

    #[tokio::test]
    async fn premature_accept_is_a_conflict() {
        let router = test_router();
        let company = Uuid::new_v4();
        let form_id = create_job(&router, company).await;

        let (_, body) = send(&router, apply_request(&form_id, None)).await;
        let candidate_id = body["applicationId"].as_str().unwrap().to_string();

        let (status, body) = send(
            &router,
            Request::put(format!("/api/candidates/{candidate_id}/status"))
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-company-id", company.to_string())
                .body(Body::from(json!({ "status": "accepted" }).to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

        // The record is untouched.
        let (_, body) = send(
            &router,
            Request::get(format!("/api/candidates/{candidate_id}"))
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(body["status"], "pending");
    }

    #[tokio::test]
    async fn company_routes_require_identity() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Request::get("/api/stats").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn deleting_a_job_keeps_its_applications() {
        let router = test_router();
        let company = Uuid::new_v4();
        let form_id = create_job(&router, company).await;

        let (_, body) = send(&router, apply_request(&form_id, None)).await;
        assert!(body["applicationId"].is_string());

        let (_, jobs) = send(
            &router,
            Request::get("/api/jobs")
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        let job_id = jobs[0]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &router,
            Request::delete(format!("/api/jobs/{job_id}"))
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // The submission survives for historical analytics; the dead job
        // shows up as N/A in the candidate list.
        let (_, stats) = send(
            &router,
            Request::get("/api/stats")
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(stats["jobs_posted"], 0);
        assert_eq!(stats["applications_received"], 1);

        let (_, candidates) = send(
            &router,
            Request::get("/api/candidates")
                .header("x-company-id", company.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(candidates[0]["jobTitle"], "N/A");
    }
}
