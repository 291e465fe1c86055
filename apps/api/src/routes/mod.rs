pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

use crate::screening::handlers;
use crate::state::AppState;

/// Largest accepted request body (resume uploads).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/analyze-resume/", post(handlers::handle_analyze_resume))
        .route("/deep-dive-analysis/", post(handlers::handle_deep_dive))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// CORS for the configured browser origins. Credentials are allowed, so
/// methods and headers mirror the preflight request instead of using `*`.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::{AuthError, AuthVerifier, Identity};
    use crate::extraction::{ExtractionError, TextExtractor};
    use crate::llm_client::{GenerativeModel, LlmError};
    use crate::timeline::TimelineAnalyzer;

    const RESUME: &str = "Jane Doe\nInitech  Jan 2018 – Dec 2018\nGlobex  Aug 2019 – Dec 2020";

    struct AcceptToken(&'static str);

    #[async_trait]
    impl AuthVerifier for AcceptToken {
        async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
            if token == self.0 {
                Ok(Identity {
                    uid: "recruiter-1".to_string(),
                    email: None,
                })
            } else {
                Err(AuthError::InvalidToken("INVALID_ID_TOKEN".to_string()))
            }
        }
    }

    struct FixedText;

    #[async_trait]
    impl TextExtractor for FixedText {
        async fn extract(&self, _document: Bytes) -> Result<String, ExtractionError> {
            Ok(RESUME.to_string())
        }
    }

    struct EchoModel;

    #[async_trait]
    impl GenerativeModel for EchoModel {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            if prompt.contains("deep-dive") {
                Ok(r#"{"projectAnalyses": [], "potentialInconsistencies": []}"#.to_string())
            } else {
                Ok(r#"{"candidateName": "Jane Doe"}"#.to_string())
            }
        }
    }

    fn app() -> Router {
        build_router(AppState {
            llm: Arc::new(EchoModel),
            auth: Arc::new(AcceptToken("good-token")),
            extractor: Arc::new(FixedText),
            timeline: TimelineAnalyzer::default(),
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_request(content_type: &str, job_description: &str) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             %PDF-1.4 fake\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"job_description\"\r\n\r\n\
             {job_description}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/analyze-resume/")
            .header(header::AUTHORIZATION, "Bearer good-token")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_is_public() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Resume Analyzer API is running.");
    }

    #[tokio::test]
    async fn test_deep_dive_requires_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/deep-dive-analysis/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"resume_text": RESUME}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["detail"], "Bearer token not provided");
    }

    #[tokio::test]
    async fn test_deep_dive_rejects_bad_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/deep-dive-analysis/")
                    .header(header::AUTHORIZATION, "Bearer forged")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"resume_text": RESUME}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_deep_dive_returns_date_analysis() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/deep-dive-analysis/")
                    .header(header::AUTHORIZATION, "Bearer good-token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"resume_text": RESUME}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["projectAnalyses"], json!([]));
        assert_eq!(body["dateAnalysis"]["overlaps"], json!([]));
        assert_eq!(body["dateAnalysis"]["gaps"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_resume_full_flow() {
        let response = app()
            .oneshot(multipart_request("application/pdf", "Senior Rust Engineer"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["candidateName"], "Jane Doe");
        assert_eq!(body["rawResumeText"], RESUME);
        let gaps = body["dateAnalysis"]["gaps"].as_array().unwrap();
        assert_eq!(gaps.len(), 1);
        assert!(gaps[0].as_str().unwrap().contains("8 months"));
    }

    #[tokio::test]
    async fn test_analyze_resume_rejects_non_pdf() {
        let response = app()
            .oneshot(multipart_request("text/plain", "Senior Rust Engineer"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["detail"], "Invalid file type. Please upload a PDF.");
    }

    #[tokio::test]
    async fn test_analyze_resume_requires_job_description() {
        let response = app()
            .oneshot(multipart_request("application/pdf", "   "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        assert!(cors_layer(&["http://localhost:3000".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
