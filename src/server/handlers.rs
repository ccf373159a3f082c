use super::{page, AppState};
use crate::{
    error::{Result, VisionError},
    models::{GenerationOutcome, GenerationRequest, InputImage},
};
use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    web, HttpRequest, HttpResponse, Responder,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub image: Option<UploadedImage>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedImage {
    pub filename: String,
    /// Base64, optionally as a `data:` URL.
    pub data: String,
}

impl GenerateBody {
    pub fn into_request(self) -> Result<GenerationRequest> {
        let mut request = GenerationRequest::new();
        if let Some(prompt) = self.prompt {
            request = request.with_prompt(prompt);
        }
        if let Some(upload) = self.image {
            request = request.with_image(InputImage::from_base64(&upload.filename, &upload.data)?);
        }
        Ok(request)
    }
}

pub async fn index(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page::render(&state.animations))
}

pub async fn healthz(state: web::Data<AppState>) -> impl Responder {
    let model = state.generator.model();
    let animations = state.animations.loaded_names();

    match state.generator.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "model": model,
            "animations": animations,
        })),
        Err(e) => {
            log::warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "model": model,
                "animations": animations,
                "error": e.to_string(),
            }))
        }
    }
}

fn respond(outcome: GenerationOutcome) -> HttpResponse {
    let status =
        StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(outcome)
}

/// Bodies that cannot be extracted still get a JSON failure the page can show.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let (code, error) = match &err {
        JsonPayloadError::Overflow { limit }
        | JsonPayloadError::OverflowKnownLength { limit, .. } => (
            413,
            format!("Request too large: uploads are limited to {} bytes", limit),
        ),
        other => {
            let e = VisionError::InvalidRequest(other.to_string());
            (e.status_code(), e.to_string())
        }
    };
    log::warn!("Rejected request body: {}", error);

    let response = respond(GenerationOutcome::Failure {
        code,
        error: error.clone(),
    });
    InternalError::from_response(error, response).into()
}

pub async fn animations(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.animations.as_ref())
}

pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateBody>,
) -> impl Responder {
    let request_id = Uuid::new_v4();

    let outcome = match body.into_inner().into_request() {
        Ok(request) => {
            log::info!(
                "[req:{}] generating (prompt: {}, image: {})",
                request_id,
                request.prompt().is_some(),
                request.image.as_ref().map_or(0, InputImage::size)
            );
            GenerationOutcome::from_result(state.generator.generate(&request).await)
        }
        Err(e) => GenerationOutcome::from_result(Err(e)),
    };

    match &outcome {
        GenerationOutcome::Success { text, .. } => {
            log::info!("[req:{}] done, {} chars", request_id, text.len())
        }
        GenerationOutcome::Failure { error, .. } => {
            log::error!("[req:{}] failed: {}", request_id, error)
        }
    }

    respond(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::VisionError,
        gemini::Generator,
        models::{image::tests::png_bytes, AnimationSet, Part},
        server::routes,
    };
    use actix_web::{test, App};
    use async_trait::async_trait;
    use base64::Engine;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    /// Records the shape of each request and answers with a canned result.
    struct StubGenerator {
        reply: std::result::Result<String, u16>,
        seen: Mutex<Vec<Vec<&'static str>>>,
    }

    impl StubGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<Vec<&'static str>> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            let kinds = request
                .parts()
                .iter()
                .map(|part| match part {
                    Part::Text(_) => "text",
                    Part::Image(_) => "image",
                })
                .collect();
            self.seen.lock().unwrap().push(kinds);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(VisionError::Api {
                    status: *status,
                    message: "quota exceeded".into(),
                }),
            }
        }

        async fn health_check(&self) -> Result<()> {
            match &self.reply {
                Ok(_) => Ok(()),
                Err(status) => Err(VisionError::Api {
                    status: *status,
                    message: "backend down".into(),
                }),
            }
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn png_base64() -> String {
        base64::engine::general_purpose::STANDARD.encode(png_bytes())
    }

    macro_rules! app {
        ($generator:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::new(
                        $generator,
                        AnimationSet::default(),
                    )))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_prompt_and_image_are_sanitized_end_to_end() {
        let stub = StubGenerator::replying("<p>A cat.</div>");
        let app = app!(stub.clone());

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({
                "prompt": "What is in this image?",
                "image": {"filename": "cat.png", "data": png_base64()},
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["text"], "<p>A cat.");
        assert_eq!(body["raw"], "<p>A cat.</div>");
        assert_eq!(stub.seen(), vec![vec!["text", "image"]]);
    }

    #[actix_web::test]
    async fn test_image_only_and_prompt_only() {
        let stub = StubGenerator::replying("ok");
        let app = app!(stub.clone());

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({"prompt": "", "image": {"filename": "a.jpg", "data": base64::engine::general_purpose::STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0])}}))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({"prompt": "describe"}))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        assert_eq!(stub.seen(), vec![vec!["image"], vec!["text"]]);
    }

    #[actix_web::test]
    async fn test_rejects_unsupported_upload() {
        let stub = StubGenerator::replying("unused");
        let app = app!(stub.clone());

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({"image": {"filename": "cat.gif", "data": png_base64()}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "failure");
        assert!(stub.seen().is_empty());
    }

    #[actix_web::test]
    async fn test_malformed_body_gets_json_failure() {
        let stub = StubGenerator::replying("unused");
        let app = app!(stub.clone());

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "failure");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request:"));
        assert!(stub.seen().is_empty());
    }

    #[actix_web::test]
    async fn test_oversized_body_is_413_json() {
        let req = test::TestRequest::post().uri("/api/generate").to_http_request();
        let err = json_error(
            JsonPayloadError::OverflowKnownLength {
                length: 32 * 1024 * 1024,
                limit: crate::server::MAX_BODY_BYTES,
            },
            &req,
        );
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "failure");
        assert!(body["error"].as_str().unwrap().contains("too large"));
    }

    #[actix_web::test]
    async fn test_generation_failure_is_reported() {
        let app = app!(StubGenerator::failing(429));

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({"prompt": "describe"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "API error: 429 - quota exceeded");
    }

    #[actix_web::test]
    async fn test_index_and_healthz() {
        let app = app!(StubGenerator::replying("unused"));

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(page::TITLE));

        let req = test::TestRequest::get().uri("/healthz").to_request();
        let health: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["model"], "stub");
        assert_eq!(health["animations"], json!([]));
    }

    #[actix_web::test]
    async fn test_healthz_reports_unreachable_backend() {
        let app = app!(StubGenerator::failing(500));

        let req = test::TestRequest::get().uri("/healthz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let health: Value = test::read_body_json(resp).await;
        assert_eq!(health["status"], "unavailable");
        assert_eq!(health["error"], "API error: 500 - backend down");
    }
}
