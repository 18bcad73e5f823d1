//! Axum route handlers for career recommendations.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, info};

use crate::careers::models::{CareerResponse, ProfileRequest};
use crate::careers::parser::parse_recommendations;
use crate::careers::prompts::{build_recommendation_prompt, system_prompt};
use crate::errors::AppError;
use crate::llm_client::MODEL;
use crate::state::AppState;

/// POST /recommend-career
///
/// Validates the profile, asks the completion API for three majors and returns
/// whatever the parser makes of the answer. Parser failures still come back as
/// 200 with an `error` body; the web client checks for `recommendations`.
pub async fn handle_recommend_career(
    State(state): State<AppState>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<CareerResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    info!("Received career recommendation request: {request:?}");

    let profile = request.validate().ok_or(AppError::MissingData)?;
    let prompt = build_recommendation_prompt(&profile);

    info!("Sending recommendation request to completion API (model: {MODEL})");
    let raw = state.llm.complete(&system_prompt(), &prompt).await?;
    debug!("Raw model response: {raw}");

    Ok(Json(parse_recommendations(&raw)))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{Config, DEFAULT_CORS_ORIGINS};
    use crate::llm_client::{CompletionProvider, LlmClient, LlmError};
    use crate::routes::build_router;
    use crate::state::AppState;

    enum Reply {
        Text(&'static str),
        Unavailable,
        Empty,
    }

    struct FakeProvider {
        reply: Reply,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl FakeProvider {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Unavailable => Err(LlmError::Api {
                    status: 503,
                    message: "upstream unavailable".to_string(),
                }),
                Reply::Empty => Err(LlmError::EmptyContent),
            }
        }
    }

    fn test_config() -> Config {
        Config {
            openrouter_api_key: "test-key".to_string(),
            openrouter_api_url: "http://127.0.0.1:9/api/v1/chat/completions".to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            port: 5000,
            rust_log: "info".to_string(),
        }
    }

    fn app_with(llm: Arc<dyn CompletionProvider>) -> Router {
        build_router(AppState {
            llm,
            config: test_config(),
        })
    }

    fn profile_body() -> Value {
        json!({
            "name": "Maya",
            "age": 18,
            "gender": "female",
            "interests": ["Science", "Healthcare"],
            "personalityTraits": ["Empathetic", "Patient"],
            "learningStyle": "Visual",
            "values": ["Helping others"]
        })
    }

    async fn post(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/recommend-career")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_return_400_without_outbound_call() {
        let cases = [
            ("interests", json!([])),
            ("interests", Value::Null),
            ("personalityTraits", json!([])),
            ("personalityTraits", Value::Null),
            ("learningStyle", json!("")),
            ("learningStyle", Value::Null),
            ("values", json!([])),
            ("values", Value::Null),
        ];
        for (field, missing) in cases {
            let provider = FakeProvider::new(Reply::Text("{}"));
            let mut body = profile_body();
            body[field] = missing.clone();

            let (status, json) = post(app_with(provider.clone()), body.to_string()).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "field {field} = {missing}");
            assert_eq!(json, json!({"error": "Missing required data"}));
            assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_absent_fields_return_400() {
        let provider = FakeProvider::new(Reply::Text("{}"));
        let body = json!({"name": "Maya"}).to_string();

        let (status, json) = post(app_with(provider.clone()), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "Missing required data"}));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_returns_400() {
        let provider = FakeProvider::new(Reply::Text("{}"));
        let (status, json) = post(app_with(provider.clone()), "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_json_model_output_is_returned_verbatim() {
        let provider = FakeProvider::new(Reply::Text(
            r#"{"recommendations":[{"major":"Medicine","matchScore":90,"description":"d","whyMatch":"w","careers":["Doctor"],"advice":"Shadow at a Beirut hospital"}]}"#,
        ));

        let (status, json) = post(app_with(provider.clone()), profile_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["recommendations"][0]["major"], "Medicine");
        assert_eq!(json["recommendations"][0]["advice"], "Shadow at a Beirut hospital");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("18-year-old female named Maya"));
        assert!(prompt.contains("Science, Healthcare"));
    }

    #[tokio::test]
    async fn test_prose_model_output_is_extracted() {
        let provider = FakeProvider::new(Reply::Text(
            "Major: Nursing\nMatch Score: 80%\nCareers:\n- Nurse\n- Midwife",
        ));

        let (status, json) = post(app_with(provider), profile_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"recommendations": [{
                "major": "Nursing",
                "matchScore": 80,
                "description": "",
                "whyMatch": "",
                "careers": ["Nurse", "Midwife"]
            }]})
        );
    }

    #[tokio::test]
    async fn test_parse_failure_is_returned_with_200() {
        let provider = FakeProvider::new(Reply::Text("{\"recommendations\": [oops]}"));

        let (status, json) = post(app_with(provider), profile_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"error": "Failed to parse recommendations"}));
    }

    #[tokio::test]
    async fn test_upstream_error_status_returns_500_connect_message() {
        let provider = FakeProvider::new(Reply::Unavailable);

        let (status, json) = post(app_with(provider), profile_body().to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"error": "Failed to connect to API"}));
    }

    #[tokio::test]
    async fn test_network_failure_returns_500_connect_message() {
        let config = test_config();
        let client = LlmClient::new(config.openrouter_api_key, config.openrouter_api_url).unwrap();

        let (status, json) = post(app_with(Arc::new(client)), profile_body().to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"error": "Failed to connect to API"}));
    }

    #[tokio::test]
    async fn test_other_failure_exposes_message() {
        let provider = FakeProvider::new(Reply::Empty);

        let (status, json) = post(app_with(provider), profile_body().to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"error": "LLM returned empty content"}));
    }
}
