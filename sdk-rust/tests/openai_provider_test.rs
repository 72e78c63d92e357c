use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use relay_sdk::{
    openai::{OpenAIProvider, OpenAIProviderOptions},
    ImageGenerationInput, ImageSize, LanguageModelError, LanguageModelInput, Message,
    ModelProvider, ModelUsage,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

impl Recorded {
    fn push(&self, path: &str, headers: &HeaderMap, body: Value) {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), auth, body));
    }

    fn all(&self) -> Vec<(String, Option<String>, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn models(State(recorded): State<Recorded>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    recorded.push("/v1/models", &headers, Value::Null);
    if headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer sk-revoked") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "message": "Incorrect API key provided: sk-revoked.",
                    "type": "invalid_request_error",
                    "code": "invalid_api_key"
                }
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "object": "list",
            "data": [
                { "id": "gpt-4o-mini", "object": "model", "owned_by": "system" },
                { "id": "dall-e-2", "object": "model", "owned_by": "system" }
            ]
        })),
    )
}

async fn chat_completions(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    recorded.push("/v1/chat/completions", &headers, body.clone());
    if body["model"] == "missing-model" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": { "message": "The model `missing-model` does not exist", "type": "invalid_request_error" }
            })),
        );
    }
    if body["model"] == "refusing-model" {
        return (
            StatusCode::OK,
            Json(json!({
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": null, "refusal": "I can't help with that." } }]
            })),
        );
    }
    if body["model"] == "empty-model" {
        return (StatusCode::OK, Json(json!({ "choices": [] })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "hello", "refusal": null },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 9, "completion_tokens": 1, "total_tokens": 10 }
        })),
    )
}

async fn images(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    recorded.push("/v1/images/generations", &headers, body);
    (
        StatusCode::OK,
        Json(json!({
            "created": 1_700_000_000,
            "data": [{ "url": "https://images.example.com/sunset.png", "revised_prompt": "A sunset over the ocean" }]
        })),
    )
}

async fn start_server() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v1/models", get(models))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/images/generations", post(images))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), recorded)
}

fn provider(base_url: &str, api_key: &str) -> OpenAIProvider {
    OpenAIProvider::new(OpenAIProviderOptions {
        base_url: Some(base_url.to_string()),
        api_key: api_key.to_string(),
        ..Default::default()
    })
}

#[tokio::test]
async fn list_models_sends_bearer_token() {
    let (base_url, recorded) = start_server().await;

    let models = provider(&base_url, "sk-live")
        .list_models()
        .await
        .expect("list_models succeeds");

    let ids: Vec<_> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["gpt-4o-mini", "dall-e-2"]);

    let requests = recorded.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1.as_deref(), Some("Bearer sk-live"));
}

#[tokio::test]
async fn list_models_surfaces_upstream_error_message() {
    let (base_url, _) = start_server().await;

    let err = provider(&base_url, "sk-revoked")
        .list_models()
        .await
        .expect_err("revoked key is rejected");

    match err {
        LanguageModelError::StatusCode(status, message) => {
            assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Incorrect API key provided: sk-revoked.");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn generate_posts_messages_and_parses_choice() {
    let (base_url, recorded) = start_server().await;

    let response = provider(&base_url, "sk-live")
        .generate(LanguageModelInput {
            model: "gpt-4o-mini".to_string(),
            system_prompt: Some("Summarize the user's text.".to_string()),
            messages: vec![Message::user("A long text")],
            max_tokens: Some(150),
            temperature: Some(0.5),
            ..Default::default()
        })
        .await
        .expect("generate succeeds");

    assert_eq!(response.text, "hello");
    assert_eq!(
        response.usage,
        Some(ModelUsage {
            input_tokens: 9,
            output_tokens: 1
        })
    );

    let requests = recorded.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].2,
        json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "Summarize the user's text." },
                { "role": "user", "content": "A long text" }
            ],
            "max_completion_tokens": 150,
            "temperature": 0.5
        })
    );
}

#[tokio::test]
async fn generate_maps_not_found_to_status_error() {
    let (base_url, _) = start_server().await;

    let err = provider(&base_url, "sk-live")
        .generate(LanguageModelInput {
            model: "missing-model".to_string(),
            messages: vec![Message::user("hi")],
            ..Default::default()
        })
        .await
        .expect_err("unknown model fails");

    assert_eq!(
        err.upstream_message(),
        "The model `missing-model` does not exist"
    );
}

#[tokio::test]
async fn generate_reports_refusal_and_empty_choices() {
    let (base_url, _) = start_server().await;
    let provider = provider(&base_url, "sk-live");

    let err = provider
        .generate(LanguageModelInput {
            model: "refusing-model".to_string(),
            messages: vec![Message::user("hi")],
            ..Default::default()
        })
        .await
        .expect_err("refusal is an error");
    assert!(matches!(err, LanguageModelError::Refusal(ref msg) if msg == "I can't help with that."));

    let err = provider
        .generate(LanguageModelInput {
            model: "empty-model".to_string(),
            messages: vec![Message::user("hi")],
            ..Default::default()
        })
        .await
        .expect_err("no choices is an error");
    assert!(matches!(err, LanguageModelError::Invariant("openai", _)));
}

#[tokio::test]
async fn generate_image_requests_url_output() {
    let (base_url, recorded) = start_server().await;

    let response = provider(&base_url, "sk-live")
        .generate_image(
            ImageGenerationInput::new("A sunset over the ocean", ImageSize::Square256)
                .with_model("dall-e-2"),
        )
        .await
        .expect("generate_image succeeds");

    assert_eq!(response.images.len(), 1);
    assert_eq!(response.images[0].url, "https://images.example.com/sunset.png");
    assert_eq!(
        response.images[0].revised_prompt.as_deref(),
        Some("A sunset over the ocean")
    );

    let requests = recorded.all();
    assert_eq!(
        requests[0].2,
        json!({
            "prompt": "A sunset over the ocean",
            "model": "dall-e-2",
            "n": 1,
            "size": "256x256",
            "response_format": "url"
        })
    );
}

#[tokio::test]
async fn generate_image_rejects_zero_count_without_request() {
    let (base_url, recorded) = start_server().await;

    let mut input = ImageGenerationInput::new("A cat", ImageSize::Square512);
    input.n = 0;

    let err = provider(&base_url, "sk-live")
        .generate_image(input)
        .await
        .expect_err("zero images is invalid");

    assert!(matches!(err, LanguageModelError::InvalidInput(_)));
    assert!(recorded.all().is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = provider(&format!("http://{addr}/v1"), "sk-live")
        .list_models()
        .await
        .expect_err("nothing is listening");

    assert!(matches!(err, LanguageModelError::Transport(_)));
}
