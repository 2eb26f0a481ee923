//! Tests for the OpenAI-compatible reasoning service against a local mock
//! of the `chat/completions` endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_client::{AiClientError, AiScorer, OpenAiConfig, OpenAiReasoningService, Prompt, ReasoningService};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use catalog::{Difficulty, Workout};
use chrono::Utc;
use pipeline::{RecommendationRequest, Scorer, ScoringError};
use serde_json::{json, Value};
use tokio::net::TcpListener;

// ============================================================================
// Mock chat completions service
// ============================================================================

struct MockState {
    status: StatusCode,
    response: Value,
    /// (Authorization header, request body) of every call
    seen: Mutex<Vec<(Option<String>, Value)>>,
}

async fn chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen.lock().unwrap().push((auth, body));
    (state.status, Json(state.response.clone()))
}

/// Start a mock service on a random port
async fn start_mock_service(
    status: StatusCode,
    response: Value,
) -> (String, Arc<MockState>, tokio::task::JoinHandle<()>) {
    let state = Arc::new(MockState {
        status,
        response,
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock service");
    let addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock service failed");
    });

    (format!("http://{}/v1", addr), state, handle)
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn service_for(base_url: String, api_key: Option<&str>) -> OpenAiReasoningService {
    OpenAiReasoningService::new(OpenAiConfig {
        base_url,
        api_key: api_key.map(str::to_string),
        model: "gpt-4o-mini".to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build service")
}

fn prompt() -> Prompt {
    Prompt {
        system: "system".to_string(),
        user: "user".to_string(),
        expects_json: true,
    }
}

fn workouts() -> Vec<Workout> {
    ["w1", "w2"]
        .iter()
        .map(|id| Workout {
            id: id.to_string(),
            name: format!("Workout {id}"),
            description: "Test workout".to_string(),
            difficulty: Difficulty::Intermediate,
            duration: 30,
            muscle_groups: vec!["core".to_string()],
            equipment: vec![],
            instructions: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_complete_sends_bearer_auth_and_json_mode() {
    let (base_url, state, handle) =
        start_mock_service(StatusCode::OK, completion("{\"recommendations\":[]}")).await;
    let service = service_for(base_url, Some("sk-test"));

    let content = service.complete(&prompt()).await.unwrap();
    assert_eq!(content, "{\"recommendations\":[]}");

    let seen = state.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["messages"][0]["role"], "system");

    handle.abort();
}

#[tokio::test]
async fn test_no_api_key_sends_no_auth_header() {
    let (base_url, state, handle) = start_mock_service(StatusCode::OK, completion("yes")).await;
    let service = service_for(base_url, None);

    let answer = service.ping().await.unwrap();
    assert_eq!(answer, "yes");

    let seen = state.seen.lock().unwrap();
    assert_eq!(seen[0].0, None);
    assert!(seen[0].1.get("response_format").is_none());

    handle.abort();
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let (base_url, _state, handle) = start_mock_service(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "rate limited" } }),
    )
    .await;
    let service = service_for(base_url, Some("sk-test"));

    let err = service.complete(&prompt()).await.unwrap_err();
    assert!(matches!(err, AiClientError::Status { status: 429, .. }));

    handle.abort();
}

#[tokio::test]
async fn test_missing_content_is_empty_response() {
    let (base_url, _state, handle) =
        start_mock_service(StatusCode::OK, json!({ "choices": [] })).await;
    let service = service_for(base_url, None);

    let err = service.complete(&prompt()).await.unwrap_err();
    assert!(matches!(err, AiClientError::EmptyResponse));

    handle.abort();
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = service_for(format!("http://{}/v1", addr), None);
    let err = service.complete(&prompt()).await.unwrap_err();
    assert!(matches!(err, AiClientError::Connection(_)));
}

#[tokio::test]
async fn test_ai_scorer_end_to_end() {
    let reply = r#"{"workouts":[
        {"workoutId":"w2","score":88,"reasoning":"great match"},
        {"workoutId":"w1","score":72,"reasoning":"good fit"}
    ]}"#;
    let (base_url, _state, handle) = start_mock_service(StatusCode::OK, completion(reply)).await;
    let scorer = AiScorer::new(service_for(base_url, Some("sk-test")));

    let scored = scorer
        .score(&RecommendationRequest::new(workouts(), None))
        .await
        .unwrap();

    let ids: Vec<&str> = scored.iter().map(|c| c.workout_id.as_str()).collect();
    assert_eq!(ids, vec!["w2", "w1"]);

    handle.abort();
}

#[tokio::test]
async fn test_ai_scorer_maps_upstream_failure() {
    let (base_url, _state, handle) =
        start_mock_service(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let scorer = AiScorer::new(service_for(base_url, None));

    let result = scorer
        .score(&RecommendationRequest::new(workouts(), None))
        .await;
    assert!(matches!(result, Err(ScoringError::Upstream(_))));

    handle.abort();
}
