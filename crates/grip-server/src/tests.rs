use crate::discovery::HttpDiscovery;
use crate::*;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    routing::get,
    Json, Router,
};
use grip_core::config::{DiscoveryConfig, SkillConfig};
use grip_core::types::ApiAccess;
use grip_core::GripError;
use grip_router::{Dispatcher, EndpointDiscovery, StaticDiscovery};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use crate::state::AppState;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(discovery: Arc<dyn EndpointDiscovery>) -> Router {
    let dispatcher = Dispatcher::new(&SkillConfig::default(), discovery);
    app_with_state(AppState::new(dispatcher))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_skill(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/skill")
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn launch_envelope(api_endpoint: &str) -> Value {
    json!({
        "version": "1.0",
        "session": { "sessionId": "s1", "new": true, "attributes": {} },
        "context": { "System": { "apiEndpoint": api_endpoint, "apiAccessToken": "tok-1" } },
        "request": { "type": "LaunchRequest", "requestId": "req-launch" }
    })
}

/// Stand-in for the platform endpoint API. Requires `Bearer tok-1`.
async fn spawn_endpoint_api(endpoints: Value) -> String {
    let api = Router::new().route(
        "/v1/endpoints",
        get(move |headers: HeaderMap| {
            let endpoints = endpoints.clone();
            async move {
                let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
                if bearer != Some("Bearer tok-1") {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "denied" })));
                }
                (StatusCode::OK, Json(json!({ "endpoints": endpoints })))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api).await.unwrap();
    });
    format!("http://{}", addr)
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = test_app(Arc::new(StaticDiscovery::empty()));
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].is_u64());
    assert!(body["started_at"].is_string());
}

// ========== Skill Webhook ==========

#[tokio::test]
async fn test_skill_launch() {
    let app = test_app(Arc::new(StaticDiscovery::single("E1")));
    let (status, body) = send(app, post_skill(launch_envelope("").to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "1.0");
    assert_eq!(body["sessionAttributes"]["endpointId"], "E1");
    assert_eq!(body["sessionAttributes"]["duration"], 10);
    assert_eq!(body["response"]["shouldEndSession"], false);
    assert_eq!(
        body["response"]["outputSpeech"]["ssml"],
        "<speak>Welcome, you can start issuing commands.</speak>"
    );
    let directive = &body["response"]["directives"][0];
    assert_eq!(directive["type"], "CustomInterfaceController.StartEventHandler");
    assert_eq!(directive["token"], "req-launch");
}

#[tokio::test]
async fn test_skill_move_sends_control_directive() {
    let app = test_app(Arc::new(StaticDiscovery::empty()));
    let env = json!({
        "session": {
            "sessionId": "s1",
            "attributes": { "endpointId": "E1", "speed": 70, "token": "req-launch", "duration": 10 }
        },
        "request": {
            "type": "IntentRequest",
            "requestId": "req-2",
            "intent": {
                "name": "MoveIntent",
                "slots": {
                    "Direction": { "name": "Direction", "value": "forward" },
                    "Duration": { "name": "Duration", "value": "3" }
                }
            }
        }
    });
    let (status, body) = send(app, post_skill(env.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let directive = &body["response"]["directives"][0];
    assert_eq!(directive["type"], "CustomInterfaceController.SendDirective");
    assert_eq!(directive["header"]["namespace"], "Custom.Mindstorms.Gadget");
    assert_eq!(directive["endpoint"]["endpointId"], "E1");
    assert_eq!(
        directive["payload"],
        json!({ "type": "move", "direction": "forward", "duration": "3", "speed": 70 })
    );
}

#[tokio::test]
async fn test_skill_unknown_request_type_is_reflected() {
    let app = test_app(Arc::new(StaticDiscovery::empty()));
    let env = json!({
        "session": { "attributes": { "custom": "kept" } },
        "request": { "type": "Connections.Response", "requestId": "r" }
    });
    let (status, body) = send(app, post_skill(env.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionAttributes"], json!({ "custom": "kept" }));
    assert!(body["response"]["outputSpeech"]["ssml"]
        .as_str()
        .unwrap()
        .contains("Connections.Response"));
}

#[tokio::test]
async fn test_skill_malformed_json() {
    let app = test_app(Arc::new(StaticDiscovery::empty()));
    let (status, body) = send(app, post_skill("{ not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_skill_missing_request() {
    let app = test_app(Arc::new(StaticDiscovery::empty()));
    let (status, body) = send(app, post_skill(r#"{"session":{}}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

// ========== HTTP Discovery ==========

#[test]
fn test_endpoints_url() {
    assert_eq!(
        HttpDiscovery::endpoints_url("https://api.example.com/"),
        "https://api.example.com/v1/endpoints"
    );
    assert_eq!(
        HttpDiscovery::endpoints_url("https://api.example.com"),
        "https://api.example.com/v1/endpoints"
    );
}

#[tokio::test]
async fn test_http_discovery_lists_endpoints() {
    let base = spawn_endpoint_api(json!([
        { "endpointId": "amzn1.ask.endpoint.E1", "friendlyName": "EV3_Gripper" },
        { "endpointId": "amzn1.ask.endpoint.E2" }
    ]))
    .await;
    let discovery = HttpDiscovery::new(&DiscoveryConfig::default()).unwrap();
    let access = ApiAccess { api_endpoint: base, api_access_token: "tok-1".into() };

    let endpoints = discovery.list_connected_endpoints(&access).await.unwrap();
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0].endpoint_id, "amzn1.ask.endpoint.E1");
    assert_eq!(endpoints[0].friendly_name.as_deref(), Some("EV3_Gripper"));
    assert!(endpoints[1].friendly_name.is_none());
}

#[tokio::test]
async fn test_http_discovery_rejected_token() {
    let base = spawn_endpoint_api(json!([])).await;
    let discovery = HttpDiscovery::new(&DiscoveryConfig::default()).unwrap();
    let access = ApiAccess { api_endpoint: base, api_access_token: "wrong".into() };

    let err = discovery.list_connected_endpoints(&access).await.unwrap_err();
    assert!(matches!(err, GripError::Discovery(msg) if msg.contains("401")));
}

#[tokio::test]
async fn test_http_discovery_requires_api_endpoint() {
    let discovery = HttpDiscovery::new(&DiscoveryConfig::default()).unwrap();
    let err = discovery
        .list_connected_endpoints(&ApiAccess::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GripError::Discovery(_)));
}

#[tokio::test]
async fn test_launch_through_http_discovery() {
    let base = spawn_endpoint_api(json!([{ "endpointId": "E7" }])).await;
    let discovery = HttpDiscovery::new(&DiscoveryConfig::default()).unwrap();
    let app = test_app(Arc::new(discovery));

    let (status, body) = send(app, post_skill(launch_envelope(&base).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionAttributes"]["endpointId"], "E7");
    assert_eq!(body["sessionAttributes"]["token"], "req-launch");
}

#[tokio::test]
async fn test_launch_with_unreachable_api_apologizes() {
    let discovery = HttpDiscovery::new(&DiscoveryConfig { timeout_ms: 500 }).unwrap();
    let app = test_app(Arc::new(discovery));

    let (status, body) = send(app, post_skill(launch_envelope("http://127.0.0.1:9").to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["shouldEndSession"], false);
    assert!(body["response"]["outputSpeech"]["ssml"]
        .as_str()
        .unwrap()
        .contains("Sorry, I had trouble"));
    assert!(body["response"]["reprompt"].is_object());
    assert_eq!(body["sessionAttributes"], json!({}));
}

// ========== Error Mapping ==========

#[test]
fn test_malformed_envelope_maps_to_bad_request() {
    let err: error::ApiError = serde_json::from_str::<Value>("{").unwrap_err().into();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.code(), "bad_request");
    assert!(err.to_string().starts_with("malformed request envelope"));
}
