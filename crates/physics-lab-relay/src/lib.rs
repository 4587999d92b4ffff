//! physics-lab-relay: the AI tutor chat relay.
//!
//! Forwards a conversation to a hosted chat-completion API with a fixed system prompt and
//! streams the upstream event stream back unchanged. Upstream 429/402 become localized
//! messages with the same status; anything else becomes a generic 500.

mod error;
pub mod handler;
pub mod pipe;
pub mod prompt;
pub mod upstream;

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN};
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use physics_lab_core::GatewayConfig;

pub use error::{
    RelayError, FALLBACK_MESSAGE, PAYMENT_REQUIRED_MESSAGE, RATE_LIMITED_MESSAGE,
    UPSTREAM_FAILURE_MESSAGE,
};
pub use prompt::{ChatMessage, ChatRequest, CompletionRequest, SYSTEM_PROMPT};
pub use upstream::{ByteStream, ChatUpstream, HttpUpstream, UpstreamReply};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Values the relay needs per request. Read once at startup and injected.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream bearer token; `None` makes every chat request fail with a configuration error.
    pub api_key: Option<String>,
    pub model: String,
}

pub struct RelayState {
    pub config: RelayConfig,
    pub upstream: Arc<dyn ChatUpstream>,
}

impl RelayState {
    pub fn new(config: RelayConfig, upstream: Arc<dyn ChatUpstream>) -> Self {
        Self { config, upstream }
    }

    /// HTTP upstream at `gateway.upstream_url`.
    pub fn from_gateway(gateway: &GatewayConfig, api_key: Option<String>) -> Self {
        Self::new(
            RelayConfig {
                api_key,
                model: gateway.model.clone(),
            },
            Arc::new(HttpUpstream::new(gateway.upstream_url.clone())),
        )
    }
}

/// Relay endpoint at `route` plus `/health`. Every response carries the CORS header set.
pub fn router(state: Arc<RelayState>, route: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(route, post(handler::chat).options(handler::preflight))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_request))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::debug!(
        target: "physics_lab::relay",
        %method,
        %path,
        status = %response.status(),
        "request handled"
    );
    response
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::{Method, StatusCode};
    use bytes::Bytes;
    use futures_util::stream::{self, StreamExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    const ROUTE: &str = "/functions/v1/physics-chat";

    /// Canned upstream that records what it was asked.
    struct FakeUpstream {
        status: StatusCode,
        chunks: Vec<&'static str>,
        calls: AtomicUsize,
        seen: Mutex<Option<(String, CompletionRequest)>>,
    }

    impl FakeUpstream {
        fn new(status: StatusCode, chunks: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                status,
                chunks,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatUpstream for FakeUpstream {
        async fn send(
            &self,
            api_key: &str,
            request: &CompletionRequest,
        ) -> Result<UpstreamReply, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some((api_key.to_string(), request.clone()));
            let body = stream::iter(
                self.chunks
                    .iter()
                    .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                    .collect::<Vec<_>>(),
            )
            .boxed();
            Ok(UpstreamReply {
                status: self.status,
                body,
            })
        }
    }

    fn app(api_key: Option<&str>, upstream: Arc<FakeUpstream>) -> Router {
        let state = RelayState::new(
            RelayConfig {
                api_key: api_key.map(str::to_string),
                model: "google/gemini-2.5-flash".to_string(),
            },
            upstream,
        );
        router(Arc::new(state), ROUTE)
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(ROUTE)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const HELLO: &str = r#"{"messages":[{"role":"user","content":"Tezlanish nima?"}]}"#;

    async fn json_body(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(res: &Response) {
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], CORS_ALLOW_ORIGIN);
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_HEADERS], CORS_ALLOW_HEADERS);
    }

    #[tokio::test]
    async fn test_success_streams_upstream_bytes_in_order() {
        let chunks = vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Tez\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lanish\"}}]}\n\n",
            "data: [DONE]\n\n",
        ];
        let upstream = FakeUpstream::new(StatusCode::OK, chunks.clone());
        let res = app(Some("key-123"), upstream.clone())
            .oneshot(post_chat(HELLO))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "text/event-stream");
        assert_cors(&res);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, chunks.concat().as_bytes());
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_receives_key_model_prompt_and_stream_flag() {
        let upstream = FakeUpstream::new(StatusCode::OK, vec!["data: [DONE]\n\n"]);
        let res = app(Some("key-123"), upstream.clone())
            .oneshot(post_chat(HELLO))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let (key, request) = upstream.seen.lock().unwrap().clone().unwrap();
        assert_eq!(key, "key-123");
        assert_eq!(request.model, "google/gemini-2.5-flash");
        assert!(request.stream);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].content, "Tezlanish nima?");
    }

    #[tokio::test]
    async fn test_rate_limited_maps_to_429_message() {
        let upstream = FakeUpstream::new(StatusCode::TOO_MANY_REQUESTS, vec!["upstream says slow down"]);
        let res = app(Some("k"), upstream).oneshot(post_chat(HELLO)).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_cors(&res);
        let json = json_body(res).await;
        assert_eq!(
            json,
            serde_json::json!({"error": "So'rovlar soni limitdan oshdi. Iltimos, biroz kutib turing."})
        );
    }

    #[tokio::test]
    async fn test_payment_required_maps_to_402_message() {
        let upstream = FakeUpstream::new(StatusCode::PAYMENT_REQUIRED, vec![]);
        let res = app(Some("k"), upstream).oneshot(post_chat(HELLO)).await.unwrap();
        assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
        let json = json_body(res).await;
        assert_eq!(
            json,
            serde_json::json!({"error": "Kredit tugadi. Iltimos, hisobni to'ldiring."})
        );
    }

    #[tokio::test]
    async fn test_other_upstream_failure_is_generic_500() {
        let upstream = FakeUpstream::new(StatusCode::SERVICE_UNAVAILABLE, vec!["internal stack trace"]);
        let res = app(Some("k"), upstream).oneshot(post_chat(HELLO)).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&res);
        let json = json_body(res).await;
        assert_eq!(json["error"], UPSTREAM_FAILURE_MESSAGE);
        assert!(!json.to_string().contains("stack trace"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_500_without_upstream_call() {
        let upstream = FakeUpstream::new(StatusCode::OK, vec!["data: [DONE]\n\n"]);
        let res = app(None, upstream.clone()).oneshot(post_chat(HELLO)).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&res);
        let json = json_body(res).await;
        assert_eq!(json["error"], "LOVABLE_API_KEY is not configured");
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_500_json_error() {
        let upstream = FakeUpstream::new(StatusCode::OK, vec![]);
        for body in ["not json", "{}", r#"{"messages":"nope"}"#] {
            let res = app(Some("k"), upstream.clone()).oneshot(post_chat(body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "body: {body}");
            let json = json_body(res).await;
            assert!(!json["error"].as_str().unwrap().is_empty());
        }
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_is_500_json_error() {
        let upstream = FakeUpstream::new(StatusCode::OK, vec![]);
        let content = "a".repeat(3 * 1024 * 1024);
        let body = serde_json::json!({"messages": [{"role": "user", "content": content}]}).to_string();
        let res = app(Some("k"), upstream.clone()).oneshot(post_chat(&body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&res);
        let json = json_body(res).await;
        assert!(!json["error"].as_str().unwrap().is_empty());
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_message_extras_and_structured_content_pass_through() {
        let upstream = FakeUpstream::new(StatusCode::OK, vec!["data: [DONE]\n\n"]);
        let body = r#"{"messages":[{"role":"user","name":"ali","content":[{"type":"text","text":"Kuch nima?"}]}]}"#;
        let res = app(Some("k"), upstream.clone()).oneshot(post_chat(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let (_, request) = upstream.seen.lock().unwrap().clone().unwrap();
        let sent = serde_json::to_value(&request.messages[1]).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"role":"user","name":"ali","content":[{"type":"text","text":"Kuch nima?"}]})
        );
    }

    #[tokio::test]
    async fn test_preflight_is_empty_200_even_without_key() {
        let upstream = FakeUpstream::new(StatusCode::OK, vec![]);
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri(ROUTE)
            .body(Body::empty())
            .unwrap();
        let res = app(None, upstream.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_cors(&res);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let upstream = FakeUpstream::new(StatusCode::OK, vec![]);
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = app(None, upstream).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_cors(&res);
    }
}
