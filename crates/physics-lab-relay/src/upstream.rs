//! The chat-completion endpoint the relay forwards to.

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};

use crate::error::RelayError;
use crate::prompt::CompletionRequest;

/// Upstream body as it arrives, chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes, RelayError>>;

/// Status and still-unread body of an upstream reply.
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: ByteStream,
}

impl UpstreamReply {
    /// Drains the body into text. Only used for failed replies, which are small.
    pub async fn into_text(self) -> String {
        let mut buf = Vec::new();
        let mut body = self.body;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => buf.extend_from_slice(&bytes),
                Err(e) => {
                    tracing::debug!(target: "physics_lab::relay", error = %e, "upstream error body cut short");
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// One request, one reply. Implementations must not retry.
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    async fn send(&self, api_key: &str, request: &CompletionRequest) -> Result<UpstreamReply, RelayError>;
}

/// reqwest-backed upstream: bearer auth, JSON body, streamed reply.
pub struct HttpUpstream {
    client: reqwest::Client,
    url: String,
}

impl HttpUpstream {
    /// No client-side timeout; the transport defaults apply.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatUpstream for HttpUpstream {
    async fn send(&self, api_key: &str, request: &CompletionRequest) -> Result<UpstreamReply, RelayError> {
        let res = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        Ok(UpstreamReply {
            status: res.status(),
            body: res.bytes_stream().map_err(RelayError::from).boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ChatMessage;
    use axum::extract::State;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Option<(String, CompletionRequest)>>>;

    fn local_upstream(url: impl Into<String>) -> HttpUpstream {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpUpstream::with_client(client, url)
    }

    async fn fake_completions(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<CompletionRequest>,
    ) -> (StatusCode, [(&'static str, &'static str); 1], &'static str) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        *captured.lock().unwrap() = Some((auth, body));
        (
            StatusCode::OK,
            [("content-type", "text/event-stream")],
            "data: {\"choices\":[{\"delta\":{\"content\":\"Salom\"}}]}\n\ndata: [DONE]\n\n",
        )
    }

    async fn spawn_fake_gateway(captured: Captured) -> String {
        let app = Router::new()
            .route("/v1/chat/completions", post(fake_completions))
            .with_state(captured);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    #[tokio::test]
    async fn http_upstream_sends_bearer_json_and_streams_reply() {
        let captured: Captured = Arc::new(Mutex::new(None));
        let url = spawn_fake_gateway(Arc::clone(&captured)).await;
        let upstream = local_upstream(url);

        let request = CompletionRequest::streaming(
            "google/gemini-2.5-flash",
            vec![ChatMessage::new("user", "Salom")],
        );
        let reply = upstream.send("test-key", &request).await.unwrap();
        assert_eq!(reply.status, StatusCode::OK);
        let text = reply.into_text().await;
        assert!(text.starts_with("data: "));
        assert!(text.ends_with("data: [DONE]\n\n"));

        let (auth, seen) = captured.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer test-key");
        assert_eq!(seen, request);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let upstream = local_upstream("http://127.0.0.1:9/v1/chat/completions");
        let request = CompletionRequest::streaming("m", Vec::new());
        let err = upstream.send("k", &request).await.err().unwrap();
        assert!(matches!(err, RelayError::Transport(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
