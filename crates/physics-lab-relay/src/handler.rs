//! Chat relay endpoint.
//!
//! POST: parse `{messages}`, prepend the tutor prompt, forward once with `stream: true`,
//! then either pipe the event stream back or answer with a single JSON `{error}`.
//! OPTIONS: empty 200. The CORS header set is added to every response by [`crate::router`].

use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::error::RelayError;
use crate::pipe;
use crate::prompt::{ChatRequest, CompletionRequest};
use crate::RelayState;

/// Body rejections (size limit, broken stream) take the same `{error}` path as parse failures.
pub async fn chat(
    State(state): State<Arc<RelayState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(body) => relay_chat(&state, &body).await,
        Err(rejection) => Err(RelayError::InvalidRequest(rejection.body_text())),
    };
    match result {
        Ok(response) => response,
        Err(e) => {
            match &e {
                RelayError::RateLimited | RelayError::PaymentRequired => {
                    tracing::warn!(target: "physics_lab::relay", status = %e.status(), "upstream refused chat")
                }
                _ => tracing::error!(target: "physics_lab::relay", error = %e, "chat relay failed"),
            }
            e.into_response()
        }
    }
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Core of the relay; at most one upstream call, never retried.
pub async fn relay_chat(state: &RelayState, body: &[u8]) -> Result<Response, RelayError> {
    let request: ChatRequest =
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidRequest(e.to_string()))?;

    let api_key = state
        .config
        .api_key
        .as_deref()
        .ok_or(RelayError::MissingApiKey)?;

    tracing::debug!(
        target: "physics_lab::relay",
        messages = request.messages.len(),
        model = %state.config.model,
        "forwarding chat upstream"
    );

    let completion = CompletionRequest::streaming(&state.config.model, request.messages);
    let reply = state.upstream.send(api_key, &completion).await?;

    let status = reply.status;
    if status.is_success() {
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/event-stream")],
            pipe::relay_body(reply.body),
        )
            .into_response());
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(RelayError::RateLimited);
    }
    if status == StatusCode::PAYMENT_REQUIRED {
        return Err(RelayError::PaymentRequired);
    }

    let body = reply.into_text().await;
    tracing::error!(
        target: "physics_lab::relay",
        %status,
        body = %body,
        "AI gateway error"
    );
    Err(RelayError::Upstream { status, body })
}
