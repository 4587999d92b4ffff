use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use physics_lab_core::config::API_KEY_ENV;

/// Used when an error renders to an empty message.
pub const FALLBACK_MESSAGE: &str = "Noma'lum xatolik";

pub const RATE_LIMITED_MESSAGE: &str = "So'rovlar soni limitdan oshdi. Iltimos, biroz kutib turing.";
pub const PAYMENT_REQUIRED_MESSAGE: &str = "Kredit tugadi. Iltimos, hisobni to'ldiring.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "AI xizmatida xatolik yuz berdi";

/// Every way a relay request can end without a stream. Display is the text sent to the caller.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{} is not configured", API_KEY_ENV)]
    MissingApiKey,

    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,

    #[error("{}", PAYMENT_REQUIRED_MESSAGE)]
    PaymentRequired,

    /// Status and body are for logs only; the caller sees the generic message.
    #[error("{}", UPSTREAM_FAILURE_MESSAGE)]
    Upstream { status: StatusCode, body: String },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            RelayError::MissingApiKey
            | RelayError::Upstream { .. }
            | RelayError::InvalidRequest(_)
            | RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for the `error` field, falling back to [`FALLBACK_MESSAGE`] when empty.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(serde_json::json!({ "error": self.message() }))).into_response()
    }
}
