//! Response envelope and error mapping
//!
//! Every endpoint answers with the same JSON shape: `success` plus either
//! `source` and `data`, or `error`. Parameter problems map to 400, an
//! exhausted fetch chain to 500; nothing else leaks out as a raw error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::AllStrategiesFailed;
use crate::extract::Payload;
use crate::pipeline::DataSource;

/// The uniform response wrapper. Fields that do not apply are omitted, so a
/// failure body is exactly `{"success":false,"error":"..."}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful answer; `source` says whether the payload was cached.
    #[must_use]
    pub fn success(source: DataSource, data: T) -> Self {
        Self {
            success: true,
            source: Some(source),
            data: Some(data),
            error: None,
        }
    }

    /// Successful answer for payloads with no fetch provenance, such as the
    /// service index.
    #[must_use]
    pub fn bare(data: T) -> Self {
        Self {
            success: true,
            source: None,
            data: Some(data),
            error: None,
        }
    }

    /// Failure answer; the only place an error string reaches a caller.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            source: None,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// What an endpoint can answer with besides data.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required query parameter was absent or blank.
    #[error("{0} parameter required")]
    MissingParam(&'static str),
    /// A parameter was present but unusable.
    #[error("invalid {name} parameter: {reason}")]
    InvalidParam { name: &'static str, reason: String },
    /// Every fetch strategy failed; the upstream site is unreachable.
    #[error(transparent)]
    Upstream(#[from] AllStrategiesFailed),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) | ApiError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(err) => error!("Request failed: {err}"),
            rejected => warn!("Rejected request: {rejected}"),
        }

        let body: Envelope<Payload> = Envelope::failure(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
