//! `application/problem+json` error responses.
//!
//! # Invariants
//! - Conflicts on rows that still exist are reported as 500, never retried.
//! - Every 5xx problem is logged with its correlation id.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use regform_core::{RegistrationId, RegistrationValidationError, RepoError};
use serde::Serialize;
use uuid::Uuid;

pub type ApiResult<T> = Result<T, ApiProblem>;

#[derive(Debug)]
pub struct ApiProblem {
    status: StatusCode,
    title: &'static str,
    detail: String,
    kind: &'static str,
    correlation_id: String,
}

impl ApiProblem {
    pub fn from_repo(error: RepoError) -> Self {
        match error {
            RepoError::Validation(err) => Self::from_validation(err),
            RepoError::NotFound(id) => Self::not_found(id),
            RepoError::Conflict(id) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Concurrency conflict",
                "conflict",
                format!("registration {id} was changed by another writer"),
            ),
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage error",
                "storage",
                other.to_string(),
            ),
        }
    }

    pub fn from_validation(error: RegistrationValidationError) -> Self {
        Self::validation(error.to_string())
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "validation",
            detail,
        )
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad request", "bad-request", detail)
    }

    pub fn not_found(id: RegistrationId) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Not found",
            "not-found",
            format!("registration {id} does not exist"),
        )
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "internal",
            detail,
        )
    }

    pub(crate) fn with_status(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::new(status, "Unprocessable request", "request", detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn new(
        status: StatusCode,
        title: &'static str,
        kind: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
            kind,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    status: u16,
    detail: String,
    correlation_id: String,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                "event=http_problem module=api status=error status_code={} kind={} correlation_id={} detail={}",
                self.status.as_u16(),
                self.kind,
                self.correlation_id,
                self.detail
            );
        }

        let payload = ProblemDetails {
            kind: format!("about:blank#{}", self.kind),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            correlation_id: self.correlation_id,
        };

        let mut response = (self.status, Json(payload)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}
