//! Body and path binders that fail with problem responses.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use regform_core::RegistrationId;

use crate::http::problem::{ApiProblem, ApiResult};

/// `Json<T>` whose missing-field and syntax failures become 400 problems.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiProblem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_problem(rejection)),
        }
    }
}

fn json_rejection_problem(rejection: JsonRejection) -> ApiProblem {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            ApiProblem::validation(rejection.body_text())
        }
        other => ApiProblem::with_status(other.status(), other.body_text()),
    }
}

/// Parses a registration id path segment.
pub fn parse_id(raw: &str) -> ApiResult<RegistrationId> {
    raw.trim()
        .parse::<RegistrationId>()
        .map_err(|_| ApiProblem::bad_request(format!("id must be an integer, got `{raw}`")))
}
