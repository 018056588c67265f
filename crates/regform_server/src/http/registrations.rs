//! Registration collection handlers.
//!
//! # Invariants
//! - Update never touches the store when path and body ids disagree.
//! - Payloads are bound and validated before the store lock is taken.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use regform_core::Registration;

use crate::{
    http::{
        extract::{parse_id, ApiJson},
        problem::{ApiProblem, ApiResult},
    },
    state::AppState,
};

pub const COLLECTION_PATH: &str = "/registrations";

pub async fn list_registrations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Registration>>> {
    let registrations = state
        .run(|service| service.list_registrations())
        .await?;
    Ok(Json(registrations))
}

pub async fn get_registration(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Registration>> {
    let id = parse_id(&raw_id)?;
    let found = state
        .run(move |service| service.get_registration(id))
        .await?;

    found.map(Json).ok_or_else(|| ApiProblem::not_found(id))
}

pub async fn create_registration(
    State(state): State<AppState>,
    ApiJson(registration): ApiJson<Registration>,
) -> ApiResult<Response> {
    registration
        .validate()
        .map_err(ApiProblem::from_validation)?;

    let created = state
        .run(move |service| service.create_registration(&registration))
        .await?;
    let location = format!("{COLLECTION_PATH}/{}", created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

pub async fn update_registration(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(registration): ApiJson<Registration>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    if registration.id != id {
        return Err(ApiProblem::bad_request(format!(
            "body id {} does not match path id {id}",
            registration.id
        )));
    }
    registration
        .validate()
        .map_err(ApiProblem::from_validation)?;

    state
        .run(move |service| service.update_registration(&registration))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_registration(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    state
        .run(move |service| service.delete_registration(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
