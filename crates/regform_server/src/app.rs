//! Explicit route table and middleware stack.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use log::info;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::{
    http::{
        health::healthcheck,
        registrations::{
            create_registration, delete_registration, get_registration, list_registrations,
            update_registration,
        },
    },
    state::AppState,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(healthcheck))
        .route(
            "/registrations",
            get(list_registrations).post(create_registration),
        )
        .route(
            "/registrations/{id}",
            get(get_registration)
                .put(update_registration)
                .delete(delete_registration),
        )
        .layer(middleware::from_fn(log_requests))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_owned();

    let response = next.run(request).await;

    let status = if response.status().is_server_error() {
        "error"
    } else {
        "ok"
    };
    info!(
        "event=http_request module=api status={} method={} path={} status_code={} duration_ms={} request_id={}",
        status,
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis(),
        request_id
    );

    response
}
