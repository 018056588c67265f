use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use regform_core::db::open_db_in_memory;
use regform_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let conn = open_db_in_memory().expect("in-memory database should open");
    build_router(AppState::new(conn))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

async fn request_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(request)
        .await
        .expect("router should serve request");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();

    if body.is_empty() {
        return (status, Value::Null);
    }

    let value = serde_json::from_slice(&body).expect("body should be valid json");
    (status, value)
}

async fn create(app: &Router, name: &str) -> i64 {
    let (status, created) = request_json(
        app.clone(),
        json_request(
            "POST",
            "/registrations",
            json!({ "name": name, "email": format!("{name}@x.com"), "phone": "555", "age": 30 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_i64().expect("created id")
}

#[tokio::test]
async fn create_get_delete_lifecycle() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/registrations",
            json!({ "name": "A", "email": "a@x.com", "phone": "555", "age": 30 }),
        ))
        .await
        .expect("router should serve request");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/registrations/1")
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let created: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        created,
        json!({ "id": 1, "name": "A", "email": "a@x.com", "phone": "555", "age": 30 })
    );

    let (status, fetched) = request_json(app.clone(), empty_request("GET", "/registrations/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = request_json(app.clone(), empty_request("DELETE", "/registrations/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, problem) = request_json(app, empty_request("GET", "/registrations/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["status"], 404);
    assert_eq!(problem["title"], "Not found");
}

#[tokio::test]
async fn create_ignores_body_id() {
    let app = app();

    let (status, created) = request_json(
        app,
        json_request(
            "POST",
            "/registrations",
            json!({ "id": 77, "name": "A", "email": "a@x.com", "phone": "555", "age": 30 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn create_with_missing_or_blank_field_is_bad_request() {
    let app = app();

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "POST",
            "/registrations",
            json!({ "name": "A", "phone": "555", "age": 30 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Validation failed");

    let (status, _) = request_json(
        app.clone(),
        json_request(
            "POST",
            "/registrations",
            json!({ "name": "  ", "email": "a@x.com", "phone": "555", "age": 30 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = request_json(app, empty_request("GET", "/registrations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn list_returns_every_created_row() {
    let app = app();
    for name in ["a", "b", "c"] {
        create(&app, name).await;
    }

    let (status, listed) = request_json(app, empty_request("GET", "/registrations")).await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<_> = listed
        .as_array()
        .expect("list should be an array")
        .iter()
        .filter_map(|item| item["name"].as_str())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn update_replaces_row_and_returns_no_content() {
    let app = app();
    let id = create(&app, "a").await;

    let (status, body) = request_json(
        app.clone(),
        json_request(
            "PUT",
            &format!("/registrations/{id}"),
            json!({ "id": id, "name": "B", "email": "b@y.org", "phone": "777", "age": 41 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, fetched) =
        request_json(app, empty_request("GET", &format!("/registrations/{id}"))).await;
    assert_eq!(
        fetched,
        json!({ "id": id, "name": "B", "email": "b@y.org", "phone": "777", "age": 41 })
    );
}

#[tokio::test]
async fn update_with_mismatched_ids_is_bad_request_and_mutates_nothing() {
    let app = app();
    let first = create(&app, "a").await;
    let second = create(&app, "b").await;

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "PUT",
            &format!("/registrations/{first}"),
            json!({ "id": second, "name": "Z", "email": "z@x.com", "phone": "0", "age": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Bad request");

    for (id, name) in [(first, "a"), (second, "b")] {
        let (_, fetched) =
            request_json(app.clone(), empty_request("GET", &format!("/registrations/{id}")))
                .await;
        assert_eq!(fetched["name"], name);
    }
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let app = app();

    let (status, _) = request_json(
        app,
        json_request(
            "PUT",
            "/registrations/9",
            json!({ "id": 9, "name": "Z", "email": "z@x.com", "phone": "0", "age": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_missing_row_is_not_found() {
    let app = app();

    let (status, problem) = request_json(app, empty_request("DELETE", "/registrations/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["detail"], "registration 3 does not exist");
}

#[tokio::test]
async fn non_integer_id_is_bad_request() {
    let app = app();

    let (status, _) = request_json(app, empty_request("GET", "/registrations/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn problem_responses_use_problem_json_and_request_ids_propagate() {
    let app = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/registrations/5")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");

    let response = app
        .oneshot(empty_request("GET", "/registrations"))
        .await
        .unwrap();
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = request_json(app(), empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());
}
