use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use calendar_api::{create_router, AppState, EventDatabase};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    router: Router,
    // Keeps the database file alive for the test.
    _dir: TempDir,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap().to_string()
    }
}

fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = EventDatabase::open(dir.path().join("calendar.db")).unwrap();
    TestApp {
        router: create_router(AppState::new(db)),
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn create(&self, title: &str, description: Option<&str>, date: &str) -> Value {
        let response = self
            .send(
                Method::POST,
                "/events",
                Some(json!({ "title": title, "description": description, "date": date })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }
}

#[tokio::test]
async fn health_reports_version() {
    let app = test_app();

    let response = app.send(Method::GET, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
    assert_eq!(response.json()["version"], calendar_core::core_version());
}

#[tokio::test]
async fn create_returns_created_event_and_location() {
    let app = test_app();

    let response = app
        .send(
            Method::POST,
            "/events",
            Some(json!({ "title": "Meeting", "description": "Standup", "date": "2024-03-05" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    let id = body["id"].as_i64().expect("id should be an integer");
    assert_eq!(body["title"], "Meeting");
    assert_eq!(body["description"], "Standup");
    assert_eq!(body["date"], "2024-03-05");
    assert_eq!(
        response.headers.get(header::LOCATION).unwrap(),
        format!("/events/{id}").as_str()
    );
}

#[tokio::test]
async fn create_without_description_stores_null() {
    let app = test_app();

    let response = app
        .send(
            Method::POST,
            "/events",
            Some(json!({ "title": "Lunch", "date": "2024-03-05" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["description"], Value::Null);
}

#[tokio::test]
async fn create_with_blank_or_missing_title_is_bad_request() {
    let app = test_app();

    for body in [
        json!({ "title": "", "date": "2024-03-05" }),
        json!({ "title": "   ", "date": "2024-03-05" }),
        json!({ "title": null, "date": "2024-03-05" }),
        json!({ "date": "2024-03-05" }),
    ] {
        let response = app.send(Method::POST, "/events", Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.error_message(),
            "Title cannot be null, empty or whitespace."
        );
    }

    let listed = app.send(Method::GET, "/events?date=2024-03-05", None).await;
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn create_with_oversized_title_is_bad_request() {
    let app = test_app();

    let response = app
        .send(
            Method::POST,
            "/events",
            Some(json!({ "title": "x".repeat(101), "date": "2024-03-05" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error_message().contains("100"));
}

#[tokio::test]
async fn title_with_nul_character_is_bad_request() {
    let app = test_app();

    let created = app
        .send(
            Method::POST,
            "/events",
            Some(json!({ "title": "\0Meeting", "date": "2024-03-05" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);

    let existing = app.create("Meeting", None, "2024-03-05").await;
    let updated = app
        .send(
            Method::PUT,
            &format!("/events/{}", existing["id"]),
            Some(json!({ "title": "\0y" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::BAD_REQUEST);

    let listed = app.send(Method::GET, "/events?date=2024-03-05", None).await;
    assert_eq!(listed.json(), json!([existing]));
}

#[tokio::test]
async fn create_with_malformed_body_is_bad_request() {
    let app = test_app();

    let missing_date = app
        .send(Method::POST, "/events", Some(json!({ "title": "No date" })))
        .await;
    assert_eq!(missing_date.status, StatusCode::BAD_REQUEST);

    let bad_date = app
        .send(
            Method::POST,
            "/events",
            Some(json!({ "title": "Bad date", "date": "2024-02-30" })),
        )
        .await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_by_date_returns_only_matching_events() {
    let app = test_app();
    let created = app.create("Meeting", Some("Standup"), "2024-03-05").await;
    app.create("Other day", None, "2024-03-06").await;

    let response = app.send(Method::GET, "/events?date=2024-03-05", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([created]));
}

#[tokio::test]
async fn list_by_date_without_matches_is_empty_array() {
    let app = test_app();

    let response = app.send(Method::GET, "/events?date=2030-01-01", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn list_by_month_returns_distinct_dates() {
    let app = test_app();
    app.create("a", None, "2024-03-05").await;
    app.create("b", None, "2024-03-05").await;
    app.create("c", None, "2024-03-20").await;
    app.create("d", None, "2024-04-01").await;

    let response = app
        .send(Method::GET, "/events?year=2024&month=3", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!(["2024-03-05", "2024-03-20"]));
}

#[tokio::test]
async fn list_prefers_date_when_both_modes_are_given() {
    let app = test_app();
    let created = app.create("a", None, "2024-03-05").await;

    let response = app
        .send(
            Method::GET,
            "/events?date=2024-03-05&year=2024&month=3",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([created]));
}

#[tokio::test]
async fn list_without_mode_is_bad_request() {
    let app = test_app();

    for uri in ["/events", "/events?month=3", "/events?year=2024"] {
        let response = app.send(Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.error_message(),
            "You must query by either a date or month."
        );
    }
}

#[tokio::test]
async fn list_with_invalid_parameters_is_bad_request() {
    let app = test_app();

    for uri in [
        "/events?date=not-a-date",
        "/events?year=2024&month=13",
        "/events?year=2024&month=march",
    ] {
        let response = app.send(Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn update_replaces_title_and_description_but_not_date() {
    let app = test_app();
    let created = app.create("Draft", Some("notes"), "2024-03-05").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .send(
            Method::PUT,
            &format!("/events/{id}"),
            Some(json!({ "title": "Final", "description": null, "date": "1999-01-01" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "id": id, "title": "Final", "description": null, "date": "2024-03-05" })
    );

    let listed = app.send(Method::GET, "/events?date=2024-03-05", None).await;
    assert_eq!(listed.json(), json!([response.json()]));
}

#[tokio::test]
async fn update_missing_event_is_not_found() {
    let app = test_app();

    let response = app
        .send(Method::PUT, "/events/999", Some(json!({ "title": "Nope" })))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "Could not find event");
}

#[tokio::test]
async fn update_with_blank_title_is_bad_request_and_keeps_record() {
    let app = test_app();
    let created = app.create("Keep", Some("me"), "2024-03-05").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .send(
            Method::PUT,
            &format!("/events/{id}"),
            Some(json!({ "title": "  ", "description": "changed" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let listed = app.send(Method::GET, "/events?date=2024-03-05", None).await;
    assert_eq!(listed.json(), json!([created]));
}

#[tokio::test]
async fn delete_succeeds_once_then_is_not_found() {
    let app = test_app();
    let created = app.create("Once", None, "2024-03-05").await;
    let uri = format!("/events/{}", created["id"]);

    let first = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body.is_empty());

    let second = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);

    let listed = app.send(Method::GET, "/events?date=2024-03-05", None).await;
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = test_app();

    let response = app.send(Method::DELETE, "/events/abc", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cors_allows_browser_origins() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/events?date=2024-03-05")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
