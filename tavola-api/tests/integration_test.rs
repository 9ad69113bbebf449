use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tavola_api::{app, AppState};
use tavola_core::{BusinessRules, FixedClock, InMemoryStore, UnconfiguredStore};
use tavola_shared::{Category, ContentItem, Country, NewReservation};
use tavola_store::app_config::RateLimitConfig;
use tavola_store::RedisClient;
use tower::ServiceExt;
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
}

fn memory_app(store: Arc<InMemoryStore>) -> Router {
    app(AppState::new(store, Arc::new(FixedClock::new(today())), BusinessRules::default(), "test"))
}

fn unconfigured_app() -> Router {
    app(AppState::new(
        Arc::new(UnconfiguredStore),
        Arc::new(FixedClock::new(today())),
        BusinessRules::default(),
        "test",
    ))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

fn reservation_body(party_size: Value, date: &str) -> Value {
    json!({
        "full_name": "Lucía Pérez",
        "phone": "+34 600 000 000",
        "email": "lucia@example.com",
        "party_size": party_size,
        "date": date,
        "occasion": "Birthday",
    })
}

fn content(slug: &str, content_type: &str) -> ContentItem {
    ContentItem {
        id: Uuid::new_v4(),
        title: format!("Title {}", slug),
        slug: slug.to_string(),
        description: None,
        body: Some("...".into()),
        content_type: content_type.to_string(),
        media_url: None,
        featured: false,
        views: 0,
        published_at: Some(Utc::now()),
        country_id: None,
        category_id: None,
        country: None,
        category: None,
    }
}

#[tokio::test]
async fn test_health_reports_store_configuration() {
    let (status, body) = send(unconfigured_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "not configured");
    assert_eq!(body["environment"], "test");

    let (_, body) = send(memory_app(Arc::new(InMemoryStore::new())), Method::GET, "/health", None).await;
    assert_eq!(body["store"], "configured");
}

#[tokio::test]
async fn test_countries_fallback_is_stable() {
    let (status, first) = send(unconfigured_app(), Method::GET, "/countries", None).await;
    let (_, second) = send(unconfigured_app(), Method::GET, "/countries", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!first.as_array().unwrap().is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_reservation_is_created_pending() {
    let store = Arc::new(InMemoryStore::new());
    let mut body = reservation_body(json!(4), "2030-06-20");
    body["status"] = json!("confirmed");

    let (status, body) = send(memory_app(store.clone()), Method::POST, "/reservations", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["reservation"]["status"], "pending");
    assert_eq!(body["reservation"]["party_size"], 4);
    assert!(body.get("simulated").is_none());
    assert_eq!(store.reservation_count().await, 1);
}

#[tokio::test]
async fn test_reservation_simulated_when_unconfigured() {
    let (status, body) = send(
        unconfigured_app(),
        Method::POST,
        "/reservations",
        Some(reservation_body(json!("2"), "2030-06-15")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["simulated"], true);
    assert_eq!(body["reservation"]["status"], "pending");
}

#[tokio::test]
async fn test_missing_fields_are_listed() {
    let store = Arc::new(InMemoryStore::new());
    let (status, body) = send(
        memory_app(store.clone()),
        Method::POST,
        "/reservations",
        Some(json!({ "full_name": "Ana", "phone": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_fields"], json!(["phone", "email", "party_size", "date"]));
    assert_eq!(body["required_fields"], json!(["full_name", "phone", "email", "party_size", "date"]));
    assert_eq!(store.reservation_count().await, 0);
}

#[tokio::test]
async fn test_past_date_wins_over_other_errors() {
    let mut body = reservation_body(json!(40), "2030-06-14");
    body["email"] = json!("bad-email");

    let (status, body) = send(unconfigured_app(), Method::POST, "/reservations", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Reservation date cannot be in the past");
}

#[tokio::test]
async fn test_party_size_bounds_are_inclusive() {
    for size in [0, 13] {
        let (status, body) = send(
            unconfigured_app(),
            Method::POST,
            "/reservations",
            Some(reservation_body(json!(size), "2030-06-20")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Party size must be between 1 and 12");
    }

    for size in [1, 12] {
        let (status, _) = send(
            unconfigured_app(),
            Method::POST,
            "/reservations",
            Some(reservation_body(json!(size), "2030-06-20")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_email_format() {
    let mut bad = reservation_body(json!(2), "2030-06-20");
    bad["email"] = json!("bad-email");
    let (status, body) = send(unconfigured_app(), Method::POST, "/reservations", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email format");

    let mut good = reservation_body(json!(2), "2030-06-20");
    good["email"] = json!("a@b.c");
    let (status, _) = send(unconfigured_app(), Method::POST, "/reservations", Some(good)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_malformed_json_is_a_json_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/reservations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = unconfigured_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_availability_near_capacity() {
    let store = Arc::new(InMemoryStore::new());
    let date = NaiveDate::from_ymd_opt(2030, 6, 20).unwrap();
    for _ in 0..4 {
        let reservation = NewReservation::new(
            "Guest".into(),
            "555".into(),
            "guest@example.com".into(),
            12,
            date,
            None,
            None,
        );
        store.seed_reservation(reservation.into_reservation(Uuid::new_v4(), Utc::now())).await;
    }

    let (status, body) =
        send(memory_app(store), Method::GET, "/reservations/availability/2030-06-20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    assert_eq!(body["occupied_seats"], 48);
    assert_eq!(body["remaining_seats"], 2);
    assert_eq!(body["max_capacity"], 50);
}

#[tokio::test]
async fn test_availability_rejects_bad_and_past_dates() {
    let (status, _) =
        send(unconfigured_app(), Method::GET, "/reservations/availability/tomorrow", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        send(unconfigured_app(), Method::GET, "/reservations/availability/2030-06-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert_eq!(body["message"], "Date unavailable (in the past)");
}

#[tokio::test]
async fn test_reservation_listing_filters_by_status() {
    let store = Arc::new(InMemoryStore::new());
    let app = memory_app(store.clone());
    send(app.clone(), Method::POST, "/reservations", Some(reservation_body(json!(2), "2030-06-20"))).await;
    let (_, created) =
        send(app.clone(), Method::POST, "/reservations", Some(reservation_body(json!(3), "2030-06-21"))).await;
    let id: Uuid = serde_json::from_value(created["reservation"]["id"].clone()).unwrap();
    assert!(store.set_reservation_status(id, tavola_shared::ReservationStatus::Confirmed).await);

    let (status, body) = send(app.clone(), Method::GET, "/reservations?status=confirmed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["reservations"][0]["party_size"], 3);

    let (_, body) = send(app.clone(), Method::GET, "/reservations?to=2030-06-20", None).await;
    assert_eq!(body["total"], 1);

    let (status, _) = send(app, Method::GET, "/reservations?status=archived", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_newsletter_upsert_last_write_wins() {
    let store = Arc::new(InMemoryStore::new());
    let app = memory_app(store.clone());

    let (status, _) =
        send(app.clone(), Method::POST, "/newsletter", Some(json!({ "email": "x@y.com", "name": "A" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        send(app, Method::POST, "/newsletter", Some(json!({ "email": "x@y.com", "name": "B" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscriber"]["name"], "B");
    assert_eq!(store.subscriber_count().await, 1);
}

#[tokio::test]
async fn test_newsletter_rejects_bad_email() {
    let (status, body) =
        send(unconfigured_app(), Method::POST, "/newsletter", Some(json!({ "email": "bad-email" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email format");

    let (status, body) = send(unconfigured_app(), Method::POST, "/newsletter", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is required");
}

#[tokio::test]
async fn test_content_by_slug_counts_views() {
    let store = Arc::new(InMemoryStore::new());
    store.add_content(content("paella", "recipe"), true).await;
    let app = memory_app(store);

    let (status, body) = send(app.clone(), Method::GET, "/content/paella", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["views"], 1);

    let (status, body) = send(app, Method::GET, "/content/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_content_type_envelope() {
    let store = Arc::new(InMemoryStore::new());
    for n in 0..3 {
        store.add_content(content(&format!("story-{}", n), "story"), true).await;
    }
    store.add_content(content("recipe-1", "recipe"), true).await;

    let (status, body) =
        send(memory_app(store.clone()), Method::GET, "/content/type/story?page=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"], json!({ "page": 1, "limit": 2, "total": 3 }));

    let (status, body) = send(memory_app(store), Method::GET, "/content/search/STORY", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn test_unconfigured_content_reads_are_empty() {
    let (status, body) = send(unconfigured_app(), Method::GET, "/content/featured", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(unconfigured_app(), Method::GET, "/content/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_backend_failure_passes_message_through() {
    let store = Arc::new(InMemoryStore::new());
    store.fail_with("relation \"reservations\" does not exist").await;

    let (status, body) = send(
        memory_app(store.clone()),
        Method::POST,
        "/reservations",
        Some(reservation_body(json!(2), "2030-06-20")),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "relation \"reservations\" does not exist");

    let (status, _) = send(memory_app(store), Method::GET, "/countries", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_store_diagnostic_endpoints() {
    let (status, body) = send(unconfigured_app(), Method::GET, "/store/test", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("not configured"));

    let (status, body) = send(unconfigured_app(), Method::GET, "/store/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configured"], false);

    let (status, body) =
        send(memory_app(Arc::new(InMemoryStore::new())), Method::GET, "/store/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = send(unconfigured_app(), Method::GET, "/nope/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn test_loosely_typed_fields_reach_validation() {
    let mut body = reservation_body(json!(2.5), "2030-06-14");
    body["phone"] = json!(600123456);
    let (status, body) = send(unconfigured_app(), Method::POST, "/reservations", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Reservation date cannot be in the past");

    let mut body = reservation_body(json!(4.0), "2030-06-20");
    body.as_object_mut().unwrap().remove("email");
    let (status, body) = send(unconfigured_app(), Method::POST, "/reservations", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_fields"], json!(["email"]));

    let (status, body) = send(
        unconfigured_app(),
        Method::POST,
        "/reservations",
        Some(reservation_body(json!(2.5), "2030-06-20")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Party size must be a whole number");

    let mut body = reservation_body(json!(4.0), "2030-06-20");
    body["phone"] = json!(600123456);
    let (status, body) = send(unconfigured_app(), Method::POST, "/reservations", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reservation"]["phone"], "600123456");
    assert_eq!(body["reservation"]["party_size"], 4);
}

#[tokio::test]
async fn test_countries_and_categories_are_active_and_ordered() {
    let store = Arc::new(InMemoryStore::new());
    for (name, code, active) in [("Peru", "PE", true), ("Japan", "JP", false), ("Italy", "IT", true)] {
        store
            .add_country(Country {
                id: Uuid::new_v4(),
                name: name.into(),
                code: code.into(),
                flag_emoji: None,
                active,
            })
            .await;
    }
    for (name, content_type, active) in [
        ("Stews", "recipe", true),
        ("Interviews", "story", true),
        ("Desserts", "recipe", true),
        ("Archive", "recipe", false),
    ] {
        store
            .add_category(Category {
                id: Uuid::new_v4(),
                name: name.into(),
                icon: None,
                content_type: content_type.into(),
                active,
            })
            .await;
    }
    let app = memory_app(store);

    let (status, body) = send(app.clone(), Method::GET, "/countries", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Italy", "Peru"]);

    let (status, body) = send(app, Method::GET, "/content/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Desserts", "Stews", "Interviews"]);
}

#[tokio::test]
async fn test_rate_limiter_fails_open_when_redis_is_down() {
    let redis = RedisClient::new("redis://127.0.0.1:1/").unwrap();
    let state = AppState::new(
        Arc::new(UnconfiguredStore),
        Arc::new(FixedClock::new(today())),
        BusinessRules::default(),
        "test",
    )
    .with_rate_limit(redis, RateLimitConfig { max_requests: 1, window_seconds: 60 });
    let app = app(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

    for _ in 0..3 {
        let (status, body) = send(app.clone(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
