use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use placement_backend::{
    config::Config,
    dto::auth_dto::RegisterPayload,
    routes,
    services::user_service::UserService,
    utils::time::ManualClock,
    AppState,
};
use serde_json::{json, Value as JsonValue};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;
use uuid::Uuid;

async fn setup_pool() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

fn config(database_url: String) -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url,
        db_max_connections: 5,
        jwt_secret: "session-api-test-secret".into(),
        jwt_ttl_hours: 24,
        uploads_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        max_avatar_bytes: 5 * 1024 * 1024,
        otp_ttl_minutes: 10,
        otp_webhook_url: None,
        auth_rps: 1000,
        cors_origins: Vec::new(),
    }
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null))
}

async fn login(app: &Router, email: &str, password: &str, role: &str) -> String {
    let (status, body) = call(
        app,
        Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": email, "password": password, "role": role }).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["role"], role);
    body["token"].as_str().expect("token").to_string()
}

async fn create_session(app: &Router, token: &str, title: &str, at: DateTime<Utc>) -> JsonValue {
    let (status, body) = call(
        app,
        Request::post("/api/sessions")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "title": title,
                    "description": "Placement prep",
                    "dateTime": at.to_rfc3339(),
                    "meetLink": "https://meet.example.com/prep"
                })
                .to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

async fn list(app: &Router, token: &str, status: &str) -> Vec<JsonValue> {
    let uri = if status.is_empty() {
        "/api/sessions".to_string()
    } else {
        format!("/api/sessions?status={}", status)
    };
    let (code, body) = call(
        app,
        Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    body.as_array().cloned().unwrap_or_default()
}

fn find<'a>(items: &'a [JsonValue], id: &JsonValue) -> Option<&'a JsonValue> {
    items.iter().find(|s| &s["id"] == id)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn session_status_lifecycle() {
    let pool = setup_pool().await;
    let database_url = std::env::var("DATABASE_URL").unwrap();
    let clock = ManualClock::new(Utc::now());
    let app = routes::router(AppState::with_clock(
        pool.clone(),
        config(database_url),
        Arc::new(clock.clone()),
    ));

    let email = format!("mentor_{}@example.com", Uuid::new_v4());
    UserService::new(pool.clone())
        .register(RegisterPayload {
            name: "Mentor".into(),
            email: email.clone(),
            password: "mentor-pass".into(),
            role: "enterprise".into(),
        })
        .await
        .expect("register");
    let token = login(&app, &email, "mentor-pass", "enterprise").await;

    let now = Utc::now();
    let soon = create_session(&app, &token, "Soon", now + Duration::hours(1)).await;
    assert_eq!(soon["status"], "Upcoming");
    assert_eq!(soon["isActive"], true);

    let past = create_session(&app, &token, "Yesterday", now - Duration::days(1)).await;
    assert_eq!(past["status"], "Past");
    assert_eq!(past["isActive"], false);

    let later = create_session(&app, &token, "Later", now + Duration::hours(2)).await;

    let upcoming = list(&app, &token, "Upcoming").await;
    assert!(find(&upcoming, &soon["id"]).is_some());
    assert!(find(&upcoming, &later["id"]).is_some());
    assert!(find(&upcoming, &past["id"]).is_none());
    let dates: Vec<&str> = upcoming
        .iter()
        .map(|s| s["dateTime"].as_str().unwrap_or_default())
        .collect();
    let parsed: Vec<DateTime<Utc>> = dates
        .iter()
        .map(|d| DateTime::parse_from_rfc3339(d).unwrap().with_timezone(&Utc))
        .collect();
    assert!(parsed.windows(2).all(|w| w[0] <= w[1]), "ascending by date");
    assert!(parsed.iter().all(|d| *d > clock_now(&clock)));

    // move past "Soon" without re-saving it
    clock.set(now + Duration::hours(1) + Duration::minutes(1));

    let upcoming = list(&app, &token, "Upcoming").await;
    assert!(find(&upcoming, &soon["id"]).is_none());
    assert!(find(&upcoming, &later["id"]).is_some());

    let past_list = list(&app, &token, "Past").await;
    let stale = find(&past_list, &soon["id"]).expect("listed as past");
    assert_eq!(stale["status"], "Upcoming");

    let everything = list(&app, &token, "whatever").await;
    assert!(find(&everything, &soon["id"]).is_some());
    assert!(find(&everything, &past["id"]).is_some());

    // re-saving recomputes the stored status against the moved clock
    let (code, resaved) = call(
        &app,
        Request::put(format!("/api/sessions/{}", soon["id"].as_str().unwrap()))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "title": "Soon",
                    "description": "Placement prep",
                    "dateTime": soon["dateTime"],
                    "meetLink": "https://meet.example.com/prep"
                })
                .to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(resaved["status"], "Past");
    assert_eq!(resaved["isActive"], false);

    let (code, _) = call(
        &app,
        Request::delete(format!("/api/sessions/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
}

fn clock_now(clock: &ManualClock) -> DateTime<Utc> {
    use placement_backend::utils::time::Clock;
    clock.now()
}
