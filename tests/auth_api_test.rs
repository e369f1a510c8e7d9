use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use placement_backend::{config::Config, routes, AppState};
use serde_json::{json, Value as JsonValue};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> Router {
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
    let config = Config {
        server_address: "127.0.0.1:0".into(),
        database_url,
        db_max_connections: 5,
        jwt_secret: "auth-api-test-secret".into(),
        jwt_ttl_hours: 24,
        uploads_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        max_avatar_bytes: 5 * 1024 * 1024,
        otp_ttl_minutes: 10,
        otp_webhook_url: None,
        auth_rps: 1000,
        cors_origins: Vec::new(),
    };
    routes::router(AppState::new(pool, config))
}

async fn post_json(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    let req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null))
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn register_login_and_profile() {
    let app = app().await;
    let email = format!("student_{}@example.com", Uuid::new_v4());

    let (status, user) = post_json(
        &app,
        "/api/auth/register",
        json!({ "name": "Student", "email": email, "password": "secret-1", "role": "farmer" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "farmer");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        json!({ "name": "Again", "email": email, "password": "secret-2", "role": "farmer" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": email, "password": "wrong-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "nobody@example.com", "password": "secret-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": email, "password": "secret-1", "role": "enterprise" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": email, "password": "secret-1", "role": "farmer" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let req = Request::get("/api/user/profile")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let profile: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(profile["email"], email);
    assert_eq!(profile["profileCompleted"], false);
    assert_eq!(profile["notifications"]["emailNotifications"], true);

    let req = Request::put("/api/user/profile")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "name": "Student", "location": "Pune", "phone": "98200" }).to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn forgot_password_for_unknown_email_is_404() {
    let app = app().await;
    let (status, body) = post_json(
        &app,
        "/api/auth/forgot-password",
        json!({ "email": format!("ghost_{}@example.com", Uuid::new_v4()) }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}
