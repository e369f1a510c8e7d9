pub mod auth;
pub mod company;
pub mod dsa;
pub mod game;
pub mod health;
pub mod session;
pub mod user;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    middleware::{
        auth::require_auth,
        cors::cors_layer,
        rate_limit::{rps_middleware, RateLimiter},
    },
    AppState,
};

/// Builds the full HTTP surface. Everything under `/api` except the auth
/// endpoints sits behind [`require_auth`].
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let auth_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/verify-otp", post(auth::verify_otp))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .layer(from_fn_with_state(
            RateLimiter::new(config.auth_rps),
            rps_middleware,
        ));

    // The multipart limit sits above the avatar cap so oversized files reach
    // the handler and get the size message instead of a bare 413.
    let avatar_body_limit = DefaultBodyLimit::max(config.max_avatar_bytes * 2);

    let protected_api = Router::new()
        .route(
            "/api/user/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route(
            "/api/user/upload-avatar",
            post(user::upload_avatar).layer(avatar_body_limit),
        )
        .route("/api/user/notifications", put(user::update_notifications))
        .route(
            "/api/sessions",
            get(session::list_sessions).post(session::create_session),
        )
        .route(
            "/api/sessions/:id",
            put(session::update_session).delete(session::delete_session),
        )
        .route(
            "/api/companies",
            get(company::list_companies).post(company::create_company),
        )
        .route(
            "/api/companies/:id",
            put(company::update_company).delete(company::delete_company),
        )
        .route(
            "/api/dsa/topics",
            get(dsa::list_topics).post(dsa::create_topic),
        )
        .route("/api/dsa/topics/:id", delete(dsa::delete_topic))
        .route("/api/dsa/topics/:id/questions", post(dsa::add_question))
        .route(
            "/api/dsa/topics/:id/questions/:question_id",
            delete(dsa::delete_question),
        )
        .route("/api/games", get(game::list_games).post(game::create_game))
        .route("/api/games/:id", delete(game::delete_game))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    tracing::info!(dir = %config.uploads_dir, "serving uploads");

    Router::new()
        .route("/health", get(health::health))
        .merge(auth_api)
        .merge(protected_api)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .with_state(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}
