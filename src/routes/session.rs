use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        auth_dto::MessageResponse,
        session_dto::{SessionListQuery, SessionPayload, SessionResponse},
    },
    error::Result,
    extract::JsonBody,
    middleware::auth::AuthUser,
    models::session::StatusFilter,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/sessions",
    params(
        ("status" = Option<String>, Query, description = "Upcoming or Past; anything else lists all")
    ),
    responses(
        (status = 200, description = "Sessions ordered by date", body = Vec<SessionResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<impl IntoResponse> {
    let filter = StatusFilter::from_query(query.status.as_deref());
    let sessions = state.session_service.list(filter).await?;
    let body: Vec<SessionResponse> = sessions.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = SessionPayload,
    responses(
        (status = 201, description = "Session created", body = Json<SessionResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Permission denied")
    )
)]
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<SessionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state.session_service.create(payload, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = SessionPayload,
    responses(
        (status = 200, description = "Session updated", body = Json<SessionResponse>),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<SessionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state.session_service.update(id, payload).await?;
    Ok(Json(SessionResponse::from(session)))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session deleted", body = Json<MessageResponse>)
    )
)]
#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.session_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Session deleted successfully")))
}
