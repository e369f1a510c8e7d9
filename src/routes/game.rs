use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        auth_dto::MessageResponse,
        game_dto::{CreateGamePayload, GameResponse},
    },
    error::Result,
    extract::JsonBody,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/games",
    request_body = CreateGamePayload,
    responses(
        (status = 201, description = "Game created", body = Json<GameResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Permission denied")
    )
)]
#[axum::debug_handler]
pub async fn create_game(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateGamePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let game = state.game_service.create(payload, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(GameResponse::from(game))))
}

#[utoipa::path(
    get,
    path = "/api/games",
    responses(
        (status = 200, description = "All games, newest first", body = Vec<GameResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_games(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let games = state.game_service.list().await?;
    let body: Vec<GameResponse> = games.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    delete,
    path = "/api/games/{id}",
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Game deleted", body = Json<MessageResponse>),
        (status = 403, description = "Permission denied")
    )
)]
#[axum::debug_handler]
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.game_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Game deleted successfully")))
}
