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
        dsa_dto::{AddQuestionPayload, CreateTopicPayload, TopicResponse},
    },
    error::Result,
    extract::JsonBody,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/dsa/topics",
    request_body = CreateTopicPayload,
    responses(
        (status = 201, description = "Topic created", body = Json<TopicResponse>),
        (status = 403, description = "Permission denied")
    )
)]
#[axum::debug_handler]
pub async fn create_topic(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateTopicPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let topic = state.dsa_service.create_topic(payload, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(TopicResponse::from(topic))))
}

#[utoipa::path(
    get,
    path = "/api/dsa/topics",
    responses(
        (status = 200, description = "Topics with their questions", body = Vec<TopicResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_topics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let topics = state.dsa_service.list_topics().await?;
    let body: Vec<TopicResponse> = topics.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/dsa/topics/{id}/questions",
    params(
        ("id" = Uuid, Path, description = "Topic ID")
    ),
    request_body = AddQuestionPayload,
    responses(
        (status = 200, description = "Question added; returns the topic", body = Json<TopicResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Topic not found")
    )
)]
#[axum::debug_handler]
pub async fn add_question(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<AddQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let topic = state.dsa_service.add_question(id, payload, auth.user_id).await?;
    Ok(Json(TopicResponse::from(topic)))
}

#[utoipa::path(
    delete,
    path = "/api/dsa/topics/{id}/questions/{question_id}",
    params(
        ("id" = Uuid, Path, description = "Topic ID"),
        ("question_id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question removed; returns the topic", body = Json<TopicResponse>),
        (status = 404, description = "Topic not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let topic = state.dsa_service.delete_question(id, question_id).await?;
    Ok(Json(TopicResponse::from(topic)))
}

#[utoipa::path(
    delete,
    path = "/api/dsa/topics/{id}",
    params(
        ("id" = Uuid, Path, description = "Topic ID")
    ),
    responses(
        (status = 200, description = "Topic deleted", body = Json<MessageResponse>),
        (status = 403, description = "Permission denied")
    )
)]
#[axum::debug_handler]
pub async fn delete_topic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.dsa_service.delete_topic(id).await?;
    Ok(Json(MessageResponse::new("Topic deleted successfully")))
}
