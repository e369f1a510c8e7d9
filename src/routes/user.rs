use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    dto::user_dto::{
        AvatarResponse, UpdateNotificationsPayload, UpdateProfilePayload, UserResponse,
    },
    error::{Error, Result},
    extract::JsonBody,
    middleware::auth::AuthUser,
    models::user::is_known_soil_type,
    utils::token::generate_suffix,
    AppState,
};

pub const AVATAR_FIELD: &str = "avatar";
pub const ALLOWED_AVATAR_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "application/pdf"];
const TOO_LARGE: &str = "File size is too large. Max size is 5MB.";
const BAD_TYPE: &str = "Invalid file type. Only JPEG, PNG, GIF and PDF are allowed.";

#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Current user", body = Json<UserResponse>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_id(auth.user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Profile updated", body = Json<UserResponse>),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    let update = payload
        .into_complete()
        .ok_or_else(|| Error::BadRequest("All fields are required".to_string()))?;
    if !is_known_soil_type(&update.soil_type) {
        return Err(Error::BadRequest("Invalid soil type".to_string()));
    }
    let user = state.user_service.update_profile(auth.user_id, update).await?;
    tracing::info!(user_id = %user.id, "profile updated");
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/user/notifications",
    request_body = UpdateNotificationsPayload,
    responses(
        (status = 200, description = "Preferences updated", body = Json<UserResponse>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<UpdateNotificationsPayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .update_notifications(auth.user_id, payload.notifications)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Stores the uploaded file under the uploads directory and points the
/// user's avatar at it. The replaced file is removed; so is the new one if
/// the user vanished in the meantime.
#[utoipa::path(
    post,
    path = "/api/user/upload-avatar",
    responses(
        (status = 200, description = "Avatar stored", body = Json<AvatarResponse>),
        (status = 400, description = "Missing, oversized or unsupported file"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let max_bytes = state.config.max_avatar_bytes;
    let mut stored: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_AVATAR_TYPES.contains(&content_type.as_str()) {
            return Err(Error::BadRequest(BAD_TYPE.to_string()));
        }
        let original_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        if data.len() > max_bytes {
            return Err(Error::BadRequest(TOO_LARGE.to_string()));
        }

        let file_name = avatar_file_name(
            original_name.as_deref(),
            state.clock.now().timestamp_millis(),
            &generate_suffix(9),
        );
        tokio::fs::create_dir_all(&state.config.uploads_dir).await?;
        tokio::fs::write(Path::new(&state.config.uploads_dir).join(&file_name), &data).await?;
        stored = Some(file_name);
        break;
    }

    let file_name = stored.ok_or_else(|| Error::BadRequest("No file uploaded".to_string()))?;
    let new_path = Path::new(&state.config.uploads_dir).join(&file_name);

    let previous = match state.user_service.find_by_id(auth.user_id).await {
        Ok(Some(user)) => user.avatar,
        Ok(None) => {
            remove_quietly(&new_path).await;
            return Err(Error::NotFound("User not found".to_string()));
        }
        Err(err) => {
            remove_quietly(&new_path).await;
            return Err(err);
        }
    };

    let avatar_url = format!("/uploads/{}", file_name);
    match state.user_service.set_avatar(auth.user_id, &avatar_url).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            remove_quietly(&new_path).await;
            return Err(Error::NotFound("User not found".to_string()));
        }
        Err(err) => {
            remove_quietly(&new_path).await;
            return Err(err);
        }
    }

    if let Some(old) = stored_upload_path(&state.config.uploads_dir, &previous) {
        remove_quietly(&old).await;
    }

    tracing::info!(user_id = %auth.user_id, file = %file_name, "avatar updated");
    Ok((StatusCode::OK, Json(AvatarResponse { avatar_url })))
}

/// Body-limit rejections surface as the same 400 as an oversized file.
fn multipart_error(err: axum::extract::multipart::MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::BadRequest(TOO_LARGE.to_string())
    } else {
        Error::Multipart(err)
    }
}

/// `<millis>-<suffix><ext>`, keeping the lower-cased extension of the
/// uploaded name.
pub fn avatar_file_name(original: Option<&str>, millis: i64, suffix: &str) -> String {
    let ext = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("{}-{}{}", millis, suffix, ext)
}

/// Maps a stored avatar URL back to its file on disk. Only the final path
/// component is used.
pub fn stored_upload_path(uploads_dir: &str, avatar: &str) -> Option<PathBuf> {
    if avatar.is_empty() {
        return None;
    }
    let name = Path::new(avatar).file_name()?;
    Some(Path::new(uploads_dir).join(name))
}

async fn remove_quietly(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_keeps_lowercased_extension() {
        assert_eq!(
            avatar_file_name(Some("Me.PNG"), 1_700_000_000_000, "abc123xyz"),
            "1700000000000-abc123xyz.png"
        );
        assert_eq!(avatar_file_name(None, 1, "s"), "1-s");
        assert_eq!(avatar_file_name(Some("noext"), 1, "s"), "1-s");
    }

    #[test]
    fn stored_path_ignores_directories_in_url() {
        let path = stored_upload_path("./uploads", "/uploads/../../etc/passwd").unwrap();
        assert_eq!(path, Path::new("./uploads").join("passwd"));
        assert_eq!(
            stored_upload_path("./uploads", "/uploads/1-a.png").unwrap(),
            Path::new("./uploads").join("1-a.png")
        );
        assert!(stored_upload_path("./uploads", "").is_none());
    }

    #[test]
    fn only_images_and_pdf_are_accepted() {
        assert!(ALLOWED_AVATAR_TYPES.contains(&"image/png"));
        assert!(!ALLOWED_AVATAR_TYPES.contains(&"text/plain"));
    }
}
