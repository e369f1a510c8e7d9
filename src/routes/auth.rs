use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Duration;
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{
            ForgotPasswordPayload, LoginPayload, LoginResponse, MessageResponse,
            RegisterPayload, ResetPasswordPayload, VerifyOtpPayload,
        },
        user_dto::UserResponse,
    },
    error::{Error, Result},
    extract::JsonBody,
    models::user::Role,
    services::token_service::Identity,
    AppState,
};

fn invalid_credentials() -> Error {
    Error::Unauthorized("Invalid credentials".to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "User registered", body = Json<UserResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Every failure collapses to the same 401 so callers cannot tell an unknown
/// email from a wrong password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token issued", body = Json<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(|_| invalid_credentials())?;

    let check = match state.user_service.verify(&payload.email, &payload.password).await {
        Ok(check) => check,
        Err(Error::NotFound(_)) => return Err(invalid_credentials()),
        Err(err) => return Err(err),
    };
    if !check.matches {
        tracing::info!(user_id = %check.user.id, "login rejected: wrong password");
        return Err(invalid_credentials());
    }

    let role = check.user.role()?;
    if let Some(requested) = payload.role.as_deref().filter(|r| !r.is_empty()) {
        if requested.parse::<Role>().ok() != Some(role) {
            tracing::info!(user_id = %check.user.id, requested = %requested, "login rejected: role mismatch");
            return Err(invalid_credentials());
        }
    }

    let token = state.tokens.issue_at(
        Identity {
            user_id: check.user.id,
            role,
        },
        state.clock.now(),
    )?;
    tracing::info!(user_id = %check.user.id, role = %role, "login succeeded");
    Ok(Json(LoginResponse { token, role }))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Reset code sent", body = Json<MessageResponse>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ForgotPasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let ttl_minutes = state.config.otp_ttl_minutes;
    let (user, otp) = state
        .user_service
        .issue_reset_code(&payload.email, Duration::minutes(ttl_minutes), state.clock.now())
        .await?;
    state
        .notification_service
        .send_reset_code(&user.email, &otp, ttl_minutes)
        .await?;
    Ok(Json(MessageResponse::new("OTP sent to your email")))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpPayload,
    responses(
        (status = 200, description = "Code accepted", body = Json<MessageResponse>),
        (status = 400, description = "Invalid or expired OTP")
    )
)]
#[axum::debug_handler]
pub async fn verify_otp(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VerifyOtpPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .user_service
        .check_reset_code(&payload.email, &payload.otp, state.clock.now())
        .await?;
    Ok(Json(MessageResponse::new("OTP verified successfully")))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Password replaced", body = Json<MessageResponse>),
        (status = 400, description = "Invalid or expired OTP")
    )
)]
#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ResetPasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .user_service
        .reset_password(
            &payload.email,
            &payload.otp,
            &payload.new_password,
            state.clock.now(),
        )
        .await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}
