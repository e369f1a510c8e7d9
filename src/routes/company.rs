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
        company_dto::{CompanyListQuery, CompanyPayload, CompanyResponse},
    },
    error::{Error, Result},
    extract::JsonBody,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CompanyPayload,
    responses(
        (status = 201, description = "Company created", body = Json<CompanyResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Permission denied")
    )
)]
#[axum::debug_handler]
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.create(payload, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}

#[utoipa::path(
    get,
    path = "/api/companies",
    params(
        ("month" = String, Query, description = "Month name, e.g. March"),
        ("year" = i32, Query, description = "Four digit year")
    ),
    responses(
        (status = 200, description = "Companies for the month", body = Vec<CompanyResponse>),
        (status = 400, description = "Month or year missing"),
        (status = 404, description = "No companies for the month")
    )
)]
#[axum::debug_handler]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyListQuery>,
) -> Result<impl IntoResponse> {
    let (month, year) = parse_month_year(&query)?;
    let companies = state.company_service.list_for_month(&month, year).await?;
    if companies.is_empty() {
        return Err(Error::NotFound(
            "No companies found for the given month and year".to_string(),
        ));
    }
    let body: Vec<CompanyResponse> = companies.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = CompanyPayload,
    responses(
        (status = 200, description = "Company updated", body = Json<CompanyResponse>),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<CompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.update(id, payload).await?;
    Ok(Json(CompanyResponse::from(company)))
}

#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company deleted", body = Json<MessageResponse>),
        (status = 403, description = "Permission denied")
    )
)]
#[axum::debug_handler]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.company_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Company deleted successfully")))
}

fn parse_month_year(query: &CompanyListQuery) -> Result<(String, i32)> {
    let missing = || Error::BadRequest("Month and year are required".to_string());
    let month = query
        .month
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(missing)?;
    let year = query
        .year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .ok_or_else(missing)?
        .parse::<i32>()
        .map_err(|_| Error::BadRequest("Year must be a number".to_string()))?;
    Ok((month.to_string(), year))
}
