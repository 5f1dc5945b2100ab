//! Account administration handlers (admin roles only).

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Account, AccountRole};
use crate::errors::AppResult;
use crate::query::ListQuery;
use crate::services::{CreateAccount, UpdateAccount};
use crate::types::{ApiResponse, Created, NoContent, PaginatedResult};

/// Account creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(alias = "first_name")]
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    #[schema(example = "John")]
    pub first_name: String,
    #[serde(default, alias = "last_name")]
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
    #[serde(default)]
    pub role: AccountRole,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(url(message = "Invalid Twitter URL"))]
    pub url_twitter: Option<String>,
    #[validate(url(message = "Invalid GitHub URL"))]
    pub url_github: Option<String>,
}

/// Account update request; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(alias = "first_name")]
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[serde(alias = "last_name")]
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<AccountRole>,
    pub verified: Option<bool>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(url(message = "Invalid Twitter URL"))]
    pub url_twitter: Option<String>,
    #[validate(url(message = "Invalid GitHub URL"))]
    pub url_github: Option<String>,
}

impl From<CreateAccountRequest> for CreateAccount {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: request.role,
            phone: request.phone,
            city: request.city,
            country: request.country,
            url_twitter: request.url_twitter,
            url_github: request.url_github,
        }
    }
}

impl From<UpdateAccountRequest> for UpdateAccount {
    fn from(request: UpdateAccountRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: request.role,
            verified: request.verified,
            phone: request.phone,
            city: request.city,
            country: request.country,
            url_twitter: request.url_twitter,
            url_github: request.url_github,
        }
    }
}

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route(
            "/:id",
            get(get_account).patch(update_account).delete(delete_account),
        )
}

/// List accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(
        ("filter" = Option<String>, Query, description = "Text searched in `fields`"),
        ("fields" = Option<String>, Query, description = "Comma separated fields to search"),
        ("sort" = Option<String>, Query, description = "Sort field, defaults to createdAt"),
        ("order" = Option<String>, Query, description = "asc or desc"),
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Paginated accounts"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PaginatedResult<Account>>> {
    let query = ListQuery::from(params);
    Ok(Json(state.account_service.list(&query).await?))
}

/// Get an account by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Account>>> {
    let account = state.account_service.get(id).await?;
    Ok(Json(ApiResponse::success(account)))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> AppResult<Created<Account>> {
    let account = state.account_service.create(payload.into()).await?;
    Ok(Created(account))
}

/// Update an account
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Email already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    let account = state.account_service.update(id, payload.into()).await?;
    Ok(Json(ApiResponse::success(account)))
}

/// Delete an account and its access history
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.account_service.delete(id).await?;
    Ok(NoContent)
}
