//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentAccount;
use crate::api::AppState;
use crate::domain::{Account, ClientInfo};
use crate::errors::AppResult;
use crate::services::{AuthResponse, Registration, TokenResponse, VerifyResponse};
use crate::types::MessageResponse;

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(alias = "firstName")]
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    #[schema(example = "John")]
    pub first_name: String,
    #[serde(default, alias = "lastName")]
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Email verification request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyRequest {
    /// Verification code received by email
    #[validate(length(min = 1, message = "Verification code is required"))]
    pub id: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// New password for a reset code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    /// Reset code received by email
    #[validate(length(min = 1, message = "Reset code is required"))]
    pub id: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
}

/// Registration result
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub auth: AuthResponse,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", post(verify))
        .route("/forgot", post(forgot_password))
        .route("/reset", post(reset_password))
}

/// Authentication routes that need a bearer token
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/token", get(refresh_token))
        .route("/me", get(me))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let auth = state
        .auth_service
        .register(Registration {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { ok: true, auth })))
}

/// Login and get a token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown email"),
        (status = 423, description = "Account temporarily blocked")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let auth = state
        .auth_service
        .login(&payload.email, &payload.password, client)
        .await?;

    Ok(Json(auth))
}

/// Verify an email address
#[utoipa::path(
    post,
    path = "/auth/verify",
    tag = "Authentication",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Email verified", body = VerifyResponse),
        (status = 404, description = "Unknown or already used code")
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyRequest>,
) -> AppResult<Json<VerifyResponse>> {
    Ok(Json(state.auth_service.verify_email(&payload.id).await?))
}

/// Request a password reset code
#[utoipa::path(
    post,
    path = "/auth/forgot",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent", body = MessageResponse),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = state
        .auth_service
        .forgot_password(&payload.email, client)
        .await?;

    Ok(Json(response))
}

/// Set a new password with a reset code
#[utoipa::path(
    post,
    path = "/auth/reset",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 404, description = "Unknown or already used code")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = state
        .auth_service
        .reset_password(&payload.id, &payload.password, client)
        .await?;

    Ok(Json(response))
}

/// Issue a fresh token
#[utoipa::path(
    get,
    path = "/auth/token",
    tag = "Authentication",
    responses(
        (status = 200, description = "New token", body = TokenResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    client: ClientInfo,
) -> AppResult<Json<TokenResponse>> {
    Ok(Json(state.auth_service.refresh_token(current.id, client).await?))
}

/// Get the authenticated account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = Account),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<Json<Account>> {
    Ok(Json(state.auth_service.me(current.id).await?))
}
