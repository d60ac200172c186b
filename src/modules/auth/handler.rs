use super::dto::{LoginRequest, RegisterRequest, TokenClaims, TokenResponse};
use super::model::User;
use super::service::AuthService;
use crate::common::error::ApiError;
use crate::common::response::MessageResponse;
use crate::state::AppState;
use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account registered", body = MessageResponse),
        (status = 400, description = "Validation failed, body is a field-message map")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    AuthService::register(state, payload).await?;

    Ok(Json(MessageResponse::new("Account registration successfully")))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Wrong password"),
        (status = 422, description = "No account for that email")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate()?;

    let response = AuthService::login(state, payload).await?;

    Ok(Json(response))
}

/// Current authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Authenticated user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<User>, ApiError> {
    let user = AuthService::me(state, claims.sub).await?;

    Ok(Json(user))
}

/// Logout and revoke the current token
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    AuthService::logout(state, &claims).await?;

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

/// Exchange the current token for a fresh one
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = AuthService::refresh(state, &claims).await?;

    Ok(Json(response))
}
