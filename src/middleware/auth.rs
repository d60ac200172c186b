use crate::common::error::ApiError;
use crate::modules::auth::dto::TokenClaims;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use redis::AsyncCommands;

/// Bearer-token guard for the protected route set. Public routes (login,
/// register, movie reads) are never layered with this.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
        .map(|t| t.to_owned());

    let token = match token {
        Some(t) => t,
        None => {
            return Err(ApiError::Unauthorized(
                "Missing or invalid token".to_string(),
            ))
        }
    };

    let claims = decode::<TokenClaims>(
        &token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?
    .claims;

    // Logout and refresh revoke tokens by jti; a revoked token stays
    // blocked until its natural expiry.
    let mut redis = state.redis.get_conn().await?;
    let is_blocked: bool = redis
        .exists(format!("blocked_token:{}", claims.jti))
        .await?;

    if is_blocked {
        return Err(ApiError::Unauthorized("Token is revoked".to_string()));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
