use super::dto::{LoginRequest, RegisterRequest, TokenClaims, TokenResponse};
use super::model::{User, UserRole};
use super::repository::AuthRepository;
use crate::common::error::ApiError;
use crate::common::security;
use crate::state::AppState;
use anyhow::{anyhow, Result};
use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use redis::AsyncCommands;
use uuid::Uuid;

pub struct AuthService;

impl AuthService {
    pub async fn register(state: AppState, req: RegisterRequest) -> Result<(), ApiError> {
        if AuthRepository::find_user_by_email(&state.db, &req.email)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(ApiError::field(
                "email",
                "The email has already been taken.",
            ));
        }

        let password_hash = security::hash_password(&req.password)?;
        // Validation guarantees the role is one of the two known values.
        let role = req
            .role
            .parse::<UserRole>()
            .map_err(|_| ApiError::field("role", "The selected role is invalid."))?;

        AuthRepository::create_user(&state.db, &req.name, &req.email, &password_hash, role)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }

    pub async fn login(state: AppState, req: LoginRequest) -> Result<TokenResponse, ApiError> {
        let user = AuthRepository::find_user_by_email(&state.db, &req.email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                ApiError::UnknownCredentials(
                    "The credentials you entered did not match our records.".to_string(),
                )
            })?;

        security::verify_password(&req.password, &user.password_hash)
            .map_err(|_| ApiError::Unauthorized("Unauthorized".to_string()))?;

        let access_token =
            Self::issue_token(&user, &state.config.jwt_secret, state.config.jwt_ttl_secs)?;

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.config.jwt_ttl_secs,
        })
    }

    pub async fn me(state: AppState, user_id: Uuid) -> Result<User, ApiError> {
        AuthRepository::find_user_by_id(&state.db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))
    }

    pub async fn logout(state: AppState, claims: &TokenClaims) -> Result<(), ApiError> {
        Self::block_token(&state, claims).await
    }

    /// Exchanges the presented (still valid) token for a fresh one. The old
    /// token is revoked so it cannot be replayed after the exchange.
    pub async fn refresh(state: AppState, claims: &TokenClaims) -> Result<TokenResponse, ApiError> {
        let user = AuthRepository::find_user_by_id(&state.db, claims.sub)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

        Self::block_token(&state, claims).await?;

        let access_token =
            Self::issue_token(&user, &state.config.jwt_secret, state.config.jwt_ttl_secs)?;

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.config.jwt_ttl_secs,
        })
    }

    /// Blocklists a token's jti for its remaining lifetime.
    async fn block_token(state: &AppState, claims: &TokenClaims) -> Result<(), ApiError> {
        let ttl = claims.exp.saturating_sub(get_current_timestamp()).max(1);

        let mut redis = state.redis.get_conn().await?;
        let _: () = redis
            .set_ex(format!("blocked_token:{}", claims.jti), "revoked", ttl)
            .await?;

        Ok(())
    }

    pub fn issue_token(user: &User, secret: &str, ttl_secs: u64) -> Result<String> {
        let iat = get_current_timestamp();

        let claims = TokenClaims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            iat,
            exp: iat + ttl_secs,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| anyhow!(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "irrelevant".into(),
            role: UserRole::Member,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn issued_token_carries_name_and_email_claims() {
        let user = sample_user();
        let token = AuthService::issue_token(&user, "test-secret", 3600).unwrap();

        let claims = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn token_signed_with_other_secret_fails_verification() {
        let user = sample_user();
        let token = AuthService::issue_token(&user, "secret-a", 3600).unwrap();

        let result = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn each_token_gets_a_distinct_jti() {
        let user = sample_user();
        let a = AuthService::issue_token(&user, "test-secret", 60).unwrap();
        let b = AuthService::issue_token(&user, "test-secret", 60).unwrap();
        assert_ne!(a, b);
    }
}
