use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "The name field is required."))]
    pub name: String,
    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
    #[validate(custom(function = validate_role))]
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// Login/refresh payload, shaped exactly as the public contract:
/// `{access_token, token_type: "bearer", expires_in}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Fixed claim schema. `name` and `email` ride along for API clients;
/// `jti` keys the revocation blocklist.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.parse::<super::model::UserRole>().is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("role");
    err.message = Some("The selected role is invalid.".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_accepts_admin_and_member_roles() {
        for role in ["admin", "member"] {
            let req = RegisterRequest {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                password: "secret".into(),
                role: role.into(),
            };
            assert!(req.validate().is_ok(), "role {} should be valid", role);
        }
    }

    #[test]
    fn register_rejects_unknown_role_and_missing_fields() {
        let req = RegisterRequest {
            name: "".into(),
            email: "not-an-email".into(),
            password: "".into(),
            role: "superuser".into(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("role"));
    }

    #[test]
    fn login_rejects_malformed_email() {
        let req = LoginRequest {
            email: "nope".into(),
            password: "secret".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
