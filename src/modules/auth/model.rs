use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::{User, UserRole};

/// JWT claims shared by access and refresh tokens. The subject is the user's
/// email; the token kind is implicit in the expiry policy used to mint it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User email (subject claim)
    pub sub: String,
    /// Expiration timestamp (Unix)
    pub exp: usize,
    /// Issued-at timestamp (Unix)
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Response body for all three auth operations, per the public wire contract:
/// camelCase keys, `success` flag, human-readable `message`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<User>,
    pub message: String,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        use validator::Validate;

        let dto = RegisterRequest {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
        };
        assert!(dto.validate().is_ok());

        let dto_bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            password: "pw1".to_string(),
        };
        assert!(dto_bad_email.validate().is_err());

        let dto_empty_password = RegisterRequest {
            email: "a@x.com".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            password: "".to_string(),
        };
        assert!(dto_empty_password.validate().is_err());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let dto: RegisterRequest = serde_json::from_str(
            r#"{"firstName":"Ann","lastName":"Lee","email":"a@x.com","password":"pw1"}"#,
        )
        .unwrap();
        assert_eq!(dto.first_name, "Ann");

        let dto: RefreshRequest =
            serde_json::from_str(r#"{"refreshToken":"abc"}"#).unwrap();
        assert_eq!(dto.refresh_token, "abc");
    }

    #[test]
    fn test_auth_response_wire_shape() {
        let response = AuthResponse {
            token: "t".to_string(),
            refresh_token: "r".to_string(),
            role: UserRole::Teacher,
            user_data: None,
            message: "Login successful".to_string(),
            success: true,
        };

        let serialized = serde_json::to_string(&response).unwrap();
        assert!(serialized.contains(r#""refreshToken":"r""#));
        assert!(serialized.contains(r#""role":"TEACHER""#));
        assert!(serialized.contains(r#""success":true"#));
        assert!(!serialized.contains("userData"));
    }
}
