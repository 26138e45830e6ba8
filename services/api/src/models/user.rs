//! User model and account payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for account creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request for token issuance
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Response for token issuance
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Profile representation returned by the account endpoints
#[derive(Debug, Serialize, PartialEq)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        ProfileResponse {
            name: user.name,
            email: user.email,
        }
    }
}

/// Partial profile update payload
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_name_is_optional() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email": "test@example.com", "password": "password"}"#)
                .unwrap();
        assert_eq!(req.email, "test@example.com");
        assert!(req.name.is_none());
    }

    #[test]
    fn test_profile_response_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: "Test Name".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let profile = ProfileResponse::from(user);
        assert_eq!(
            profile,
            ProfileResponse {
                name: "Test Name".to_string(),
                email: "test@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_profile_response_omits_password() {
        let profile = ProfileResponse {
            name: "Test Name".to_string(),
            email: "test@example.com".to_string(),
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "Test Name", "email": "test@example.com"})
        );
    }
}
