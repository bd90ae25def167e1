//! Authentication API types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Local login request. The identifier matches either username or email.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Bearer token issued after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// Query parameters Google appends to the OAuth callback.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct GoogleCallbackQuery {
    pub code: String,
    #[allow(dead_code)]
    pub state: Option<String>,
}
