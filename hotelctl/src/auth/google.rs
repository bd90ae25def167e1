//! Google OAuth client.
//!
//! Constructed once at startup from config and injected through
//! [`crate::AppState`], so handlers never reach for a global client and tests
//! can point the endpoint URLs at a local mock server.

use reqwest::Url;
use serde::Deserialize;
use tracing::instrument;

use crate::config::GoogleAuthConfig;
use crate::errors::{Error, Result};

/// Profile fields we read from Google's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUser {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
}

/// OAuth2 authorization-code client for Google sign-in.
#[derive(Debug, Clone)]
pub struct GoogleAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: Url,
    auth_url: Url,
    token_url: Url,
    userinfo_url: Url,
}

impl GoogleAuthClient {
    pub fn new(config: &GoogleAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
        }
    }

    /// URL the browser is redirected to for consent.
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", self.redirect_url.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("state", state);
        url
    }

    /// Exchange the callback `code` for an access token and fetch the
    /// user's profile. An exchange rejected by Google is a client error;
    /// transport failures are internal.
    #[instrument(skip(self, code), err)]
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleUser> {
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("code", code),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| Error::Internal {
                operation: format!("Google token exchange: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(Error::Unauthenticated {
                message: Some("Google rejected the authorization code".to_string()),
            });
        }

        let token: TokenExchangeResponse = response.json().await.map_err(|e| Error::Internal {
            operation: format!("Google token response: {e}"),
        })?;

        let user = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| Error::Internal {
                operation: format!("Google userinfo request: {e}"),
            })?
            .error_for_status()
            .map_err(|e| Error::Internal {
                operation: format!("Google userinfo request: {e}"),
            })?
            .json::<GoogleUser>()
            .await
            .map_err(|e| Error::Internal {
                operation: format!("Google userinfo response: {e}"),
            })?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GoogleAuthClient {
        GoogleAuthClient::new(&GoogleAuthConfig {
            enabled: true,
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "http://localhost:3000/api/v1/auth/google/callback".parse().unwrap(),
            ..Default::default()
        })
    }

    #[test]
    fn test_authorize_url_carries_oauth_params() {
        let url = test_client().authorize_url("xyzzy");

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["state"], "xyzzy");
        assert_eq!(pairs["redirect_uri"], "http://localhost:3000/api/v1/auth/google/callback");
        assert!(pairs["scope"].contains("email"));
        assert!(url.as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    }

    #[test]
    fn test_secret_never_in_authorize_url() {
        let url = test_client().authorize_url("state");
        assert!(!url.as_str().contains("secret"));
    }
}
