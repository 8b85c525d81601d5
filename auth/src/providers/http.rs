//! HTTP implementation of the remote auth backend.

use crate::error::{AuthError, Result};
use crate::providers::backend::{AuthBackend, LoginResponse};
use crate::state::{Credentials, ProfileUpdate, RegisterRequest, User};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

/// Error body shape used by the ticketing backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Auth backend over HTTP.
///
/// Talks to the ticketing platform's REST API:
///
/// - `POST {base_url}/auth/login`
/// - `POST {base_url}/auth/register`
/// - `GET  {base_url}/auth/profile`
/// - `PUT  {base_url}/auth/profile`
///
/// # Example
///
/// ```no_run
/// use stagepass_auth::providers::HttpAuthBackend;
///
/// let backend = HttpAuthBackend::new("https://api.stagepass.app".to_string());
/// ```
#[derive(Clone, Debug)]
pub struct HttpAuthBackend {
    /// API base URL, without a trailing slash.
    base_url: String,

    /// HTTP client for making requests.
    http_client: Client,
}

impl HttpAuthBackend {
    /// Create a new HTTP backend against the given base URL.
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    /// Use a preconfigured client (timeouts, proxies).
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success response into an `AuthError`.
    async fn error_for(response: Response) -> AuthError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        if status == StatusCode::UNAUTHORIZED {
            AuthError::InvalidCredentials
        } else {
            AuthError::Backend {
                status: status.as_u16(),
                message,
            }
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AuthError::Serialization(e.to_string()))
    }
}

impl AuthBackend for HttpAuthBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let response = self
            .http_client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Self::parse(response).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse> {
        let response = self
            .http_client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Self::parse(response).await
    }

    async fn get_profile(&self, token: &str) -> Result<User> {
        let response = self
            .http_client
            .get(self.url("/auth/profile"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Self::parse(response).await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User> {
        let response = self
            .http_client
            .put(self.url("/auth/profile"))
            .bearer_auth(token)
            .json(update)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Self::parse(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let backend = HttpAuthBackend::new("https://api.example.com/".to_string());
        assert_eq!(backend.url("/auth/login"), "https://api.example.com/auth/login");

        let backend = HttpAuthBackend::new("https://api.example.com".to_string());
        assert_eq!(backend.url("/auth/profile"), "https://api.example.com/auth/profile");
    }
}
