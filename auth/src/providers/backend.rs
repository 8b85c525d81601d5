//! Remote auth backend trait.

use crate::error::Result;
use crate::state::{Credentials, ProfileUpdate, RegisterRequest, User};
use serde::{Deserialize, Serialize};

/// Successful login or registration response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,

    /// Identity record for the authenticated account.
    pub user: User,
}

/// Remote auth backend.
///
/// Abstracts over the ticketing platform's auth endpoints. Transient
/// failures are returned to the caller; nothing here retries
/// automatically.
pub trait AuthBackend: Send + Sync {
    /// Exchange email/password credentials for a token and identity.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Credentials are rejected
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<LoginResponse>> + Send;

    /// Create an account and log it in.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - The email is already registered or the request is rejected
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl std::future::Future<Output = Result<LoginResponse>> + Send;

    /// Fetch the identity record for the token's account.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - The token is rejected
    fn get_profile(&self, token: &str) -> impl std::future::Future<Output = Result<User>> + Send;

    /// Partially update the identity record.
    ///
    /// Absent fields in `update` are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - The token or the update is rejected
    fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> impl std::future::Future<Output = Result<User>> + Send;
}
