//! Mock auth backend for testing.

use crate::error::{AuthError, Result};
use crate::providers::backend::{AuthBackend, LoginResponse};
use crate::state::{AuthProviderTag, Credentials, ProfileUpdate, RegisterRequest, User};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    /// email → (password, identity)
    accounts: HashMap<String, (String, User)>,
    /// Token issued by the next successful login/registration.
    issued_token: String,
    /// Injected failure returned by every call while set.
    fail_with: Option<AuthError>,
    /// Identity of the most recently logged-in account.
    profile: Option<User>,
}

/// Mock auth backend.
///
/// Registered accounts live in memory; any call can be made to fail by
/// injecting an error.
#[derive(Debug, Clone)]
pub struct MockAuthBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockAuthBackend {
    /// Create an empty mock backend issuing a placeholder token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                issued_token: "jwt.token.here".to_string(),
                ..Inner::default()
            })),
        }
    }

    /// Register an account the mock will accept.
    #[must_use]
    pub fn with_account(self, email: &str, password: &str, user: User) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .accounts
                .insert(email.to_string(), (password.to_string(), user));
        }
        self
    }

    /// Set the token issued on the next successful login/registration.
    pub fn set_issued_token(&self, token: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.issued_token = token.to_string();
        }
    }

    /// Make every call fail with the given error until cleared with
    /// `None`.
    pub fn set_failure(&self, error: Option<AuthError>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_with = error;
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthBackend for MockAuthBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let mut inner = self.lock()?;

        if let Some(e) = inner.fail_with.clone() {
            return Err(e);
        }

        let user = match inner.accounts.get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => user.clone(),
            _ => return Err(AuthError::InvalidCredentials),
        };

        inner.profile = Some(user.clone());
        Ok(LoginResponse {
            access_token: inner.issued_token.clone(),
            user,
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse> {
        let mut inner = self.lock()?;

        if let Some(e) = inner.fail_with.clone() {
            return Err(e);
        }

        if inner.accounts.contains_key(&request.email) {
            return Err(AuthError::Backend {
                status: 409,
                message: "Email already registered".to_string(),
            });
        }

        let now = chrono::Utc::now();
        let user = User {
            id: format!("usr_{}", inner.accounts.len() + 1),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            provider: AuthProviderTag::Email,
            created_at: now,
            updated_at: now,
        };

        inner.accounts.insert(
            request.email.clone(),
            (request.password.clone(), user.clone()),
        );
        inner.profile = Some(user.clone());

        Ok(LoginResponse {
            access_token: inner.issued_token.clone(),
            user,
        })
    }

    async fn get_profile(&self, token: &str) -> Result<User> {
        let inner = self.lock()?;

        if let Some(e) = inner.fail_with.clone() {
            return Err(e);
        }

        if token != inner.issued_token {
            return Err(AuthError::InvalidCredentials);
        }

        inner.profile.clone().ok_or(AuthError::NotAuthenticated)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User> {
        let mut inner = self.lock()?;

        if let Some(e) = inner.fail_with.clone() {
            return Err(e);
        }

        if token != inner.issued_token {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(mut user) = inner.profile.clone() else {
            return Err(AuthError::NotAuthenticated);
        };

        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            user.phone = Some(phone.clone());
        }
        user.updated_at = chrono::Utc::now();

        inner.profile = Some(user.clone());
        if let Some((_, stored)) = inner.accounts.get_mut(&user.email) {
            *stored = user.clone();
        }

        Ok(user)
    }
}
