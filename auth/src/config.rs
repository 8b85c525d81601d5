//! Sign-in configuration.
//!
//! Configuration values are provided by the application at startup, not
//! hardcoded in the coordinator.

use std::time::Duration;

/// External sign-in configuration.
#[derive(Debug, Clone)]
pub struct SignInConfig {
    /// URI of the backend's provider-initiated auth endpoint, opened in
    /// the external browser (e.g. `https://api.stagepass.app/auth/google`).
    pub authorize_url: String,

    /// Reserved callback URI prefix. Incoming deep links that do not start
    /// with this prefix are ignored.
    ///
    /// Default: `stagepass://auth/callback`
    pub callback_prefix: String,

    /// Hard deadline for the external round trip.
    ///
    /// Default: 5 minutes
    pub timeout: Duration,
}

impl SignInConfig {
    /// Create a new sign-in configuration.
    ///
    /// # Arguments
    ///
    /// * `authorize_url` - Backend auth endpoint to open externally
    #[must_use]
    pub fn new(authorize_url: String) -> Self {
        Self {
            authorize_url,
            callback_prefix: "stagepass://auth/callback".to_string(),
            timeout: Duration::from_secs(5 * 60),
        }
    }

    /// Set the callback URI prefix.
    #[must_use]
    pub fn with_callback_prefix(mut self, prefix: String) -> Self {
        self.callback_prefix = prefix;
        self
    }

    /// Set the round-trip deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SignInConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000/auth/google".to_string())
    }
}
