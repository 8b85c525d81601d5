//! Platform deep-link facility trait.

use crate::error::Result;
use tokio::sync::broadcast;

/// Platform deep-link facility.
///
/// The operating system routes custom-scheme URIs into the running
/// process; this trait abstracts over that channel plus the two adjacent
/// platform calls the sign-in flow needs (opening an external URI, and
/// reading the URI the process was cold-started with).
pub trait DeepLinkGateway: Send + Sync {
    /// Open a URI in the external browser.
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot open the URI (no handler,
    /// malformed URI). This is fatal to the sign-in call that requested
    /// it.
    fn open_external(&self, url: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Subscribe to incoming deep-link URIs.
    ///
    /// Every subscriber sees every URI; filtering by prefix is the
    /// subscriber's job.
    fn subscribe(&self) -> broadcast::Receiver<String>;

    /// The URI the process was launched with, if any.
    ///
    /// Consumed once at coordinator construction to cover the case where
    /// the app was cold-started directly from the callback URI.
    ///
    /// # Errors
    ///
    /// Returns error if the platform query fails.
    fn initial_link(&self) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}
