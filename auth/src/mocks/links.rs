//! Mock deep-link gateway for testing.

use crate::error::{AuthError, Result};
use crate::providers::DeepLinkGateway;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Mock deep-link gateway.
///
/// Records every externally opened URL and lets tests deliver incoming
/// deep links on demand.
#[derive(Debug, Clone)]
pub struct MockLinkGateway {
    links: broadcast::Sender<String>,
    opened: Arc<Mutex<Vec<String>>>,
    initial: Arc<Mutex<Option<String>>>,
    fail_open: Arc<AtomicBool>,
}

impl MockLinkGateway {
    /// Create a gateway with no launch link.
    #[must_use]
    pub fn new() -> Self {
        let (links, _) = broadcast::channel(16);
        Self {
            links,
            opened: Arc::new(Mutex::new(Vec::new())),
            initial: Arc::new(Mutex::new(None)),
            fail_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the URI the process was "launched" with.
    pub fn set_initial_link(&self, uri: &str) {
        if let Ok(mut initial) = self.initial.lock() {
            *initial = Some(uri.to_string());
        }
    }

    /// Make `open_external` fail.
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    /// Deliver an incoming deep link to all subscribers.
    pub fn deliver(&self, uri: &str) {
        // No subscribers is fine; the send result is irrelevant
        let _ = self.links.send(uri.to_string());
    }

    /// URLs opened in the external browser so far (for assertions).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn opened_urls(&self) -> Result<Vec<String>> {
        Ok(self
            .opened
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))?
            .clone())
    }
}

impl Default for MockLinkGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepLinkGateway for MockLinkGateway {
    async fn open_external(&self, url: &str) -> Result<()> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(AuthError::LaunchFailed {
                reason: "injected open failure".to_string(),
            });
        }

        let mut opened = self
            .opened
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))?;
        opened.push(url.to_string());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.links.subscribe()
    }

    async fn initial_link(&self) -> Result<Option<String>> {
        Ok(self
            .initial
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))?
            .clone())
    }
}
