use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Bearer token shared by every coordinator of a client.
///
/// Cloning yields another handle on the same token. Writes are visible to
/// all handles and wake the subscribers, which is how GET bindings learn
/// that they have to fetch again.
#[derive(Debug, Clone)]
pub struct AuthContext {
    token: Arc<watch::Sender<Option<String>>>,
}

impl AuthContext {
    pub fn new(token: Option<String>) -> Self {
        let (token, _) = watch::channel(token.filter(|t| !t.is_empty()));
        Self {
            token: Arc::new(token),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn read(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Stores `token`. Writing the token already held is not a change and
    /// does not notify subscribers.
    pub fn write(&self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            return self.clear();
        }
        let changed = self.token.send_if_modified(|current| {
            if current.as_deref() == Some(token.as_str()) {
                return false;
            }
            *current = Some(token);
            true
        });
        if changed {
            debug!("auth token updated");
        }
    }

    pub fn clear(&self) {
        let changed = self.token.send_if_modified(|current| current.take().is_some());
        if changed {
            debug!("auth token cleared");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }

    /// Token to sign one call with: the override when it is non-empty,
    /// otherwise whatever the context holds right now.
    pub(crate) fn resolve(&self, token_override: Option<&str>) -> Option<String> {
        match token_override {
            Some(token) if !token.is_empty() => Some(token.to_string()),
            _ => self.read(),
        }
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
