//! Request control: abort signals for in-flight decision flows.
//!
//! A flow registers its request id here for as long as it runs. When the
//! browser aborts the request (tab closed, navigation), the caller invokes
//! [`RequestControl::request_abort`] and a flow suspended on the prompt
//! resumes with [`EngineError::Aborted`](crate::engine::EngineError::Aborted).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

/// Browser-assigned request identifier.
pub type RequestId = u64;

#[derive(Debug)]
struct Entry {
    generation: u64,
    abort: watch::Sender<bool>,
}

/// Shared registry of request id -> abort signal.
#[derive(Debug, Default)]
pub struct RequestControl {
    requests: RwLock<HashMap<RequestId, Entry>>,
    next_generation: AtomicU64,
}

impl RequestControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-flight request. The entry lives until the returned
    /// [`Registration`] is dropped. Re-registering an id replaces the
    /// previous entry; dropping the older registration then leaves the
    /// newer one in place.
    pub fn register(self: &Arc<Self>, request_id: RequestId) -> Registration {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (abort, rx) = watch::channel(false);
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request_id, Entry { generation, abort });
        Registration {
            control: Arc::clone(self),
            request_id,
            generation,
            token: AbortToken { rx },
        }
    }

    fn unregister(&self, request_id: RequestId, generation: u64) {
        let mut requests = self.requests.write().unwrap_or_else(PoisonError::into_inner);
        if requests.get(&request_id).is_some_and(|e| e.generation == generation) {
            requests.remove(&request_id);
        }
    }

    /// Signal abort for a request. Returns false if no flow is registered for it.
    pub fn request_abort(&self, request_id: RequestId) -> bool {
        match self
            .requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&request_id)
        {
            Some(entry) => {
                entry.abort.send_replace(true);
                tracing::debug!(request_id, "abort requested");
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, request_id: RequestId) -> bool {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&request_id)
    }

    pub fn len(&self) -> usize {
        self.requests.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registered request. Unregisters on drop, including when the flow's
/// future is dropped mid-prompt.
#[derive(Debug)]
pub struct Registration {
    control: Arc<RequestControl>,
    request_id: RequestId,
    generation: u64,
    token: AbortToken,
}

impl Registration {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn token(&self) -> &AbortToken {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut AbortToken {
        &mut self.token
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.control.unregister(self.request_id, self.generation);
    }
}

/// Receiving side of one request's abort signal.
#[derive(Debug, Clone)]
pub struct AbortToken {
    rx: watch::Receiver<bool>,
}

impl AbortToken {
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once abort has been requested. Never resolves if the
    /// registration goes away without an abort.
    pub async fn aborted(&mut self) {
        let closed = self.rx.wait_for(|aborted| *aborted).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn abort_wakes_waiting_token() {
        let control = Arc::new(RequestControl::new());
        let mut registration = control.register(7);
        assert!(!registration.token().is_aborted());
        assert!(control.request_abort(7));
        tokio::time::timeout(Duration::from_secs(1), registration.token_mut().aborted())
            .await
            .expect("token resolves after abort");
        assert!(registration.token().is_aborted());
    }

    #[tokio::test]
    async fn unregistered_request_is_not_aborted() {
        let control = Arc::new(RequestControl::new());
        assert!(!control.request_abort(1));
        let registration = control.register(1);
        let mut token = registration.token().clone();
        drop(registration);
        assert!(!control.is_registered(1));
        assert!(!control.request_abort(1));
        let waited = tokio::time::timeout(Duration::from_millis(20), token.aborted()).await;
        assert!(waited.is_err());
    }

    #[test]
    fn dropping_stale_registration_keeps_newer_one() {
        let control = Arc::new(RequestControl::new());
        let old = control.register(3);
        let new = control.register(3);
        drop(old);
        assert!(control.is_registered(3));
        assert!(control.request_abort(3));
        assert!(new.token().is_aborted());
        drop(new);
        assert!(control.is_empty());
    }
}
