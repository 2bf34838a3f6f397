use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::fetch::navigation::NavigationController;
use crate::fetch::transport::{HttpRequest, HttpResponse, Transport, TransportError};

type Reply = Result<HttpResponse, TransportError>;

/// Transport answering from a queue of scripted replies, in call order.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<HttpRequest>>,
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
}

/// Reply held back until the test releases it.
pub(crate) struct Gate(oneshot::Sender<Reply>);

impl Gate {
    pub(crate) fn ok(self, status: u16, body: Value) {
        // the call may already be gone
        let _ = self.0.send(Ok(HttpResponse::new(status, Some(body))));
    }
}

impl ScriptedTransport {
    pub(crate) fn gate(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().push_back(rx);
        Gate(tx)
    }

    pub(crate) fn respond(&self, status: u16, body: Value) {
        self.gate().ok(status, body);
    }

    pub(crate) fn respond_empty(&self, status: u16) {
        let _ = self.gate().0.send(Ok(HttpResponse::new(status, None)));
    }

    pub(crate) fn fail(&self, reason: &str) {
        let _ = self
            .gate()
            .0
            .send(Err(TransportError::Connection(reason.to_string())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Yields to the runtime until `n` requests reached the transport.
    pub(crate) async fn wait_for_requests(&self, n: usize) -> Vec<HttpRequest> {
        for _ in 0..1_000 {
            let requests = self.requests();
            if requests.len() >= n {
                return requests;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {n} requests, saw {}", self.requests().len());
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Connection("reply dropped".into()))),
            None => Err(TransportError::Connection("no scripted reply".into())),
        }
    }
}

#[derive(Default)]
pub(crate) struct CountingNavigation {
    redirects: AtomicUsize,
}

impl CountingNavigation {
    pub(crate) fn count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl NavigationController for CountingNavigation {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}
