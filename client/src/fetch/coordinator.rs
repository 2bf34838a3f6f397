//! Request lifecycle of one UI binding.
//!
//! A [`RequestCoordinator`] issues the calls of a single [`Binding`], keeps
//! its [`RequestState`] and guarantees that only the most recently issued
//! call may write that state. Issuing a call first cancels the live one:
//! the transport task is aborted, and the call's generation is retired so a
//! settlement that slipped past the abort is discarded all the same.
//!
//! GET bindings fire on their own: once when the coordinator is built, again
//! whenever the shared auth token changes, and on every poll tick.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::fetch::auth::AuthContext;
use crate::fetch::binding::{Binding, Call, Method};
use crate::fetch::error::FetchError;
use crate::fetch::navigation::NavigationController;
use crate::fetch::state::RequestState;
use crate::fetch::transport::{HttpResponse, Transport, TransportError};

/// Collaborators a coordinator is built with. A coordinator never swaps
/// them; when one changes, build a new coordinator.
#[derive(Clone)]
pub struct Dependencies {
    pub config: Arc<ApiConfig>,
    pub auth: AuthContext,
    pub navigation: Arc<dyn NavigationController>,
    pub transport: Arc<dyn Transport>,
}

/// How a call ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The raw response of a successful call.
    Completed(HttpResponse),
    /// The server rejected the session and the login redirect was taken.
    Redirected,
    /// Superseded by a newer call, cancelled, or the binding was dropped.
    Cancelled,
}

impl Outcome {
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Outcome::Completed(response) => Some(response),
            _ => None,
        }
    }

    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            Outcome::Completed(response) => Some(response),
            _ => None,
        }
    }
}

/// Handle on the single live call of a binding.
#[derive(Debug)]
struct CancellationHandle {
    generation: u64,
    abort: AbortHandle,
}

impl CancellationHandle {
    fn cancel(self) {
        self.abort.abort();
    }
}

struct Slot<T> {
    state: RequestState<T>,
    generation: u64,
    live: Option<CancellationHandle>,
    // token the latest call was signed with
    last_token: Option<String>,
}

struct Core<T> {
    binding: Binding,
    deps: Dependencies,
    slot: Mutex<Slot<T>>,
    revision: watch::Sender<u64>,
}

impl<T> Core<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn dispatch(self: &Arc<Self>, call: Call) -> PendingCall {
        let Call {
            body,
            suppress_redirect,
            token_override,
        } = call;
        let token_override = token_override.filter(|token| !token.is_empty());
        let token = self.deps.auth.resolve(token_override.as_deref());
        let request = self.binding.request(&self.deps.config, token.clone(), body);

        let mut slot = self.slot.lock();
        if let Some(stale) = slot.live.take() {
            debug!(
                path = %self.binding.resource_path(),
                generation = stale.generation,
                "cancelling superseded call"
            );
            stale.cancel();
        }
        slot.generation += 1;
        let generation = slot.generation;
        slot.state.is_loading = true;
        slot.last_token = token;

        let core = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = core.deps.transport.send(request).await;
            core.settle(generation, suppress_redirect, result)
        });
        slot.live = Some(CancellationHandle {
            generation,
            abort: task.abort_handle(),
        });
        drop(slot);
        self.bump();

        debug!(
            method = %self.binding.method(),
            path = %self.binding.resource_path(),
            generation,
            "call issued"
        );
        if let Some(token) = token_override {
            self.deps.auth.write(token);
        }
        PendingCall { task }
    }

    fn settle(
        &self,
        generation: u64,
        suppress_redirect: bool,
        result: Result<HttpResponse, TransportError>,
    ) -> Result<Outcome, FetchError> {
        let path = self.binding.resource_path();
        let mut slot = self.slot.lock();
        if slot.live.as_ref().map(|live| live.generation) != Some(generation) {
            debug!(%path, generation, "discarding stale response");
            return Ok(Outcome::Cancelled);
        }
        slot.live = None;
        slot.state.is_loading = false;

        let result = match result {
            Ok(response) if response.is_success() => match decode::<T>(response.body.as_ref()) {
                Ok(data) => {
                    slot.state.data = Some(data);
                    slot.state.error_message = None;
                    Ok(Outcome::Completed(response))
                }
                Err(source) => Err(FetchError::Decode { response, source }),
            },
            Ok(response) => Err(FetchError::from_response(response)),
            Err(err) => Err(FetchError::Network(err)),
        };

        let outcome = match result {
            Err(err) if err.is_unauthenticated() && !suppress_redirect => {
                drop(slot);
                info!(%path, "session rejected, redirecting to login");
                self.deps.navigation.redirect_to_login();
                Ok(Outcome::Redirected)
            }
            Err(err) => {
                warn!(%path, error = %err, "call failed");
                slot.state.error_message = Some(err.user_message());
                drop(slot);
                Err(err)
            }
            Ok(outcome) => {
                drop(slot);
                Ok(outcome)
            }
        };
        self.bump();
        outcome
    }

    fn cancel(&self) {
        let mut slot = self.slot.lock();
        let Some(live) = slot.live.take() else {
            return;
        };
        debug!(
            path = %self.binding.resource_path(),
            generation = live.generation,
            "call cancelled"
        );
        live.cancel();
        slot.state.is_loading = false;
        drop(slot);
        self.bump();
    }

    fn last_token(&self) -> Option<String> {
        self.slot.lock().last_token.clone()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    // Fire-and-forget call; its outcome lands in the state and the logs.
    fn auto_fire(self: &Arc<Self>, reason: &'static str) {
        debug!(path = %self.binding.resource_path(), reason, "auto-fire");
        drop(self.dispatch(Call::default()));
    }
}

/// Unwraps the `rows` envelope of listing endpoints, otherwise the body as is.
fn decode<T: DeserializeOwned>(body: Option<&Value>) -> serde_json::Result<T> {
    let payload = match body {
        Some(Value::Object(map)) if map.contains_key("rows") => map["rows"].clone(),
        Some(body) => body.clone(),
        None => Value::Null,
    };
    serde_json::from_value(payload)
}

/// Future of one issued call.
///
/// The call runs whether or not this is awaited; dropping it only discards
/// the outcome.
#[derive(Debug)]
pub struct PendingCall {
    task: JoinHandle<Result<Outcome, FetchError>>,
}

impl Future for PendingCall {
    type Output = Result<Outcome, FetchError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().task).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(err)) if err.is_cancelled() => Poll::Ready(Ok(Outcome::Cancelled)),
            Poll::Ready(Err(err)) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

/// Owns the request lifecycle of one binding for as long as the UI call
/// site that created it is mounted. Dropping it cancels the live call and
/// stops polling.
pub struct RequestCoordinator<T> {
    core: Arc<Core<T>>,
    poll_interval: Option<Duration>,
    poller: Option<JoinHandle<()>>,
    token_watcher: Option<JoinHandle<()>>,
}

impl<T> RequestCoordinator<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    /// Must be called inside a tokio runtime.
    pub fn new(binding: Binding, deps: Dependencies) -> Self {
        Self::with_poll_interval(binding, deps, None)
    }

    pub fn with_poll_interval(
        binding: Binding,
        deps: Dependencies,
        poll_interval: Option<Duration>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        let core = Arc::new(Core {
            binding,
            deps,
            slot: Mutex::new(Slot {
                state: RequestState::default(),
                generation: 0,
                live: None,
                last_token: None,
            }),
            revision,
        });
        let mut coordinator = Self {
            core,
            poll_interval: poll_interval.filter(|period| !period.is_zero()),
            poller: None,
            token_watcher: None,
        };
        if coordinator.auto_fires() {
            coordinator.core.auto_fire("mount");
            coordinator.token_watcher = Some(coordinator.spawn_token_watcher());
            coordinator.poller = coordinator.spawn_poller();
        }
        coordinator
    }

    /// Issues a call, cancelling the live one first.
    pub fn trigger(&self, call: Call) -> PendingCall {
        self.core.dispatch(call)
    }

    /// Aborts the live call, if any. Data and error text are left alone.
    pub fn cancel(&self) {
        self.core.cancel();
    }

    /// Changes the poll period of a GET binding and fetches right away.
    pub fn set_poll_interval(&mut self, poll_interval: Option<Duration>) {
        let poll_interval = poll_interval.filter(|period| !period.is_zero());
        if poll_interval == self.poll_interval {
            return;
        }
        self.poll_interval = poll_interval;
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        if self.auto_fires() {
            self.core.auto_fire("poll interval changed");
            self.poller = self.spawn_poller();
        }
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }

    pub fn binding(&self) -> &Binding {
        &self.core.binding
    }

    pub fn state(&self) -> RequestState<T> {
        self.core.slot.lock().state.clone()
    }

    pub fn data(&self) -> Option<T> {
        self.core.slot.lock().state.data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.core.slot.lock().state.is_loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.core.slot.lock().state.error_message.clone()
    }

    /// Ticks whenever the state may have changed.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.core.revision.subscribe()
    }

    /// Resolves once no call is in flight.
    pub async fn wait_idle(&self) {
        let mut changes = self.subscribe();
        loop {
            let loading = self.is_loading();
            if !loading {
                return;
            }
            if changes.changed().await.is_err() {
                return;
            }
        }
    }

    fn auto_fires(&self) -> bool {
        self.core.binding.method() == Method::Get
    }

    fn spawn_token_watcher(&self) -> JoinHandle<()> {
        let core = Arc::clone(&self.core);
        let mut tokens = core.deps.auth.subscribe();
        tokio::spawn(async move {
            while tokens.changed().await.is_ok() {
                let token = tokens.borrow_and_update().clone();
                // A call signed with an override already wrote this token.
                if token == core.last_token() {
                    continue;
                }
                core.auto_fire("auth token changed");
            }
        })
    }

    fn spawn_poller(&self) -> Option<JoinHandle<()>> {
        let period = self.poll_interval?;
        let core = Arc::clone(&self.core);
        Some(tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                core.auto_fire("poll");
            }
        }))
    }
}

impl<T> Drop for RequestCoordinator<T> {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        if let Some(watcher) = self.token_watcher.take() {
            watcher.abort();
        }
        if let Some(live) = self.core.slot.lock().live.take() {
            live.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::error::FALLBACK_MESSAGE;
    use crate::fetch::testing::{CountingNavigation, ScriptedTransport};
    use serde_json::json;
    use shared::protocol::Deck;

    struct Harness {
        transport: Arc<ScriptedTransport>,
        navigation: Arc<CountingNavigation>,
        auth: AuthContext,
    }

    impl Harness {
        fn new(token: Option<&str>) -> Self {
            Self {
                transport: Arc::new(ScriptedTransport::default()),
                navigation: Arc::new(CountingNavigation::default()),
                auth: AuthContext::new(token.map(str::to_string)),
            }
        }

        fn deps(&self) -> Dependencies {
            Dependencies {
                config: Arc::new(ApiConfig::new("http://lobby.test")),
                auth: self.auth.clone(),
                navigation: self.navigation.clone(),
                transport: self.transport.clone(),
            }
        }
    }

    fn decks() -> Value {
        json!({
            "rows": [
                { "_id": "d1", "name": "Base Set" },
                { "_id": "d2", "name": "Expansion" }
            ]
        })
    }

    #[tokio::test]
    async fn get_binding_fires_on_mount() {
        let h = Harness::new(None);
        let reply = h.transport.gate();
        let coordinator: RequestCoordinator<Vec<Deck>> =
            RequestCoordinator::new(Binding::get("/api/decks"), h.deps());

        assert!(coordinator.is_loading());
        assert_eq!(coordinator.data(), None);

        reply.ok(200, decks());
        coordinator.wait_idle().await;

        let state = coordinator.state();
        assert!(!state.is_loading);
        assert_eq!(state.error_message, None);
        let data = state.data.unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].name, "Base Set");
        assert_eq!(h.transport.requests()[0].url, "http://lobby.test/api/decks");
    }

    #[tokio::test]
    async fn post_binding_waits_for_trigger() {
        let h = Harness::new(None);
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());
        tokio::task::yield_now().await;

        assert!(!coordinator.is_loading());
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn only_the_latest_call_writes_state() {
        let h = Harness::new(None);
        let first_reply = h.transport.gate();
        let second_reply = h.transport.gate();
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        let first = coordinator.trigger(Call::new().with_body(json!({ "name": "one" })));
        h.transport.wait_for_requests(1).await;
        let second = coordinator.trigger(Call::new().with_body(json!({ "name": "two" })));
        h.transport.wait_for_requests(2).await;

        second_reply.ok(201, json!({ "_id": "room-2" }));
        let outcome = second.await.unwrap();
        assert_eq!(outcome.response().and_then(|r| r.field("_id")), Some("room-2"));

        // the superseded call settles late; nothing may change
        first_reply.ok(201, json!({ "_id": "room-1" }));
        assert_eq!(first.await.unwrap(), Outcome::Cancelled);

        let state = coordinator.state();
        assert_eq!(state.data, Some(json!({ "_id": "room-2" })));
        assert!(!state.is_loading);
        assert_eq!(state.error_message, None);
    }

    #[tokio::test]
    async fn settlement_of_a_retired_generation_is_discarded() {
        let h = Harness::new(None);
        let _first = h.transport.gate();
        let second_reply = h.transport.gate();
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        let _ = coordinator.trigger(Call::new());
        h.transport.wait_for_requests(1).await;
        let second = coordinator.trigger(Call::new());

        // a transport that could not be aborted in time still reports back
        let late = coordinator.core.settle(
            1,
            false,
            Ok(HttpResponse::new(500, Some(json!({ "message": "boom" })))),
        );
        assert_eq!(late.unwrap(), Outcome::Cancelled);
        let state = coordinator.state();
        assert!(state.is_loading);
        assert_eq!(state.error_message, None);

        second_reply.ok(200, json!(["fresh"]));
        second.await.unwrap();
        assert_eq!(coordinator.data(), Some(json!(["fresh"])));
    }

    #[tokio::test]
    async fn signs_calls_with_the_shared_token() {
        let h = Harness::new(Some("abc"));
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        h.transport.respond(200, json!({}));
        coordinator.trigger(Call::new()).await.unwrap();
        assert_eq!(
            h.transport.requests()[0].authorization().as_deref(),
            Some("Bearer abc")
        );
    }

    #[tokio::test]
    async fn override_token_persists_for_every_binding() {
        let h = Harness::new(Some("abc"));
        let rooms: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());
        let other: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::put("/api/rooms/r1"), h.deps());

        for _ in 0..3 {
            h.transport.respond(200, json!({}));
        }
        rooms.trigger(Call::new().with_token("xyz")).await.unwrap();
        rooms.trigger(Call::new()).await.unwrap();
        other.trigger(Call::new()).await.unwrap();

        let signed: Vec<_> = h
            .transport
            .requests()
            .iter()
            .map(|r| r.authorization().unwrap())
            .collect();
        assert_eq!(signed, vec!["Bearer xyz", "Bearer xyz", "Bearer xyz"]);
        assert_eq!(h.auth.read().as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn unauthenticated_call_redirects_and_resolves() {
        let h = Harness::new(Some("expired"));
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        h.transport.respond(401, json!({ "message": "Unauthorized" }));
        let outcome = coordinator.trigger(Call::new()).await.unwrap();

        assert_eq!(outcome, Outcome::Redirected);
        assert_eq!(h.navigation.count(), 1);
        let state = coordinator.state();
        assert!(!state.is_loading);
        assert_eq!(state.error_message, None);
    }

    #[tokio::test]
    async fn suppressed_redirect_rejects_instead() {
        let h = Harness::new(Some("expired"));
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/login"), h.deps());

        h.transport.respond(401, json!({ "message": "Unknown user" }));
        let err = coordinator
            .trigger(Call::new().suppress_redirect())
            .await
            .unwrap_err();

        assert!(err.is_unauthenticated());
        assert_eq!(h.navigation.count(), 0);
        assert_eq!(coordinator.error_message().as_deref(), Some("Unknown user"));
    }

    #[tokio::test]
    async fn error_message_prefers_the_server_text() {
        let h = Harness::new(None);
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        h.transport.respond(409, json!({ "message": "Name taken" }));
        let err = coordinator.trigger(Call::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(coordinator.error_message().as_deref(), Some("Name taken"));

        h.transport.respond_empty(500);
        coordinator.trigger(Call::new()).await.unwrap_err();
        assert_eq!(coordinator.error_message().as_deref(), Some(FALLBACK_MESSAGE));

        h.transport.fail("connection refused");
        let err = coordinator.trigger(Call::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert_eq!(coordinator.error_message().as_deref(), Some(FALLBACK_MESSAGE));
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn success_clears_a_previous_error() {
        let h = Harness::new(None);
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        h.transport.respond(500, json!({ "message": "down" }));
        coordinator.trigger(Call::new()).await.unwrap_err();
        h.transport.respond(200, json!({ "ok": true }));
        coordinator.trigger(Call::new()).await.unwrap();

        assert_eq!(coordinator.error_message(), None);
        assert_eq!(coordinator.data(), Some(json!({ "ok": true })));
    }

    #[tokio::test]
    async fn validation_rejection_reaches_the_caller_unmodified() {
        let h = Harness::new(None);
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        h.transport.respond(
            400,
            json!({
                "type": "VALIDATION_ERROR",
                "message": "Invalid",
                "data": [{ "field": "passcode" }]
            }),
        );
        let err = coordinator.trigger(Call::new()).await.unwrap_err();

        assert_eq!(err.validation_issues()[0].field, "passcode");
        assert_eq!(err.response().unwrap().status, 400);
        assert_eq!(coordinator.error_message().as_deref(), Some("Invalid"));
    }

    #[tokio::test]
    async fn undecodable_success_is_a_failure() {
        let h = Harness::new(None);
        h.transport.respond(200, json!({ "rows": "not a list" }));
        let coordinator: RequestCoordinator<Vec<Deck>> =
            RequestCoordinator::new(Binding::get("/api/decks"), h.deps());
        coordinator.wait_idle().await;

        assert_eq!(coordinator.data(), None);
        assert_eq!(coordinator.error_message().as_deref(), Some(FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let h = Harness::new(None);
        let reply = h.transport.gate();
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        coordinator.cancel();

        let pending = coordinator.trigger(Call::new());
        coordinator.cancel();
        coordinator.cancel();
        reply.ok(200, json!({ "late": true }));

        assert_eq!(pending.await.unwrap(), Outcome::Cancelled);
        let state = coordinator.state();
        assert_eq!(state.data, None);
        assert!(!state.is_loading);
        assert_eq!(state.error_message, None);
    }

    #[tokio::test]
    async fn dropping_the_coordinator_cancels_its_call() {
        let h = Harness::new(None);
        let _reply = h.transport.gate();
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::post("/api/rooms"), h.deps());

        let pending = coordinator.trigger(Call::new());
        drop(coordinator);

        assert_eq!(pending.await.unwrap(), Outcome::Cancelled);
    }

    #[tokio::test]
    async fn token_change_refetches_get_bindings() {
        let h = Harness::new(Some("abc"));
        h.transport.respond(200, decks());
        let coordinator: RequestCoordinator<Vec<Deck>> =
            RequestCoordinator::new(Binding::get("/api/decks"), h.deps());
        coordinator.wait_idle().await;

        h.transport.respond(200, json!({ "rows": [] }));
        h.auth.write("def");
        let requests = h.transport.wait_for_requests(2).await;
        coordinator.wait_idle().await;

        assert_eq!(requests[1].authorization().as_deref(), Some("Bearer def"));
        assert_eq!(coordinator.data(), Some(vec![]));
    }

    #[tokio::test]
    async fn token_change_supersedes_the_mount_call() {
        let h = Harness::new(Some("abc"));
        let mount_reply = h.transport.gate();
        let refetch_reply = h.transport.gate();
        let coordinator: RequestCoordinator<Value> =
            RequestCoordinator::new(Binding::get("/api/rooms"), h.deps());
        h.transport.wait_for_requests(1).await;

        h.auth.write("def");
        h.transport.wait_for_requests(2).await;
        assert!(coordinator.is_loading());

        mount_reply.ok(200, json!("stale"));
        refetch_reply.ok(200, json!("fresh"));
        coordinator.wait_idle().await;

        assert_eq!(coordinator.data(), Some(json!("fresh")));
        assert_eq!(coordinator.error_message(), None);
    }

    #[tokio::test]
    async fn dropped_coordinator_ignores_token_changes() {
        let h = Harness::new(Some("abc"));
        h.transport.respond(200, decks());
        let coordinator: RequestCoordinator<Vec<Deck>> =
            RequestCoordinator::new(Binding::get("/api/decks"), h.deps());
        coordinator.wait_idle().await;
        drop(coordinator);

        h.transport.respond(401, json!({ "message": "Unauthorized" }));
        h.auth.write("new");
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(h.transport.requests().len(), 1);
        assert_eq!(h.navigation.count(), 0);
    }

    #[tokio::test]
    async fn own_override_does_not_refire() {
        let h = Harness::new(Some("abc"));
        h.transport.respond(200, decks());
        let coordinator: RequestCoordinator<Vec<Deck>> =
            RequestCoordinator::new(Binding::get("/api/decks"), h.deps());
        coordinator.wait_idle().await;

        h.transport.respond(200, decks());
        coordinator
            .trigger(Call::new().with_token("xyz"))
            .await
            .unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(h.transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_refetches_every_period() {
        let h = Harness::new(None);
        for _ in 0..3 {
            h.transport.respond(200, decks());
        }
        let coordinator: RequestCoordinator<Vec<Deck>> = RequestCoordinator::with_poll_interval(
            Binding::get("/api/decks"),
            h.deps(),
            Some(Duration::from_secs(5)),
        );

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(h.transport.requests().len(), 2);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(h.transport.requests().len(), 3);

        drop(coordinator);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(h.transport.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_tick_supersedes_a_call_in_flight() {
        let h = Harness::new(None);
        let mount_reply = h.transport.gate();
        let tick_reply = h.transport.gate();
        let coordinator: RequestCoordinator<Value> = RequestCoordinator::with_poll_interval(
            Binding::get("/api/rooms"),
            h.deps(),
            Some(Duration::from_secs(5)),
        );
        h.transport.wait_for_requests(1).await;

        tokio::time::sleep(Duration::from_millis(5_100)).await;
        h.transport.wait_for_requests(2).await;
        assert!(coordinator.is_loading());

        mount_reply.ok(200, json!("stale"));
        tick_reply.ok(200, json!("fresh"));
        coordinator.wait_idle().await;

        assert_eq!(coordinator.data(), Some(json!("fresh")));
        assert_eq!(h.transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn changing_the_poll_interval_refetches() {
        let h = Harness::new(None);
        for _ in 0..2 {
            h.transport.respond(200, decks());
        }
        let mut coordinator: RequestCoordinator<Vec<Deck>> =
            RequestCoordinator::new(Binding::get("/api/decks"), h.deps());
        coordinator.wait_idle().await;

        coordinator.set_poll_interval(Some(Duration::from_secs(60)));
        coordinator.wait_idle().await;
        assert_eq!(h.transport.requests().len(), 2);

        coordinator.set_poll_interval(Some(Duration::from_secs(60)));
        tokio::task::yield_now().await;
        assert_eq!(h.transport.requests().len(), 2);
    }
}
