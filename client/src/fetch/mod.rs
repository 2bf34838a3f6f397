//! Coordinated HTTP calls for UI bindings: single-flight dispatch, bearer
//! signing from a shared [`AuthContext`] and the login redirect on 401.

mod auth;
mod binding;
mod coordinator;
mod error;
mod navigation;
mod state;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthContext;
pub use binding::{Binding, Call, Method, Options};
pub use coordinator::{Dependencies, Outcome, PendingCall, RequestCoordinator};
pub use error::{FetchError, FALLBACK_MESSAGE, UNAUTHENTICATED};
pub use navigation::NavigationController;
pub use state::RequestState;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
