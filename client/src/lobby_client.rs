use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::prelude::*;
use tracing::info;

use crate::config::ApiConfig;
use crate::fetch::{
    AuthContext, Binding, Dependencies, NavigationController, ReqwestTransport, RequestCoordinator,
    Transport, TransportError,
};

/// Everything the lobby screens share: API location, session token,
/// transport and the login redirect. Each screen binds its own coordinators
/// from here.
#[derive(Clone)]
pub struct LobbyClient {
    deps: Dependencies,
}

impl LobbyClient {
    pub fn new(
        config: ApiConfig,
        navigation: Arc<dyn NavigationController>,
    ) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(
            config,
            AuthContext::anonymous(),
            navigation,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        config: ApiConfig,
        auth: AuthContext,
        navigation: Arc<dyn NavigationController>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        info!("Lobby api: {}", config.base_url());
        Self {
            deps: Dependencies {
                config: Arc::new(config),
                auth,
                navigation,
                transport,
            },
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.deps.config
    }

    pub fn auth(&self) -> &AuthContext {
        &self.deps.auth
    }

    pub fn dependencies(&self) -> Dependencies {
        self.deps.clone()
    }

    pub fn bind<T>(&self, binding: Binding) -> RequestCoordinator<T>
    where
        T: DeserializeOwned + Clone + Send + 'static,
    {
        RequestCoordinator::new(binding, self.dependencies())
    }

    // Room listing, optionally kept fresh by polling.
    pub fn rooms(&self, poll_interval: Option<Duration>) -> RequestCoordinator<Vec<Room>> {
        RequestCoordinator::with_poll_interval(
            Binding::get(ROOMS_PATH),
            self.dependencies(),
            poll_interval,
        )
    }

    pub fn decks(&self) -> RequestCoordinator<Vec<Deck>> {
        self.bind(Binding::get(DECKS_PATH))
    }

    pub fn create_room(&self) -> RequestCoordinator<Value> {
        self.bind(Binding::post(ROOMS_PATH))
    }

    pub fn login(&self) -> RequestCoordinator<LoginResponse> {
        self.bind(Binding::post(LOGIN_PATH))
    }
}
