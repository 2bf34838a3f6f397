use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::fetch::error::FetchError;
use crate::fetch::transport::HttpRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }

    /// Only POST and PUT carry a payload; a GET body is dropped.
    pub fn sends_body(self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static options applied to every call of a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// Handed to the transport as-is; the coordinator never schedules timeouts itself.
    pub timeout: Option<Duration>,
}

impl Options {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The fixed (resource, method, options) triple a coordinator serves.
///
/// A binding never changes once a coordinator owns it; binding another
/// resource means building another coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    resource_path: String,
    method: Method,
    options: Options,
}

impl Binding {
    pub fn new(resource_path: impl Into<String>, method: Method) -> Self {
        Self {
            resource_path: resource_path.into(),
            method,
            options: Options::default(),
        }
    }

    pub fn get(resource_path: impl Into<String>) -> Self {
        Self::new(resource_path, Method::Get)
    }

    pub fn post(resource_path: impl Into<String>) -> Self {
        Self::new(resource_path, Method::Post)
    }

    pub fn put(resource_path: impl Into<String>) -> Self {
        Self::new(resource_path, Method::Put)
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn request(
        &self,
        config: &ApiConfig,
        bearer: Option<String>,
        body: Option<Value>,
    ) -> HttpRequest {
        HttpRequest {
            method: self.method,
            url: config.url(&self.resource_path),
            headers: self.options.headers.clone(),
            query: self.options.query.clone(),
            timeout: self.options.timeout,
            bearer,
            body: body.filter(|_| self.method.sends_body()),
        }
    }
}

/// Arguments of a single `trigger`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
    pub body: Option<Value>,
    /// Surface a 401 to the caller instead of redirecting to the login screen.
    pub suppress_redirect: bool,
    /// Token for this call; when non-empty it is also written back to the
    /// shared auth context.
    pub token_override: Option<String>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<B: Serialize>(self, body: &B) -> Result<Self, FetchError> {
        let body = serde_json::to_value(body).map_err(FetchError::Encode)?;
        Ok(self.with_body(body))
    }

    pub fn suppress_redirect(mut self) -> Self {
        self.suppress_redirect = true;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token_override = Some(token.into());
        self
    }
}
