use shared::errors::{ErrorBody, ValidationIssue};
use thiserror::Error;

use crate::fetch::transport::{HttpResponse, TransportError};

/// Shown when the server did not say what went wrong.
pub const FALLBACK_MESSAGE: &str = "Something went wrong.";

pub const UNAUTHENTICATED: u16 = 401;

/// Failure of one coordinated call. Every variant that came from the server
/// keeps the raw response so call sites can dig into it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication required")]
    Unauthenticated { response: HttpResponse },

    #[error("request rejected: {} invalid field(s)", .issues.len())]
    Validation {
        response: HttpResponse,
        issues: Vec<ValidationIssue>,
    },

    #[error("request failed with status {}", .response.status)]
    Status { response: HttpResponse },

    #[error(transparent)]
    Network(#[from] TransportError),

    #[error("failed to decode response body: {source}")]
    Decode {
        response: HttpResponse,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl FetchError {
    /// Classifies a non-2xx response.
    pub(crate) fn from_response(response: HttpResponse) -> Self {
        if response.status == UNAUTHENTICATED {
            return FetchError::Unauthenticated { response };
        }
        let body = response
            .body
            .clone()
            .and_then(|body| serde_json::from_value::<ErrorBody>(body).ok());
        match body {
            Some(body) if body.is_validation() => FetchError::Validation {
                response,
                issues: body.data,
            },
            _ => FetchError::Status { response },
        }
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            FetchError::Unauthenticated { response }
            | FetchError::Validation { response, .. }
            | FetchError::Status { response }
            | FetchError::Decode { response, .. } => Some(response),
            FetchError::Network(_) | FetchError::Encode(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, FetchError::Unauthenticated { .. })
    }

    pub fn validation_issues(&self) -> &[ValidationIssue] {
        match self {
            FetchError::Validation { issues, .. } => issues,
            _ => &[],
        }
    }

    /// `message` field of the error body, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        self.response()?.field("message")
    }

    pub fn user_message(&self) -> String {
        self.server_message().unwrap_or(FALLBACK_MESSAGE).to_string()
    }
}
