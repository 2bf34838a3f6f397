use serde::{Deserialize, Serialize};

// `type` tag the server puts on structured field rejections
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

// Error body returned by the lobby API. Every field is optional: the client
// has to cope with bare status codes and bodies from proxies.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<ValidationIssue>,
}

impl ErrorBody {
    pub fn is_validation(&self) -> bool {
        self.kind.as_deref() == Some(VALIDATION_ERROR)
    }
}

// One offending field of a validation rejection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
