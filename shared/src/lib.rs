pub mod errors;
pub mod protocol;

pub mod prelude {
    pub use crate::errors::{ErrorBody, ValidationIssue, VALIDATION_ERROR};
    pub use crate::protocol::*;
}
