//! Route handlers. Each one parses its inputs, calls a service and wraps the
//! outcome in the response envelope; rules live in `services`.

pub mod companies;
pub mod interviews;
pub mod system;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids that are not UUIDs are a client error, not a missing record
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Resource id {} is not valid", raw)))
}
