//! Shared response envelope types for API handlers.
//!
//! Listing responses use a `{ "data": ... }` envelope; mutations that have
//! nothing to return answer with an empty object.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: boards }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Serializes to `{}`.
#[derive(Debug, Default, Serialize)]
pub struct EmptyResponse {}
