//! Shared response envelope for API handlers.
//!
//! Successful responses use `{ "success": true, "data": ... }`; errors are
//! rendered by [`crate::error::AppError`] as `{ "success": false, ... }`.

use serde::Serialize;

/// Standard success envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::new(result)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
