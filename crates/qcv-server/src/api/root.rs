//! Greeting endpoint.

use axum::Json;

use crate::dto::GreetingResponse;

/// GET / - Fixed greeting.
pub async fn root() -> Json<GreetingResponse> {
    Json(GreetingResponse::default())
}
