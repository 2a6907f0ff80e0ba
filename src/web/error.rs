//! API errors with IntoResponse
//!
//! Every failure becomes a JSON body `{"error": code, "message": "Error: ..."}`
//! with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::loader::LoadError;

#[derive(Debug)]
pub enum ApiError {
    /// Catalog query failed; the pool is still usable (500)
    Query(sqlx::Error),

    /// Create, drop or clear batch failed and was rolled back (500)
    Schema(sqlx::Error),

    /// Bulk load aborted; tables loaded before the failure are kept
    /// (422 for bad input, 500 for database failures)
    Load(LoadError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Query(e) => {
                tracing::warn!("Query failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "query_error",
                        "message": format!("Error: {}", e)
                    }),
                )
            }
            Self::Schema(e) => {
                tracing::error!("Schema operation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "schema_error",
                        "message": format!("Error: {}", e)
                    }),
                )
            }
            Self::Load(e) => {
                tracing::error!("Load failed, data may be incomplete: {}", e);
                let status = if e.is_input_error() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (
                    status,
                    json!({
                        "error": "load_error",
                        "message": format!("Error: {}", e),
                        "partial": true
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<LoadError> for ApiError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}
