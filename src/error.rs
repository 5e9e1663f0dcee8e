use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

/// Shared error body used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error taxonomy for the whole API. Handlers return `Result<_, ApiError>`
/// and the `IntoResponse` impl below picks the status code and body shape.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-labeled validation failures, rendered as `{"<field>": "<message>"}`.
    #[error("validation failed")]
    Validation(BTreeMap<&'static str, String>),

    /// Relationship toggle conflicts (duplicate add, remove of an absent
    /// relation, self-subscribe). The legacy API returns 400 here, not 409.
    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("The shopping cart is empty")]
    EmptyCart,

    /// Storage-layer failures, including integrity violations that slipped
    /// past application-level checks. Fatal for the request.
    #[error("database error: {0}")]
    Database(diesel::result::Error),

    #[error("database connection failed")]
    Pool,

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Single field-labeled validation error.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field, message.into());
        ApiError::Validation(fields)
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ApiError::NotFound("Resource"),
            other => ApiError::Database(other),
        }
    }
}

fn simple(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            ApiError::Conflict(message) => simple(StatusCode::BAD_REQUEST, message),
            ApiError::EmptyCart => {
                simple(StatusCode::BAD_REQUEST, "The shopping cart is empty".to_string())
            }
            ApiError::NotFound(what) => {
                simple(StatusCode::NOT_FOUND, format!("{} not found", what))
            }
            ApiError::Forbidden(message) => simple(StatusCode::FORBIDDEN, message.to_string()),
            ApiError::Unauthorized(message) => {
                simple(StatusCode::UNAUTHORIZED, message.to_string())
            }
            ApiError::Database(err) => {
                tracing::error!("database error: {}", err);
                simple(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Pool => {
                tracing::error!("database connection failed");
                simple(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database connection failed".to_string(),
                )
            }
            ApiError::Internal(message) => {
                tracing::error!("internal error: {}", message);
                simple(StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_carries_single_entry() {
        let err = ApiError::field("tags", "At least one tag is required");
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields["tags"], "At least one tag is required");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err: ApiError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
