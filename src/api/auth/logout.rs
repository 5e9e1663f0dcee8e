use crate::auth::{delete_session, AuthUser};
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use axum::http::{header, HeaderMap, StatusCode};
use axum::extract::State;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    // The extractor already validated the header, so the token is present.
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized("Invalid Authorization header"))?;

    let mut conn = db::conn(&pool)?;
    delete_session(&mut conn, token)?;

    Ok(StatusCode::NO_CONTENT)
}
