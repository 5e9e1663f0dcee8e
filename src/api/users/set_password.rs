use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Emptiness is checked before the old/new comparison so an empty new
/// password is always reported as empty.
fn validate_new_password(old_password: &str, new_password: &str) -> Result<(), ApiError> {
    if new_password.is_empty() {
        return Err(ApiError::field("new_password", "Password cannot be empty"));
    }
    if old_password == new_password {
        return Err(ApiError::field(
            "new_password",
            "New password matches the old one",
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if !verify_password(&req.old_password, &user.password_hash) {
        return Err(ApiError::field("old_password", "Wrong old password"));
    }
    validate_new_password(&req.old_password, &req.new_password)?;

    let password_hash = hash_password(&req.new_password).map_err(|e| {
        tracing::error!("failed to hash password: {}", e);
        ApiError::Internal("Failed to hash password")
    })?;

    let mut conn = db::conn(&pool)?;
    diesel::update(users::table.find(user.id))
        .set((
            users::password_hash.eq(&password_hash),
            users::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_for(err: ApiError) -> String {
        match err {
            ApiError::Validation(fields) => fields["new_password"].clone(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn empty_new_password_reported_as_empty() {
        // Even when the old password is empty too, emptiness wins.
        let err = validate_new_password("", "").unwrap_err();
        assert_eq!(message_for(err), "Password cannot be empty");
    }

    #[test]
    fn reused_password_rejected() {
        let err = validate_new_password("secret", "secret").unwrap_err();
        assert_eq!(message_for(err), "New password matches the old one");
    }

    #[test]
    fn fresh_password_accepted() {
        assert!(validate_new_password("old-secret", "new-secret").is_ok());
    }
}
