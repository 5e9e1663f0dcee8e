use super::UserResponse;
use crate::auth::MaybeAuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::models::User;
use crate::relations;
use crate::schema::users;
use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = db::conn(&pool)?;

    let user: User = users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))?;

    let is_subscribed = match viewer {
        Some(ref viewer) if viewer.id != user.id => {
            !relations::subscribed_ids(&mut conn, viewer.id, &[user.id])?.is_empty()
        }
        _ => false,
    };

    Ok(Json(UserResponse::from_user(&user, is_subscribed)))
}
