use super::get::load_recipe;
use super::update::ensure_can_edit;
use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::schema::recipes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = db::conn(&pool)?;

    let recipe = load_recipe(&mut conn, id)?;
    ensure_can_edit(&user, &recipe)?;

    // Tag links, ingredient lines, favorites, and cart entries cascade.
    diesel::delete(recipes::table.find(recipe.id)).execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}
