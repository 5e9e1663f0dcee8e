use super::get::load_recipe;
use super::RecipeShortResponse;
use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::relations::{self, Relation};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Added to favorites", body = RecipeShortResponse),
        (status = 400, description = "Already favorited", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiError> {
    let mut conn = db::conn(&pool)?;

    let recipe = load_recipe(&mut conn, id)?;
    relations::add(&mut conn, Relation::Favorite, user.id, recipe.id)?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::from_recipe(&recipe)),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 400, description = "Not in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = db::conn(&pool)?;

    let recipe = load_recipe(&mut conn, id)?;
    relations::remove(&mut conn, Relation::Favorite, user.id, recipe.id)?;

    Ok(StatusCode::NO_CONTENT)
}
