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
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Added to shopping cart", body = RecipeShortResponse),
        (status = 400, description = "Already in cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiError> {
    let mut conn = db::conn(&pool)?;

    let recipe = load_recipe(&mut conn, id)?;
    relations::add(&mut conn, Relation::Cart, user.id, recipe.id)?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::from_recipe(&recipe)),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Removed from shopping cart"),
        (status = 400, description = "Not in cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = db::conn(&pool)?;

    let recipe = load_recipe(&mut conn, id)?;
    relations::remove(&mut conn, Relation::Cart, user.id, recipe.id)?;

    Ok(StatusCode::NO_CONTENT)
}
