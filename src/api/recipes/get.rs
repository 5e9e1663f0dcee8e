use super::view::{self, RecipeResponse};
use crate::auth::MaybeAuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::models::Recipe;
use crate::schema::recipes;
use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

pub(super) fn load_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Full recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = db::conn(&pool)?;

    let recipe = load_recipe(&mut conn, id)?;
    let response = view::load_recipe_view(&mut conn, viewer.as_ref(), recipe)?;

    Ok(Json(response))
}
