use super::view::{self, RecipeResponse};
use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::models::{NewRecipe, NewRecipeIngredientLine, NewRecipeTag, Recipe};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};
use crate::validation::{self, IngredientEntry};
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub text: String,
    /// Opaque image reference (upload path or URL)
    pub image: String,
    /// Minutes, 1..=1440
    pub cooking_time: i32,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<IngredientEntry>,
}

/// Rejects tag/ingredient ids that do not exist, so the client gets a
/// field-labeled error instead of a foreign-key failure.
pub(super) fn check_references(
    conn: &mut PgConnection,
    tag_ids: &[Uuid],
    entries: &[IngredientEntry],
) -> Result<(), ApiError> {
    let known_tags: i64 = tags::table
        .filter(tags::id.eq_any(tag_ids))
        .count()
        .get_result(conn)?;
    if known_tags != tag_ids.len() as i64 {
        return Err(ApiError::field("tags", "Unknown tag id"));
    }

    let ingredient_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
    let known_ingredients: i64 = ingredients::table
        .filter(ingredients::id.eq_any(&ingredient_ids))
        .count()
        .get_result(conn)?;
    if known_ingredients != ingredient_ids.len() as i64 {
        return Err(ApiError::field("ingredients", "Unknown ingredient id"));
    }

    Ok(())
}

pub(super) fn insert_tag_links(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), ApiError> {
    let links: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&links)
        .execute(conn)?;
    Ok(())
}

pub(super) fn insert_ingredient_lines(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    entries: &[IngredientEntry],
) -> Result<(), ApiError> {
    let lines: Vec<NewRecipeIngredientLine> = entries
        .iter()
        .map(|entry| NewRecipeIngredientLine {
            recipe_id,
            ingredient_id: entry.id,
            amount: entry.amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&lines)
        .execute(conn)?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let name = validation::normalize_name(&request.name);
    validation::validate_name(&name)?;
    validation::validate_tags(&request.tags)?;
    validation::validate_ingredients(&request.ingredients)?;
    validation::validate_cooking_time(request.cooking_time)?;

    if request.text.trim().is_empty() {
        return Err(ApiError::field("text", "Text cannot be empty"));
    }
    if request.image.trim().is_empty() {
        return Err(ApiError::field("image", "Image cannot be empty"));
    }

    let mut conn = db::conn(&pool)?;

    // Recipe row, tag links, and ingredient lines land atomically; a recipe
    // with tags but no lines is never observable.
    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        let duplicate: i64 = recipes::table
            .filter(recipes::name.eq(&name))
            .filter(recipes::author_id.eq(user.id))
            .count()
            .get_result(conn)?;
        if duplicate > 0 {
            return Err(validation::duplicate_recipe_error());
        }

        check_references(conn, &request.tags, &request.ingredients)?;

        let new_recipe = NewRecipe {
            author_id: user.id,
            name: &name,
            text: &request.text,
            image: &request.image,
            cooking_time: request.cooking_time,
        };

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        insert_tag_links(conn, recipe.id, &request.tags)?;
        insert_ingredient_lines(conn, recipe.id, &request.ingredients)?;

        Ok(recipe)
    })?;

    let view = view::load_recipe_view(&mut conn, Some(&user), recipe)?;

    Ok((StatusCode::CREATED, Json(view)))
}
