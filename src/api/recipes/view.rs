//! Assembly of the full recipe representation: tags, ingredient lines,
//! author, and the per-viewer membership projections. The projections are
//! computed per request by joining the relationship edge sets against the
//! ids on the page; they are never stored.

use crate::api::tags::TagResponse;
use crate::api::users::UserResponse;
use crate::error::ApiError;
use crate::models::{Ingredient, Recipe, Tag, User};
use crate::relations;
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, tags, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientAmountResponse {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<IngredientAmountResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Builds full views for a page of recipes with a fixed number of queries,
/// independent of page size.
pub fn load_recipe_views(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    page: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    let recipe_ids: Vec<Uuid> = page.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = {
        let unique: HashSet<Uuid> = page.iter().map(|r| r.author_id).collect();
        unique.into_iter().collect()
    };

    let authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let tag_rows: Vec<(Uuid, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;

    let line_rows: Vec<(Uuid, Ingredient, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .select((
            recipe_ingredients::recipe_id,
            Ingredient::as_select(),
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    let mut tags_by_recipe: HashMap<Uuid, Vec<TagResponse>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(TagResponse::from_tag(tag));
    }

    let mut lines_by_recipe: HashMap<Uuid, Vec<IngredientAmountResponse>> = HashMap::new();
    for (recipe_id, ingredient, amount) in line_rows {
        lines_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(IngredientAmountResponse {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount,
            });
    }

    let (favorited, in_cart, subscribed) = match viewer {
        Some(viewer) => (
            relations::favorited_ids(conn, viewer.id, &recipe_ids)?,
            relations::cart_ids(conn, viewer.id, &recipe_ids)?,
            relations::subscribed_ids(conn, viewer.id, &author_ids)?,
        ),
        None => Default::default(),
    };

    let views = page
        .into_iter()
        .map(|recipe| {
            let author = authors.get(&recipe.author_id).map(|author| {
                UserResponse::from_user(author, subscribed.contains(&author.id))
            });
            // The author row always exists; the FK guarantees it.
            let author = author.unwrap_or_else(|| UserResponse {
                email: String::new(),
                id: recipe.author_id,
                username: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                is_subscribed: false,
            });

            RecipeResponse {
                id: recipe.id,
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                author,
                ingredients: lines_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                name: recipe.name,
                image: recipe.image,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                created_at: recipe.created_at,
                updated_at: recipe.updated_at,
            }
        })
        .collect();

    Ok(views)
}

/// Single-recipe convenience wrapper around [`load_recipe_views`].
pub fn load_recipe_view(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    recipe: Recipe,
) -> Result<RecipeResponse, ApiError> {
    let mut views = load_recipe_views(conn, viewer, vec![recipe])?;
    views
        .pop()
        .ok_or(ApiError::Internal("Failed to build recipe view"))
}
