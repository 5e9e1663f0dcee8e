use super::IngredientResponse;
use crate::db::{self, DbPool};
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{extract::Query, extract::State, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-insensitive name prefix to search for
    pub name: Option<String>,
}

/// Escapes LIKE wildcards and builds the prefix pattern.
fn prefix_pattern(prefix: &str) -> String {
    format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"))
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Ingredients matching the name prefix", body = [IngredientResponse])
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListIngredientsParams>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let mut conn = db::conn(&pool)?;

    let mut query = ingredients::table.into_boxed();

    if let Some(ref prefix) = params.name {
        if !prefix.is_empty() {
            query = query.filter(ingredients::name.ilike(prefix_pattern(prefix)));
        }
    }

    let rows: Vec<Ingredient> = query
        .select(Ingredient::as_select())
        .order(ingredients::name.asc())
        .load(&mut conn)?;

    Ok(Json(
        rows.into_iter()
            .map(IngredientResponse::from_ingredient)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_prefix_anchored() {
        assert_eq!(prefix_pattern("salt"), "salt%");
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("100%_pure"), "100\\%\\_pure%");
    }
}
