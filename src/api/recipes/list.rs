use super::view::{self, RecipeResponse};
use crate::auth::MaybeAuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::models::Recipe;
use crate::pagination::{PageMetadata, PageParams};
use crate::schema::{cart_items, favorites, recipe_tags, recipes, tags};
use axum::extract::State;
use axum_extra::extract::Query;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Accepts "1"/"0" and "true"/"false" for the membership filter flags.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None => Ok(None),
        Some("1") | Some("true") => Ok(Some(true)),
        Some("0") | Some("false") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid flag value: {other}"
        ))),
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size override (default: 10, max: 100)
    pub limit: Option<i64>,
    /// Tag slugs; repeat the parameter to OR several tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Only recipes the caller has favorited
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub is_favorited: Option<bool>,
    /// Only recipes in the caller's shopping cart
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub is_in_shopping_cart: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
    pub pagination: PageMetadata,
}

/// Only an explicit true narrows the listing. A false flag is a no-op, not
/// the complement: `is_favorited=0` returns the unfiltered page.
fn membership_filter_active(flag: Option<bool>) -> bool {
    flag == Some(true)
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Page of recipes, newest first", body = ListRecipesResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> Result<axum::Json<ListRecipesResponse>, ApiError> {
    let page = PageParams {
        page: params.page,
        limit: params.limit,
    };

    // The membership filters are meaningless without a caller; anonymous
    // requests asking for them get an empty page rather than an error.
    let wants_membership = membership_filter_active(params.is_favorited)
        || membership_filter_active(params.is_in_shopping_cart);
    if viewer.is_none() && wants_membership {
        return Ok(axum::Json(ListRecipesResponse {
            recipes: Vec::new(),
            pagination: PageMetadata::new(0, &page),
        }));
    }

    let mut conn = db::conn(&pool)?;

    let mut query = recipes::table.into_boxed();

    if !params.tags.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(&params.tags))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    if let Some(author_id) = params.author {
        query = query.filter(recipes::author_id.eq(author_id));
    }

    if let Some(viewer) = &viewer {
        if membership_filter_active(params.is_favorited) {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(viewer.id))
                .select(favorites::recipe_id);
            query = query.filter(recipes::id.eq_any(favorited));
        }
        if membership_filter_active(params.is_in_shopping_cart) {
            let in_cart = cart_items::table
                .filter(cart_items::user_id.eq(viewer.id))
                .select(cart_items::recipe_id);
            query = query.filter(recipes::id.eq_any(in_cart));
        }
    }

    let rows: Vec<(Recipe, i64)> = query
        .order(recipes::created_at.desc())
        .select((Recipe::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(page.page_size())
        .offset(page.offset())
        .load(&mut conn)?;

    let count = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let page_recipes: Vec<Recipe> = rows.into_iter().map(|(recipe, _)| recipe).collect();

    let views = view::load_recipe_views(&mut conn, viewer.as_ref(), page_recipes)?;

    Ok(axum::Json(ListRecipesResponse {
        recipes: views,
        pagination: PageMetadata::new(count, &page),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct FlagHolder {
        #[serde(default, deserialize_with = "deserialize_flag")]
        flag: Option<bool>,
    }

    fn parse(query: &str) -> Result<Option<bool>, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str::<FlagHolder>(query).map(|h| h.flag)
    }

    #[test]
    fn flag_accepts_numeric_and_word_forms() {
        assert_eq!(parse("flag=1").unwrap(), Some(true));
        assert_eq!(parse("flag=true").unwrap(), Some(true));
        assert_eq!(parse("flag=0").unwrap(), Some(false));
        assert_eq!(parse("flag=false").unwrap(), Some(false));
    }

    #[test]
    fn flag_defaults_to_none_when_absent() {
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn flag_rejects_garbage() {
        assert!(parse("flag=yes").is_err());
        assert!(parse("flag=2").is_err());
    }

    #[test]
    fn false_flag_does_not_narrow_the_listing() {
        assert!(membership_filter_active(Some(true)));
        assert!(!membership_filter_active(Some(false)));
        assert!(!membership_filter_active(None));
    }
}
