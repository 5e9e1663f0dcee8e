use crate::api::recipes::RecipeShortResponse;
use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::models::{Recipe, User};
use crate::pagination::{PageMetadata, PageParams};
use crate::schema::{recipes, subscriptions, users};
use axum::{extract::Query, extract::State, Json};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubscriptionsParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size override (default: 10, max: 100)
    pub limit: Option<i64>,
    /// Truncate each author's recipe list to this many entries
    pub recipes_limit: Option<i64>,
}

/// A subscribed-to author together with their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeShortResponse>,
    /// Total number of recipes by this author, before truncation
    pub recipes_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionsResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
    pub pagination: PageMetadata,
}

/// Builds one subscription entry from an author and their recipes (newest
/// first), truncated by `recipes_limit`.
pub fn subscription_entry(
    author: &User,
    author_recipes: &[Recipe],
    recipes_limit: Option<i64>,
) -> SubscriptionResponse {
    let recipes_count = author_recipes.len() as i64;
    let shown = match recipes_limit {
        Some(limit) if limit >= 0 => &author_recipes[..author_recipes.len().min(limit as usize)],
        _ => author_recipes,
    };

    SubscriptionResponse {
        email: author.email.clone(),
        id: author.id,
        username: author.username.clone(),
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        is_subscribed: true,
        recipes: shown.iter().map(RecipeShortResponse::from_recipe).collect(),
        recipes_count,
    }
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(SubscriptionsParams),
    responses(
        (status = 200, description = "Authors the user subscribes to", body = SubscriptionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<SubscriptionsParams>,
) -> Result<Json<SubscriptionsResponse>, ApiError> {
    let page = PageParams {
        page: params.page,
        limit: params.limit,
    };

    let mut conn = db::conn(&pool)?;

    let subscribed_to = subscriptions::table
        .filter(subscriptions::subscriber_id.eq(user.id))
        .select(subscriptions::author_id);

    let rows: Vec<(User, i64)> = users::table
        .filter(users::id.eq_any(subscribed_to))
        .order(users::username.asc())
        .select((User::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(page.page_size())
        .offset(page.offset())
        .load(&mut conn)?;

    let count = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let author_ids: Vec<Uuid> = rows.iter().map(|(author, _)| author.id).collect();

    // One query for every author on the page, grouped in memory
    let all_recipes: Vec<Recipe> = recipes::table
        .filter(recipes::author_id.eq_any(&author_ids))
        .order(recipes::created_at.desc())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let mut by_author: HashMap<Uuid, Vec<Recipe>> = HashMap::new();
    for recipe in all_recipes {
        by_author.entry(recipe.author_id).or_default().push(recipe);
    }

    let empty = Vec::new();
    let entries = rows
        .iter()
        .map(|(author, _)| {
            let author_recipes = by_author.get(&author.id).unwrap_or(&empty);
            subscription_entry(author, author_recipes, params.recipes_limit)
        })
        .collect();

    Ok(Json(SubscriptionsResponse {
        subscriptions: entries,
        pagination: PageMetadata::new(count, &page),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn author() -> User {
        User {
            id: Uuid::new_v4(),
            username: "chef".to_string(),
            email: "chef@example.com".to_string(),
            first_name: "Julia".to_string(),
            last_name: "Child".to_string(),
            role: "user".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn recipe(author_id: Uuid, name: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            author_id,
            name: name.to_string(),
            text: "steps".to_string(),
            image: "recipes/img.png".to_string(),
            cooking_time: 30,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn recipes_limit_truncates_but_count_is_total() {
        let author = author();
        let owned: Vec<Recipe> = (0..5)
            .map(|i| recipe(author.id, &format!("Recipe {}", i)))
            .collect();

        let entry = subscription_entry(&author, &owned, Some(2));
        assert_eq!(entry.recipes.len(), 2);
        assert_eq!(entry.recipes_count, 5);
        assert!(entry.is_subscribed);
    }

    #[test]
    fn missing_limit_keeps_all_recipes() {
        let author = author();
        let owned: Vec<Recipe> = (0..3)
            .map(|i| recipe(author.id, &format!("Recipe {}", i)))
            .collect();

        let entry = subscription_entry(&author, &owned, None);
        assert_eq!(entry.recipes.len(), 3);
    }

    #[test]
    fn limit_larger_than_list_is_harmless() {
        let author = author();
        let owned = vec![recipe(author.id, "Solo")];
        let entry = subscription_entry(&author, &owned, Some(10));
        assert_eq!(entry.recipes.len(), 1);
    }
}
