use super::create::{check_references, insert_ingredient_lines, insert_tag_links};
use super::get::load_recipe;
use super::view::{self, RecipeResponse};
use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::models::{Recipe, User};
use crate::schema::{recipe_ingredients, recipe_tags, recipes};
use crate::validation::{self, IngredientEntry};
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial update; omitted fields keep their current value. Providing `tags`
/// or `ingredients` replaces the whole collection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<Uuid>>,
    pub ingredients: Option<Vec<IngredientEntry>>,
}

/// Swaps the recipe's tag set: the old links go away entirely, only the new
/// set remains.
pub(super) fn replace_tag_links(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), ApiError> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    insert_tag_links(conn, recipe_id, tag_ids)
}

pub(super) fn replace_ingredient_lines(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    entries: &[IngredientEntry],
) -> Result<(), ApiError> {
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    insert_ingredient_lines(conn, recipe_id, entries)
}

pub(super) fn ensure_can_edit(user: &User, recipe: &Recipe) -> Result<(), ApiError> {
    if recipe.author_id == user.id || user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not have permission to modify this recipe",
        ))
    }
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let name = request.name.as_deref().map(validation::normalize_name);
    if let Some(name) = &name {
        validation::validate_name(name)?;
    }
    if let Some(tags) = &request.tags {
        validation::validate_tags(tags)?;
    }
    if let Some(entries) = &request.ingredients {
        validation::validate_ingredients(entries)?;
    }
    if let Some(cooking_time) = request.cooking_time {
        validation::validate_cooking_time(cooking_time)?;
    }
    if let Some(text) = &request.text {
        if text.trim().is_empty() {
            return Err(ApiError::field("text", "Text cannot be empty"));
        }
    }
    if let Some(image) = &request.image {
        if image.trim().is_empty() {
            return Err(ApiError::field("image", "Image cannot be empty"));
        }
    }

    let mut conn = db::conn(&pool)?;

    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        let recipe = load_recipe(conn, id)?;
        ensure_can_edit(&user, &recipe)?;

        if let Some(name) = &name {
            let duplicate: i64 = recipes::table
                .filter(recipes::name.eq(name))
                .filter(recipes::author_id.eq(recipe.author_id))
                .filter(recipes::id.ne(recipe.id))
                .count()
                .get_result(conn)?;
            if duplicate > 0 {
                return Err(validation::duplicate_recipe_error());
            }
        }

        check_references(
            conn,
            request.tags.as_deref().unwrap_or(&[]),
            request.ingredients.as_deref().unwrap_or(&[]),
        )?;

        let recipe: Recipe = diesel::update(recipes::table.find(recipe.id))
            .set((
                recipes::name.eq(name.as_deref().unwrap_or(&recipe.name)),
                recipes::text.eq(request.text.as_deref().unwrap_or(&recipe.text)),
                recipes::image.eq(request.image.as_deref().unwrap_or(&recipe.image)),
                recipes::cooking_time.eq(request.cooking_time.unwrap_or(recipe.cooking_time)),
                recipes::updated_at.eq(Utc::now()),
            ))
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        if let Some(tag_ids) = &request.tags {
            replace_tag_links(conn, recipe.id, tag_ids)?;
        }
        if let Some(entries) = &request.ingredients {
            replace_ingredient_lines(conn, recipe.id, entries)?;
        }

        Ok(recipe)
    })?;

    let response = view::load_recipe_view(&mut conn, Some(&user), recipe)?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ROLE_ADMIN;
    use chrono::Utc;

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: role.to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn recipe_by(author_id: Uuid) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            author_id,
            name: "Borscht".to_string(),
            text: "steps".to_string(),
            image: "recipes/borscht.png".to_string(),
            cooking_time: 90,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_can_edit() {
        let author = user("user");
        let recipe = recipe_by(author.id);
        assert!(ensure_can_edit(&author, &recipe).is_ok());
    }

    #[test]
    fn stranger_cannot_edit() {
        let stranger = user("user");
        let recipe = recipe_by(Uuid::new_v4());
        assert!(matches!(
            ensure_can_edit(&stranger, &recipe),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_can_edit_anything() {
        let admin = user(ROLE_ADMIN);
        let recipe = recipe_by(Uuid::new_v4());
        assert!(ensure_can_edit(&admin, &recipe).is_ok());
    }

    // Runs only when DATABASE_URL points at a Postgres instance; rolls back
    // via a test transaction.
    #[test]
    fn new_tag_set_fully_replaces_the_old_set() {
        use crate::models::{NewRecipe, NewTag, NewUser, Tag};
        use crate::schema::{recipe_tags, tags, users};
        use diesel_migrations::MigrationHarness;

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => return,
        };

        let mut conn = PgConnection::establish(&database_url).expect("connect to database");
        conn.run_pending_migrations(crate::db::MIGRATIONS)
            .expect("run migrations");
        conn.begin_test_transaction().expect("begin test transaction");

        let author: User = diesel::insert_into(users::table)
            .values(&NewUser {
                username: "tagswap",
                email: "tagswap@example.com",
                first_name: "Tag",
                last_name: "Swap",
                password_hash: "x",
            })
            .returning(User::as_returning())
            .get_result(&mut conn)
            .unwrap();

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: author.id,
                name: "Tag swap stew",
                text: "steps",
                image: "recipes/stew.png",
                cooking_time: 30,
            })
            .returning(Recipe::as_returning())
            .get_result(&mut conn)
            .unwrap();

        let mut tag_ids = Vec::new();
        for slug in ["first", "second", "third"] {
            let tag: Tag = diesel::insert_into(tags::table)
                .values(&NewTag {
                    name: slug,
                    color: None,
                    slug,
                })
                .returning(Tag::as_returning())
                .get_result(&mut conn)
                .unwrap();
            tag_ids.push(tag.id);
        }

        replace_tag_links(&mut conn, recipe.id, &tag_ids[..2]).unwrap();
        replace_tag_links(&mut conn, recipe.id, &tag_ids[2..]).unwrap();

        let linked: Vec<Uuid> = recipe_tags::table
            .filter(recipe_tags::recipe_id.eq(recipe.id))
            .select(recipe_tags::tag_id)
            .load(&mut conn)
            .unwrap();
        assert_eq!(linked, vec![tag_ids[2]]);
    }
}
