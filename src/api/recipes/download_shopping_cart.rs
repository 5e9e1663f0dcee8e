use crate::auth::AuthUser;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::schema::{cart_items, ingredients, recipe_ingredients};
use crate::shopping_list::{self, CartLine};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Aggregated shopping list as plain text", body = String),
        (status = 400, description = "Shopping cart is empty", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<(HeaderMap, String), ApiError> {
    let mut conn = db::conn(&pool)?;

    let cart_recipes = cart_items::table
        .filter(cart_items::user_id.eq(user.id))
        .select(cart_items::recipe_id);

    let cart_size: i64 = cart_items::table
        .filter(cart_items::user_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;
    if cart_size == 0 {
        return Err(ApiError::EmptyCart);
    }

    // Stable recipe order keeps the aggregated group order deterministic.
    let rows: Vec<(String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(cart_recipes))
        .order((recipe_ingredients::recipe_id.asc(), ingredients::name.asc()))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(&mut conn)?;

    let lines: Vec<CartLine> = rows
        .into_iter()
        .map(|(ingredient_name, measurement_unit, amount)| CartLine {
            ingredient_name,
            measurement_unit,
            amount,
        })
        .collect();

    let totals = shopping_list::aggregate(&lines);
    let report = shopping_list::render_report(&user.full_name(), &totals);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    let disposition = format!(
        "attachment; filename=\"{}_shopping_list.txt\"",
        user.username
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| ApiError::Internal("Invalid download filename"))?,
    );

    Ok((headers, report))
}
