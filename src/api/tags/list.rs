use super::TagResponse;
use crate::db::{self, DbPool};
use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use axum::{extract::State, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags", body = [TagResponse])
    )
)]
pub async fn list_tags(State(pool): State<Arc<DbPool>>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let mut conn = db::conn(&pool)?;

    let rows: Vec<Tag> = tags::table
        .select(Tag::as_select())
        .order(tags::name.asc())
        .load(&mut conn)?;

    Ok(Json(rows.into_iter().map(TagResponse::from_tag).collect()))
}
