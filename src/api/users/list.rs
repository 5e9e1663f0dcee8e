use super::UserResponse;
use crate::auth::MaybeAuthUser;
use crate::db::{self, DbPool};
use crate::error::ApiError;
use crate::models::User;
use crate::pagination::{PageMetadata, PageParams};
use crate::relations;
use crate::schema::users;
use axum::{extract::Query, extract::State, Json};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub pagination: PageMetadata,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated list of users", body = ListUsersResponse)
    )
)]
pub async fn list_users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let mut conn = db::conn(&pool)?;

    // COUNT(*) OVER() carries the total across the page in one query
    let rows: Vec<(User, i64)> = users::table
        .order(users::username.asc())
        .select((User::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(params.page_size())
        .offset(params.offset())
        .load(&mut conn)?;

    let count = rows.first().map(|(_, total)| *total).unwrap_or(0);

    let ids: Vec<Uuid> = rows.iter().map(|(user, _)| user.id).collect();
    let subscribed = match viewer {
        Some(ref viewer) => relations::subscribed_ids(&mut conn, viewer.id, &ids)?,
        None => Default::default(),
    };

    let users = rows
        .into_iter()
        .map(|(user, _)| {
            let is_subscribed = subscribed.contains(&user.id);
            UserResponse::from_user(&user, is_subscribed)
        })
        .collect();

    Ok(Json(ListUsersResponse {
        users,
        pagination: PageMetadata::new(count, &params),
    }))
}
