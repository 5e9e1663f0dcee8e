use super::UserResponse;
use crate::auth::AuthUser;
use crate::error::ErrorResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    // A user never subscribes to themselves.
    Json(UserResponse::from_user(&user, false))
}
