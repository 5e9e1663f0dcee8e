use super::UserResponse;
use crate::auth::hash_password;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ErrorResponse};
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

fn validate_signup(req: &CreateUserRequest) -> Result<(), ApiError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::field("email", "Enter a valid email address"));
    }
    if req.username.trim().is_empty() {
        return Err(ApiError::field("username", "Username cannot be empty"));
    }
    if req.first_name.trim().is_empty() {
        return Err(ApiError::field("first_name", "First name cannot be empty"));
    }
    if req.last_name.trim().is_empty() {
        return Err(ApiError::field("last_name", "Last name cannot be empty"));
    }
    if req.password.is_empty() {
        return Err(ApiError::field("password", "Password cannot be empty"));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_signup(&req)?;

    let mut conn = db::conn(&pool)?;

    // Pre-insert checks produce field-labeled errors; the unique constraints
    // remain the backstop for races and surface as a generic 500.
    let email_taken: i64 = users::table
        .filter(users::email.eq(&req.email))
        .count()
        .get_result(&mut conn)?;
    if email_taken > 0 {
        return Err(ApiError::field(
            "email",
            "A user with this email already exists",
        ));
    }

    let username_taken: i64 = users::table
        .filter(users::username.eq(&req.username))
        .count()
        .get_result(&mut conn)?;
    if username_taken > 0 {
        return Err(ApiError::field(
            "username",
            "A user with this username already exists",
        ));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("failed to hash password: {}", e);
        ApiError::Internal("Failed to hash password")
    })?;

    let new_user = NewUser {
        username: &req.username,
        email: &req.email,
        first_name: &req.first_name,
        last_name: &req.last_name,
        password_hash: &password_hash,
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::from_user(&user, false)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn complete_signup_accepted() {
        assert!(validate_signup(&request()).is_ok());
    }

    #[test]
    fn malformed_email_rejected() {
        let mut req = request();
        req.email = "not-an-email".to_string();
        assert!(validate_signup(&req).is_err());
    }

    #[test]
    fn blank_fields_rejected() {
        for field in ["username", "first_name", "last_name", "password"] {
            let mut req = request();
            match field {
                "username" => req.username = "  ".to_string(),
                "first_name" => req.first_name = String::new(),
                "last_name" => req.last_name = String::new(),
                _ => req.password = String::new(),
            }
            assert!(validate_signup(&req).is_err(), "field = {}", field);
        }
    }
}
