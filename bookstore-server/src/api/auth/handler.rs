//! Authentication Handlers
//!
//! Handles registration, login and the current-user lookup

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, UserInfo, UserResponse};

use crate::AppError;
use crate::auth::{CurrentUser, get_default_permissions};
use crate::core::ServerState;
use crate::stores::User;
use crate::utils::Cancellation;
use crate::utils::validation::validate_register;

/// Register a new account
pub async fn register(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let role = validate_register(&req)?;

    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let user = state.users.create(
        User {
            id: 0,
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        },
        &cancel,
    )?;

    Ok((StatusCode::CREATED, Json(user.to_response())))
}

/// Login handler
///
/// Authenticates credentials and returns a JWT carrying the role's
/// default permission set
pub async fn login(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.users.find_by_email(req.email.trim(), &cancel)?;

    // unified error message for unknown email and wrong password
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let permissions = get_default_permissions(user.role);
    let token = state
        .jwt_service
        .generate_token(user.id, &user.email, &user.name, user.role, &permissions)?;

    tracing::info!(
        user_id = user.id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: user.to_response(),
    }))
}

/// Get current user info
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        permissions: user.permissions.to_vec(),
    })
}
