//! Sign-up and login.
//!
//! `POST /api/auth/signup`: create an account
//! `POST /api/auth/login`: verify credentials for a role
//!
//! No session token is issued; both return the account profile.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{AccountProfile, NewAccount, Role};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: AccountProfile,
}

pub async fn signup(
    State(ctx): State<ApiContext>,
    body: Result<Json<NewAccount>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(new_account) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // Password hashing is CPU-bound.
    let core = ctx.core.clone();
    let user = tokio::task::spawn_blocking(move || core.accounts.register(new_account))
        .await
        .map_err(|e| ApiError::Internal(format!("signup task failed: {e}")))??;

    Ok(Json(AuthResponse {
        success: true,
        user,
    }))
}

pub async fn login(
    State(ctx): State<ApiContext>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let core = ctx.core.clone();
    let user = tokio::task::spawn_blocking(move || {
        core.accounts
            .authenticate(&request.email, &request.password, request.role)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("login task failed: {e}")))?
    .inspect_err(|_| tracing::info!("Login rejected"))?;

    tracing::info!(account_id = %user.id, role = %user.role, "Login succeeded");
    Ok(Json(AuthResponse {
        success: true,
        user,
    }))
}
