use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use service::accounts::AccountUser;

use crate::errors::ApiError;
use crate::routes::AppState;

/// Bodies deserialize with every field optional so that a missing field is a
/// handler-level 400 with a JSON error, not a framework rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub user: AccountUser,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let (email, password) = match (required(input.email), required(input.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::BadRequest("email and password are required".into())),
    };

    let user = state.accounts.signup(email, password, input.name).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse { user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let (email, password) = match (required(input.email), required(input.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::BadRequest("email and password are required".into())),
    };

    let user = state.accounts.login(&email, &password).await?;
    Ok(Json(AccountResponse { user }))
}
