//! Account endpoints: signup, token issuance, profile

use axum::{Extension, extract::State, http::StatusCode};
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult, ValidationErrors},
    extract::Json,
    middleware::CurrentUser,
    models::user::{
        CreateUserRequest, ProfileResponse, TokenRequest, TokenResponse, UpdateProfileRequest,
    },
    state::AppState,
    validation::{validate_email, validate_password},
};

/// Create a new account
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ProfileResponse>)> {
    let mut errors = ValidationErrors::new();
    if let Err(message) = validate_email(&payload.email) {
        errors.add("email", message);
    }
    if let Err(message) = validate_password(&payload.password) {
        errors.add("password", message);
    }
    errors.into_result()?;

    let name = payload.name.unwrap_or_default();
    let user = state
        .user_repository
        .create(&payload.email, &name, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(user))))
}

/// Issue a bearer token for valid credentials
pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .user_repository
        .authenticate(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| {
            info!("Failed token request for {}", payload.email);
            ApiError::validation(
                "non_field_errors",
                "Unable to authenticate with provided credentials",
            )
        })?;

    let token = state.token_service.issue(user.id).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(TokenResponse { token }))
}

/// Return the authenticated user's profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(ProfileResponse::from(user)))
}

/// Apply a partial profile update
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    if let Some(password) = &payload.password {
        if let Err(message) = validate_password(password) {
            return Err(ApiError::validation("password", message));
        }
    }

    let user = state
        .user_repository
        .update_profile(user.id, &payload)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(ProfileResponse::from(user)))
}
