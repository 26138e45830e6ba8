//! Tag and ingredient endpoints
//!
//! Both resources share the same handlers, dispatched to the matching
//! repository.

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::Json,
    middleware::CurrentUser,
    models::attribute::{AttributeFilter, AttributePayload, AttributeResponse},
    repositories::AttributeRepository,
    state::AppState,
    validation::validate_name,
};

async fn list_attributes(
    repository: &AttributeRepository,
    user: CurrentUser,
    filter: &AttributeFilter,
) -> ApiResult<Json<Vec<AttributeResponse>>> {
    let attributes = repository.list(user.id, filter.assigned_only()).await?;
    Ok(Json(attributes.into_iter().map(Into::into).collect()))
}

async fn create_attribute(
    repository: &AttributeRepository,
    user: CurrentUser,
    payload: AttributePayload,
) -> ApiResult<(StatusCode, Json<AttributeResponse>)> {
    validate_name(&payload.name).map_err(|message| ApiError::validation("name", message))?;

    let attribute = repository.create(user.id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(AttributeResponse::from(attribute))))
}

async fn retrieve_attribute(
    repository: &AttributeRepository,
    user: CurrentUser,
    id: Uuid,
) -> ApiResult<Json<AttributeResponse>> {
    let attribute = repository
        .find(user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(attribute.into()))
}

async fn update_attribute(
    repository: &AttributeRepository,
    user: CurrentUser,
    id: Uuid,
    payload: AttributePayload,
) -> ApiResult<Json<AttributeResponse>> {
    validate_name(&payload.name).map_err(|message| ApiError::validation("name", message))?;

    let attribute = repository
        .update_name(user.id, id, &payload.name)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(attribute.into()))
}

async fn remove_attribute(
    repository: &AttributeRepository,
    user: CurrentUser,
    id: Uuid,
) -> ApiResult<StatusCode> {
    if repository.delete(user.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// List the user's tags, optionally restricted to assigned ones
pub async fn list_tags(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(filter): Query<AttributeFilter>,
) -> ApiResult<Json<Vec<AttributeResponse>>> {
    list_attributes(&state.tag_repository, user, &filter).await
}

/// Create a tag
pub async fn create_tag(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AttributePayload>,
) -> ApiResult<(StatusCode, Json<AttributeResponse>)> {
    create_attribute(&state.tag_repository, user, payload).await
}

/// Retrieve one of the user's tags
pub async fn retrieve_tag(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AttributeResponse>> {
    retrieve_attribute(&state.tag_repository, user, id).await
}

/// Rename one of the user's tags
pub async fn update_tag(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttributePayload>,
) -> ApiResult<Json<AttributeResponse>> {
    update_attribute(&state.tag_repository, user, id, payload).await
}

/// Delete one of the user's tags
pub async fn remove_tag(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    remove_attribute(&state.tag_repository, user, id).await
}

/// List the user's ingredients, optionally restricted to assigned ones
pub async fn list_ingredients(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(filter): Query<AttributeFilter>,
) -> ApiResult<Json<Vec<AttributeResponse>>> {
    list_attributes(&state.ingredient_repository, user, &filter).await
}

/// Create an ingredient
pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AttributePayload>,
) -> ApiResult<(StatusCode, Json<AttributeResponse>)> {
    create_attribute(&state.ingredient_repository, user, payload).await
}

/// Retrieve one of the user's ingredients
pub async fn retrieve_ingredient(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AttributeResponse>> {
    retrieve_attribute(&state.ingredient_repository, user, id).await
}

/// Rename one of the user's ingredients
pub async fn update_ingredient(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttributePayload>,
) -> ApiResult<Json<AttributeResponse>> {
    update_attribute(&state.ingredient_repository, user, id, payload).await
}

/// Delete one of the user's ingredients
pub async fn remove_ingredient(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    remove_attribute(&state.ingredient_repository, user, id).await
}
