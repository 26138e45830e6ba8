//! Recipe endpoints

use axum::{
    Extension,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult, ValidationErrors},
    extract::Json,
    middleware::CurrentUser,
    models::attribute::AttributePayload,
    models::recipe::{Recipe, RecipeDetail, RecipePatch, RecipePayload, RecipeSummary},
    repositories::AttributeKind,
    state::AppState,
    validation::{validate_name, validate_price, validate_time_minutes, validate_title},
};

fn check_attribute_names(
    errors: &mut ValidationErrors,
    field: &str,
    items: Option<&[AttributePayload]>,
) {
    for item in items.unwrap_or_default() {
        if let Err(message) = validate_name(&item.name) {
            errors.add(field, message);
            break;
        }
    }
}

fn validate_payload(payload: &RecipePayload) -> ApiResult<()> {
    let mut errors = ValidationErrors::new();
    if let Err(message) = validate_title(&payload.title) {
        errors.add("title", message);
    }
    if let Err(message) = validate_time_minutes(payload.time_minutes) {
        errors.add("time_minutes", message);
    }
    if let Err(message) = validate_price(payload.price) {
        errors.add("price", message);
    }
    check_attribute_names(&mut errors, "tags", payload.tags.as_deref());
    check_attribute_names(&mut errors, "ingredients", payload.ingredients.as_deref());
    errors.into_result()
}

fn validate_patch(patch: &RecipePatch) -> ApiResult<()> {
    let mut errors = ValidationErrors::new();
    if let Some(title) = &patch.title {
        if let Err(message) = validate_title(title) {
            errors.add("title", message);
        }
    }
    if let Some(time_minutes) = patch.time_minutes {
        if let Err(message) = validate_time_minutes(time_minutes) {
            errors.add("time_minutes", message);
        }
    }
    if let Some(price) = patch.price {
        if let Err(message) = validate_price(price) {
            errors.add("price", message);
        }
    }
    check_attribute_names(&mut errors, "tags", patch.tags.as_deref());
    check_attribute_names(&mut errors, "ingredients", patch.ingredients.as_deref());
    errors.into_result()
}

/// Render a single recipe with its associations
async fn render_detail(state: &AppState, recipe: Recipe) -> ApiResult<RecipeDetail> {
    let ids = [recipe.id];
    let mut tags = state
        .recipe_repository
        .attributes_for(&ids, AttributeKind::Tag)
        .await?;
    let mut ingredients = state
        .recipe_repository
        .attributes_for(&ids, AttributeKind::Ingredient)
        .await?;

    let recipe_tags = tags.remove(&recipe.id).unwrap_or_default();
    let recipe_ingredients = ingredients.remove(&recipe.id).unwrap_or_default();
    Ok(RecipeDetail::new(recipe, recipe_tags, recipe_ingredients))
}

/// List the user's recipes, most recent first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<RecipeSummary>>> {
    let recipes = state.recipe_repository.list(user.id).await?;
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();

    let mut tags = state
        .recipe_repository
        .attributes_for(&ids, AttributeKind::Tag)
        .await?;
    let mut ingredients = state
        .recipe_repository
        .attributes_for(&ids, AttributeKind::Ingredient)
        .await?;

    let summaries = recipes
        .into_iter()
        .map(|recipe| {
            let recipe_tags = tags.remove(&recipe.id).unwrap_or_default();
            let recipe_ingredients = ingredients.remove(&recipe.id).unwrap_or_default();
            RecipeSummary::new(recipe, recipe_tags, recipe_ingredients)
        })
        .collect();

    Ok(Json(summaries))
}

/// Create a recipe, resolving nested tags and ingredients
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<RecipePayload>,
) -> ApiResult<(StatusCode, Json<RecipeDetail>)> {
    validate_payload(&payload)?;

    let recipe = state.recipe_repository.create(user.id, &payload).await?;
    let detail = render_detail(&state, recipe).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Retrieve one of the user's recipes
pub async fn retrieve(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = state
        .recipe_repository
        .find(user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(render_detail(&state, recipe).await?))
}

/// Full update of one of the user's recipes
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipePayload>,
) -> ApiResult<Json<RecipeDetail>> {
    validate_payload(&payload)?;

    let recipe = state
        .recipe_repository
        .update_full(user.id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(render_detail(&state, recipe).await?))
}

/// Partial update of one of the user's recipes
pub async fn partial_update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RecipePatch>,
) -> ApiResult<Json<RecipeDetail>> {
    validate_patch(&patch)?;

    let recipe = state
        .recipe_repository
        .update_partial(user.id, id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(render_detail(&state, recipe).await?))
}

/// Delete one of the user's recipes along with its stored image
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let recipe = state
        .recipe_repository
        .delete(user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(image_path) = &recipe.image_path {
        state.image_store.delete(image_path).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Attach an uploaded image to one of the user's recipes
///
/// Multipart body with an `image` field; anything that does not decode as an
/// image is rejected. A previously stored image is replaced.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let existing = state
        .recipe_repository
        .find(user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("image", "Invalid multipart payload"))?
    {
        if field.name() == Some("image") {
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::validation("image", "Invalid multipart payload"))?,
            );
        }
    }
    let data = data.ok_or_else(|| ApiError::validation("image", "No image provided"))?;

    let filename = state.image_store.save(&data).await?;
    let updated = match state
        .recipe_repository
        .set_image(user.id, id, &filename)
        .await?
    {
        Some(recipe) => recipe,
        None => {
            // Recipe vanished between the lookup and the update; do not leave
            // the stored file behind.
            state.image_store.delete(&filename).await;
            return Err(ApiError::NotFound);
        }
    };

    if let Some(old_image) = &existing.image_path {
        state.image_store.delete(old_image).await;
    }

    Ok(Json(json!({ "image": updated.image_url() })))
}
