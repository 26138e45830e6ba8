//! API service routes

use axum::{
    Json, Router,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

pub mod attributes;
pub mod media;
pub mod recipes;
pub mod users;

/// Create the router for the API service
///
/// Everything except account creation, token issuance, the health check and
/// stored image serving sits behind the bearer-token middleware.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/users/me",
            get(users::profile).patch(users::update_profile),
        )
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/:id",
            get(recipes::retrieve)
                .put(recipes::update)
                .patch(recipes::partial_update)
                .delete(recipes::remove),
        )
        .route("/recipes/:id/upload-image", post(recipes::upload_image))
        .route(
            "/tags",
            get(attributes::list_tags).post(attributes::create_tag),
        )
        .route(
            "/tags/:id",
            get(attributes::retrieve_tag)
                .patch(attributes::update_tag)
                .delete(attributes::remove_tag),
        )
        .route(
            "/ingredients",
            get(attributes::list_ingredients).post(attributes::create_ingredient),
        )
        .route(
            "/ingredients/:id",
            get(attributes::retrieve_ingredient)
                .patch(attributes::update_ingredient)
                .delete(attributes::remove_ingredient),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(users::create))
        .route("/users/token", post(users::token))
        .route("/media/recipes/:filename", get(media::serve_recipe_image))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "recipe-api"
    }))
}
