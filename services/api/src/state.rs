//! Application state shared across handlers

use sqlx::PgPool;

use crate::repositories::{AttributeKind, AttributeRepository, RecipeRepository, UserRepository};
use crate::storage::ImageStore;
use crate::token::TokenService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub token_service: TokenService,
    pub user_repository: UserRepository,
    pub recipe_repository: RecipeRepository,
    pub tag_repository: AttributeRepository,
    pub ingredient_repository: AttributeRepository,
    pub image_store: ImageStore,
}

impl AppState {
    /// Assemble the application state from its infrastructure pieces
    pub fn new(pool: PgPool, token_service: TokenService, image_store: ImageStore) -> Self {
        AppState {
            user_repository: UserRepository::new(pool.clone()),
            recipe_repository: RecipeRepository::new(pool.clone()),
            tag_repository: AttributeRepository::new(pool.clone(), AttributeKind::Tag),
            ingredient_repository: AttributeRepository::new(pool.clone(), AttributeKind::Ingredient),
            db_pool: pool,
            token_service,
            image_store,
        }
    }
}
