//! API service models

pub mod attribute;
pub mod recipe;
pub mod user;

// Re-export for convenience
pub use attribute::{Attribute, AttributeFilter, AttributePayload, AttributeResponse};
pub use recipe::{Recipe, RecipeDetail, RecipePatch, RecipePayload, RecipeSummary};
pub use user::{CreateUserRequest, ProfileResponse, TokenRequest, TokenResponse, UpdateProfileRequest, User};
