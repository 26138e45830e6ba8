//! Repositories for database operations

pub mod attribute;
pub mod recipe;
pub mod user;

pub use attribute::{AttributeKind, AttributeRepository};
pub use recipe::RecipeRepository;
pub use user::UserRepository;
