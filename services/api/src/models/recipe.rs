//! Recipe model and per-operation payloads
//!
//! The list and detail endpoints return different shapes, so each operation
//! maps to its own response type rather than one serializer doing double duty.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::attribute::{AttributePayload, AttributeResponse};

/// Recipe entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Public URL of the uploaded image, if any
    pub fn image_url(&self) -> Option<String> {
        self.image_path
            .as_ref()
            .map(|path| format!("/media/recipes/{}", path))
    }
}

/// Payload for recipe creation and full update
///
/// `tags`/`ingredients`, when present, replace the association set wholesale;
/// when absent the associations are left untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipePayload {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<AttributePayload>>,
    #[serde(default)]
    pub ingredients: Option<Vec<AttributePayload>>,
}

/// Payload for partial recipe update; absent fields are left unchanged
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<AttributePayload>>,
    pub ingredients: Option<Vec<AttributePayload>>,
}

/// Recipe representation returned by the list endpoint
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: Option<String>,
    pub tags: Vec<AttributeResponse>,
    pub ingredients: Vec<AttributeResponse>,
}

impl RecipeSummary {
    pub fn new(
        recipe: Recipe,
        tags: Vec<AttributeResponse>,
        ingredients: Vec<AttributeResponse>,
    ) -> Self {
        RecipeSummary {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags,
            ingredients,
        }
    }
}

/// Recipe representation returned by the detail, create and update endpoints
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<AttributeResponse>,
    pub ingredients: Vec<AttributeResponse>,
}

impl RecipeDetail {
    pub fn new(
        recipe: Recipe,
        tags: Vec<AttributeResponse>,
        ingredients: Vec<AttributeResponse>,
    ) -> Self {
        let image = recipe.image_url();
        RecipeDetail {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            description: recipe.description,
            image,
            tags,
            ingredients,
        }
    }
}
