//! Tag and ingredient models
//!
//! Tags and ingredients share one shape (an owner-scoped name), so a single
//! set of types covers both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tag or ingredient entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attribute {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire representation of a tag or ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Attribute> for AttributeResponse {
    fn from(attribute: Attribute) -> Self {
        AttributeResponse {
            id: attribute.id,
            name: attribute.name,
        }
    }
}

/// Payload for creating or renaming a tag or ingredient, and for the nested
/// items inside a recipe payload
#[derive(Debug, Clone, Deserialize)]
pub struct AttributePayload {
    pub name: String,
}

/// Query parameters for tag and ingredient listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AttributeFilter {
    /// When set to a non-zero value, restrict the listing to attributes
    /// referenced by at least one recipe
    pub assigned_only: Option<u8>,
}

impl AttributeFilter {
    pub fn assigned_only(&self) -> bool {
        self.assigned_only.unwrap_or(0) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigned_only_defaults_to_false() {
        assert!(!AttributeFilter::default().assigned_only());
    }

    #[test]
    fn test_assigned_only_flag() {
        let filter = AttributeFilter {
            assigned_only: Some(1),
        };
        assert!(filter.assigned_only());

        let filter = AttributeFilter {
            assigned_only: Some(0),
        };
        assert!(!filter.assigned_only());
    }

    #[test]
    fn test_attribute_response_shape() {
        let attribute = Attribute {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Vegan".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = AttributeResponse::from(attribute.clone());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": attribute.id, "name": "Vegan"})
        );
    }
}
