//! Tag and ingredient repository
//!
//! Tags and ingredients have identical access rules, so one repository serves
//! both, parameterized by the table pair it operates on.

use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::attribute::Attribute;

/// Which attribute tables a repository instance operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Tag,
    Ingredient,
}

impl AttributeKind {
    /// Attribute table name
    pub fn table(self) -> &'static str {
        match self {
            AttributeKind::Tag => "tags",
            AttributeKind::Ingredient => "ingredients",
        }
    }

    /// Recipe association table name
    pub fn link_table(self) -> &'static str {
        match self {
            AttributeKind::Tag => "recipe_tags",
            AttributeKind::Ingredient => "recipe_ingredients",
        }
    }

    /// Attribute foreign-key column in the association table
    pub fn link_column(self) -> &'static str {
        match self {
            AttributeKind::Tag => "tag_id",
            AttributeKind::Ingredient => "ingredient_id",
        }
    }
}

pub(crate) fn attribute_from_row(row: &PgRow) -> Attribute {
    Attribute {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Repository for one attribute kind (tags or ingredients)
#[derive(Clone)]
pub struct AttributeRepository {
    pool: PgPool,
    kind: AttributeKind,
}

impl AttributeRepository {
    /// Create a new attribute repository
    pub fn new(pool: PgPool, kind: AttributeKind) -> Self {
        Self { pool, kind }
    }

    /// List the user's attributes, descending by name
    ///
    /// With `assigned_only`, restrict to attributes referenced by at least one
    /// recipe; the join is de-duplicated.
    pub async fn list(&self, user_id: Uuid, assigned_only: bool) -> ApiResult<Vec<Attribute>> {
        let sql = if assigned_only {
            format!(
                r#"
                SELECT DISTINCT a.id, a.user_id, a.name, a.created_at, a.updated_at
                FROM {table} a
                JOIN {link_table} l ON l.{link_column} = a.id
                WHERE a.user_id = $1
                ORDER BY a.name DESC
                "#,
                table = self.kind.table(),
                link_table = self.kind.link_table(),
                link_column = self.kind.link_column(),
            )
        } else {
            format!(
                r#"
                SELECT id, user_id, name, created_at, updated_at
                FROM {table}
                WHERE user_id = $1
                ORDER BY name DESC
                "#,
                table = self.kind.table(),
            )
        };

        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(attribute_from_row).collect())
    }

    /// Find one of the user's attributes by id
    pub async fn find(&self, user_id: Uuid, id: Uuid) -> ApiResult<Option<Attribute>> {
        let sql = format!(
            r#"
            SELECT id, user_id, name, created_at, updated_at
            FROM {table}
            WHERE id = $1 AND user_id = $2
            "#,
            table = self.kind.table(),
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(attribute_from_row))
    }

    /// Create an attribute for the user
    pub async fn create(&self, user_id: Uuid, name: &str) -> ApiResult<Attribute> {
        let sql = format!(
            r#"
            INSERT INTO {table} (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at, updated_at
            "#,
            table = self.kind.table(),
        );

        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_duplicate_name)?;

        Ok(attribute_from_row(&row))
    }

    /// Rename one of the user's attributes; `None` when absent or other-owner
    pub async fn update_name(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> ApiResult<Option<Attribute>> {
        let sql = format!(
            r#"
            UPDATE {table}
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, created_at, updated_at
            "#,
            table = self.kind.table(),
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_duplicate_name)?;

        Ok(row.as_ref().map(attribute_from_row))
    }

    /// Delete one of the user's attributes; `false` when absent or other-owner
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> ApiResult<bool> {
        let sql = format!(
            "DELETE FROM {table} WHERE id = $1 AND user_id = $2",
            table = self.kind.table(),
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn map_duplicate_name(e: sqlx::Error) -> ApiError {
        let duplicate = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
        if duplicate {
            ApiError::validation("name", "This name already exists")
        } else {
            ApiError::Database(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_kind_tables() {
        assert_eq!(AttributeKind::Tag.table(), "tags");
        assert_eq!(AttributeKind::Tag.link_table(), "recipe_tags");
        assert_eq!(AttributeKind::Tag.link_column(), "tag_id");
        assert_eq!(AttributeKind::Ingredient.table(), "ingredients");
        assert_eq!(AttributeKind::Ingredient.link_table(), "recipe_ingredients");
        assert_eq!(AttributeKind::Ingredient.link_column(), "ingredient_id");
    }
}
