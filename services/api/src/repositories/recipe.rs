//! Recipe repository for database operations
//!
//! All reads and writes are scoped to the owning user. Creation and update
//! run in a single transaction together with the nested tag/ingredient
//! upserts, so a failed attribute write never leaves a half-written recipe.

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::attribute::{AttributePayload, AttributeResponse};
use crate::models::recipe::{Recipe, RecipePatch, RecipePayload};
use crate::repositories::attribute::AttributeKind;

const RECIPE_COLUMNS: &str =
    "id, user_id, title, time_minutes, price, description, link, image_path, created_at, updated_at";

fn recipe_from_row(row: &PgRow) -> Recipe {
    Recipe {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        time_minutes: row.get("time_minutes"),
        price: row.get("price"),
        description: row.get("description"),
        link: row.get("link"),
        image_path: row.get("image_path"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Recipe repository
#[derive(Clone)]
pub struct RecipeRepository {
    pool: PgPool,
}

impl RecipeRepository {
    /// Create a new recipe repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the user's recipes, most recently created first
    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Recipe>> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(recipe_from_row).collect())
    }

    /// Find one of the user's recipes by id
    pub async fn find(&self, user_id: Uuid, id: Uuid) -> ApiResult<Option<Recipe>> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2");

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(recipe_from_row))
    }

    /// Create a recipe, upserting and linking any nested tags and ingredients
    pub async fn create(&self, user_id: Uuid, payload: &RecipePayload) -> ApiResult<Recipe> {
        info!("Creating recipe for user: {}", user_id);

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price, description, link)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECIPE_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(&payload.title)
            .bind(payload.time_minutes)
            .bind(payload.price)
            .bind(&payload.description)
            .bind(&payload.link)
            .fetch_one(&mut *tx)
            .await?;
        let recipe = recipe_from_row(&row);

        if let Some(tags) = &payload.tags {
            relink(&mut tx, AttributeKind::Tag, user_id, recipe.id, tags).await?;
        }
        if let Some(ingredients) = &payload.ingredients {
            relink(&mut tx, AttributeKind::Ingredient, user_id, recipe.id, ingredients).await?;
        }

        tx.commit().await?;
        Ok(recipe)
    }

    /// Full update: every scalar field is written, omitted optionals are
    /// cleared. `None` when the recipe is absent or owned by another user.
    pub async fn update_full(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &RecipePayload,
    ) -> ApiResult<Option<Recipe>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE recipes
            SET title = $3, time_minutes = $4, price = $5, description = $6, link = $7,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {RECIPE_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&payload.title)
            .bind(payload.time_minutes)
            .bind(payload.price)
            .bind(&payload.description)
            .bind(&payload.link)
            .fetch_optional(&mut *tx)
            .await?;

        let recipe = match row {
            Some(row) => recipe_from_row(&row),
            None => return Ok(None),
        };

        if let Some(tags) = &payload.tags {
            relink(&mut tx, AttributeKind::Tag, user_id, id, tags).await?;
        }
        if let Some(ingredients) = &payload.ingredients {
            relink(&mut tx, AttributeKind::Ingredient, user_id, id, ingredients).await?;
        }

        tx.commit().await?;
        Ok(Some(recipe))
    }

    /// Partial update: absent fields are left unchanged. `None` when the
    /// recipe is absent or owned by another user.
    pub async fn update_partial(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &RecipePatch,
    ) -> ApiResult<Option<Recipe>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let existing = match row {
            Some(row) => recipe_from_row(&row),
            None => return Ok(None),
        };

        let title = patch.title.clone().unwrap_or(existing.title);
        let time_minutes = patch.time_minutes.unwrap_or(existing.time_minutes);
        let price = patch.price.unwrap_or(existing.price);
        let description = patch.description.clone().or(existing.description);
        let link = patch.link.clone().or(existing.link);

        let sql = format!(
            r#"
            UPDATE recipes
            SET title = $3, time_minutes = $4, price = $5, description = $6, link = $7,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {RECIPE_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&title)
            .bind(time_minutes)
            .bind(price)
            .bind(&description)
            .bind(&link)
            .fetch_one(&mut *tx)
            .await?;
        let recipe = recipe_from_row(&row);

        if let Some(tags) = &patch.tags {
            relink(&mut tx, AttributeKind::Tag, user_id, id, tags).await?;
        }
        if let Some(ingredients) = &patch.ingredients {
            relink(&mut tx, AttributeKind::Ingredient, user_id, id, ingredients).await?;
        }

        tx.commit().await?;
        Ok(Some(recipe))
    }

    /// Delete one of the user's recipes, returning the deleted row so the
    /// caller can clean up the stored image
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> ApiResult<Option<Recipe>> {
        let sql = format!(
            "DELETE FROM recipes WHERE id = $1 AND user_id = $2 RETURNING {RECIPE_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(recipe_from_row))
    }

    /// Record the stored image filename for one of the user's recipes
    pub async fn set_image(
        &self,
        user_id: Uuid,
        id: Uuid,
        image_path: &str,
    ) -> ApiResult<Option<Recipe>> {
        let sql = format!(
            r#"
            UPDATE recipes
            SET image_path = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {RECIPE_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(image_path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(recipe_from_row))
    }

    /// Fetch the attributes of one kind for a batch of recipes, grouped by
    /// recipe id
    pub async fn attributes_for(
        &self,
        recipe_ids: &[Uuid],
        kind: AttributeKind,
    ) -> ApiResult<HashMap<Uuid, Vec<AttributeResponse>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            r#"
            SELECT l.recipe_id, a.id, a.name
            FROM {table} a
            JOIN {link_table} l ON l.{link_column} = a.id
            WHERE l.recipe_id = ANY($1)
            ORDER BY a.name DESC
            "#,
            table = kind.table(),
            link_table = kind.link_table(),
            link_column = kind.link_column(),
        );

        let rows = sqlx::query(&sql)
            .bind(recipe_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<AttributeResponse>> = HashMap::new();
        for row in rows {
            let recipe_id: Uuid = row.get("recipe_id");
            grouped.entry(recipe_id).or_default().push(AttributeResponse {
                id: row.get("id"),
                name: row.get("name"),
            });
        }

        Ok(grouped)
    }
}

/// Replace a recipe's attribute set wholesale: upsert each named item by
/// `(user_id, name)` and relink. An empty list clears all associations.
async fn relink(
    tx: &mut Transaction<'_, Postgres>,
    kind: AttributeKind,
    user_id: Uuid,
    recipe_id: Uuid,
    items: &[AttributePayload],
) -> ApiResult<()> {
    let sql = format!(
        "DELETE FROM {link_table} WHERE recipe_id = $1",
        link_table = kind.link_table(),
    );
    sqlx::query(&sql).bind(recipe_id).execute(&mut **tx).await?;

    let upsert_sql = format!(
        r#"
        INSERT INTO {table} (user_id, name)
        VALUES ($1, $2)
        ON CONFLICT (user_id, name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
        table = kind.table(),
    );
    let link_sql = format!(
        r#"
        INSERT INTO {link_table} (recipe_id, {link_column})
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
        link_table = kind.link_table(),
        link_column = kind.link_column(),
    );

    for item in items {
        let row = sqlx::query(&upsert_sql)
            .bind(user_id)
            .bind(&item.name)
            .fetch_one(&mut **tx)
            .await?;
        let attribute_id: Uuid = row.get("id");

        sqlx::query(&link_sql)
            .bind(recipe_id)
            .bind(attribute_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
