//! User repository for database operations

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::user::{UpdateProfileRequest, User};

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Hash a password with argon2 and a fresh salt
pub(crate) fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::Internal
        })
}

/// Verify a password against a stored argon2 hash
pub(crate) fn verify_password(password_hash: &str, password: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(e) => {
            error!("Failed to parse stored password hash: {}", e);
            false
        }
    }
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a hashed password
    ///
    /// A duplicate email surfaces as a field-level validation error, not a
    /// database error.
    pub async fn create(&self, email: &str, name: &str, password: &str) -> ApiResult<User> {
        info!("Creating new user: {}", email);

        let password_hash = hash_password(password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
            if duplicate {
                ApiError::validation("email", "A user with this email already exists")
            } else {
                ApiError::Database(e)
            }
        })?;

        Ok(user_from_row(&row))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Check credentials and return the matching user
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<Option<User>> {
        if password.is_empty() {
            return Ok(None);
        }

        let user = match self.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if verify_password(&user.password_hash, password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Apply a partial profile update; absent fields are left unchanged
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: &UpdateProfileRequest,
    ) -> ApiResult<Option<User>> {
        let existing = match self.find_by_id(user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let name = update.name.clone().unwrap_or(existing.name);
        let password_hash = match &update.password {
            Some(password) => hash_password(password)?,
            None => existing.password_hash,
        };

        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, password_hash = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(user_from_row(&row)))
    }
}
