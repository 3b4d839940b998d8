//! User and product repositories
//!
//! Flat lookups used by the chat services to resolve listing owners and
//! display names.

use super::entity::{Product, UNKNOWN_USER_NAME, User};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for user records
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a user
    pub async fn save(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (id, name, created_at) VALUES (?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(())
    }

    /// Create and save a user with the given display name
    pub async fn create(&self, name: &str) -> Result<User> {
        let user = User::new(name);
        self.save(&user).await?;
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, user_id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, name, created_at FROM users WHERE id = ?")
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::DatabaseError)?;

        row.map(UserRow::into_user).transpose()
    }

    /// Display name for a user, falling back to a neutral placeholder
    pub async fn display_name(&self, user_id: Uuid) -> Result<String> {
        Ok(self
            .get(user_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()))
    }
}

/// Repository for product listings
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a listing owned by `seller_id`; the store assigns the ID
    pub async fn create(&self, title: &str, seller_id: Uuid) -> Result<Product> {
        let created_at = Utc::now();
        let result =
            sqlx::query("INSERT INTO products (title, seller_id, created_at) VALUES (?, ?, ?)")
                .bind(title)
                .bind(seller_id.to_string())
                .bind(created_at)
                .execute(&self.pool)
                .await
                .map_err(Error::DatabaseError)?;

        Ok(Product {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            seller_id,
            created_at,
        })
    }

    /// Get a listing by ID
    pub async fn get(&self, product_id: i64) -> Result<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as("SELECT id, title, seller_id, created_at FROM products WHERE id = ?")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::DatabaseError)?;

        row.map(ProductRow::into_product).transpose()
    }
}

// ========== Database Row Types ==========

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        Ok(User {
            id: parse_uuid(&self.id, "user")?,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    title: String,
    seller_id: String,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product> {
        Ok(Product {
            id: self.id,
            title: self.title,
            seller_id: parse_uuid(&self.seller_id, "seller")?,
            created_at: self.created_at,
        })
    }
}

/// Parse a stored UUID column
pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Parse(format!("Invalid {} ID: {}", what, e)))
}
