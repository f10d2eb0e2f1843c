//! # User Repository
//!
//! Platform account profiles. Authentication itself is outside this layer;
//! these are the rows the loyalty flows join against.

use async_trait::async_trait;
use sqlx::SqlitePool;

use puntofiel_core::repository::{RepoResult, UserRepository};
use puntofiel_core::User;

use super::map_sqlx;

/// Repository for platform accounts.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new SqliteUserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteUserRepository { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, full_name, role, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn get(&self, user_id: &str) -> RepoResult<Option<User>> {
        sqlx::query_as("SELECT id, email, full_name, role, created_at FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
