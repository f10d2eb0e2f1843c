//! # Promotion Repository
//!
//! CRUD for time-boxed business announcements. No ledger interaction.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use puntofiel_core::repository::{PromotionRepository, RepoResult};
use puntofiel_core::{Promotion, RepositoryError};

use super::map_sqlx;

const PROMOTION_COLUMNS: &str =
    "id, business_id, title, description, image_url, starts_at, ends_at, is_active, created_at";

/// Repository for promotions.
#[derive(Debug, Clone)]
pub struct SqlitePromotionRepository {
    pool: SqlitePool,
}

impl SqlitePromotionRepository {
    /// Creates a new SqlitePromotionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqlitePromotionRepository { pool }
    }
}

#[async_trait]
impl PromotionRepository for SqlitePromotionRepository {
    async fn create(&self, promotion: &Promotion) -> RepoResult<()> {
        debug!(promotion_id = %promotion.id, "Inserting promotion");

        sqlx::query(
            "INSERT INTO promotions \
             (id, business_id, title, description, image_url, starts_at, ends_at, \
              is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&promotion.id)
        .bind(&promotion.business_id)
        .bind(&promotion.title)
        .bind(&promotion.description)
        .bind(&promotion.image_url)
        .bind(promotion.starts_at)
        .bind(promotion.ends_at)
        .bind(promotion.is_active)
        .bind(promotion.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn update(&self, promotion: &Promotion) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE promotions SET \
                 title = ?2, description = ?3, image_url = ?4, \
                 starts_at = ?5, ends_at = ?6, is_active = ?7 \
             WHERE id = ?1",
        )
        .bind(&promotion.id)
        .bind(&promotion.title)
        .bind(&promotion.description)
        .bind(&promotion.image_url)
        .bind(promotion.starts_at)
        .bind(promotion.ends_at)
        .bind(promotion.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("promoción"));
        }
        Ok(())
    }

    async fn deactivate(&self, promotion_id: &str) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE promotions SET is_active = 0 WHERE id = ?1 AND is_active = 1")
                .bind(promotion_id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("promoción"));
        }
        Ok(())
    }

    async fn get(&self, promotion_id: &str) -> RepoResult<Option<Promotion>> {
        sqlx::query_as(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = ?1"
        ))
        .bind(promotion_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn list_active_for_business(&self, business_id: &str) -> RepoResult<Vec<Promotion>> {
        sqlx::query_as(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions \
             WHERE business_id = ?1 AND is_active = 1 \
             ORDER BY starts_at DESC"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
