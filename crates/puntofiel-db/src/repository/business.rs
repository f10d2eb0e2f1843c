//! # Business Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use puntofiel_core::repository::{BusinessRepository, RepoResult};
use puntofiel_core::{Business, RepositoryError};

use super::map_sqlx;

const BUSINESS_COLUMNS: &str =
    "id, owner_id, name, description, logo_url, is_active, created_at, updated_at";

/// Repository for businesses.
#[derive(Debug, Clone)]
pub struct SqliteBusinessRepository {
    pool: SqlitePool,
}

impl SqliteBusinessRepository {
    /// Creates a new SqliteBusinessRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteBusinessRepository { pool }
    }
}

#[async_trait]
impl BusinessRepository for SqliteBusinessRepository {
    async fn create(&self, business: &Business) -> RepoResult<()> {
        debug!(business_id = %business.id, name = %business.name, "Inserting business");

        sqlx::query(
            "INSERT INTO businesses \
             (id, owner_id, name, description, logo_url, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&business.id)
        .bind(&business.owner_id)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.logo_url)
        .bind(business.is_active)
        .bind(business.created_at)
        .bind(business.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn get(&self, business_id: &str) -> RepoResult<Option<Business>> {
        sqlx::query_as(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = ?1"
        ))
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn update(&self, business: &Business) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE businesses SET \
                 name = ?2, description = ?3, logo_url = ?4, is_active = ?5, updated_at = ?6 \
             WHERE id = ?1",
        )
        .bind(&business.id)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.logo_url)
        .bind(business.is_active)
        .bind(business.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("negocio"));
        }
        Ok(())
    }

    async fn set_logo(&self, business_id: &str, logo_url: &str) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE businesses SET logo_url = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(business_id)
                .bind(logo_url)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("negocio"));
        }
        Ok(())
    }

    async fn list_active(&self) -> RepoResult<Vec<Business>> {
        sqlx::query_as(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE is_active = 1 ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testutil::{seed_business, test_db};

    #[tokio::test]
    async fn test_seeded_business_roundtrip() {
        let db = test_db().await;
        let id = seed_business(&db, "Café Central").await;

        let business = db.businesses().get(&id).await.unwrap().unwrap();
        assert_eq!(business.name, "Café Central");
        assert!(business.logo_url.is_none());

        db.businesses()
            .set_logo(&id, "https://files.local/businesses/logo.png")
            .await
            .unwrap();
        let business = db.businesses().get(&id).await.unwrap().unwrap();
        assert_eq!(
            business.logo_url.as_deref(),
            Some("https://files.local/businesses/logo.png")
        );
    }

    #[tokio::test]
    async fn test_list_active_sorted_by_name() {
        let db = test_db().await;
        seed_business(&db, "Pizzería Napoli").await;
        seed_business(&db, "Café Central").await;

        let all = db.businesses().list_active().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Café Central");
    }

    #[tokio::test]
    async fn test_set_logo_missing_business() {
        let db = test_db().await;
        let err = db
            .businesses()
            .set_logo("missing", "https://x/logo.png")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
