//! # Reward Repository
//!
//! Reward catalog CRUD plus the atomic redemption debit.
//!
//! ## Redemption Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     redeem (ONE transaction)                            │
//! │                                                                         │
//! │  1. Load the active reward (missing/inactive → NotFound)               │
//! │  2. Load the customer's card at the reward's business                  │
//! │  3. UPDATE … SET points_balance = points_balance - cost                │
//! │         WHERE id = ? AND points_balance >= cost                        │
//! │     └── 0 rows? → InsufficientPoints (balance raced or too low)        │
//! │  4. INSERT redeem transaction (negative delta)                         │
//! │  5. COMMIT — steps 3+4 can never be observed half-applied              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional UPDATE is the double-spend guard: two redemptions racing
//! on the same card each re-check the balance inside their own write.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use puntofiel_core::repository::{RepoResult, RewardRepository};
use puntofiel_core::{LoyaltyOutcome, Reward, RepositoryError, TransactionKind};

use super::loyalty::{current_balance, insert_transaction};
use super::map_sqlx;

const REWARD_COLUMNS: &str = "id, business_id, name, description, points_required, image_url, \
                              is_active, created_at, updated_at";

/// Repository for rewards.
#[derive(Debug, Clone)]
pub struct SqliteRewardRepository {
    pool: SqlitePool,
}

impl SqliteRewardRepository {
    /// Creates a new SqliteRewardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteRewardRepository { pool }
    }
}

#[async_trait]
impl RewardRepository for SqliteRewardRepository {
    async fn create(&self, reward: &Reward) -> RepoResult<()> {
        debug!(reward_id = %reward.id, business_id = %reward.business_id, "Inserting reward");

        sqlx::query(
            "INSERT INTO rewards \
             (id, business_id, name, description, points_required, image_url, \
              is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&reward.id)
        .bind(&reward.business_id)
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.points_required)
        .bind(&reward.image_url)
        .bind(reward.is_active)
        .bind(reward.created_at)
        .bind(reward.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn update(&self, reward: &Reward) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE rewards SET \
                 name = ?2, description = ?3, points_required = ?4, \
                 image_url = ?5, is_active = ?6, updated_at = ?7 \
             WHERE id = ?1",
        )
        .bind(&reward.id)
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.points_required)
        .bind(&reward.image_url)
        .bind(reward.is_active)
        .bind(reward.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("recompensa"));
        }
        Ok(())
    }

    async fn deactivate(&self, reward_id: &str) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE rewards SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        )
        .bind(reward_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("recompensa"));
        }
        Ok(())
    }

    async fn get(&self, reward_id: &str) -> RepoResult<Option<Reward>> {
        sqlx::query_as(&format!(
            "SELECT {REWARD_COLUMNS} FROM rewards WHERE id = ?1"
        ))
        .bind(reward_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn list_active_for_business(&self, business_id: &str) -> RepoResult<Vec<Reward>> {
        sqlx::query_as(&format!(
            "SELECT {REWARD_COLUMNS} FROM rewards \
             WHERE business_id = ?1 AND is_active = 1 \
             ORDER BY points_required, name"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn redeem(
        &self,
        reward_id: &str,
        customer_id: &str,
        points_cost: i64,
    ) -> RepoResult<LoyaltyOutcome> {
        debug!(
            reward_id = %reward_id,
            customer_id = %customer_id,
            points = points_cost,
            "redeem"
        );

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let reward: Option<Reward> = sqlx::query_as(&format!(
            "SELECT {REWARD_COLUMNS} FROM rewards WHERE id = ?1 AND is_active = 1"
        ))
        .bind(reward_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let reward = reward.ok_or_else(|| RepositoryError::not_found("recompensa"))?;

        let card: Option<(String, i64)> = sqlx::query_as(
            "SELECT id, points_balance FROM loyalty_cards \
             WHERE customer_id = ?1 AND business_id = ?2",
        )
        .bind(customer_id)
        .bind(&reward.business_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let (card_id, balance) =
            card.ok_or_else(|| RepositoryError::not_found("tarjeta de lealtad"))?;

        let result = sqlx::query(
            "UPDATE loyalty_cards \
             SET points_balance = points_balance - ?2, updated_at = ?3 \
             WHERE id = ?1 AND points_balance >= ?2",
        )
        .bind(&card_id)
        .bind(points_cost)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::InsufficientPoints {
                required: points_cost,
                available: balance,
            });
        }

        insert_transaction(&mut tx, &card_id, TransactionKind::Redeem, None, -points_cost)
            .await?;

        let new_balance = current_balance(&mut tx, &card_id).await?;

        tx.commit().await.map_err(map_sqlx)?;

        Ok(LoyaltyOutcome {
            card_id,
            points_delta: -points_cost,
            new_balance,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testutil::{seed_business, seed_customer, test_db};
    use puntofiel_core::repository::LoyaltyRepository;
    use uuid::Uuid;

    fn sample_reward(business_id: &str, points: i64) -> Reward {
        let now = Utc::now();
        Reward {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            name: "Café Gratis".to_string(),
            description: Some("Un café americano de cortesía".to_string()),
            points_required: points,
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch_roundtrip() {
        let db = test_db().await;
        let business = seed_business(&db, "Café Central").await;

        let reward = sample_reward(&business, 100);
        db.rewards().create(&reward).await.unwrap();

        let fetched = db.rewards().get(&reward.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Café Gratis");
        assert_eq!(fetched.points_required, 100);
        assert_eq!(fetched.business_id, business);
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_deactivate_is_soft() {
        let db = test_db().await;
        let business = seed_business(&db, "Café Central").await;

        let reward = sample_reward(&business, 100);
        db.rewards().create(&reward).await.unwrap();
        db.rewards().deactivate(&reward.id).await.unwrap();

        // Row still exists, just inactive
        let fetched = db.rewards().get(&reward.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);

        // And it no longer shows in the active list
        let active = db
            .rewards()
            .list_active_for_business(&business)
            .await
            .unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn test_redeem_debits_and_appends_ledger_row() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ana García").await;
        let business = seed_business(&db, "Café Central").await;

        // Earn 120 points, then spend 100
        db.loyalty()
            .process_loyalty(&customer, &business, 12_000)
            .await
            .unwrap();

        let reward = sample_reward(&business, 100);
        db.rewards().create(&reward).await.unwrap();

        let outcome = db
            .rewards()
            .redeem(&reward.id, &customer, reward.points_required)
            .await
            .unwrap();

        assert_eq!(outcome.points_delta, -100);
        assert_eq!(outcome.new_balance, 20);

        let history = db
            .loyalty()
            .transactions_for_card(&outcome.card_id)
            .await
            .unwrap();
        let total: i64 = history.iter().map(|t| t.points_delta).sum();
        assert_eq!(total, 20);
        assert!(history.iter().any(|t| t.kind == TransactionKind::Redeem));
    }

    #[tokio::test]
    async fn test_redeem_insufficient_is_distinct_from_not_found() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ana García").await;
        let business = seed_business(&db, "Café Central").await;

        // Only 5 points on the card
        db.loyalty()
            .process_loyalty(&customer, &business, 500)
            .await
            .unwrap();

        let reward = sample_reward(&business, 100);
        db.rewards().create(&reward).await.unwrap();

        let err = db
            .rewards()
            .redeem(&reward.id, &customer, 100)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::InsufficientPoints {
                required: 100,
                available: 5
            }
        ));

        // Balance untouched by the failed attempt
        let card = db
            .loyalty()
            .card_for(&customer, &business)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(card.points_balance, 5);

        // Unknown reward id is NotFound, not InsufficientPoints
        let err = db
            .rewards()
            .redeem("missing", &customer, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_redeem_inactive_reward_is_not_found() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ana García").await;
        let business = seed_business(&db, "Café Central").await;

        db.loyalty()
            .process_loyalty(&customer, &business, 12_000)
            .await
            .unwrap();

        let reward = sample_reward(&business, 100);
        db.rewards().create(&reward).await.unwrap();
        db.rewards().deactivate(&reward.id).await.unwrap();

        let err = db
            .rewards()
            .redeem(&reward.id, &customer, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
