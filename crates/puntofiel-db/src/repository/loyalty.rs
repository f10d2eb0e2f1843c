//! # Loyalty Ledger Repository
//!
//! The accrual operation and the ledger read models.
//!
//! ## Accrual Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 process_loyalty (ONE transaction)                       │
//! │                                                                         │
//! │  1. Verify the customer and business exist                             │
//! │  2. Find the (customer, business) card — or create it at balance 0     │
//! │  3. earned = amount_cents × accrual_rate (backend-owned parameter)     │
//! │  4. UPDATE points_balance += earned                                    │
//! │  5. INSERT purchase_earn transaction (conservation law)                │
//! │  6. COMMIT                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use puntofiel_core::repository::{LoyaltyRepository, RepoResult};
use puntofiel_core::{
    AccrualRate, CustomerLoyaltySummary, LoyaltyCard, LoyaltyOutcome, Points, RepositoryError,
    Transaction, TransactionKind,
};

use super::map_sqlx;

const CARD_COLUMNS: &str = "id, customer_id, business_id, points_balance, created_at, updated_at";

/// Repository for loyalty cards and the transaction ledger.
#[derive(Debug, Clone)]
pub struct SqliteLoyaltyRepository {
    pool: SqlitePool,
    accrual_rate: AccrualRate,
}

impl SqliteLoyaltyRepository {
    /// Creates a new SqliteLoyaltyRepository.
    pub fn new(pool: SqlitePool, accrual_rate: AccrualRate) -> Self {
        SqliteLoyaltyRepository { pool, accrual_rate }
    }
}

#[async_trait]
impl LoyaltyRepository for SqliteLoyaltyRepository {
    async fn process_loyalty(
        &self,
        customer_id: &str,
        business_id: &str,
        purchase_amount_cents: i64,
    ) -> RepoResult<LoyaltyOutcome> {
        debug!(
            customer_id = %customer_id,
            business_id = %business_id,
            amount_cents = purchase_amount_cents,
            "process_loyalty"
        );

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        // Explicit existence checks give the caller NotFound instead of an
        // opaque foreign-key conflict.
        let customer_exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?1")
                .bind(customer_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        if customer_exists.is_none() {
            return Err(RepositoryError::not_found("cliente"));
        }

        let business_exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM businesses WHERE id = ?1 AND is_active = 1")
                .bind(business_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        if business_exists.is_none() {
            return Err(RepositoryError::not_found("negocio"));
        }

        let now = Utc::now();

        let card: Option<LoyaltyCard> = sqlx::query_as(&format!(
            "SELECT {CARD_COLUMNS} FROM loyalty_cards WHERE customer_id = ?1 AND business_id = ?2"
        ))
        .bind(customer_id)
        .bind(business_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let card = match card {
            Some(card) => card,
            None => {
                let card = LoyaltyCard {
                    id: Uuid::new_v4().to_string(),
                    customer_id: customer_id.to_string(),
                    business_id: business_id.to_string(),
                    points_balance: 0,
                    created_at: now,
                    updated_at: now,
                };
                sqlx::query(
                    "INSERT INTO loyalty_cards \
                     (id, customer_id, business_id, points_balance, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .bind(&card.id)
                .bind(&card.customer_id)
                .bind(&card.business_id)
                .bind(card.points_balance)
                .bind(card.created_at)
                .bind(card.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
                card
            }
        };

        let earned = Points::earned_from_purchase(purchase_amount_cents, self.accrual_rate);

        sqlx::query(
            "UPDATE loyalty_cards SET points_balance = points_balance + ?2, updated_at = ?3 \
             WHERE id = ?1",
        )
        .bind(&card.id)
        .bind(earned.value())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        insert_transaction(
            &mut tx,
            &card.id,
            TransactionKind::PurchaseEarn,
            Some(purchase_amount_cents),
            earned.value(),
        )
        .await?;

        // Re-read inside the transaction: the relative UPDATE is what keeps
        // racing accruals correct, so the pre-read value may be stale.
        let new_balance = current_balance(&mut tx, &card.id).await?;

        tx.commit().await.map_err(map_sqlx)?;

        Ok(LoyaltyOutcome {
            card_id: card.id,
            points_delta: earned.value(),
            new_balance,
        })
    }

    async fn card_for(
        &self,
        customer_id: &str,
        business_id: &str,
    ) -> RepoResult<Option<LoyaltyCard>> {
        sqlx::query_as(&format!(
            "SELECT {CARD_COLUMNS} FROM loyalty_cards WHERE customer_id = ?1 AND business_id = ?2"
        ))
        .bind(customer_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn customer_summary(
        &self,
        customer_id: &str,
    ) -> RepoResult<Vec<CustomerLoyaltySummary>> {
        sqlx::query_as(
            "SELECT c.id AS card_id, c.business_id AS business_id, \
                    b.name AS business_name, c.points_balance AS points_balance \
             FROM loyalty_cards c \
             JOIN businesses b ON b.id = c.business_id \
             WHERE c.customer_id = ?1 AND b.is_active = 1 \
             ORDER BY b.name",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn transactions_for_card(&self, card_id: &str) -> RepoResult<Vec<Transaction>> {
        sqlx::query_as(
            "SELECT id, card_id, kind, purchase_amount_cents, points_delta, created_at \
             FROM transactions WHERE card_id = ?1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

/// Reads a card's balance inside an open transaction.
pub(crate) async fn current_balance(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    card_id: &str,
) -> RepoResult<i64> {
    sqlx::query_scalar("SELECT points_balance FROM loyalty_cards WHERE id = ?1")
        .bind(card_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_sqlx)
}

/// Appends one ledger row inside an open transaction.
///
/// Shared by every balance-mutating operation across the repositories, so
/// a mutation without its ledger row cannot be written by accident.
pub(crate) async fn insert_transaction(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    card_id: &str,
    kind: TransactionKind,
    purchase_amount_cents: Option<i64>,
    points_delta: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO transactions \
         (id, card_id, kind, purchase_amount_cents, points_delta, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(card_id)
    .bind(kind)
    .bind(purchase_amount_cents)
    .bind(points_delta)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
