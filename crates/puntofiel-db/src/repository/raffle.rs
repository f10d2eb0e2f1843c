//! # Raffle Repository
//!
//! Raffle CRUD plus the atomic ticket accounting operations.
//!
//! ## Ticket Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   buy_ticket (ONE transaction)                          │
//! │                                                                         │
//! │  1. Load the raffle (missing → NotFound)                               │
//! │  2. Window check: starts_at ≤ now ≤ ends_at, not completed             │
//! │  3. Cap check: COUNT(tickets for user) < max_tickets_per_user          │
//! │  4. Conditional balance debit (0 rows → InsufficientPoints)            │
//! │  5. INSERT ticket_purchase transaction                                 │
//! │  6. INSERT ticket row, points_spent frozen at today's cost             │
//! │  7. COMMIT — points without a ticket, or a ticket without points,      │
//! │     can never be observed                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Returns refund `SUM(points_spent)` over the user's tickets — the frozen
//! purchase-time cost — never `count × current cost`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use puntofiel_core::repository::{RaffleRepository, RepoResult};
use puntofiel_core::{Raffle, RepositoryError, Ticket, TicketReturnOutcome, TransactionKind};

use super::loyalty::{current_balance, insert_transaction};
use super::map_sqlx;

const RAFFLE_COLUMNS: &str = "id, business_id, title, description, image_url, points_per_ticket, \
                              max_tickets_per_user, starts_at, ends_at, winner_id, is_completed, \
                              created_at, updated_at";

const TICKET_COLUMNS: &str = "id, raffle_id, customer_id, points_spent, purchased_at";

/// Repository for raffles and tickets.
#[derive(Debug, Clone)]
pub struct SqliteRaffleRepository {
    pool: SqlitePool,
}

impl SqliteRaffleRepository {
    /// Creates a new SqliteRaffleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteRaffleRepository { pool }
    }

    async fn fetch_raffle(
        &self,
        executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
        raffle_id: &str,
    ) -> RepoResult<Option<Raffle>> {
        sqlx::query_as(&format!(
            "SELECT {RAFFLE_COLUMNS} FROM raffles WHERE id = ?1"
        ))
        .bind(raffle_id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx)
    }
}

#[async_trait]
impl RaffleRepository for SqliteRaffleRepository {
    async fn create(&self, raffle: &Raffle) -> RepoResult<()> {
        debug!(raffle_id = %raffle.id, business_id = %raffle.business_id, "Inserting raffle");

        sqlx::query(
            "INSERT INTO raffles \
             (id, business_id, title, description, image_url, points_per_ticket, \
              max_tickets_per_user, starts_at, ends_at, winner_id, is_completed, \
              created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&raffle.id)
        .bind(&raffle.business_id)
        .bind(&raffle.title)
        .bind(&raffle.description)
        .bind(&raffle.image_url)
        .bind(raffle.points_per_ticket)
        .bind(raffle.max_tickets_per_user)
        .bind(raffle.starts_at)
        .bind(raffle.ends_at)
        .bind(&raffle.winner_id)
        .bind(raffle.is_completed)
        .bind(raffle.created_at)
        .bind(raffle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn update(&self, raffle: &Raffle) -> RepoResult<()> {
        // Completed raffles are frozen; only open ones accept edits.
        let result = sqlx::query(
            "UPDATE raffles SET \
                 title = ?2, description = ?3, image_url = ?4, points_per_ticket = ?5, \
                 max_tickets_per_user = ?6, starts_at = ?7, ends_at = ?8, updated_at = ?9 \
             WHERE id = ?1 AND is_completed = 0",
        )
        .bind(&raffle.id)
        .bind(&raffle.title)
        .bind(&raffle.description)
        .bind(&raffle.image_url)
        .bind(raffle.points_per_ticket)
        .bind(raffle.max_tickets_per_user)
        .bind(raffle.starts_at)
        .bind(raffle.ends_at)
        .bind(raffle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("sorteo"));
        }
        Ok(())
    }

    async fn get(&self, raffle_id: &str) -> RepoResult<Option<Raffle>> {
        self.fetch_raffle(&self.pool, raffle_id).await
    }

    async fn list_for_business(&self, business_id: &str) -> RepoResult<Vec<Raffle>> {
        sqlx::query_as(&format!(
            "SELECT {RAFFLE_COLUMNS} FROM raffles WHERE business_id = ?1 ORDER BY ends_at DESC"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn tickets_for(&self, raffle_id: &str, customer_id: &str) -> RepoResult<Vec<Ticket>> {
        sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets \
             WHERE raffle_id = ?1 AND customer_id = ?2 \
             ORDER BY purchased_at"
        ))
        .bind(raffle_id)
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn buy_ticket(
        &self,
        raffle_id: &str,
        customer_id: &str,
        cost: i64,
    ) -> RepoResult<Ticket> {
        debug!(raffle_id = %raffle_id, customer_id = %customer_id, points = cost, "buy_ticket");

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let now = Utc::now();

        let raffle: Option<Raffle> = sqlx::query_as(&format!(
            "SELECT {RAFFLE_COLUMNS} FROM raffles WHERE id = ?1"
        ))
        .bind(raffle_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let raffle = raffle.ok_or_else(|| RepositoryError::not_found("sorteo"))?;

        if !raffle.is_open_at(now) {
            return Err(RepositoryError::RaffleWindowClosed);
        }

        let held: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tickets WHERE raffle_id = ?1 AND customer_id = ?2",
        )
        .bind(raffle_id)
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if held >= raffle.max_tickets_per_user {
            return Err(RepositoryError::TicketLimitReached {
                max: raffle.max_tickets_per_user,
            });
        }

        let card: Option<(String, i64)> = sqlx::query_as(
            "SELECT id, points_balance FROM loyalty_cards \
             WHERE customer_id = ?1 AND business_id = ?2",
        )
        .bind(customer_id)
        .bind(&raffle.business_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let (card_id, balance) =
            card.ok_or_else(|| RepositoryError::not_found("tarjeta de lealtad"))?;

        if cost > 0 {
            let result = sqlx::query(
                "UPDATE loyalty_cards \
                 SET points_balance = points_balance - ?2, updated_at = ?3 \
                 WHERE id = ?1 AND points_balance >= ?2",
            )
            .bind(&card_id)
            .bind(cost)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::InsufficientPoints {
                    required: cost,
                    available: balance,
                });
            }

            insert_transaction(&mut tx, &card_id, TransactionKind::TicketPurchase, None, -cost)
                .await?;
        }

        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            raffle_id: raffle_id.to_string(),
            customer_id: customer_id.to_string(),
            points_spent: cost,
            purchased_at: now,
        };

        sqlx::query(
            "INSERT INTO tickets (id, raffle_id, customer_id, points_spent, purchased_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&ticket.id)
        .bind(&ticket.raffle_id)
        .bind(&ticket.customer_id)
        .bind(ticket.points_spent)
        .bind(ticket.purchased_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;

        Ok(ticket)
    }

    async fn return_tickets(
        &self,
        raffle_id: &str,
        customer_id: &str,
    ) -> RepoResult<TicketReturnOutcome> {
        debug!(raffle_id = %raffle_id, customer_id = %customer_id, "return_tickets");

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let now = Utc::now();

        let raffle: Option<Raffle> = sqlx::query_as(&format!(
            "SELECT {RAFFLE_COLUMNS} FROM raffles WHERE id = ?1"
        ))
        .bind(raffle_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let raffle = raffle.ok_or_else(|| RepositoryError::not_found("sorteo"))?;

        if raffle.is_completed {
            return Err(RepositoryError::conflict(
                "el sorteo ya finalizó; los boletos no son reembolsables",
            ));
        }

        let card: Option<(String, i64)> = sqlx::query_as(
            "SELECT id, points_balance FROM loyalty_cards \
             WHERE customer_id = ?1 AND business_id = ?2",
        )
        .bind(customer_id)
        .bind(&raffle.business_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let (card_id, balance) =
            card.ok_or_else(|| RepositoryError::not_found("tarjeta de lealtad"))?;

        // Refund the frozen purchase-time cost, not the raffle's current one
        let (count, refund): (i64, Option<i64>) = sqlx::query_as(
            "SELECT COUNT(*), SUM(points_spent) FROM tickets \
             WHERE raffle_id = ?1 AND customer_id = ?2",
        )
        .bind(raffle_id)
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;
        let refund = refund.unwrap_or(0);

        if count == 0 {
            return Ok(TicketReturnOutcome {
                tickets_returned: 0,
                points_refunded: 0,
                new_balance: balance,
            });
        }

        sqlx::query("DELETE FROM tickets WHERE raffle_id = ?1 AND customer_id = ?2")
            .bind(raffle_id)
            .bind(customer_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        if refund > 0 {
            sqlx::query(
                "UPDATE loyalty_cards \
                 SET points_balance = points_balance + ?2, updated_at = ?3 \
                 WHERE id = ?1",
            )
            .bind(&card_id)
            .bind(refund)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

            insert_transaction(&mut tx, &card_id, TransactionKind::TicketRefund, None, refund)
                .await?;
        }

        let new_balance = current_balance(&mut tx, &card_id).await?;

        tx.commit().await.map_err(map_sqlx)?;

        Ok(TicketReturnOutcome {
            tickets_returned: count,
            points_refunded: refund,
            new_balance,
        })
    }

    async fn select_winner(&self, raffle_id: &str, customer_id: &str) -> RepoResult<Raffle> {
        debug!(raffle_id = %raffle_id, customer_id = %customer_id, "select_winner");

        let winner_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?1")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if winner_exists.is_none() {
            return Err(RepositoryError::not_found("cliente"));
        }

        // Conditional update: only the first call writes. A repeat call
        // affects 0 rows and falls through to return the frozen raffle.
        sqlx::query(
            "UPDATE raffles SET winner_id = ?2, is_completed = 1, updated_at = ?3 \
             WHERE id = ?1 AND is_completed = 0",
        )
        .bind(raffle_id)
        .bind(customer_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let raffle = self
            .fetch_raffle(&self.pool, raffle_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("sorteo"))?;

        Ok(raffle)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
