//! # Repository Contracts
//!
//! Async trait contracts between the use cases and the backend.
//!
//! ## Injection Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Use cases hold Arc<dyn …Repository> — constructor injection against   │
//! │  an interface. Production wires in the SQLite implementations from     │
//! │  puntofiel-db; tests wire in in-memory fakes. Use cases never see      │
//! │  which one they got.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Contract
//! The operations marked *atomic* below must be applied all-or-nothing by
//! the implementation (one database transaction, conditional updates for
//! balance checks). This layer holds no locks of its own; two racing
//! mutations against the same card are serialized by the backend, not here.

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::types::{
    Business, CustomerLoyaltySummary, Employee, LoyaltyCard, LoyaltyOutcome, Promotion, Raffle,
    Reward, StoredFile, Ticket, TicketReturnOutcome, Transaction, User,
};

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepositoryError>;

// =============================================================================
// Loyalty Ledger
// =============================================================================

#[async_trait]
pub trait LoyaltyRepository: Send + Sync {
    /// *Atomic.* Finds or creates the loyalty card for the (customer,
    /// business) pair, computes the points earned from the purchase using
    /// the backend's configured accrual rate, appends a `purchase_earn`
    /// transaction and returns the new balance.
    async fn process_loyalty(
        &self,
        customer_id: &str,
        business_id: &str,
        purchase_amount_cents: i64,
    ) -> RepoResult<LoyaltyOutcome>;

    /// Fetches the card for a (customer, business) pair, if one exists.
    async fn card_for(
        &self,
        customer_id: &str,
        business_id: &str,
    ) -> RepoResult<Option<LoyaltyCard>>;

    /// The "customer loyalty summary" read model: one row per card with
    /// the business name and current balance.
    async fn customer_summary(&self, customer_id: &str)
        -> RepoResult<Vec<CustomerLoyaltySummary>>;

    /// Ledger history for a card, newest first.
    async fn transactions_for_card(&self, card_id: &str) -> RepoResult<Vec<Transaction>>;
}

// =============================================================================
// Rewards
// =============================================================================

#[async_trait]
pub trait RewardRepository: Send + Sync {
    async fn create(&self, reward: &Reward) -> RepoResult<()>;
    async fn update(&self, reward: &Reward) -> RepoResult<()>;

    /// Soft delete: clears `is_active`, never removes the row, so past
    /// transactions keep a valid reference.
    async fn deactivate(&self, reward_id: &str) -> RepoResult<()>;

    async fn get(&self, reward_id: &str) -> RepoResult<Option<Reward>>;
    async fn list_active_for_business(&self, business_id: &str) -> RepoResult<Vec<Reward>>;

    /// *Atomic.* Verifies the customer's balance covers `points_cost` with
    /// a conditional debit, decrements it and appends a `redeem`
    /// transaction. Insufficient balance must surface as
    /// [`RepositoryError::InsufficientPoints`], distinct from
    /// [`RepositoryError::NotFound`] for an invalid reward/card.
    async fn redeem(
        &self,
        reward_id: &str,
        customer_id: &str,
        points_cost: i64,
    ) -> RepoResult<LoyaltyOutcome>;
}

// =============================================================================
// Raffles & Tickets
// =============================================================================

#[async_trait]
pub trait RaffleRepository: Send + Sync {
    async fn create(&self, raffle: &Raffle) -> RepoResult<()>;
    async fn update(&self, raffle: &Raffle) -> RepoResult<()>;
    async fn get(&self, raffle_id: &str) -> RepoResult<Option<Raffle>>;
    async fn list_for_business(&self, business_id: &str) -> RepoResult<Vec<Raffle>>;

    /// The customer's tickets for one raffle.
    async fn tickets_for(&self, raffle_id: &str, customer_id: &str) -> RepoResult<Vec<Ticket>>;

    /// *Atomic.* Checks the raffle window, the per-user ticket cap and the
    /// customer's balance; debits `cost` points, records a
    /// `ticket_purchase` transaction and inserts exactly one ticket row
    /// (freezing `points_spent = cost`). Partial application — points
    /// debited without a ticket, or vice versa — must be impossible.
    async fn buy_ticket(
        &self,
        raffle_id: &str,
        customer_id: &str,
        cost: i64,
    ) -> RepoResult<Ticket>;

    /// *Atomic.* Deletes all of the customer's tickets for the raffle and
    /// refunds the exact sum of their frozen `points_spent` values,
    /// recording a `ticket_refund` transaction.
    async fn return_tickets(
        &self,
        raffle_id: &str,
        customer_id: &str,
    ) -> RepoResult<TicketReturnOutcome>;

    /// Marks the raffle completed and records the winner.
    ///
    /// Idempotent-safe: implemented as a conditional update on the
    /// not-yet-completed row, so a second call finds the raffle already
    /// completed and returns it unchanged.
    async fn select_winner(&self, raffle_id: &str, customer_id: &str) -> RepoResult<Raffle>;
}

// =============================================================================
// Promotions
// =============================================================================

#[async_trait]
pub trait PromotionRepository: Send + Sync {
    async fn create(&self, promotion: &Promotion) -> RepoResult<()>;
    async fn update(&self, promotion: &Promotion) -> RepoResult<()>;
    async fn deactivate(&self, promotion_id: &str) -> RepoResult<()>;
    async fn get(&self, promotion_id: &str) -> RepoResult<Option<Promotion>>;
    async fn list_active_for_business(&self, business_id: &str) -> RepoResult<Vec<Promotion>>;
}

// =============================================================================
// Businesses & Accounts
// =============================================================================

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn create(&self, business: &Business) -> RepoResult<()>;
    async fn get(&self, business_id: &str) -> RepoResult<Option<Business>>;
    async fn update(&self, business: &Business) -> RepoResult<()>;

    /// Stores the public URL of an uploaded logo.
    async fn set_logo(&self, business_id: &str, logo_url: &str) -> RepoResult<()>;

    async fn list_active(&self) -> RepoResult<Vec<Business>>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Creates the employee together with its backing platform account
    /// (one backend operation; the account carries the email).
    async fn create(&self, employee: &Employee, email: &str) -> RepoResult<()>;

    async fn get(&self, employee_id: &str) -> RepoResult<Option<Employee>>;
    async fn list_for_business(&self, business_id: &str) -> RepoResult<Vec<Employee>>;
    async fn deactivate(&self, employee_id: &str) -> RepoResult<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> RepoResult<()>;
    async fn get(&self, user_id: &str) -> RepoResult<Option<User>>;
}

// =============================================================================
// File Storage
// =============================================================================

/// Opaque file storage for reward/raffle images and business logos.
///
/// No business rule depends on its internals beyond "upload succeeds or
/// fails"; the bundled implementation writes to local disk.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `bytes` at `path`. With `overwrite` false, an existing file
    /// at the same path is an error.
    async fn upload(&self, path: &str, bytes: &[u8], overwrite: bool) -> RepoResult<StoredFile>;

    /// Derives the public URL for a stored path.
    fn public_url(&self, path: &str) -> String;

    /// Deletes the file at `path`.
    async fn delete(&self, path: &str) -> RepoResult<()>;
}
