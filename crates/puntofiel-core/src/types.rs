//! # Domain Types
//!
//! Core domain entities used throughout PuntoFiel.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Entities                                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Business     │   │   LoyaltyCard   │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  owner_id       │   │  customer_id    │   │  card_id (FK)   │       │
//! │  │  name           │   │  business_id    │   │  kind           │       │
//! │  │  logo_url       │   │  points_balance │   │  points_delta   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Reward      │   │     Raffle      │   │     Ticket      │       │
//! │  │  points_required│   │  window + cap   │   │  points_spent   │       │
//! │  │  is_active      │   │  winner_id      │   │  (frozen cost)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Naming Boundary
//! Storage uses snake_case columns; the outward JSON surface uses camelCase.
//! Every entity therefore derives `#[serde(rename_all = "camelCase")]`, which
//! preserves the exact mapping `business_id ↔ businessId`,
//! `points_required ↔ pointsRequired`, `created_at ↔ createdAt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::points::Points;

// =============================================================================
// Users
// =============================================================================

/// Role of an account within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Collects points and redeems rewards.
    Customer,
    /// Owns one or more businesses.
    Owner,
    /// Works for a business; validates redemptions.
    Employee,
}

/// A platform account. Authentication itself lives in the backend; this is
/// the profile row the application reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Business & Employee
// =============================================================================

/// A participating business.
///
/// Soft-deactivated via `is_active`, never hard-deleted, so historical
/// cards and transactions keep their references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An employee account attached to a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub business_id: String,
    /// The backing platform account.
    pub user_id: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Loyalty Card & Ledger
// =============================================================================

/// A customer's point balance at one specific business.
///
/// ## Invariants
/// - `points_balance >= 0`, always
/// - Mutated only by accrual, redemption and ticket operations — each of
///   which also appends a [`Transaction`], so the sum of a card's deltas
///   equals its balance (conservation law)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyCard {
    pub id: String,
    pub customer_id: String,
    pub business_id: String,
    pub points_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoyaltyCard {
    /// Returns the balance as a Points value.
    #[inline]
    pub fn balance(&self) -> Points {
        Points::new(self.points_balance)
    }
}

/// What kind of balance change a ledger row records.
///
/// `TicketPurchase`/`TicketRefund` exist so raffle accounting also leaves
/// ledger rows; without them the conservation law could not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Points earned from a purchase (positive delta).
    PurchaseEarn,
    /// Points spent on a reward (negative delta).
    Redeem,
    /// Points spent on a raffle ticket (negative delta).
    TicketPurchase,
    /// Points returned when tickets are given back (positive delta).
    TicketRefund,
}

/// Immutable record of a balance change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub card_id: String,
    pub kind: TransactionKind,
    /// Purchase amount in cents; present for `PurchaseEarn` rows only.
    pub purchase_amount_cents: Option<i64>,
    /// Signed change applied to the card's balance.
    pub points_delta: i64,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the delta as a Points value.
    #[inline]
    pub fn delta(&self) -> Points {
        Points::new(self.points_delta)
    }
}

// =============================================================================
// Reward
// =============================================================================

/// A named redeemable item belonging to a business.
///
/// Lifecycle: created by the owner, optionally deactivated (soft delete)
/// to preserve referential integrity with past transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    /// Returns the cost as a Points value.
    #[inline]
    pub fn cost(&self) -> Points {
        Points::new(self.points_required)
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// A time-boxed announcement published by a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub business_id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Raffle & Tickets
// =============================================================================

/// A time-boxed prize drawing belonging to a business.
///
/// ## Invariants
/// - Tickets can only be purchased while `starts_at <= now <= ends_at`
///   and the raffle is not completed
/// - A user's ticket count never exceeds `max_tickets_per_user`
/// - Once completed, the winner never changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Raffle {
    pub id: String,
    pub business_id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Cost of one ticket, in points.
    pub points_per_ticket: i64,
    pub max_tickets_per_user: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub winner_id: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Raffle {
    /// Whether tickets may be sold at the given instant.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.starts_at <= now && now <= self.ends_at
    }

    /// Whether the sales window is over, making winner selection legal.
    pub fn has_ended_at(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }
}

/// One raffle entry owned by a customer.
///
/// `points_spent` freezes the ticket cost at purchase time, so a later
/// change to the raffle's cost can never mis-refund a return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub raffle_id: String,
    pub customer_id: String,
    pub points_spent: i64,
    pub purchased_at: DateTime<Utc>,
}

// =============================================================================
// Operation Outcomes & Summaries
// =============================================================================

/// Result of an atomic ledger operation (accrual or debit).
///
/// `points_delta` is positive for accruals and negative for redemptions;
/// `new_balance` is the backend's post-operation truth. Callers refresh
/// their views from it rather than patching a cached balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyOutcome {
    pub card_id: String,
    pub points_delta: i64,
    pub new_balance: i64,
}

/// Result of returning a user's tickets for a raffle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReturnOutcome {
    pub tickets_returned: i64,
    pub points_refunded: i64,
    pub new_balance: i64,
}

/// One row of the "customer loyalty summary" read model: a card joined
/// with its business name, for the customer's card list screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CustomerLoyaltySummary {
    pub card_id: String,
    pub business_id: String,
    pub business_name: String,
    pub points_balance: i64,
}

/// Display-only summary produced by validating a redemption code, shown on
/// the employee confirmation screen before the balance is touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionSummary {
    pub reward_id: String,
    pub reward_name: String,
    pub points: i64,
    pub customer_id: String,
    pub customer_name: String,
}

/// Descriptor returned by file storage after an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub path: String,
    pub public_url: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
