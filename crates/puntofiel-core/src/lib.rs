//! # puntofiel-core: Pure Business Logic for PuntoFiel
//!
//! This crate is the **heart** of PuntoFiel, a loyalty-rewards platform
//! connecting customers, business owners and employees around point
//! accrual, reward redemption, promotions and raffles. It contains all
//! business rules as pure logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PuntoFiel Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Frontend                              │   │
//! │  │    Scan QR ──► Card List ──► Reward Catalog ──► Raffles        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ puntofiel-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  points   │  │ usecases  │  │ validation│  │   │
//! │  │   │  Reward   │  │  Points   │  │  guards + │  │   rules   │  │   │
//! │  │   │  Raffle   │  │ Accrual   │  │  delegate │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE LOGIC               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ dyn repository traits                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                puntofiel-db (Backend Layer)                     │   │
//! │  │        SQLite repositories, atomic ledger operations            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Business, LoyaltyCard, Reward, Raffle, ...)
//! - [`points`] - Points type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`redemption`] - Redemption-code (QR payload) contract and expiry rules
//! - [`repository`] - Async repository trait contracts
//! - [`session`] - Ephemeral per-session state (temporary passwords)
//! - [`usecases`] - One type per business operation: validate, then delegate
//!
//! ## Design Principles
//!
//! 1. **Fail fast locally**: every use case validates inputs before any
//!    backend call; validation errors carry user-displayable messages
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Points**: balances are i64 points, never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//! 5. **The backend owns balances**: this layer never caches a writable
//!    copy of a balance; callers re-fetch after a mutation succeeds

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod points;
pub mod redemption;
pub mod repository;
pub mod session;
pub mod types;
pub mod usecases;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use puntofiel_core::Points` instead of
// `use puntofiel_core::points::Points`

pub use error::{CoreError, CoreResult, RepositoryError, ValidationError};
pub use points::{AccrualRate, Points};
pub use redemption::RedemptionCode;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Validity window for a redemption code, in minutes.
///
/// ## Business Reason
/// A redemption QR represents an intent to redeem, shown on the customer's
/// screen and scanned by an employee. Thirty minutes bounds how long a
/// screenshot stays usable. This is a hard boundary, not configuration.
pub const REDEMPTION_CODE_TTL_MINUTES: i64 = 30;

/// Lifetime of a temporary employee password held in session state, in hours.
///
/// ## Business Reason
/// The owner is expected to hand the generated password to the employee the
/// same day. Entries are swept lazily on read/write, not by a timer.
pub const TEMP_PASSWORD_TTL_HOURS: i64 = 24;

/// Minimum length for human-facing names (businesses, rewards, raffles).
pub const MIN_NAME_CHARS: usize = 3;

/// Minimum length for employee passwords.
pub const MIN_PASSWORD_CHARS: usize = 8;
