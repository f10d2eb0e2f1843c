//! # puntofiel-db: Backend Layer for PuntoFiel
//!
//! This crate is the backend the core's repository traits talk to. It uses
//! SQLite for storage with sqlx for async operations, plus a local file
//! store for images.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PuntoFiel Data Flow                               │
//! │                                                                         │
//! │  Use case (puntofiel-core)                                             │
//! │       │  Arc<dyn LoyaltyRepository> etc.                               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   puntofiel-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ loyalty, etc. │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Every multi-step invariant runs inside ONE SQL transaction:  │   │
//! │  │   debit + ledger insert, window/cap/balance + ticket insert    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (+ local file storage for images)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, [`DbConfig`], loyalty parameters
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and the RepositoryError boundary
//! - [`repository`] - Repository implementations (loyalty, raffle, ...)
//! - [`storage`] - Local file storage for logos and images
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use puntofiel_core::usecases::ProcessLoyaltyUseCase;
//! use puntofiel_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./puntofiel.db")).await?;
//! let accrue = ProcessLoyaltyUseCase::new(Arc::new(db.loyalty()));
//! let outcome = accrue.execute(&customer_id, &business_id, 1250).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig, LoyaltyConfig};
pub use storage::LocalFileStorage;

// Repository re-exports for convenience
pub use repository::business::SqliteBusinessRepository;
pub use repository::employee::SqliteEmployeeRepository;
pub use repository::loyalty::SqliteLoyaltyRepository;
pub use repository::promotion::SqlitePromotionRepository;
pub use repository::raffle::SqliteRaffleRepository;
pub use repository::reward::SqliteRewardRepository;
pub use repository::user::SqliteUserRepository;
