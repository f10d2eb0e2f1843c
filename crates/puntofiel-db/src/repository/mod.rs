//! # Repository Implementations
//!
//! SQLite-backed implementations of the puntofiel-core repository traits.
//!
//! ## Conventions
//! - One `Sqlite…Repository` struct per trait, holding a cloned pool
//! - Runtime-bound queries (`sqlx::query` / `query_as` + `FromRow`)
//! - Every multi-step invariant is ONE transaction; balance checks are
//!   conditional updates (`WHERE points_balance >= ?`), so racing debits
//!   against the same card serialize correctly
//! - sqlx failures are folded into the core's `RepositoryError` exactly
//!   once, via [`map_sqlx`]

use puntofiel_core::RepositoryError;

use crate::error::DbError;

pub mod business;
pub mod employee;
pub mod loyalty;
pub mod promotion;
pub mod raffle;
pub mod reward;
pub mod user;

/// Folds a raw sqlx failure into the tagged boundary type.
pub(crate) fn map_sqlx(err: sqlx::Error) -> RepositoryError {
    RepositoryError::from(DbError::from(err))
}

// =============================================================================
// Shared Test Fixtures
// =============================================================================
