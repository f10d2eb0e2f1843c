//! # Error Types
//!
//! Domain-specific error types for puntofiel-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  puntofiel-core errors (this file)                                     │
//! │  ├── ValidationError  - Local input validation failures (tier 1)       │
//! │  ├── RepositoryError  - Tagged failures at the backend boundary        │
//! │  └── CoreError        - What use cases return to the caller            │
//! │                                                                         │
//! │  puntofiel-db errors (separate crate)                                  │
//! │  └── DbError          - SQL/storage failures → RepositoryError         │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                              │
//! │        RepositoryError ─┴─► CoreError ─► UI displays Display text      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Validation messages are user-displayable Spanish, ready for the UI
//! 3. Backend failures are tagged variants; upstream logic never matches
//!    on backend-specific error codes or message strings
//! 4. Redemption-code parse failures collapse into ONE generic message so
//!    payload internals never leak to the end user

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Local input validation errors.
///
/// Raised synchronously before any backend call. Deterministic and fully
/// testable without mocking the network. The `Display` text is the exact
/// message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("El campo {field} es obligatorio")]
    Required { field: String },

    /// A name/title is shorter than the business minimum.
    #[error("El {field} debe tener al menos {min} caracteres")]
    TooShort { field: String, min: usize },

    /// A numeric field must be strictly greater than zero.
    #[error("El {field} debe ser mayor que cero")]
    MustBePositive { field: String },

    /// A numeric field must not be negative.
    #[error("El {field} no puede ser negativo")]
    MustBeNonNegative { field: String },

    /// End date is not after the start date.
    #[error("La fecha de fin debe ser posterior a la fecha de inicio")]
    DateOrder,

    /// Password shorter than the minimum.
    #[error("La contraseña debe tener al menos {min} caracteres")]
    PasswordTooShort { min: usize },
}

impl ValidationError {
    /// Creates a Required error for the given (Spanish) field label.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a TooShort error for the given field label.
    pub fn too_short(field: impl Into<String>, min: usize) -> Self {
        ValidationError::TooShort {
            field: field.into(),
            min,
        }
    }
}

// =============================================================================
// Repository Error
// =============================================================================

/// Tagged failures crossing the repository (backend) boundary.
///
/// The backend reports structured errors; implementations translate them
/// into these variants once, at the boundary. Use cases and the UI branch
/// on the variant, never on backend codes like `"PGRST116"`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The referenced row does not exist (or is soft-deleted).
    #[error("{entity} no encontrado")]
    NotFound { entity: String },

    /// Balance check failed inside an atomic debit.
    ///
    /// Distinct from [`RepositoryError::NotFound`] on purpose: an
    /// insufficient balance and an invalid reward/user must surface as
    /// different failures.
    #[error("Puntos insuficientes: se requieren {required} y el saldo es {available}")]
    InsufficientPoints { required: i64, available: i64 },

    /// The user already holds the maximum tickets for the raffle.
    #[error("Límite de boletos alcanzado: máximo {max} por usuario")]
    TicketLimitReached { max: i64 },

    /// The raffle is outside its start/end window or already completed.
    #[error("El sorteo no está activo")]
    RaffleWindowClosed,

    /// A constraint conflict (duplicate value, broken reference, invalid
    /// state transition).
    #[error("Conflicto de datos: {message}")]
    Conflict { message: String },

    /// File-storage operation failed.
    #[error("Error de almacenamiento: {message}")]
    Storage { message: String },

    /// Any other operational failure reported by the backend.
    #[error("{message}")]
    Backend { message: String },
}

impl RepositoryError {
    /// Creates a NotFound error for a given (Spanish) entity label.
    pub fn not_found(entity: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity: entity.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        RepositoryError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Backend error from any displayable cause.
    pub fn backend(message: impl std::fmt::Display) -> Self {
        RepositoryError::Backend {
            message: message.to_string(),
        }
    }

    /// Whether this variant carries domain meaning the caller should see
    /// as-is (not wrapped under an operation prefix).
    fn is_domain(&self) -> bool {
        matches!(
            self,
            RepositoryError::NotFound { .. }
                | RepositoryError::InsufficientPoints { .. }
                | RepositoryError::TicketLimitReached { .. }
                | RepositoryError::RaffleWindowClosed
        )
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by use cases.
///
/// The UI displays the `Display` text of whichever variant it receives;
/// nothing here requires the caller to inspect backend internals.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Local validation failed; no backend call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Redemption payload could not be parsed. One generic message for
    /// every parse failure, so payload structure never leaks.
    #[error("Código QR inválido o corrupto")]
    InvalidCode,

    /// Redemption code is older than the validity window.
    #[error("El código QR ha expirado")]
    ExpiredCode,

    /// The reward referenced by a redemption code no longer exists or has
    /// been deactivated.
    #[error("La recompensa no existe o ya no está disponible")]
    RewardNotFound,

    /// Winner selection attempted before the raffle's end date.
    #[error("El sorteo aún no ha finalizado")]
    RaffleNotEnded,

    /// A domain failure from the backend, passed through unchanged.
    #[error(transparent)]
    Repository(RepositoryError),

    /// An operational backend failure, wrapped with the operation that was
    /// being attempted (e.g. "Error al crear promoción: ...").
    #[error("Error al {context}: {source}")]
    Operation {
        context: String,
        source: RepositoryError,
    },
}

impl CoreError {
    /// Wraps a repository failure for the given operation.
    ///
    /// Domain variants (not-found, insufficient points, ticket limit,
    /// closed window) pass through untouched; operational failures gain a
    /// contextual prefix while preserving the original cause.
    pub fn in_context(context: &str, err: RepositoryError) -> Self {
        if err.is_domain() {
            CoreError::Repository(err)
        } else {
            CoreError::Operation {
                context: context.to_string(),
                source: err,
            }
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
