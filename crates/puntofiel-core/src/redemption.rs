//! # Redemption Codes
//!
//! The QR payload contract between the customer app (producer) and the
//! employee validation flow (consumer).
//!
//! ## Redemption Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Redemption Lifecycle                               │
//! │                                                                         │
//! │  Customer taps "Canjear"                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RedemptionCode::issue() → to_payload() → rendered as QR               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Employee scans QR                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse() ── malformed? ──► "Código QR inválido o corrupto"             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_at(now) ── older than 30 min? ──► "El código QR ha expirado" │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Employee confirms → the atomic redeem operation runs (separately)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The parse step NEVER mutates a balance; it only produces data for the
//! confirmation screen. Every parse failure collapses into the one generic
//! [`CoreError::InvalidCode`] so payload internals never leak to users.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::REDEMPTION_CODE_TTL_MINUTES;

/// The signed bundle carried inside a redemption QR.
///
/// Serialized as camelCase JSON: `{"rewardId":…,"userId":…,"timestamp":…,
/// "points":…}` — the producer/consumer wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionCode {
    pub reward_id: String,
    pub user_id: String,
    /// When the customer generated the code.
    pub timestamp: DateTime<Utc>,
    /// Point cost displayed at issue time.
    pub points: i64,
}

impl RedemptionCode {
    /// Issues a new code stamped at the given instant.
    pub fn issue(
        reward_id: impl Into<String>,
        user_id: impl Into<String>,
        points: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        RedemptionCode {
            reward_id: reward_id.into(),
            user_id: user_id.into(),
            timestamp: issued_at,
            points,
        }
    }

    /// Serializes the code into the textual QR payload.
    pub fn to_payload(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|_| CoreError::InvalidCode)
    }

    /// Parses a scanned payload.
    ///
    /// ## Errors
    /// Malformed JSON, missing fields, blank ids or a non-positive point
    /// count all return the same generic [`CoreError::InvalidCode`] —
    /// deliberately indistinguishable to the caller.
    pub fn parse(payload: &str) -> CoreResult<Self> {
        let code: RedemptionCode =
            serde_json::from_str(payload.trim()).map_err(|_| CoreError::InvalidCode)?;

        if code.reward_id.trim().is_empty() || code.user_id.trim().is_empty() {
            return Err(CoreError::InvalidCode);
        }
        if code.points <= 0 {
            return Err(CoreError::InvalidCode);
        }

        Ok(code)
    }

    /// Checks the code's age against the hard 30-minute validity window.
    ///
    /// ## Rules
    /// - Elapsed time beyond the window → [`CoreError::ExpiredCode`].
    ///   29 minutes passes, 31 fails; exactly 30:00 is still valid.
    /// - A timestamp in the future cannot come from a legitimate producer
    ///   and is rejected as [`CoreError::InvalidCode`].
    pub fn validate_at(&self, now: DateTime<Utc>) -> CoreResult<()> {
        let elapsed = now - self.timestamp;

        if elapsed < Duration::zero() {
            return Err(CoreError::InvalidCode);
        }
        if elapsed > Duration::minutes(REDEMPTION_CODE_TTL_MINUTES) {
            return Err(CoreError::ExpiredCode);
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(issued_at: DateTime<Utc>) -> RedemptionCode {
        RedemptionCode::issue("rw1", "u1", 100, issued_at)
    }

    #[test]
    fn test_roundtrip() {
        let now = Utc::now();
        let code = sample_at(now);
        let payload = code.to_payload().unwrap();

        assert!(payload.contains("\"rewardId\""));
        assert!(payload.contains("\"userId\""));

        let parsed = RedemptionCode::parse(&payload).unwrap();
        assert_eq!(parsed, code);
    }

    #[test]
    fn test_malformed_payload_is_generic() {
        for bad in [
            "not json at all",
            "{\"rewardId\":\"rw1\"}",
            "{}",
            "",
            "{\"rewardId\":\"rw1\",\"userId\":\"u1\",\"timestamp\":\"nope\",\"points\":10}",
        ] {
            let err = RedemptionCode::parse(bad).unwrap_err();
            assert_eq!(err.to_string(), "Código QR inválido o corrupto");
        }
    }

    #[test]
    fn test_blank_ids_rejected() {
        let now = Utc::now();
        let payload = RedemptionCode::issue("  ", "u1", 10, now)
            .to_payload()
            .unwrap();
        assert!(matches!(
            RedemptionCode::parse(&payload),
            Err(CoreError::InvalidCode)
        ));
    }

    #[test]
    fn test_non_positive_points_rejected() {
        let now = Utc::now();
        let payload = RedemptionCode::issue("rw1", "u1", 0, now)
            .to_payload()
            .unwrap();
        assert!(matches!(
            RedemptionCode::parse(&payload),
            Err(CoreError::InvalidCode)
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();

        // 29 minutes old: still valid
        let code = sample_at(now - Duration::minutes(29));
        assert!(code.validate_at(now).is_ok());

        // Exactly 30 minutes old: the boundary itself is valid
        let code = sample_at(now - Duration::minutes(30));
        assert!(code.validate_at(now).is_ok());

        // 31 minutes old: expired
        let code = sample_at(now - Duration::minutes(31));
        let err = code.validate_at(now).unwrap_err();
        assert!(matches!(err, CoreError::ExpiredCode));
        assert_eq!(err.to_string(), "El código QR ha expirado");
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let now = Utc::now();
        let code = sample_at(now + Duration::minutes(5));
        assert!(matches!(code.validate_at(now), Err(CoreError::InvalidCode)));
    }
}
