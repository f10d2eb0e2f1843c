//! # Loyalty Use Cases
//!
//! Point accrual, reward redemption and redemption-code validation.
//!
//! ## Who Calls What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Employee scans a purchase  ──► ProcessLoyaltyUseCase    (accrual)     │
//! │  Employee scans a QR code   ──► CompleteRedemptionUseCase (display)    │
//! │  Employee confirms redeem   ──► RedeemRewardUseCase      (debit)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation and debit are deliberately two steps: the scan only parses
//! and displays; the balance is touched after the employee confirms.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::redemption::RedemptionCode;
use crate::repository::{LoyaltyRepository, RewardRepository, UserRepository};
use crate::types::{LoyaltyOutcome, RedemptionSummary};
use crate::validation;

// =============================================================================
// Process Loyalty (accrual)
// =============================================================================

/// Accrues points for a purchase at a business.
pub struct ProcessLoyaltyUseCase {
    repo: Arc<dyn LoyaltyRepository>,
}

impl ProcessLoyaltyUseCase {
    pub fn new(repo: Arc<dyn LoyaltyRepository>) -> Self {
        ProcessLoyaltyUseCase { repo }
    }

    /// Validates locally, then delegates to the backend's atomic accrual.
    ///
    /// ## Rules
    /// - `purchase_amount_cents <= 0` fails fast with a validation message;
    ///   the repository is NOT invoked
    /// - The accrual rate is the backend's concern; this layer treats the
    ///   earned amount as opaque output
    pub async fn execute(
        &self,
        customer_id: &str,
        business_id: &str,
        purchase_amount_cents: i64,
    ) -> CoreResult<LoyaltyOutcome> {
        validation::validate_id("cliente", customer_id)?;
        validation::validate_id("negocio", business_id)?;
        validation::validate_purchase_amount(purchase_amount_cents)?;

        debug!(
            customer_id = %customer_id,
            business_id = %business_id,
            amount_cents = purchase_amount_cents,
            "Processing loyalty accrual"
        );

        let outcome = self
            .repo
            .process_loyalty(customer_id, business_id, purchase_amount_cents)
            .await
            .map_err(|e| CoreError::in_context("procesar puntos", e))?;

        info!(
            card_id = %outcome.card_id,
            points = outcome.points_delta,
            balance = outcome.new_balance,
            "Points accrued"
        );

        Ok(outcome)
    }
}

// =============================================================================
// Redeem Reward (debit)
// =============================================================================

/// Spends points on a reward after the employee confirms a scanned code.
pub struct RedeemRewardUseCase {
    repo: Arc<dyn RewardRepository>,
}

impl RedeemRewardUseCase {
    pub fn new(repo: Arc<dyn RewardRepository>) -> Self {
        RedeemRewardUseCase { repo }
    }

    /// Validates locally, then delegates to the backend's atomic debit.
    ///
    /// ## Rules
    /// - Blank ids or `points_cost <= 0` fail before any backend call
    /// - Insufficient balance surfaces as its own error, distinct from an
    ///   invalid reward or user
    pub async fn execute(
        &self,
        reward_id: &str,
        user_id: &str,
        points_cost: i64,
    ) -> CoreResult<LoyaltyOutcome> {
        validation::validate_id("recompensa", reward_id)?;
        validation::validate_id("usuario", user_id)?;
        validation::validate_positive("costo en puntos", points_cost)?;

        let outcome = self
            .repo
            .redeem(reward_id, user_id, points_cost)
            .await
            .map_err(|e| CoreError::in_context("canjear recompensa", e))?;

        info!(
            card_id = %outcome.card_id,
            points = outcome.points_delta,
            balance = outcome.new_balance,
            "Reward redeemed"
        );

        Ok(outcome)
    }
}

// =============================================================================
// Complete Redemption (QR validation, display only)
// =============================================================================

/// Validates a scanned redemption payload and builds the confirmation
/// summary. Never mutates a balance.
pub struct CompleteRedemptionUseCase {
    rewards: Arc<dyn RewardRepository>,
    users: Arc<dyn UserRepository>,
}

impl CompleteRedemptionUseCase {
    pub fn new(rewards: Arc<dyn RewardRepository>, users: Arc<dyn UserRepository>) -> Self {
        CompleteRedemptionUseCase { rewards, users }
    }

    /// Parses and checks a scanned payload.
    ///
    /// ## Failure Modes
    /// - Any parse problem → the one generic "invalid or corrupt" error
    /// - Older than 30 minutes → expired-code error (hard boundary)
    /// - Reward missing or deactivated → reward-not-found error
    pub async fn execute(&self, payload: &str) -> CoreResult<RedemptionSummary> {
        let code = RedemptionCode::parse(payload)?;
        code.validate_at(Utc::now())?;

        let reward = self
            .rewards
            .get(&code.reward_id)
            .await
            .map_err(|e| CoreError::in_context("validar código", e))?;

        let reward = match reward {
            Some(r) if r.is_active => r,
            _ => return Err(CoreError::RewardNotFound),
        };

        let customer_name = self
            .users
            .get(&code.user_id)
            .await
            .map_err(|e| CoreError::in_context("validar código", e))?
            .map(|u| u.full_name)
            // An unknown account still gets a confirmation screen; the id
            // stands in for the name.
            .unwrap_or_else(|| code.user_id.clone());

        debug!(reward_id = %reward.id, customer_id = %code.user_id, "Redemption code validated");

        Ok(RedemptionSummary {
            reward_id: reward.id,
            reward_name: reward.name,
            points: code.points,
            customer_id: code.user_id,
            customer_name,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RepositoryError, ValidationError};
    use crate::repository::RepoResult;
    use crate::types::{
        CustomerLoyaltySummary, LoyaltyCard, Reward, Transaction, User, UserRole,
    };
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counting fake: records how often the atomic ops are invoked.
    #[derive(Default)]
    struct FakeLoyaltyRepo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LoyaltyRepository for FakeLoyaltyRepo {
        async fn process_loyalty(
            &self,
            _customer_id: &str,
            _business_id: &str,
            _purchase_amount_cents: i64,
        ) -> RepoResult<LoyaltyOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoyaltyOutcome {
                card_id: "c1".to_string(),
                points_delta: 5,
                new_balance: 105,
            })
        }

        async fn card_for(
            &self,
            _customer_id: &str,
            _business_id: &str,
        ) -> RepoResult<Option<LoyaltyCard>> {
            Ok(None)
        }

        async fn customer_summary(
            &self,
            _customer_id: &str,
        ) -> RepoResult<Vec<CustomerLoyaltySummary>> {
            Ok(vec![])
        }

        async fn transactions_for_card(&self, _card_id: &str) -> RepoResult<Vec<Transaction>> {
            Ok(vec![])
        }
    }

    struct FakeRewardRepo {
        reward: Option<Reward>,
        redeem_calls: AtomicUsize,
        redeem_result: fn() -> RepoResult<LoyaltyOutcome>,
    }

    impl FakeRewardRepo {
        fn with_reward(reward: Option<Reward>) -> Self {
            FakeRewardRepo {
                reward,
                redeem_calls: AtomicUsize::new(0),
                redeem_result: || {
                    Ok(LoyaltyOutcome {
                        card_id: "c1".to_string(),
                        points_delta: -100,
                        new_balance: 20,
                    })
                },
            }
        }
    }

    #[async_trait]
    impl RewardRepository for FakeRewardRepo {
        async fn create(&self, _reward: &Reward) -> RepoResult<()> {
            Ok(())
        }
        async fn update(&self, _reward: &Reward) -> RepoResult<()> {
            Ok(())
        }
        async fn deactivate(&self, _reward_id: &str) -> RepoResult<()> {
            Ok(())
        }
        async fn get(&self, _reward_id: &str) -> RepoResult<Option<Reward>> {
            Ok(self.reward.clone())
        }
        async fn list_active_for_business(&self, _business_id: &str) -> RepoResult<Vec<Reward>> {
            Ok(vec![])
        }
        async fn redeem(
            &self,
            _reward_id: &str,
            _customer_id: &str,
            _points_cost: i64,
        ) -> RepoResult<LoyaltyOutcome> {
            self.redeem_calls.fetch_add(1, Ordering::SeqCst);
            (self.redeem_result)()
        }
    }

    struct FakeUserRepo {
        user: Option<User>,
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create(&self, _user: &User) -> RepoResult<()> {
            Ok(())
        }
        async fn get(&self, _user_id: &str) -> RepoResult<Option<User>> {
            Ok(self.user.clone())
        }
    }

    fn sample_reward(active: bool) -> Reward {
        Reward {
            id: "rw1".to_string(),
            business_id: "b1".to_string(),
            name: "Café Gratis".to_string(),
            description: None,
            points_required: 100,
            image_url: None,
            is_active: active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            full_name: "Ana García".to_string(),
            role: UserRole::Customer,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_accrual_rejects_non_positive_amount_without_repo_call() {
        let repo = Arc::new(FakeLoyaltyRepo::default());
        let uc = ProcessLoyaltyUseCase::new(repo.clone());

        for amount in [0, -500] {
            let err = uc.execute("u1", "b1", amount).await.unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MustBePositive { .. })
            ));
        }
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_accrual_delegates_for_valid_amount() {
        let repo = Arc::new(FakeLoyaltyRepo::default());
        let uc = ProcessLoyaltyUseCase::new(repo.clone());

        let outcome = uc.execute("u1", "b1", 500).await.unwrap();
        assert_eq!(outcome.new_balance, 105);
        assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_redeem_rejects_non_positive_cost_before_repo() {
        let repo = Arc::new(FakeRewardRepo::with_reward(None));
        let uc = RedeemRewardUseCase::new(repo.clone());

        assert!(uc.execute("rw1", "u1", 0).await.is_err());
        assert!(uc.execute("rw1", "u1", -10).await.is_err());
        assert!(uc.execute("", "u1", 100).await.is_err());
        assert_eq!(repo.redeem_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_redeem_passes_insufficient_points_through() {
        let mut repo = FakeRewardRepo::with_reward(Some(sample_reward(true)));
        repo.redeem_result = || {
            Err(RepositoryError::InsufficientPoints {
                required: 100,
                available: 20,
            })
        };
        let uc = RedeemRewardUseCase::new(Arc::new(repo));

        let err = uc.execute("rw1", "u1", 100).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Repository(RepositoryError::InsufficientPoints { .. })
        ));
    }

    #[tokio::test]
    async fn test_complete_redemption_happy_path() {
        let rewards = Arc::new(FakeRewardRepo::with_reward(Some(sample_reward(true))));
        let users = Arc::new(FakeUserRepo {
            user: Some(sample_user()),
        });
        let uc = CompleteRedemptionUseCase::new(rewards, users);

        let payload = RedemptionCode::issue("rw1", "u1", 100, Utc::now())
            .to_payload()
            .unwrap();
        let summary = uc.execute(&payload).await.unwrap();

        assert_eq!(summary.reward_name, "Café Gratis");
        assert_eq!(summary.points, 100);
        assert_eq!(summary.customer_name, "Ana García");
    }

    #[tokio::test]
    async fn test_complete_redemption_malformed_payload_is_generic() {
        let rewards = Arc::new(FakeRewardRepo::with_reward(Some(sample_reward(true))));
        let users = Arc::new(FakeUserRepo { user: None });
        let uc = CompleteRedemptionUseCase::new(rewards, users);

        let err = uc.execute("{{{ not json").await.unwrap_err();
        assert_eq!(err.to_string(), "Código QR inválido o corrupto");
    }

    #[tokio::test]
    async fn test_complete_redemption_expired_code() {
        let rewards = Arc::new(FakeRewardRepo::with_reward(Some(sample_reward(true))));
        let users = Arc::new(FakeUserRepo { user: None });
        let uc = CompleteRedemptionUseCase::new(rewards, users);

        let payload = RedemptionCode::issue("rw1", "u1", 100, Utc::now() - Duration::minutes(31))
            .to_payload()
            .unwrap();
        let err = uc.execute(&payload).await.unwrap_err();
        assert!(matches!(err, CoreError::ExpiredCode));
    }

    #[tokio::test]
    async fn test_complete_redemption_missing_or_inactive_reward() {
        for reward in [None, Some(sample_reward(false))] {
            let rewards = Arc::new(FakeRewardRepo::with_reward(reward));
            let users = Arc::new(FakeUserRepo { user: None });
            let uc = CompleteRedemptionUseCase::new(rewards, users);

            let payload = RedemptionCode::issue("rw1", "u1", 100, Utc::now())
                .to_payload()
                .unwrap();
            let err = uc.execute(&payload).await.unwrap_err();
            assert!(matches!(err, CoreError::RewardNotFound));
        }
    }
}
