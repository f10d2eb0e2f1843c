//! # Reward Use Cases
//!
//! Owner-side management of a business's reward catalog. Pure guard-clause
//! sequences: validate, build the entity, delegate.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::repository::RewardRepository;
use crate::types::Reward;
use crate::validation;

/// Input for creating a reward.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReward {
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub image_url: Option<String>,
}

pub struct CreateRewardUseCase {
    repo: Arc<dyn RewardRepository>,
}

impl CreateRewardUseCase {
    pub fn new(repo: Arc<dyn RewardRepository>) -> Self {
        CreateRewardUseCase { repo }
    }

    /// ## Rules
    /// - business reference present
    /// - name at least 3 characters
    /// - `points_required > 0`
    pub async fn execute(&self, input: NewReward) -> CoreResult<Reward> {
        validation::validate_id("negocio", &input.business_id)?;
        validation::validate_name("nombre", &input.name)?;
        validation::validate_positive("puntos requeridos", input.points_required)?;

        let now = Utc::now();
        let reward = Reward {
            id: Uuid::new_v4().to_string(),
            business_id: input.business_id,
            name: input.name.trim().to_string(),
            description: input.description,
            points_required: input.points_required,
            image_url: input.image_url,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .create(&reward)
            .await
            .map_err(|e| CoreError::in_context("crear recompensa", e))?;

        info!(reward_id = %reward.id, business_id = %reward.business_id, "Reward created");
        Ok(reward)
    }
}

pub struct UpdateRewardUseCase {
    repo: Arc<dyn RewardRepository>,
}

impl UpdateRewardUseCase {
    pub fn new(repo: Arc<dyn RewardRepository>) -> Self {
        UpdateRewardUseCase { repo }
    }

    /// Same field rules as creation, plus the reward id itself.
    pub async fn execute(&self, reward: Reward) -> CoreResult<Reward> {
        validation::validate_id("recompensa", &reward.id)?;
        validation::validate_id("negocio", &reward.business_id)?;
        validation::validate_name("nombre", &reward.name)?;
        validation::validate_positive("puntos requeridos", reward.points_required)?;

        let mut reward = reward;
        reward.updated_at = Utc::now();

        self.repo
            .update(&reward)
            .await
            .map_err(|e| CoreError::in_context("actualizar recompensa", e))?;

        Ok(reward)
    }
}

/// Soft delete. The row survives so past transactions keep their reference.
pub struct DeactivateRewardUseCase {
    repo: Arc<dyn RewardRepository>,
}

impl DeactivateRewardUseCase {
    pub fn new(repo: Arc<dyn RewardRepository>) -> Self {
        DeactivateRewardUseCase { repo }
    }

    pub async fn execute(&self, reward_id: &str) -> CoreResult<()> {
        validation::validate_id("recompensa", reward_id)?;

        self.repo
            .deactivate(reward_id)
            .await
            .map_err(|e| CoreError::in_context("desactivar recompensa", e))?;

        info!(reward_id = %reward_id, "Reward deactivated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::repository::RepoResult;
    use crate::types::LoyaltyOutcome;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingRewardRepo {
        creates: AtomicUsize,
    }

    #[async_trait]
    impl RewardRepository for RecordingRewardRepo {
        async fn create(&self, _reward: &Reward) -> RepoResult<()> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn update(&self, _reward: &Reward) -> RepoResult<()> {
            Ok(())
        }
        async fn deactivate(&self, _reward_id: &str) -> RepoResult<()> {
            Ok(())
        }
        async fn get(&self, _reward_id: &str) -> RepoResult<Option<Reward>> {
            Ok(None)
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
            unreachable!("redeem is not exercised here")
        }
    }

    fn new_reward_input() -> NewReward {
        NewReward {
            business_id: "b1".to_string(),
            name: "Café Gratis".to_string(),
            description: None,
            points_required: 100,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_reward_happy_path() {
        let repo = Arc::new(RecordingRewardRepo::default());
        let uc = CreateRewardUseCase::new(repo.clone());

        let reward = uc.execute(new_reward_input()).await.unwrap();
        assert_eq!(reward.name, "Café Gratis");
        assert_eq!(reward.points_required, 100);
        assert!(reward.is_active);
        assert_eq!(repo.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_reward_rejects_short_name() {
        let repo = Arc::new(RecordingRewardRepo::default());
        let uc = CreateRewardUseCase::new(repo.clone());

        let mut input = new_reward_input();
        input.name = "ab".to_string();

        let err = uc.execute(input).await.unwrap_err();
        assert_eq!(err.to_string(), "El nombre debe tener al menos 3 caracteres");
        assert_eq!(repo.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_reward_rejects_non_positive_points() {
        let repo = Arc::new(RecordingRewardRepo::default());
        let uc = CreateRewardUseCase::new(repo.clone());

        for points in [0, -50] {
            let mut input = new_reward_input();
            input.points_required = points;
            let err = uc.execute(input).await.unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MustBePositive { .. })
            ));
        }
        assert_eq!(repo.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_reward_requires_business() {
        let repo = Arc::new(RecordingRewardRepo::default());
        let uc = CreateRewardUseCase::new(repo);

        let mut input = new_reward_input();
        input.business_id = " ".to_string();
        assert!(uc.execute(input).await.is_err());
    }
}
