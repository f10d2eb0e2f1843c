//! # Promotion Use Cases
//!
//! Time-boxed announcements published by a business. Same guard-clause
//! shape as rewards: validate, build, delegate.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::repository::PromotionRepository;
use crate::types::Promotion;
use crate::validation;

/// Input for creating a promotion.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPromotion {
    pub business_id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub starts_at: chrono::DateTime<Utc>,
    pub ends_at: chrono::DateTime<Utc>,
}

pub struct CreatePromotionUseCase {
    repo: Arc<dyn PromotionRepository>,
}

impl CreatePromotionUseCase {
    pub fn new(repo: Arc<dyn PromotionRepository>) -> Self {
        CreatePromotionUseCase { repo }
    }

    /// ## Rules
    /// - business reference present, title at least 3 characters
    /// - `ends_at > starts_at`
    pub async fn execute(&self, input: NewPromotion) -> CoreResult<Promotion> {
        validation::validate_id("negocio", &input.business_id)?;
        validation::validate_name("título", &input.title)?;
        validation::validate_date_order(input.starts_at, input.ends_at)?;

        let promotion = Promotion {
            id: Uuid::new_v4().to_string(),
            business_id: input.business_id,
            title: input.title.trim().to_string(),
            description: input.description,
            image_url: input.image_url,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            is_active: true,
            created_at: Utc::now(),
        };

        self.repo
            .create(&promotion)
            .await
            .map_err(|e| CoreError::in_context("crear promoción", e))?;

        info!(promotion_id = %promotion.id, "Promotion created");
        Ok(promotion)
    }
}

pub struct UpdatePromotionUseCase {
    repo: Arc<dyn PromotionRepository>,
}

impl UpdatePromotionUseCase {
    pub fn new(repo: Arc<dyn PromotionRepository>) -> Self {
        UpdatePromotionUseCase { repo }
    }

    pub async fn execute(&self, promotion: Promotion) -> CoreResult<Promotion> {
        validation::validate_id("promoción", &promotion.id)?;
        validation::validate_id("negocio", &promotion.business_id)?;
        validation::validate_name("título", &promotion.title)?;
        validation::validate_date_order(promotion.starts_at, promotion.ends_at)?;

        self.repo
            .update(&promotion)
            .await
            .map_err(|e| CoreError::in_context("actualizar promoción", e))?;

        Ok(promotion)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
