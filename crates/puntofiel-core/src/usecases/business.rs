//! # Business Use Cases
//!
//! Business creation, including the one documented partial-success policy
//! in the whole system: a failed logo upload after a successful creation
//! returns the business without its logo instead of rolling back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::repository::{BusinessRepository, FileStorage};
use crate::types::Business;
use crate::validation;

/// A logo file captured by the UI, ready to upload.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Input for creating a business.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<LogoUpload>,
}

pub struct CreateBusinessUseCase {
    businesses: Arc<dyn BusinessRepository>,
    storage: Arc<dyn FileStorage>,
}

impl CreateBusinessUseCase {
    pub fn new(businesses: Arc<dyn BusinessRepository>, storage: Arc<dyn FileStorage>) -> Self {
        CreateBusinessUseCase {
            businesses,
            storage,
        }
    }

    /// Creates the business, then uploads the logo if one was provided.
    ///
    /// ## Partial-Success Policy
    /// Once the business row exists, a logo failure (upload or URL update)
    /// does NOT roll it back: the business is returned without a logo and
    /// the failure is logged. The owner can retry the upload later. This
    /// is the documented exception to "use cases never swallow errors".
    pub async fn execute(&self, input: NewBusiness) -> CoreResult<Business> {
        validation::validate_id("propietario", &input.owner_id)?;
        validation::validate_name("nombre", &input.name)?;

        let now = Utc::now();
        let mut business = Business {
            id: Uuid::new_v4().to_string(),
            owner_id: input.owner_id,
            name: input.name.trim().to_string(),
            description: input.description,
            logo_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.businesses
            .create(&business)
            .await
            .map_err(|e| CoreError::in_context("crear negocio", e))?;

        info!(business_id = %business.id, "Business created");

        if let Some(logo) = input.logo {
            let path = format!("businesses/{}/{}", business.id, logo.file_name);
            match self.storage.upload(&path, &logo.bytes, true).await {
                Ok(stored) => {
                    match self.businesses.set_logo(&business.id, &stored.public_url).await {
                        Ok(()) => business.logo_url = Some(stored.public_url),
                        Err(e) => {
                            warn!(
                                business_id = %business.id,
                                error = %e,
                                "Logo stored but URL update failed; returning business without logo"
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        business_id = %business.id,
                        error = %e,
                        "Logo upload failed; returning business without logo"
                    );
                }
            }
        }

        Ok(business)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::repository::RepoResult;
    use crate::types::StoredFile;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingBusinessRepo {
        creates: AtomicUsize,
        logo_sets: AtomicUsize,
    }

    #[async_trait]
    impl BusinessRepository for RecordingBusinessRepo {
        async fn create(&self, _business: &Business) -> RepoResult<()> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn get(&self, _business_id: &str) -> RepoResult<Option<Business>> {
            Ok(None)
        }
        async fn update(&self, _business: &Business) -> RepoResult<()> {
            Ok(())
        }
        async fn set_logo(&self, _business_id: &str, _logo_url: &str) -> RepoResult<()> {
            self.logo_sets.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn list_active(&self) -> RepoResult<Vec<Business>> {
            Ok(vec![])
        }
    }

    struct OkStorage;

    #[async_trait]
    impl FileStorage for OkStorage {
        async fn upload(
            &self,
            path: &str,
            _bytes: &[u8],
            _overwrite: bool,
        ) -> RepoResult<StoredFile> {
            Ok(StoredFile {
                path: path.to_string(),
                public_url: format!("https://files.local/{path}"),
            })
        }
        fn public_url(&self, path: &str) -> String {
            format!("https://files.local/{path}")
        }
        async fn delete(&self, _path: &str) -> RepoResult<()> {
            Ok(())
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl FileStorage for FailingStorage {
        async fn upload(
            &self,
            _path: &str,
            _bytes: &[u8],
            _overwrite: bool,
        ) -> RepoResult<StoredFile> {
            Err(RepositoryError::Storage {
                message: "disco lleno".to_string(),
            })
        }
        fn public_url(&self, path: &str) -> String {
            path.to_string()
        }
        async fn delete(&self, _path: &str) -> RepoResult<()> {
            Ok(())
        }
    }

    fn input_with_logo() -> NewBusiness {
        NewBusiness {
            owner_id: "o1".to_string(),
            name: "Café Central".to_string(),
            description: Some("Cafetería de barrio".to_string()),
            logo: Some(LogoUpload {
                file_name: "logo.png".to_string(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            }),
        }
    }

    #[tokio::test]
    async fn test_create_with_logo_sets_url() {
        let repo = Arc::new(RecordingBusinessRepo::default());
        let uc = CreateBusinessUseCase::new(repo.clone(), Arc::new(OkStorage));

        let business = uc.execute(input_with_logo()).await.unwrap();
        assert!(business
            .logo_url
            .as_deref()
            .unwrap()
            .starts_with("https://files.local/businesses/"));
        assert_eq!(repo.creates.load(Ordering::SeqCst), 1);
        assert_eq!(repo.logo_sets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logo_failure_is_partial_success() {
        let repo = Arc::new(RecordingBusinessRepo::default());
        let uc = CreateBusinessUseCase::new(repo.clone(), Arc::new(FailingStorage));

        // The business is still created and returned, just without a logo
        let business = uc.execute(input_with_logo()).await.unwrap();
        assert!(business.logo_url.is_none());
        assert_eq!(repo.creates.load(Ordering::SeqCst), 1);
        assert_eq!(repo.logo_sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_short_name() {
        let repo = Arc::new(RecordingBusinessRepo::default());
        let uc = CreateBusinessUseCase::new(repo.clone(), Arc::new(OkStorage));

        let mut input = input_with_logo();
        input.name = "ab".to_string();
        assert!(uc.execute(input).await.is_err());
        assert_eq!(repo.creates.load(Ordering::SeqCst), 0);
    }
}
