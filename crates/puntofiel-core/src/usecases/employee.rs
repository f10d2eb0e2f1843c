//! # Employee Use Cases
//!
//! Owner-side creation of employee accounts. When the owner doesn't choose
//! a password, a temporary one is generated and parked in the session
//! [`TempPasswordStore`] so it can be read back and handed over.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::repository::EmployeeRepository;
use crate::session::TempPasswordStore;
use crate::types::Employee;
use crate::validation;

/// Input for creating an employee account.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub business_id: String,
    pub full_name: String,
    pub email: String,
    /// Chosen by the owner, or None to have one generated.
    pub password: Option<String>,
}

/// Creation result: the employee plus the generated temporary password,
/// if one was generated (None when the owner chose a password).
#[derive(Debug, Clone)]
pub struct CreatedEmployee {
    pub employee: Employee,
    pub temp_password: Option<String>,
}

pub struct CreateEmployeeUseCase {
    repo: Arc<dyn EmployeeRepository>,
    temp_passwords: Arc<TempPasswordStore>,
}

impl CreateEmployeeUseCase {
    pub fn new(repo: Arc<dyn EmployeeRepository>, temp_passwords: Arc<TempPasswordStore>) -> Self {
        CreateEmployeeUseCase {
            repo,
            temp_passwords,
        }
    }

    /// ## Rules
    /// - business reference and email present, full name at least 3 chars
    /// - a supplied password must have at least 8 characters
    /// - a generated password is recorded in the session store under the
    ///   new employee's id (24 h lifetime)
    pub async fn execute(&self, input: NewEmployee) -> CoreResult<CreatedEmployee> {
        validation::validate_id("negocio", &input.business_id)?;
        validation::validate_name("nombre", &input.full_name)?;
        validation::validate_id("correo", &input.email)?;

        let (password, generated) = match input.password {
            Some(pw) => {
                validation::validate_password(&pw)?;
                (pw, false)
            }
            None => (generate_temp_password(), true),
        };

        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            business_id: input.business_id,
            user_id: Uuid::new_v4().to_string(),
            full_name: input.full_name.trim().to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        self.repo
            .create(&employee, input.email.trim())
            .await
            .map_err(|e| CoreError::in_context("crear empleado", e))?;

        info!(
            employee_id = %employee.id,
            business_id = %employee.business_id,
            "Employee created"
        );

        let temp_password = if generated {
            self.temp_passwords.insert(&employee.id, &password);
            Some(password)
        } else {
            None
        };

        Ok(CreatedEmployee {
            employee,
            temp_password,
        })
    }
}

/// Generates a 12-character temporary password from a fresh UUID.
///
/// Advisory credential only: the employee is expected to change it at
/// first login, and it disappears from the session store after 24 h.
fn generate_temp_password() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    raw[..12].to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::repository::RepoResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingEmployeeRepo {
        creates: AtomicUsize,
    }

    #[async_trait]
    impl EmployeeRepository for RecordingEmployeeRepo {
        async fn create(&self, _employee: &Employee, _email: &str) -> RepoResult<()> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn get(&self, _employee_id: &str) -> RepoResult<Option<Employee>> {
            Ok(None)
        }
        async fn list_for_business(&self, _business_id: &str) -> RepoResult<Vec<Employee>> {
            Ok(vec![])
        }
        async fn deactivate(&self, _employee_id: &str) -> RepoResult<()> {
            Ok(())
        }
    }

    fn new_employee_input(password: Option<&str>) -> NewEmployee {
        NewEmployee {
            business_id: "b1".to_string(),
            full_name: "Luis Pérez".to_string(),
            email: "luis@example.com".to_string(),
            password: password.map(|s| s.to_string()),
        }
    }

    #[tokio::test]
    async fn test_generated_password_lands_in_store() {
        let repo = Arc::new(RecordingEmployeeRepo::default());
        let store = Arc::new(TempPasswordStore::new());
        let uc = CreateEmployeeUseCase::new(repo.clone(), store.clone());

        let created = uc.execute(new_employee_input(None)).await.unwrap();

        let temp = created.temp_password.expect("a password was generated");
        assert_eq!(temp.len(), 12);
        assert_eq!(store.get(&created.employee.id), Some(temp));
        assert_eq!(repo.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chosen_password_skips_store() {
        let repo = Arc::new(RecordingEmployeeRepo::default());
        let store = Arc::new(TempPasswordStore::new());
        let uc = CreateEmployeeUseCase::new(repo, store.clone());

        let created = uc
            .execute(new_employee_input(Some("elegida123")))
            .await
            .unwrap();

        assert!(created.temp_password.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_short_password_rejected_before_repo() {
        let repo = Arc::new(RecordingEmployeeRepo::default());
        let store = Arc::new(TempPasswordStore::new());
        let uc = CreateEmployeeUseCase::new(repo.clone(), store);

        let err = uc
            .execute(new_employee_input(Some("corta")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::PasswordTooShort { .. })
        ));
        assert_eq!(repo.creates.load(Ordering::SeqCst), 0);
    }
}
