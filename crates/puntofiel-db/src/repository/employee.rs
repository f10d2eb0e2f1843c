//! # Employee Repository
//!
//! Employee rows plus their backing platform accounts. Creation inserts
//! both in one transaction, mirroring the backend's "create employee
//! account" operation.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use puntofiel_core::repository::{EmployeeRepository, RepoResult};
use puntofiel_core::{Employee, RepositoryError, UserRole};

use super::map_sqlx;

const EMPLOYEE_COLUMNS: &str = "id, business_id, user_id, full_name, is_active, created_at";

/// Repository for employees.
#[derive(Debug, Clone)]
pub struct SqliteEmployeeRepository {
    pool: SqlitePool,
}

impl SqliteEmployeeRepository {
    /// Creates a new SqliteEmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteEmployeeRepository { pool }
    }
}

#[async_trait]
impl EmployeeRepository for SqliteEmployeeRepository {
    async fn create(&self, employee: &Employee, email: &str) -> RepoResult<()> {
        debug!(
            employee_id = %employee.id,
            business_id = %employee.business_id,
            "Creating employee account"
        );

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        sqlx::query(
            "INSERT INTO users (id, email, full_name, role, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&employee.user_id)
        .bind(email)
        .bind(&employee.full_name)
        .bind(UserRole::Employee)
        .bind(employee.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query(
            "INSERT INTO employees (id, business_id, user_id, full_name, is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&employee.id)
        .bind(&employee.business_id)
        .bind(&employee.user_id)
        .bind(&employee.full_name)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;
        Ok(())
    }

    async fn get(&self, employee_id: &str) -> RepoResult<Option<Employee>> {
        sqlx::query_as(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1"
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn list_for_business(&self, business_id: &str) -> RepoResult<Vec<Employee>> {
        sqlx::query_as(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE business_id = ?1 AND is_active = 1 \
             ORDER BY full_name"
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn deactivate(&self, employee_id: &str) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE employees SET is_active = 0 WHERE id = ?1 AND is_active = 1")
                .bind(employee_id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("empleado"));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
