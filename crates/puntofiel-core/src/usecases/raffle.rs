//! # Raffle Use Cases
//!
//! Raffle management and ticket accounting.
//!
//! ## Ticket Money Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  buy_ticket:    balance -cost   +1 ticket (points_spent = cost)        │
//! │  return_tickets: balance +Σ points_spent   -all tickets               │
//! │  select_winner: no balance change; raffle frozen as completed          │
//! │                                                                         │
//! │  Window, cap and balance checks plus both mutations are ONE atomic    │
//! │  backend operation — partial application is a correctness violation.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, RepositoryError};
use crate::repository::RaffleRepository;
use crate::types::{Raffle, Ticket, TicketReturnOutcome};
use crate::validation;

/// Input for creating a raffle.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRaffle {
    pub business_id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub points_per_ticket: i64,
    pub max_tickets_per_user: i64,
    pub starts_at: chrono::DateTime<Utc>,
    pub ends_at: chrono::DateTime<Utc>,
}

// =============================================================================
// Create / Update
// =============================================================================

pub struct CreateRaffleUseCase {
    repo: Arc<dyn RaffleRepository>,
}

impl CreateRaffleUseCase {
    pub fn new(repo: Arc<dyn RaffleRepository>) -> Self {
        CreateRaffleUseCase { repo }
    }

    /// ## Rules
    /// - business reference present, title at least 3 characters
    /// - `points_per_ticket > 0`, `max_tickets_per_user > 0`
    /// - `ends_at > starts_at`
    pub async fn execute(&self, input: NewRaffle) -> CoreResult<Raffle> {
        validation::validate_id("negocio", &input.business_id)?;
        validation::validate_name("título", &input.title)?;
        validation::validate_positive("costo en puntos por boleto", input.points_per_ticket)?;
        validation::validate_positive("máximo de boletos por usuario", input.max_tickets_per_user)?;
        validation::validate_date_order(input.starts_at, input.ends_at)?;

        let now = Utc::now();
        let raffle = Raffle {
            id: Uuid::new_v4().to_string(),
            business_id: input.business_id,
            title: input.title.trim().to_string(),
            description: input.description,
            image_url: input.image_url,
            points_per_ticket: input.points_per_ticket,
            max_tickets_per_user: input.max_tickets_per_user,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            winner_id: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .create(&raffle)
            .await
            .map_err(|e| CoreError::in_context("crear sorteo", e))?;

        info!(raffle_id = %raffle.id, business_id = %raffle.business_id, "Raffle created");
        Ok(raffle)
    }
}

pub struct UpdateRaffleUseCase {
    repo: Arc<dyn RaffleRepository>,
}

impl UpdateRaffleUseCase {
    pub fn new(repo: Arc<dyn RaffleRepository>) -> Self {
        UpdateRaffleUseCase { repo }
    }

    pub async fn execute(&self, raffle: Raffle) -> CoreResult<Raffle> {
        validation::validate_id("sorteo", &raffle.id)?;
        validation::validate_id("negocio", &raffle.business_id)?;
        validation::validate_name("título", &raffle.title)?;
        validation::validate_positive("costo en puntos por boleto", raffle.points_per_ticket)?;
        validation::validate_positive("máximo de boletos por usuario", raffle.max_tickets_per_user)?;
        validation::validate_date_order(raffle.starts_at, raffle.ends_at)?;

        let mut raffle = raffle;
        raffle.updated_at = Utc::now();

        self.repo
            .update(&raffle)
            .await
            .map_err(|e| CoreError::in_context("actualizar sorteo", e))?;

        Ok(raffle)
    }
}

// =============================================================================
// Buy / Return Tickets
// =============================================================================

pub struct BuyTicketUseCase {
    repo: Arc<dyn RaffleRepository>,
}

impl BuyTicketUseCase {
    pub fn new(repo: Arc<dyn RaffleRepository>) -> Self {
        BuyTicketUseCase { repo }
    }

    /// ## Rules
    /// - ids present; `cost >= 0` (free raffles exist)
    /// - window, cap and balance checks happen inside the backend's atomic
    ///   operation, not here
    pub async fn execute(&self, raffle_id: &str, user_id: &str, cost: i64) -> CoreResult<Ticket> {
        validation::validate_id("sorteo", raffle_id)?;
        validation::validate_id("usuario", user_id)?;
        validation::validate_non_negative("costo del boleto", cost)?;

        let ticket = self
            .repo
            .buy_ticket(raffle_id, user_id, cost)
            .await
            .map_err(|e| CoreError::in_context("comprar boleto", e))?;

        info!(
            ticket_id = %ticket.id,
            raffle_id = %raffle_id,
            points = cost,
            "Ticket purchased"
        );
        Ok(ticket)
    }
}

pub struct ReturnTicketsUseCase {
    repo: Arc<dyn RaffleRepository>,
}

impl ReturnTicketsUseCase {
    pub fn new(repo: Arc<dyn RaffleRepository>) -> Self {
        ReturnTicketsUseCase { repo }
    }

    /// Refunds every ticket the user holds for the raffle, at the cost
    /// frozen on each ticket when it was purchased.
    pub async fn execute(
        &self,
        raffle_id: &str,
        user_id: &str,
    ) -> CoreResult<TicketReturnOutcome> {
        validation::validate_id("sorteo", raffle_id)?;
        validation::validate_id("usuario", user_id)?;

        let outcome = self
            .repo
            .return_tickets(raffle_id, user_id)
            .await
            .map_err(|e| CoreError::in_context("devolver boletos", e))?;

        info!(
            raffle_id = %raffle_id,
            tickets = outcome.tickets_returned,
            points = outcome.points_refunded,
            "Tickets returned"
        );
        Ok(outcome)
    }
}

// =============================================================================
// Select Winner
// =============================================================================

pub struct SelectWinnerUseCase {
    repo: Arc<dyn RaffleRepository>,
}

impl SelectWinnerUseCase {
    pub fn new(repo: Arc<dyn RaffleRepository>) -> Self {
        SelectWinnerUseCase { repo }
    }

    /// ## Rules
    /// - Only legal once the raffle's end date has passed; this is a
    ///   business rule enforced here, not merely in the UI
    /// - Safe to call twice: a completed raffle is returned unchanged
    pub async fn execute(&self, raffle_id: &str, customer_id: &str) -> CoreResult<Raffle> {
        validation::validate_id("sorteo", raffle_id)?;
        validation::validate_id("cliente", customer_id)?;

        let raffle = self
            .repo
            .get(raffle_id)
            .await
            .map_err(|e| CoreError::in_context("seleccionar ganador", e))?
            .ok_or_else(|| CoreError::Repository(RepositoryError::not_found("sorteo")))?;

        if !raffle.is_completed && !raffle.has_ended_at(Utc::now()) {
            return Err(CoreError::RaffleNotEnded);
        }

        let raffle = self
            .repo
            .select_winner(raffle_id, customer_id)
            .await
            .map_err(|e| CoreError::in_context("seleccionar ganador", e))?;

        info!(
            raffle_id = %raffle.id,
            winner_id = raffle.winner_id.as_deref().unwrap_or("-"),
            "Raffle completed"
        );
        Ok(raffle)
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
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Fake with a single raffle and an idempotent winner path.
    struct FakeRaffleRepo {
        raffle: Mutex<Option<Raffle>>,
        creates: AtomicUsize,
        buys: AtomicUsize,
    }

    impl FakeRaffleRepo {
        fn new(raffle: Option<Raffle>) -> Self {
            FakeRaffleRepo {
                raffle: Mutex::new(raffle),
                creates: AtomicUsize::new(0),
                buys: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RaffleRepository for FakeRaffleRepo {
        async fn create(&self, raffle: &Raffle) -> RepoResult<()> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            *self.raffle.lock().unwrap() = Some(raffle.clone());
            Ok(())
        }
        async fn update(&self, _raffle: &Raffle) -> RepoResult<()> {
            Ok(())
        }
        async fn get(&self, _raffle_id: &str) -> RepoResult<Option<Raffle>> {
            Ok(self.raffle.lock().unwrap().clone())
        }
        async fn list_for_business(&self, _business_id: &str) -> RepoResult<Vec<Raffle>> {
            Ok(vec![])
        }
        async fn tickets_for(
            &self,
            _raffle_id: &str,
            _customer_id: &str,
        ) -> RepoResult<Vec<Ticket>> {
            Ok(vec![])
        }
        async fn buy_ticket(
            &self,
            raffle_id: &str,
            customer_id: &str,
            cost: i64,
        ) -> RepoResult<Ticket> {
            self.buys.fetch_add(1, Ordering::SeqCst);
            Ok(Ticket {
                id: "t1".to_string(),
                raffle_id: raffle_id.to_string(),
                customer_id: customer_id.to_string(),
                points_spent: cost,
                purchased_at: Utc::now(),
            })
        }
        async fn return_tickets(
            &self,
            _raffle_id: &str,
            _customer_id: &str,
        ) -> RepoResult<TicketReturnOutcome> {
            Ok(TicketReturnOutcome {
                tickets_returned: 2,
                points_refunded: 20,
                new_balance: 120,
            })
        }
        async fn select_winner(&self, _raffle_id: &str, customer_id: &str) -> RepoResult<Raffle> {
            let mut guard = self.raffle.lock().unwrap();
            let raffle = guard.as_mut().ok_or_else(|| {
                crate::error::RepositoryError::not_found("sorteo")
            })?;
            // Conditional update semantics: only the first call writes.
            if !raffle.is_completed {
                raffle.is_completed = true;
                raffle.winner_id = Some(customer_id.to_string());
            }
            Ok(raffle.clone())
        }
    }

    fn new_raffle_input() -> NewRaffle {
        let now = Utc::now();
        NewRaffle {
            business_id: "b1".to_string(),
            title: "Rifa Aniversario".to_string(),
            description: None,
            image_url: None,
            points_per_ticket: 10,
            max_tickets_per_user: 3,
            starts_at: now,
            ends_at: now + Duration::days(7),
        }
    }

    fn ended_raffle() -> Raffle {
        let now = Utc::now();
        Raffle {
            id: "r1".to_string(),
            business_id: "b1".to_string(),
            title: "Rifa Aniversario".to_string(),
            description: None,
            image_url: None,
            points_per_ticket: 10,
            max_tickets_per_user: 3,
            starts_at: now - Duration::days(8),
            ends_at: now - Duration::days(1),
            winner_id: None,
            is_completed: false,
            created_at: now - Duration::days(9),
            updated_at: now - Duration::days(9),
        }
    }

    #[tokio::test]
    async fn test_create_raffle_rejects_bad_date_order() {
        let repo = Arc::new(FakeRaffleRepo::new(None));
        let uc = CreateRaffleUseCase::new(repo.clone());

        let mut input = new_raffle_input();
        input.ends_at = input.starts_at;
        let err = uc.execute(input).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DateOrder)
        ));

        let mut input = new_raffle_input();
        input.ends_at = input.starts_at - Duration::days(1);
        assert!(uc.execute(input).await.is_err());

        assert_eq!(repo.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_raffle_rejects_non_positive_limits() {
        let repo = Arc::new(FakeRaffleRepo::new(None));
        let uc = CreateRaffleUseCase::new(repo.clone());

        let mut input = new_raffle_input();
        input.max_tickets_per_user = 0;
        assert!(uc.execute(input).await.is_err());

        let mut input = new_raffle_input();
        input.points_per_ticket = 0;
        assert!(uc.execute(input).await.is_err());

        assert_eq!(repo.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_raffle_happy_path() {
        let repo = Arc::new(FakeRaffleRepo::new(None));
        let uc = CreateRaffleUseCase::new(repo.clone());

        let raffle = uc.execute(new_raffle_input()).await.unwrap();
        assert!(!raffle.is_completed);
        assert!(raffle.winner_id.is_none());
        assert_eq!(repo.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_buy_ticket_rejects_negative_cost() {
        let repo = Arc::new(FakeRaffleRepo::new(None));
        let uc = BuyTicketUseCase::new(repo.clone());

        assert!(uc.execute("r1", "u1", -1).await.is_err());
        assert_eq!(repo.buys.load(Ordering::SeqCst), 0);

        // Zero is a legal cost (free entry)
        assert!(uc.execute("r1", "u1", 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_select_winner_requires_ended_raffle() {
        let mut raffle = ended_raffle();
        raffle.ends_at = Utc::now() + Duration::days(1);
        let repo = Arc::new(FakeRaffleRepo::new(Some(raffle)));
        let uc = SelectWinnerUseCase::new(repo);

        let err = uc.execute("r1", "u1").await.unwrap_err();
        assert!(matches!(err, CoreError::RaffleNotEnded));
    }

    #[tokio::test]
    async fn test_select_winner_is_idempotent() {
        let repo = Arc::new(FakeRaffleRepo::new(Some(ended_raffle())));
        let uc = SelectWinnerUseCase::new(repo);

        let first = uc.execute("r1", "u1").await.unwrap();
        assert_eq!(first.winner_id.as_deref(), Some("u1"));
        assert!(first.is_completed);

        // Second call, even with a different customer, changes nothing
        let second = uc.execute("r1", "u2").await.unwrap();
        assert_eq!(second.winner_id.as_deref(), Some("u1"));
        assert!(second.is_completed);
    }
}
