//! # Use Cases
//!
//! One type per business operation. Each use case:
//!
//! 1. Validates its inputs locally (tier-1 errors, no network)
//! 2. Delegates unchanged to an injected repository trait object
//! 3. Maps repository failures through [`CoreError::in_context`], so
//!    operational errors gain a contextual prefix while domain errors
//!    (not-found, insufficient points, …) pass through untouched
//!
//! The use cases are the entirety of the business-rule layer: repositories
//! do I/O, the UI renders, and everything in between lives here.
//!
//! [`CoreError::in_context`]: crate::error::CoreError::in_context

pub mod business;
pub mod employee;
pub mod loyalty;
pub mod promotion;
pub mod raffle;
pub mod reward;

pub use business::{CreateBusinessUseCase, LogoUpload, NewBusiness};
pub use employee::{CreateEmployeeUseCase, CreatedEmployee, NewEmployee};
pub use loyalty::{CompleteRedemptionUseCase, ProcessLoyaltyUseCase, RedeemRewardUseCase};
pub use promotion::{CreatePromotionUseCase, NewPromotion, UpdatePromotionUseCase};
pub use raffle::{
    BuyTicketUseCase, CreateRaffleUseCase, NewRaffle, ReturnTicketsUseCase, SelectWinnerUseCase,
    UpdateRaffleUseCase,
};
pub use reward::{CreateRewardUseCase, DeactivateRewardUseCase, NewReward, UpdateRewardUseCase};
