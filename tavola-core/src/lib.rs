pub mod availability;
pub mod clock;
pub mod content;
pub mod fallback;
pub mod memory;
pub mod repository;
pub mod reservation;
pub mod rules;
pub mod subscriber;
pub mod unconfigured;
pub mod validation;

pub use availability::AvailabilityCalculator;
pub use clock::{Clock, FixedClock, SystemClock};
pub use content::ContentService;
pub use memory::InMemoryStore;
pub use repository::{Store, StoreError, StoreResult};
pub use reservation::{ReservationConfirmation, ReservationList, ReservationService};
pub use rules::BusinessRules;
pub use subscriber::{SubscriberService, SubscriptionConfirmation};
pub use unconfigured::UnconfiguredStore;
pub use validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
