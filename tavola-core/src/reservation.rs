use serde::Serialize;
use std::sync::Arc;
use tavola_shared::{AvailabilitySnapshot, Masked, Reservation, ReservationFilter, ReservationRequest};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::availability::AvailabilityCalculator;
use crate::clock::Clock;
use crate::repository::{Store, StoreError};
use crate::rules::BusinessRules;
use crate::validation::{self, ValidationError};
use crate::{CoreError, CoreResult};

pub const MESSAGE_CREATED: &str =
    "Reservation created successfully. We will contact you shortly to confirm.";
pub const MESSAGE_SIMULATED: &str =
    "Reservation received. The reservation store is not configured, so it was not saved.";

#[derive(Debug, Clone, Serialize)]
pub struct ReservationConfirmation {
    pub success: bool,
    pub message: String,
    pub reservation: Reservation,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub simulated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationList {
    pub reservations: Vec<Reservation>,
    pub total: usize,
}

/// Validation, optional capacity guard and persistence for reservations.
pub struct ReservationService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    rules: BusinessRules,
    availability: AvailabilityCalculator,
}

impl ReservationService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, rules: BusinessRules) -> Self {
        let availability = AvailabilityCalculator::new(store.clone(), clock.clone(), rules.max_capacity);
        Self { store, clock, rules, availability }
    }

    pub async fn submit_reservation(&self, req: &ReservationRequest) -> CoreResult<ReservationConfirmation> {
        let candidate = validation::validate_reservation(req, self.clock.today(), &self.rules)?;

        if self.rules.enforce_capacity {
            let snapshot = self.availability.check(candidate.date).await?;
            let party = u32::try_from(candidate.party_size).unwrap_or(u32::MAX);
            if party > snapshot.remaining_seats {
                info!(date = %candidate.date, party, remaining = snapshot.remaining_seats, "Reservation rejected, date is full");
                return Err(ValidationError::CapacityExceeded { remaining: snapshot.remaining_seats }.into());
            }
        }

        match self.store.insert_reservation(&candidate).await {
            Ok(reservation) => {
                info!(
                    reservation_id = %reservation.id,
                    date = %reservation.date,
                    party_size = reservation.party_size,
                    email = %Masked(&reservation.email),
                    "Reservation created"
                );
                Ok(ReservationConfirmation {
                    success: true,
                    message: MESSAGE_CREATED.to_string(),
                    reservation,
                    simulated: false,
                })
            }
            Err(StoreError::NotConfigured) => {
                warn!(date = %candidate.date, "Store not configured, reservation accepted without persisting");
                let reservation = candidate.into_reservation(Uuid::new_v4(), self.clock.now());
                Ok(ReservationConfirmation {
                    success: true,
                    message: MESSAGE_SIMULATED.to_string(),
                    reservation,
                    simulated: true,
                })
            }
            Err(StoreError::Backend(msg)) => {
                error!(error = %msg, "Failed to create reservation");
                Err(CoreError::Persistence(msg))
            }
        }
    }

    /// `raw_date` uses the same formats as the reservation body.
    pub async fn check_availability(&self, raw_date: &str) -> CoreResult<AvailabilitySnapshot> {
        let date = validation::parse_date(raw_date)?;
        self.availability.check(date).await
    }

    pub async fn list_reservations(&self, filter: &ReservationFilter) -> CoreResult<ReservationList> {
        let reservations = match self.store.list_reservations(filter).await {
            Ok(reservations) => reservations,
            Err(StoreError::NotConfigured) => Vec::new(),
            Err(StoreError::Backend(msg)) => {
                error!(error = %msg, "Failed to list reservations");
                return Err(CoreError::Persistence(msg));
            }
        };
        let total = reservations.len();
        Ok(ReservationList { reservations, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::memory::InMemoryStore;
    use crate::unconfigured::UnconfiguredStore;
    use chrono::NaiveDate;
    use tavola_shared::{PartySizeInput, ReservationStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
    }

    fn service(store: Arc<dyn Store>, rules: BusinessRules) -> ReservationService {
        ReservationService::new(store, Arc::new(FixedClock::new(today())), rules)
    }

    fn request(party_size: i64, date: &str) -> ReservationRequest {
        ReservationRequest {
            full_name: Some("Kenji Sato".to_string()),
            phone: Some("555-0199".to_string()),
            email: Some("kenji@example.com".to_string()),
            party_size: Some(PartySizeInput::Integer(party_size)),
            date: Some(date.to_string()),
            country_context: Some("Japan".to_string()),
            occasion: Some("Anniversary".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_one_pending_reservation() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone(), BusinessRules::default());

        let confirmation = service.submit_reservation(&request(4, "2030-06-20")).await.unwrap();

        assert!(confirmation.success);
        assert!(!confirmation.simulated);
        assert_eq!(confirmation.reservation.status, ReservationStatus::Pending);
        assert_eq!(confirmation.reservation.occasion.as_deref(), Some("Anniversary"));
        assert_eq!(store.reservation_count().await, 1);
    }

    #[tokio::test]
    async fn test_validation_failure_writes_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone(), BusinessRules::default());

        let err = service.submit_reservation(&request(4, "2030-06-14")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::PastDate)));
        assert_eq!(store.reservation_count().await, 0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported_verbatim() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_with("duplicate key value violates constraint").await;
        let service = service(store.clone(), BusinessRules::default());

        let err = service.submit_reservation(&request(2, "2030-06-20")).await.unwrap_err();
        assert!(matches!(err, CoreError::Persistence(msg) if msg == "duplicate key value violates constraint"));
    }

    #[tokio::test]
    async fn test_unconfigured_store_simulates_success() {
        let service = service(Arc::new(UnconfiguredStore), BusinessRules::default());

        let confirmation = service.submit_reservation(&request(2, "2030-06-20")).await.unwrap();
        assert!(confirmation.success);
        assert!(confirmation.simulated);
        assert_eq!(confirmation.reservation.status, ReservationStatus::Pending);
        assert_eq!(confirmation.message, MESSAGE_SIMULATED);
    }

    #[tokio::test]
    async fn test_capacity_is_advisory_by_default() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone(), BusinessRules::default());
        for _ in 0..5 {
            service.submit_reservation(&request(12, "2030-06-20")).await.unwrap();
        }
        assert_eq!(store.reservation_count().await, 5);
    }

    #[tokio::test]
    async fn test_capacity_guard_when_enforced() {
        let store = Arc::new(InMemoryStore::new());
        let rules = BusinessRules { enforce_capacity: true, ..Default::default() };
        let service = service(store.clone(), rules);
        for _ in 0..4 {
            service.submit_reservation(&request(12, "2030-06-20")).await.unwrap();
        }

        let err = service.submit_reservation(&request(3, "2030-06-20")).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::CapacityExceeded { remaining: 2 })
        ));
        assert!(service.submit_reservation(&request(2, "2030-06-20")).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_availability_parses_the_date() {
        let service = service(Arc::new(InMemoryStore::new()), BusinessRules::default());

        let snapshot = service.check_availability("2030-06-20").await.unwrap();
        assert!(snapshot.available);
        assert_eq!(snapshot.remaining_seats, 50);

        let err = service.check_availability("tomorrow").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidDate(_))));
    }

    #[tokio::test]
    async fn test_list_reservations_filters_by_status() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone(), BusinessRules::default());
        let first = service.submit_reservation(&request(2, "2030-06-20")).await.unwrap();
        service.submit_reservation(&request(3, "2030-06-21")).await.unwrap();
        store.set_reservation_status(first.reservation.id, ReservationStatus::Confirmed).await;

        let filter = ReservationFilter { status: Some(ReservationStatus::Confirmed), ..Default::default() };
        let listed = service.list_reservations(&filter).await.unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.reservations[0].id, first.reservation.id);

        let unconfigured = service_unconfigured();
        assert_eq!(unconfigured.list_reservations(&ReservationFilter::default()).await.unwrap().total, 0);
    }

    fn service_unconfigured() -> ReservationService {
        service(Arc::new(UnconfiguredStore), BusinessRules::default())
    }
}
