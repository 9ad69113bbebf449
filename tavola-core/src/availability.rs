use chrono::NaiveDate;
use std::sync::Arc;
use tavola_shared::{AvailabilitySnapshot, ReservationStatus};
use tracing::{debug, error};

use crate::clock::Clock;
use crate::repository::{Store, StoreError};
use crate::{CoreError, CoreResult};

pub const MESSAGE_AVAILABLE: &str = "Date available";
pub const MESSAGE_FULL: &str = "Date fully booked";
pub const MESSAGE_PAST: &str = "Date unavailable (in the past)";

/// Seat usage for a date, derived from the non-cancelled reservations on it.
pub struct AvailabilityCalculator {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    max_capacity: u32,
}

impl AvailabilityCalculator {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, max_capacity: u32) -> Self {
        Self { store, clock, max_capacity }
    }

    pub async fn check(&self, date: NaiveDate) -> CoreResult<AvailabilitySnapshot> {
        if date < self.clock.today() {
            return Ok(past_date(date, self.max_capacity));
        }

        let party_sizes = match self.store.party_sizes_on(date, &ReservationStatus::ACTIVE).await {
            Ok(sizes) => sizes,
            Err(StoreError::NotConfigured) => {
                debug!(%date, "Store not configured, reporting an empty date");
                Vec::new()
            }
            Err(StoreError::Backend(msg)) => {
                error!(%date, error = %msg, "Failed to load reservations for availability");
                return Err(CoreError::Persistence(msg));
            }
        };

        Ok(summarize(date, &party_sizes, self.max_capacity))
    }
}

/// Sum party sizes and compare against capacity.
pub fn summarize(date: NaiveDate, party_sizes: &[i32], max_capacity: u32) -> AvailabilitySnapshot {
    let occupied_seats = party_sizes
        .iter()
        .map(|size| u32::try_from(*size).unwrap_or(0))
        .fold(0u32, u32::saturating_add);
    let available = occupied_seats < max_capacity;

    AvailabilitySnapshot {
        date,
        available,
        occupied_seats,
        remaining_seats: max_capacity.saturating_sub(occupied_seats),
        max_capacity,
        message: if available { MESSAGE_AVAILABLE } else { MESSAGE_FULL }.to_string(),
    }
}

pub fn past_date(date: NaiveDate, max_capacity: u32) -> AvailabilitySnapshot {
    AvailabilitySnapshot {
        date,
        available: false,
        occupied_seats: 0,
        remaining_seats: 0,
        max_capacity,
        message: MESSAGE_PAST.to_string(),
    }
}
