use chrono::NaiveDate;
use serde::Serialize;

/// Derived view of a date's seating. Never persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    pub date: NaiveDate,
    pub available: bool,
    pub occupied_seats: u32,
    pub remaining_seats: u32,
    pub max_capacity: u32,
    pub message: String,
}
