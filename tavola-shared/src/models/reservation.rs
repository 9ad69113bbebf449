use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::lenient;

/// Reservation lifecycle. Only `Pending` is ever written by this service;
/// the other states are set by staff directly in the database.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Statuses that occupy seats on their date.
    pub const ACTIVE: [ReservationStatus; 2] = [ReservationStatus::Pending, ReservationStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub party_size: i32,
    pub date: NaiveDate,
    pub country_context: Option<String>,
    pub occasion: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// A validated reservation ready to be handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub party_size: i32,
    pub date: NaiveDate,
    pub country_context: Option<String>,
    pub occasion: Option<String>,
    status: ReservationStatus,
}

impl NewReservation {
    pub fn new(
        full_name: String,
        phone: String,
        email: String,
        party_size: i32,
        date: NaiveDate,
        country_context: Option<String>,
        occasion: Option<String>,
    ) -> Self {
        Self {
            full_name,
            phone,
            email,
            party_size,
            date,
            country_context,
            occasion,
            status: ReservationStatus::Pending,
        }
    }

    /// Always `Pending`: there is no way to build a candidate in any other state.
    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn into_reservation(self, id: Uuid, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            party_size: self.party_size,
            date: self.date,
            country_context: self.country_context,
            occasion: self.occasion,
            status: self.status,
            created_at,
        }
    }
}

/// Party size as sent by web forms. Any JSON value is accepted here so that
/// the validator, not the decoder, decides what is a usable number.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PartySizeInput {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Raw reservation body. Every field is optional so that presence can be
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    pub party_size: Option<PartySizeInput>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub country_context: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub occasion: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let Some(status) = self.status {
            if reservation.status != status {
                return false;
            }
        }
        if let Some(from) = self.from {
            if reservation.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if reservation.date > to {
                return false;
            }
        }
        true
    }
}
