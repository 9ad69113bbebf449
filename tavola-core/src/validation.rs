//! Reservation and email validation.
//!
//! Checks run in a fixed order (presence, date, party size, email, lengths) and the
//! first failure is the only one reported.

use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use tavola_shared::{NewReservation, PartySizeInput, ReservationRequest};

use crate::rules::BusinessRules;

pub const REQUIRED_FIELDS: [&str; 5] = ["full_name", "phone", "email", "party_size", "date"];

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_PHONE_LEN: usize = 50;
/// RFC 5321
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_NOTE_LEN: usize = 200;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid reservation date: {0}")]
    InvalidDate(String),
    #[error("Reservation date cannot be in the past")]
    PastDate,
    #[error("Party size must be a whole number")]
    InvalidPartySize,
    #[error("Party size must be between {min} and {max}")]
    PartySizeOutOfRange { min: u32, max: u32 },
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("Not enough seats left on this date (remaining: {remaining})")]
    CapacityExceeded { remaining: u32 },
}

/// Validate a raw reservation body against `today` and normalize it.
/// The returned candidate is always `pending`.
pub fn validate_reservation(
    req: &ReservationRequest,
    today: NaiveDate,
    rules: &BusinessRules,
) -> Result<NewReservation, ValidationError> {
    let full_name = present(&req.full_name);
    let phone = present(&req.phone);
    let email = present(&req.email);
    let party_size = req.party_size.as_ref().filter(|p| party_size_present(p));
    let date = present(&req.date);

    let (full_name, phone, email, party_size, date) = match (full_name, phone, email, party_size, date) {
        (Some(n), Some(p), Some(e), Some(s), Some(d)) => (n, p, e, s, d),
        (n, p, e, s, d) => {
            let flags = [n.is_none(), p.is_none(), e.is_none(), s.is_none(), d.is_none()];
            let missing = REQUIRED_FIELDS
                .iter()
                .zip(flags)
                .filter_map(|(field, is_missing)| is_missing.then_some(*field))
                .collect();
            return Err(ValidationError::MissingFields(missing));
        }
    };

    let date = parse_date(date)?;
    ensure_not_past(date, today)?;
    let party_size = parse_party_size(party_size, rules)?;
    check_email_format(email)?;

    check_length("full_name", full_name, MAX_NAME_LEN)?;
    check_length("phone", phone, MAX_PHONE_LEN)?;
    check_length("email", email, MAX_EMAIL_LEN)?;
    let country_context = optional(&req.country_context);
    let occasion = optional(&req.occasion);
    if let Some(value) = &country_context {
        check_length("country_context", value, MAX_NOTE_LEN)?;
    }
    if let Some(value) = &occasion {
        check_length("occasion", value, MAX_NOTE_LEN)?;
    }

    Ok(NewReservation::new(
        full_name.to_string(),
        phone.to_string(),
        email.to_string(),
        party_size,
        date,
        country_context,
        occasion,
    ))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (reduced to its local calendar day).
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Local).date_naive())
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Day granularity: today itself is allowed.
pub fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::PastDate);
    }
    Ok(())
}

pub fn parse_party_size(input: &PartySizeInput, rules: &BusinessRules) -> Result<i32, ValidationError> {
    let size = match input {
        PartySizeInput::Integer(n) => *n,
        PartySizeInput::Float(f) => whole_number(*f).ok_or(ValidationError::InvalidPartySize)?,
        PartySizeInput::Text(s) => s.trim().parse::<i64>().map_err(|_| ValidationError::InvalidPartySize)?,
        PartySizeInput::Other(_) => return Err(ValidationError::InvalidPartySize),
    };

    let out_of_range = ValidationError::PartySizeOutOfRange {
        min: rules.min_party_size,
        max: rules.max_party_size,
    };
    if size < i64::from(rules.min_party_size) || size > i64::from(rules.max_party_size) {
        return Err(out_of_range);
    }
    i32::try_from(size).map_err(|_| out_of_range)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn check_email_format(email: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Email-only endpoints: presence then format. Returns the trimmed address.
pub fn validate_email(raw: Option<&str>) -> Result<String, ValidationError> {
    let email = raw.map(str::trim).filter(|e| !e.is_empty()).ok_or(ValidationError::EmailRequired)?;
    check_email_format(email)?;
    check_length("email", email, MAX_EMAIL_LEN)?;
    Ok(email.to_string())
}

/// Trimmed, with blank strings treated as absent.
pub fn optional(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_string)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn party_size_present(input: &PartySizeInput) -> bool {
    match input {
        PartySizeInput::Text(s) => !s.trim().is_empty(),
        PartySizeInput::Integer(_) | PartySizeInput::Float(_) | PartySizeInput::Other(_) => true,
    }
}

/// `4.0` counts as 4; `2.5` is not a party size.
fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(())
}
