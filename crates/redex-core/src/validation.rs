use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ValidationError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// First and last bookable slot, in 30 minute steps.
pub const FIRST_SLOT_HOUR: u32 = 17;
pub const LAST_SLOT_HOUR: u32 = 23;
pub const MAX_GUESTS: u32 = 12;
pub const DEFAULT_GUESTS: u32 = 2;
pub const MAX_SPECIAL_REQUESTS: usize = 500;

/// Per-field validation failures in the order the fields appear on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<(&'static str, ValidationError)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first error per field wins.
    pub fn push(&mut self, field: &'static str, error: ValidationError) {
        if self.get(field).is_none() {
            self.errors.push((field, error));
        }
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, e)| e)
    }

    /// Message shown under `field`, if it failed.
    pub fn message(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ValidationError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }
}

impl Serialize for FormErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in &self.errors {
            map.serialize_entry(field, &error.to_string())?;
        }
        map.end()
    }
}

/// Raw reservation form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    /// Kept as text so a blank or garbled value is a field error.
    pub guests: String,
    pub special_requests: String,
}

impl Default for ReservationRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            date: String::new(),
            time: String::new(),
            guests: DEFAULT_GUESTS.to_string(),
            special_requests: String::new(),
        }
    }
}

/// A reservation that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: u32,
    pub special_requests: Option<String>,
}

/// Raw newsletter form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionRequest {
    pub email: String,
}

/// A newsletter signup that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub email: String,
}

/// Validator for form input.
pub struct Validator;

impl Validator {
    /// Loose email shape check: something@something.something, no spaces.
    pub fn is_valid_email(email: &str) -> bool {
        EMAIL_RE.is_match(email)
    }

    /// Validate a reservation date. Today is allowed; earlier days are not.
    pub fn validate_date(date: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        let date = date.trim();
        if date.is_empty() {
            return Err(ValidationError::DateRequired);
        }
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
        if parsed < today {
            return Err(ValidationError::PastDate);
        }
        Ok(parsed)
    }

    /// Validate a time against the bookable slots.
    pub fn validate_time(time: &str) -> Result<NaiveTime, ValidationError> {
        let time = time.trim();
        if time.is_empty() {
            return Err(ValidationError::TimeRequired);
        }
        let parsed = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| ValidationError::InvalidTimeSlot(time.to_string()))?;
        let in_hours = (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&parsed.hour());
        if !in_hours || parsed.minute() % 30 != 0 {
            return Err(ValidationError::InvalidTimeSlot(time.to_string()));
        }
        Ok(parsed)
    }

    /// Validate the party size field.
    pub fn validate_guests(guests: &str) -> Result<u32, ValidationError> {
        let guests = guests.trim();
        if guests.is_empty() {
            return Err(ValidationError::GuestsRequired);
        }
        guests
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=MAX_GUESTS).contains(n))
            .ok_or_else(|| ValidationError::InvalidGuestCount(guests.to_string()))
    }

    /// Validate the whole reservation form, collecting every field error.
    pub fn validate_reservation(
        request: &ReservationRequest,
        today: NaiveDate,
    ) -> Result<Reservation, FormErrors> {
        let mut errors = FormErrors::new();

        let name = request.name.trim();
        if name.is_empty() {
            errors.push("name", ValidationError::NameRequired);
        }

        let email = request.email.trim();
        if email.is_empty() {
            errors.push("email", ValidationError::EmailRequired);
        } else if !Self::is_valid_email(email) {
            errors.push("email", ValidationError::InvalidEmail);
        }

        let phone = request.phone.trim();
        if phone.is_empty() {
            errors.push("phone", ValidationError::PhoneRequired);
        }

        let date = Self::validate_date(&request.date, today)
            .map_err(|e| errors.push("date", e))
            .ok();
        let time = Self::validate_time(&request.time)
            .map_err(|e| errors.push("time", e))
            .ok();
        let guests = Self::validate_guests(&request.guests)
            .map_err(|e| errors.push("guests", e))
            .ok();

        let special = request.special_requests.trim();
        let len = special.chars().count();
        if len > MAX_SPECIAL_REQUESTS {
            errors.push(
                "special_requests",
                ValidationError::TooLong {
                    len,
                    max: MAX_SPECIAL_REQUESTS,
                },
            );
        }

        match (date, time, guests) {
            (Some(date), Some(time), Some(guests)) if errors.is_empty() => Ok(Reservation {
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                date,
                time,
                guests,
                special_requests: (!special.is_empty()).then(|| special.to_string()),
            }),
            _ => Err(errors),
        }
    }

    /// Validate the newsletter form.
    pub fn validate_subscription(request: &SubscriptionRequest) -> Result<Subscription, FormErrors> {
        let mut errors = FormErrors::new();
        let email = request.email.trim();

        if email.is_empty() {
            errors.push("email", ValidationError::SubscriberEmailRequired);
        } else if !Self::is_valid_email(email) {
            errors.push("email", ValidationError::SubscriberEmailInvalid);
        }

        if errors.is_empty() {
            Ok(Subscription {
                email: email.to_string(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Bookable times from 17:00 to 23:30 in 30 minute steps.
pub fn time_slots() -> Vec<String> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .flat_map(|hour| [0, 30].map(|minute| format!("{:02}:{:02}", hour, minute)))
        .collect()
}
