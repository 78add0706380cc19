use thiserror::Error;

use crate::cocktail::CocktailId;

/// Field-level validation failures. The `Display` text is the message shown
/// next to the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Phone number is required")]
    PhoneRequired,

    #[error("Date is required")]
    DateRequired,

    #[error("Please enter a valid date")]
    InvalidDate(String),

    #[error("Please select a future date")]
    PastDate,

    #[error("Time is required")]
    TimeRequired,

    #[error("Please select a time between 17:00 and 23:30")]
    InvalidTimeSlot(String),

    #[error("Number of guests is required")]
    GuestsRequired,

    #[error("Party size must be between 1 and 12 guests")]
    InvalidGuestCount(String),

    #[error("Too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("Please enter your email address")]
    SubscriberEmailRequired,

    #[error("Please enter a valid email address")]
    SubscriberEmailInvalid,
}

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Duplicate cocktail id: {0}")]
    DuplicateId(CocktailId),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Cannot {action} while form is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}
