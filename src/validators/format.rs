//! Format validators: identifiers, locales, phone numbers, token shape,
//! dates and bounded counts, plus the closed status enums used by the
//! domain endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use super::ValidationError;

/// Lower bound on accepted token length; anything shorter cannot carry
/// the required entropy and is rejected without a store lookup.
pub const MIN_TOKEN_LENGTH: usize = 16;
/// Upper bound on accepted token length.
pub const MAX_TOKEN_LENGTH: usize = 128;

pub const MIN_SLOT_COUNT: u32 = 1;
pub const MAX_SLOT_COUNT: u32 = 1000;

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}$").unwrap());

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Validates an RFC-4122 UUID.
pub fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidUuid)
}

/// A locale supported by the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Es,
    Zh,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Zh => "zh",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "zh" => Some(Self::Zh),
            _ => None,
        }
    }

    /// Parses a locale, rejecting anything outside the supported set.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_str(s).ok_or(ValidationError::UnsupportedLocale)
    }
}

/// Validates a phone number: digits, spaces, hyphens, optional leading
/// `+` country code, bounded length.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() > super::text::MAX_PHONE || !PHONE_REGEX.is_match(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Validates the shape of an opaque token before it is hashed and looked
/// up: letters, digits, `-`, `_`, bounded length. Shape failures never
/// reach the store.
pub fn validate_token_shape(token: &str) -> Result<(), ValidationError> {
    if token.len() < MIN_TOKEN_LENGTH
        || token.len() > MAX_TOKEN_LENGTH
        || !TOKEN_REGEX.is_match(token)
    {
        return Err(ValidationError::InvalidToken);
    }
    Ok(())
}

/// Validates that a date is strictly in the future relative to `now`.
///
/// Exam sessions can only be scheduled forward.
pub fn validate_future_date(date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if date <= now {
        return Err(ValidationError::DateNotInFuture);
    }
    Ok(())
}

/// Validates a slot count for an exam session.
pub fn validate_slot_count(count: u32) -> Result<(), ValidationError> {
    if !(MIN_SLOT_COUNT..=MAX_SLOT_COUNT).contains(&count) {
        return Err(ValidationError::SlotCountOutOfRange(
            MIN_SLOT_COUNT,
            MAX_SLOT_COUNT,
        ));
    }
    Ok(())
}

/// Status of a public inquiry (contact-form submission).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Pending,
    Contacted,
    Resolved,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Resolved => "resolved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "contacted" => Some(Self::Contacted),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_str(s).ok_or(ValidationError::InvalidStatus)
    }
}

/// Status of an exam-session registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamRegistrationStatus {
    Registered,
    Confirmed,
    Cancelled,
}

impl ExamRegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "registered" => Some(Self::Registered),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_str(s).ok_or(ValidationError::InvalidStatus)
    }
}
