//! Pure input validators shared by every endpoint that accepts
//! untrusted data.
//!
//! Validators fail closed: the first failing field aborts the request
//! before any store access. They never touch I/O.

pub mod email;
pub mod format;
pub mod password;
pub mod text;

pub use email::validate_email;
pub use format::{
    validate_future_date, validate_phone, validate_slot_count, validate_token_shape,
    validate_uuid, Locale,
};
pub use password::{validate_password, PasswordPolicy};
pub use text::{validate_full_name, validate_optional_text, validate_text};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    EmailEmpty,
    EmailTooLong,
    EmailInvalidFormat,
    PasswordEmpty,
    PasswordTooShort(usize),
    PasswordTooLong(usize),
    PasswordMissingUppercase,
    PasswordMissingLowercase,
    PasswordMissingDigit,
    PasswordMissingSpecial,
    TextEmpty(&'static str),
    TextTooLong(&'static str, usize),
    InvalidUuid,
    UnsupportedLocale,
    InvalidPhone,
    InvalidToken,
    InvalidRole,
    InvalidStatus,
    DateNotInFuture,
    SlotCountOutOfRange(u32, u32),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailEmpty => write!(f, "Email cannot be empty"),
            Self::EmailTooLong => write!(f, "Email is too long (max 254 characters)"),
            Self::EmailInvalidFormat => write!(f, "Invalid email format"),
            Self::PasswordEmpty => write!(f, "Password cannot be empty"),
            Self::PasswordTooShort(min) => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordTooLong(max) => write!(f, "Password is too long (max {max} characters)"),
            Self::PasswordMissingUppercase => {
                write!(f, "Password must contain an uppercase letter")
            }
            Self::PasswordMissingLowercase => {
                write!(f, "Password must contain a lowercase letter")
            }
            Self::PasswordMissingDigit => write!(f, "Password must contain a digit"),
            Self::PasswordMissingSpecial => {
                write!(f, "Password must contain a special character")
            }
            Self::TextEmpty(field) => write!(f, "{field} cannot be empty"),
            Self::TextTooLong(field, max) => {
                write!(f, "{field} is too long (max {max} characters)")
            }
            Self::InvalidUuid => write!(f, "Invalid identifier format"),
            Self::UnsupportedLocale => write!(f, "Unsupported locale"),
            Self::InvalidPhone => write!(f, "Invalid phone number"),
            Self::InvalidToken => write!(f, "Invalid token format"),
            Self::InvalidRole => write!(f, "Invalid role"),
            Self::InvalidStatus => write!(f, "Invalid status"),
            Self::DateNotInFuture => write!(f, "Date must be in the future"),
            Self::SlotCountOutOfRange(min, max) => {
                write!(f, "Slot count must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
