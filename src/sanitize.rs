//! Defensive sanitization: free-text cleanup before storage, and safe
//! rendering of store-layer failures.
//!
//! `clean_text` applies to flat string fields only. Structured rich-text
//! payloads (editor document trees) are passed through untouched at this
//! layer; they are rendered through a constrained renderer downstream.

use regex::Regex;
use std::sync::LazyLock;

// innermost tags only; outer fragments are caught by the fixpoint loop
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());

/// Strips markup and script-bearing content from a flat text field.
///
/// Tag removal loops to a fixpoint so that fragments reassembled by a
/// single removal pass (`<scr<script>ipt>`) are still eliminated.
/// The output contains no complete tags, which makes the function
/// idempotent: `clean_text(clean_text(s)) == clean_text(s)`.
pub fn clean_text(input: &str) -> String {
    let mut out = input.to_owned();

    while TAG_REGEX.is_match(&out) {
        out = TAG_REGEX.replace_all(&out, "").into_owned();
    }

    // Drop control characters; keep ordinary whitespace.
    out.retain(|c| !c.is_control() || c == '\n' || c == '\t');

    out.trim().to_owned()
}

/// Classification of a store-layer failure into categories the client is
/// allowed to learn about. Internal identifiers, SQL text, and stack
/// detail never cross this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Unique-constraint violation.
    UniqueViolation,
    /// Foreign-key violation.
    ForeignKeyViolation,
    /// Check-constraint violation.
    CheckViolation,
    /// Insufficient database privileges.
    PermissionDenied,
    /// Anything else.
    Other,
}

impl StoreErrorKind {
    /// Classifies a SQLSTATE code.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("23505") => Self::UniqueViolation,
            Some("23503") => Self::ForeignKeyViolation,
            Some("23514") => Self::CheckViolation,
            Some("42501") => Self::PermissionDenied,
            _ => Self::Other,
        }
    }

    /// The generic, safe message shown to clients for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UniqueViolation => "A record with these details already exists",
            Self::ForeignKeyViolation => "Referenced record does not exist",
            Self::CheckViolation => "Invalid data",
            Self::PermissionDenied => "Operation not allowed",
            Self::Other => "An unexpected error occurred",
        }
    }
}
