//! Configuration for the administrative core.
//!
//! Centralizes the knobs that were previously scattered: invitation token
//! lifetime and length, the request-body ceiling, and pagination clamping.
//!
//! # Example
//!
//! ```rust
//! use atrio::config::AdminConfig;
//! use chrono::Duration;
//!
//! let config = AdminConfig {
//!     invitation_expiry: Duration::minutes(30),
//!     ..AdminConfig::default()
//! };
//! ```

use chrono::Duration;

/// Main configuration struct for the administrative core.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// How long an invitation token remains valid after creation.
    ///
    /// Default: 1 hour. Invitations ride the one-time-code paradigm, so
    /// the horizon is deliberately short.
    pub invitation_expiry: Duration,

    /// Length of generated invitation tokens (in characters).
    ///
    /// Default is 48 alphanumeric characters (~285 bits of entropy).
    pub token_length: usize,

    /// Maximum accepted request-body size, in bytes.
    ///
    /// Default: 64 KiB. Bodies at or above this ceiling are rejected
    /// before field validation runs.
    pub max_payload_bytes: usize,

    /// Server-side clamp on the `limit` pagination parameter.
    ///
    /// Default: 100. Client-supplied values above this are reduced.
    pub max_page_size: u32,

    /// Origins accepted for state-changing requests.
    ///
    /// The deployment's own host, plus any trusted frontends.
    pub allowed_origins: Vec<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            invitation_expiry: Duration::hours(1),
            token_length: 48,
            max_payload_bytes: 64 * 1024,
            max_page_size: 100,
            allowed_origins: Vec::new(),
        }
    }
}

impl AdminConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with stricter security settings.
    ///
    /// Shorter invitation lifetime, longer tokens, smaller payloads.
    pub fn strict() -> Self {
        Self {
            invitation_expiry: Duration::minutes(30),
            token_length: 64,
            max_payload_bytes: 16 * 1024,
            max_page_size: 50,
            allowed_origins: Vec::new(),
        }
    }

    /// Sets the allowed origins for CSRF verification.
    #[must_use]
    pub fn with_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();

        assert_eq!(config.invitation_expiry, Duration::hours(1));
        assert_eq!(config.token_length, 48);
        assert_eq!(config.max_payload_bytes, 64 * 1024);
        assert_eq!(config.max_page_size, 100);
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_strict_config() {
        let config = AdminConfig::strict();

        assert_eq!(config.invitation_expiry, Duration::minutes(30));
        assert_eq!(config.token_length, 64);
    }

    #[test]
    fn test_with_origins() {
        let config = AdminConfig::new().with_origins(["https://admin.example.org"]);
        assert_eq!(config.allowed_origins, vec!["https://admin.example.org"]);
    }
}
