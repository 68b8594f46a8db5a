use super::ValidationError;

/// Configuration for password validation rules.
///
/// # Examples
///
/// ```
/// use atrio::validators::PasswordPolicy;
///
/// // Staff policy: 8-72 characters, uppercase, lowercase, digit, special
/// let policy = PasswordPolicy::staff();
/// assert!(policy.validate("MyP@ssw0rd").is_ok());
/// assert!(policy.validate("weak").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length (default: 8)
    pub min_length: usize,
    /// Maximum password length (default: 72)
    pub max_length: usize,
    /// Require at least one uppercase letter
    pub require_uppercase: bool,
    /// Require at least one lowercase letter
    pub require_lowercase: bool,
    /// Require at least one digit
    pub require_digit: bool,
    /// Require at least one special character
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 72,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

impl PasswordPolicy {
    /// Creates a new password policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The policy applied to staff account passwords.
    ///
    /// Requirements:
    /// - 8 to 72 characters
    /// - At least one uppercase letter
    /// - At least one lowercase letter
    /// - At least one digit
    /// - At least one special character
    #[must_use]
    pub fn staff() -> Self {
        Self {
            min_length: 8,
            max_length: 72,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }

    /// Sets the minimum password length.
    #[must_use]
    pub fn min(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    /// Sets the maximum password length.
    #[must_use]
    pub fn max(mut self, len: usize) -> Self {
        self.max_length = len;
        self
    }

    /// Requires at least one uppercase letter.
    #[must_use]
    pub fn require_uppercase(mut self) -> Self {
        self.require_uppercase = true;
        self
    }

    /// Requires at least one lowercase letter.
    #[must_use]
    pub fn require_lowercase(mut self) -> Self {
        self.require_lowercase = true;
        self
    }

    /// Requires at least one digit.
    #[must_use]
    pub fn require_digit(mut self) -> Self {
        self.require_digit = true;
        self
    }

    /// Requires at least one special character.
    #[must_use]
    pub fn require_special(mut self) -> Self {
        self.require_special = true;
        self
    }

    /// Validates a password against this policy.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the password doesn't meet the policy
    /// requirements.
    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::PasswordEmpty);
        }

        if password.len() < self.min_length {
            return Err(ValidationError::PasswordTooShort(self.min_length));
        }

        if password.len() > self.max_length {
            return Err(ValidationError::PasswordTooLong(self.max_length));
        }

        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            return Err(ValidationError::PasswordMissingUppercase);
        }

        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            return Err(ValidationError::PasswordMissingLowercase);
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::PasswordMissingDigit);
        }

        if self.require_special && !password.chars().any(is_special_char) {
            return Err(ValidationError::PasswordMissingSpecial);
        }

        Ok(())
    }
}

/// Checks if a character is a special character.
fn is_special_char(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

/// Validates a password using the staff policy.
///
/// For custom validation rules, use [`PasswordPolicy`] directly.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    PasswordPolicy::staff().validate(password)
}
