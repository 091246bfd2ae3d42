//! Pure field validators for the registration form.
//!
//! Every function here is total and side-effect free so the form can run it
//! on each keystroke.

use std::fmt;

/// Minimum number of characters a password must have.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Minimum number of characters (after trimming) before a login is queried.
pub const MIN_LOGIN_LENGTH: usize = 3;

/// Problems reported for the display name field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameValidationError {
    /// Only one word was typed.
    MissingSurname,
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSurname => write!(f, "enter a first and last name"),
        }
    }
}

impl std::error::Error for NameValidationError {}

/// Return the name error to show, if any.
///
/// An empty name is never flagged so the field does not turn red before the
/// user has typed anything.
///
/// ```
/// use registration_client::domain::validation::{validate_name, NameValidationError};
///
/// assert_eq!(validate_name(""), None);
/// assert_eq!(validate_name("Ana"), Some(NameValidationError::MissingSurname));
/// assert_eq!(validate_name("Ana Silva"), None);
/// ```
pub fn validate_name(value: &str) -> Option<NameValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || has_surname(trimmed) {
        None
    } else {
        Some(NameValidationError::MissingSurname)
    }
}

/// Whether the name has at least two whitespace-separated tokens.
pub fn has_surname(value: &str) -> bool {
    value.split_whitespace().nth(1).is_some()
}

/// Independent password requirements, recomputed on every password edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordCriteria {
    /// At least [`MIN_PASSWORD_LENGTH`] characters.
    pub has_min_length: bool,
    /// At least one ASCII uppercase letter.
    pub has_upper_case: bool,
    /// At least one ASCII decimal digit.
    pub has_digit: bool,
}

impl PasswordCriteria {
    /// All three requirements hold.
    pub const fn all_met(self) -> bool {
        self.has_min_length && self.has_upper_case && self.has_digit
    }
}

/// Evaluate the password requirements.
///
/// ```
/// use registration_client::domain::validation::evaluate_password;
///
/// assert!(evaluate_password("Senha123").all_met());
/// assert!(!evaluate_password("senha123").has_upper_case);
/// ```
pub fn evaluate_password(value: &str) -> PasswordCriteria {
    PasswordCriteria {
        has_min_length: value.chars().count() >= MIN_PASSWORD_LENGTH,
        has_upper_case: value.chars().any(|c| c.is_ascii_uppercase()),
        has_digit: value.chars().any(|c| c.is_ascii_digit()),
    }
}

/// Reasons a login cannot be sent to the availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Fewer than `min` characters once trimmed.
    TooShort {
        /// Required minimum.
        min: usize,
    },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => write!(f, "login must have at least {min} characters"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// A trimmed login long enough to be checked against the authority.
///
/// ## Invariants
/// - no leading or trailing whitespace;
/// - at least [`MIN_LOGIN_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckableLogin(String);

impl CheckableLogin {
    /// Trim `raw` and accept it when it is long enough.
    pub fn parse(raw: &str) -> Result<Self, LoginValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_LOGIN_LENGTH {
            return Err(LoginValidationError::TooShort {
                min: MIN_LOGIN_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Trimmed login text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for CheckableLogin {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CheckableLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `value` would be accepted by [`CheckableLogin::parse`].
pub fn is_checkable_login(value: &str) -> bool {
    value.trim().chars().count() >= MIN_LOGIN_LENGTH
}
