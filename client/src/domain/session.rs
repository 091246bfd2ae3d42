//! Signed-in user state shared with outbound adapters.
//!
//! The bearer token lives in an explicit [`SessionContext`] that is handed to
//! the HTTP transport at construction time, rather than in ambient storage.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use zeroize::Zeroizing;

/// Domain error returned when a sign-in response carries unusable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// Token was missing or blank once trimmed.
    EmptyToken,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "bearer token must not be empty"),
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// Opaque bearer credential. Wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Accept a non-blank token, trimming surrounding whitespace.
    pub fn try_new(raw: &str) -> Result<Self, SessionValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Token text, for building an `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Token and display name returned by a successful sign-in.
///
/// # Examples
/// ```
/// use registration_client::domain::AuthenticatedUser;
///
/// let user = AuthenticatedUser::try_new("abc.def", "Ana Silva").unwrap();
/// assert_eq!(user.display_name(), "Ana Silva");
/// assert!(AuthenticatedUser::try_new("  ", "Ana").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    token: BearerToken,
    display_name: String,
}

impl AuthenticatedUser {
    /// Validate the token; the display name is trimmed and may be empty.
    pub fn try_new(token: &str, display_name: &str) -> Result<Self, SessionValidationError> {
        Ok(Self {
            token: BearerToken::try_new(token)?,
            display_name: display_name.trim().to_owned(),
        })
    }

    /// Bearer credential.
    pub const fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<BearerToken>,
    display_name: Option<String>,
}

/// Cloneable handle to the current credentials.
///
/// Clones share state: a sign-in through one handle is visible to the
/// transport holding another.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    state: Arc<RwLock<SessionState>>,
}

impl SessionContext {
    /// Start without credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-issued token and no display name.
    pub fn with_token(token: BearerToken) -> Self {
        let context = Self::new();
        context.set_token(token);
        context
    }

    /// Store the user returned by a sign-in.
    pub fn sign_in(&self, user: AuthenticatedUser) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.token = Some(user.token);
        state.display_name = Some(user.display_name);
    }

    /// Replace the bearer token, keeping the display name.
    pub fn set_token(&self, token: BearerToken) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .token = Some(token);
    }

    /// Token to attach to outgoing requests, if any.
    pub fn bearer_token(&self) -> Option<BearerToken> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    /// Display name stored at sign-in.
    pub fn display_name(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .display_name
            .clone()
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .is_some()
    }

    /// Forget all credentials.
    pub fn clear(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = SessionState::default();
    }
}
