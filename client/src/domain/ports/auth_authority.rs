//! Driven port for the remote authority that owns login handles.
//!
//! The domain owns the request and reply shapes; outbound adapters own paths,
//! headers and status-code handling. Any non-success response reaches the
//! domain as [`AuthAuthorityError::Rejected`] with whatever body came back.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::auth::LoginCredentials;
use crate::domain::form::RegistrationRequest;
use crate::domain::session::AuthenticatedUser;

/// Decoded payload of a successful login-uniqueness query.
///
/// The authority has answered with both a bare boolean and an
/// `{ "available": bool }` object over time, so the raw JSON is kept and
/// interpreted here.
///
/// # Examples
/// ```
/// use registration_client::domain::ports::AvailabilityReply;
/// use serde_json::json;
///
/// assert!(AvailabilityReply::new(json!(true)).is_available());
/// assert!(AvailabilityReply::new(json!({ "available": true })).is_available());
/// assert!(!AvailabilityReply::new(json!("taken")).is_available());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityReply(Value);

impl AvailabilityReply {
    /// Wrap a decoded reply payload.
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Raw payload as returned by the authority.
    pub fn payload(&self) -> &Value {
        &self.0
    }

    /// `true` only for a JSON `true` or an object whose `available` is `true`.
    pub fn is_available(&self) -> bool {
        match &self.0 {
            Value::Bool(flag) => *flag,
            Value::Object(fields) => matches!(fields.get("available"), Some(Value::Bool(true))),
            _ => false,
        }
    }
}

impl From<Value> for AvailabilityReply {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Body attached to a non-success response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorBody {
    /// JSON object, possibly carrying a message and a stable error code.
    Structured {
        /// Human-readable message.
        message: Option<String>,
        /// Machine-readable code, when the authority provides one.
        code: Option<String>,
    },
    /// Plain text (or a bare JSON string).
    Raw(String),
    /// No body at all.
    #[default]
    Empty,
}

impl ErrorBody {
    /// Build a structured body carrying only a message.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::Structured {
            message: Some(message.into()),
            code: None,
        }
    }

    /// Non-blank message text, from either the structured or raw form.
    pub fn message(&self) -> Option<&str> {
        let text = match self {
            Self::Structured { message, .. } => message.as_deref(),
            Self::Raw(text) => Some(text.as_str()),
            Self::Empty => None,
        };
        text.map(str::trim).filter(|text| !text.is_empty())
    }

    /// Non-blank error code, if the body is structured and carries one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Structured { code, .. } => {
                code.as_deref().map(str::trim).filter(|code| !code.is_empty())
            }
            Self::Raw(_) | Self::Empty => None,
        }
    }
}

define_port_error! {
    /// Errors surfaced while calling the remote authority.
    pub enum AuthAuthorityError {
        /// No response was received.
        Transport { message: String } =>
            "auth authority unreachable: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "auth authority timed out: {message}",
        /// The authority answered with a non-success status.
        Rejected { status: u16, body: ErrorBody } =>
            "auth authority rejected request with status {status}",
        /// A success response could not be decoded.
        Decode { message: String } =>
            "auth authority response decode failed: {message}",
    }
}

impl AuthAuthorityError {
    /// Response body when the authority actually answered.
    pub fn rejection_body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            Self::Transport { .. } | Self::Timeout { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Port for the authority that checks, registers and authenticates logins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthAuthority: Send + Sync {
    /// Ask whether `login` is still free to register.
    async fn check_login(&self, login: &str) -> Result<AvailabilityReply, AuthAuthorityError>;

    /// Submit a registration request.
    async fn register(&self, request: &RegistrationRequest) -> Result<(), AuthAuthorityError>;

    /// Exchange credentials for a bearer token.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, AuthAuthorityError>;
}

const FIXTURE_TOKEN: &str = "fixture-token";
const FIXTURE_DISPLAY_NAME: &str = "Fixture Admin";

/// In-memory authority keeping a set of registered logins.
///
/// `admin` / `password` authenticates successfully; registering a login that
/// is already present is rejected with the authority's duplicate message.
#[derive(Debug, Default)]
pub struct FixtureAuthAuthority {
    registered: Mutex<BTreeSet<String>>,
}

impl FixtureAuthAuthority {
    /// Seed the fixture with logins that are already taken.
    pub fn with_registered<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registered: Mutex::new(logins.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether `login` has been registered.
    pub fn is_registered(&self, login: &str) -> bool {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(login)
    }
}

#[async_trait]
impl AuthAuthority for FixtureAuthAuthority {
    async fn check_login(&self, login: &str) -> Result<AvailabilityReply, AuthAuthorityError> {
        let available = !self.is_registered(login);
        Ok(AvailabilityReply::new(serde_json::json!({ "available": available })))
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<(), AuthAuthorityError> {
        let mut registered = self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if registered.insert(request.login().to_owned()) {
            Ok(())
        } else {
            Err(AuthAuthorityError::rejected(
                409_u16,
                ErrorBody::Structured {
                    message: Some("Login já cadastrado".to_owned()),
                    code: Some("login_taken".to_owned()),
                },
            ))
        }
    }

    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, AuthAuthorityError> {
        if credentials.login() == "admin" && credentials.password() == "password" {
            AuthenticatedUser::try_new(FIXTURE_TOKEN, FIXTURE_DISPLAY_NAME)
                .map_err(|err| AuthAuthorityError::decode(err.to_string()))
        } else {
            Err(AuthAuthorityError::rejected(
                401_u16,
                ErrorBody::Raw("Usuário ou senha inválidos".to_owned()),
            ))
        }
    }
}
