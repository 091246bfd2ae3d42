//! Wiring of adapters into domain services.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::config::ClientSettings;
use crate::domain::ports::{AuthAuthority, Notifier};
use crate::domain::{
    AvailabilityChecker, BearerToken, DEFAULT_DEBOUNCE_DELAY, RegistrationSession,
    SessionContext, SessionValidationError, SignInService,
};
use crate::outbound::http::{HttpAuthAuthority, HttpTransport, HttpTransportOptions};

/// Failures while assembling the client from settings.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured base URL is not absolute.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    /// The configured token is blank.
    #[error("invalid bearer token: {0}")]
    Token(#[from] SessionValidationError),
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Shared collaborators handed to each registration or sign-in flow.
#[derive(Clone)]
pub struct RegistrationClient {
    authority: Arc<dyn AuthAuthority>,
    notifier: Arc<dyn Notifier>,
    session: SessionContext,
    debounce_delay: Duration,
}

impl RegistrationClient {
    /// Assemble a client around an existing authority, e.g. a fixture.
    pub fn new(authority: Arc<dyn AuthAuthority>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            authority,
            notifier,
            session: SessionContext::new(),
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
        }
    }

    /// Assemble the HTTP-backed client described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the base URL or token is invalid or
    /// the HTTP client cannot be built.
    pub fn from_settings(
        settings: &ClientSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientBuildError> {
        let base_url = settings.base_url()?;
        let session = match settings.token() {
            Some(token) => SessionContext::with_token(BearerToken::try_new(token)?),
            None => SessionContext::new(),
        };
        let options = HttpTransportOptions {
            timeout: settings.request_timeout(),
            user_agent: settings.user_agent().to_owned(),
        };
        debug!(%base_url, timeout = ?options.timeout, "building authority client");
        let transport = HttpTransport::new(base_url, session.clone(), options)?;

        Ok(Self {
            authority: Arc::new(HttpAuthAuthority::new(transport)),
            notifier,
            session,
            debounce_delay: settings.debounce_delay(),
        })
    }

    /// Override the debounce delay for new registration sessions.
    #[must_use]
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Credentials shared with the transport.
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Debounce delay used by new registration sessions.
    pub const fn debounce_delay(&self) -> Duration {
        self.debounce_delay
    }

    /// Start a fresh registration attempt.
    pub fn registration(&self) -> RegistrationSession {
        RegistrationSession::new(
            Arc::clone(&self.authority),
            Arc::clone(&self.notifier),
            self.debounce_delay,
        )
    }

    /// Sign-in service storing its result in [`Self::session`].
    pub fn sign_in(&self) -> SignInService {
        SignInService::new(
            Arc::clone(&self.authority),
            Arc::clone(&self.notifier),
            self.session.clone(),
        )
    }

    /// One-off availability lookups outside a registration session.
    pub fn availability_checker(&self) -> AvailabilityChecker {
        AvailabilityChecker::new(Arc::clone(&self.authority))
    }
}

impl fmt::Debug for RegistrationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationClient")
            .field("session", &self.session)
            .field("debounce_delay", &self.debounce_delay)
            .finish_non_exhaustive()
    }
}
