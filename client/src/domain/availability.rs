//! Login availability lookups and the status they drive.
//!
//! The checker is stateless: it turns one authority reply into an
//! [`AvailabilityResult`]. Deciding whether that result still matters is the
//! form's job, using the [`AvailabilityTicket`] the check was issued for.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::AuthAuthority;
use crate::domain::validation::CheckableLogin;

/// Availability of the login currently typed into the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoginAvailabilityStatus {
    /// Nothing known; the login is too short or the last check failed.
    #[default]
    Idle,
    /// A check is scheduled or in flight.
    Checking,
    /// The authority reported the login as free.
    Available,
    /// The authority reported the login as registered.
    Taken,
}

impl LoginAvailabilityStatus {
    /// Stable lower-case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Checking => "checking",
            Self::Available => "available",
            Self::Taken => "taken",
        }
    }
}

impl fmt::Display for LoginAvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single availability lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityResult {
    /// Free to register.
    Available,
    /// Already registered.
    Taken,
    /// The lookup failed; availability will be settled at submission.
    Unknown,
}

impl AvailabilityResult {
    /// Status the form moves to when this result is applied.
    pub const fn status(self) -> LoginAvailabilityStatus {
        match self {
            Self::Available => LoginAvailabilityStatus::Available,
            Self::Taken => LoginAvailabilityStatus::Taken,
            Self::Unknown => LoginAvailabilityStatus::Idle,
        }
    }
}

/// Identifies the login edit an availability check was issued for.
///
/// A ticket is only honoured while its sequence number is the form's current
/// one; any later login edit makes it stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvailabilityTicket {
    login: CheckableLogin,
    sequence: u64,
}

impl AvailabilityTicket {
    pub(crate) const fn new(login: CheckableLogin, sequence: u64) -> Self {
        Self { login, sequence }
    }

    /// Login the check was issued for.
    pub const fn login(&self) -> &CheckableLogin {
        &self.login
    }

    /// Login-edit generation the check belongs to.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Queries the authority for login availability.
#[derive(Clone)]
pub struct AvailabilityChecker {
    authority: Arc<dyn AuthAuthority>,
}

impl AvailabilityChecker {
    /// Create a checker backed by `authority`.
    pub fn new(authority: Arc<dyn AuthAuthority>) -> Self {
        Self { authority }
    }

    /// Issue one lookup for `login`.
    ///
    /// Failures never surface as errors: they are logged and reported as
    /// [`AvailabilityResult::Unknown`] so the user is not blocked.
    pub async fn check(&self, login: &CheckableLogin) -> AvailabilityResult {
        match self.authority.check_login(login.as_str()).await {
            Ok(reply) if reply.is_available() => {
                debug!(%login, "login available");
                AvailabilityResult::Available
            }
            Ok(reply) => {
                debug!(%login, payload = %reply.payload(), "login taken");
                AvailabilityResult::Taken
            }
            Err(error) => {
                warn!(%login, %error, "availability check failed");
                AvailabilityResult::Unknown
            }
        }
    }
}

impl fmt::Debug for AvailabilityChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityChecker").finish_non_exhaustive()
    }
}
