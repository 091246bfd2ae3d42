//! Registration form state machine.
//!
//! [`RegistrationForm`] is the only place field values, field errors, the
//! login availability status and the submission state change. Everything
//! else hands it values and reads [`FormSnapshot`]s back.
//!
//! ## Invariants
//! - Editing a field clears that field's error and the form-wide error;
//!   retyping the current login changes nothing.
//! - Every login edit bumps the login sequence, so availability results for
//!   earlier edits are discarded as stale.
//! - A login shorter than three characters leaves availability `Idle` and
//!   never schedules a check.
//! - Validity is derived on demand and never stored.

mod handle;


use std::fmt;

use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::availability::{
    AvailabilityResult, AvailabilityTicket, LoginAvailabilityStatus,
};
use crate::domain::fields::{Field, FieldErrors};
use crate::domain::submission::{GENERIC_SUBMISSION_FAILURE, SubmitOutcome};
use crate::domain::validation::{
    CheckableLogin, PasswordCriteria, evaluate_password, has_surname, is_checkable_login,
    validate_name,
};

pub use handle::FormHandle;

/// Whether a registration request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A request has been sent and not yet resolved.
    Submitting,
}

/// What the caller must do with the availability check after a field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEffect {
    /// The edit does not affect availability.
    Unchanged,
    /// Drop any pending check; the login is too short to query.
    CancelCheck,
    /// (Re)start the debounced check for this ticket.
    ScheduleCheck(AvailabilityTicket),
}

/// Whether an availability result reached the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityApplication {
    /// The result was current and moved availability to this status.
    Applied(LoginAvailabilityStatus),
    /// The login was edited after the check was issued.
    Stale,
}

/// Reasons the form refuses to start a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionRefused {
    /// Another submission is still in flight.
    AlreadySubmitting,
    /// The form is not currently valid.
    Invalid,
}

impl fmt::Display for SubmissionRefused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySubmitting => write!(f, "a submission is already in flight"),
            Self::Invalid => write!(f, "the form is not valid"),
        }
    }
}

impl std::error::Error for SubmissionRefused {}

/// Payload sent to the authority when registering.
///
/// # Examples
/// ```
/// use registration_client::domain::RegistrationRequest;
///
/// let request = RegistrationRequest::new("Ana Silva", "anasilva", "Senha123");
/// assert_eq!(request.login(), "anasilva");
/// assert!(!format!("{request:?}").contains("Senha123"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    name: String,
    login: String,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Build a request from already-normalised values.
    pub fn new(name: &str, login: &str, password: &str) -> Self {
        Self {
            name: name.to_owned(),
            login: login.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Login handle.
    pub fn login(&self) -> &str {
        self.login.as_str()
    }

    /// Password, exactly as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable view of the form published after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    /// Name as typed.
    pub name: String,
    /// Login as typed.
    pub login: String,
    /// Password requirements met so far.
    pub password_criteria: PasswordCriteria,
    /// Field and form-wide messages.
    pub errors: FieldErrors,
    /// Login availability.
    pub availability: LoginAvailabilityStatus,
    /// Submission state.
    pub submission: SubmissionState,
    /// Whether submitting is currently allowed.
    pub is_valid: bool,
}

/// Field values, errors and statuses of one registration attempt.
#[derive(Default)]
pub struct RegistrationForm {
    name: String,
    login: String,
    password: Zeroizing<String>,
    errors: FieldErrors,
    criteria: PasswordCriteria,
    availability: LoginAvailabilityStatus,
    submission: SubmissionState,
    login_sequence: u64,
    submitted_sequence: Option<u64>,
}

impl RegistrationForm {
    /// Empty form: no values, no errors, everything idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new value for `field` and report what the login check
    /// should do next.
    ///
    /// Retyping the current login is a no-op, so a rejection message for it
    /// stays visible.
    pub fn set_field(&mut self, field: Field, value: &str) -> LoginEffect {
        if field == Field::Login && self.login == value {
            return LoginEffect::Unchanged;
        }
        self.errors.clear(field);
        self.errors.clear_general();

        match field {
            Field::Name => {
                value.clone_into(&mut self.name);
                if let Some(error) = validate_name(value) {
                    self.errors.set(Field::Name, error.to_string());
                }
                LoginEffect::Unchanged
            }
            Field::Password => {
                self.password = Zeroizing::new(value.to_owned());
                self.criteria = evaluate_password(value);
                LoginEffect::Unchanged
            }
            Field::Login => self.set_login(value),
        }
    }

    fn set_login(&mut self, value: &str) -> LoginEffect {
        value.clone_into(&mut self.login);
        self.login_sequence = self.login_sequence.wrapping_add(1);

        match CheckableLogin::parse(value) {
            Ok(login) => {
                self.availability = LoginAvailabilityStatus::Checking;
                LoginEffect::ScheduleCheck(AvailabilityTicket::new(login, self.login_sequence))
            }
            Err(_) => {
                self.availability = LoginAvailabilityStatus::Idle;
                LoginEffect::CancelCheck
            }
        }
    }

    /// Apply a check result if `ticket` still belongs to the current login.
    pub fn apply_availability_result(
        &mut self,
        ticket: &AvailabilityTicket,
        result: AvailabilityResult,
    ) -> AvailabilityApplication {
        if ticket.sequence() != self.login_sequence {
            debug!(
                login = %ticket.login(),
                ticket = ticket.sequence(),
                current = self.login_sequence,
                "discarding stale availability result"
            );
            return AvailabilityApplication::Stale;
        }
        self.availability = result.status();
        AvailabilityApplication::Applied(self.availability)
    }

    /// Whether the form may be submitted right now.
    pub fn derive_validity(&self) -> bool {
        has_surname(&self.name)
            && self.criteria.all_met()
            && is_checkable_login(&self.login)
            && self.availability != LoginAvailabilityStatus::Taken
            && self.submission == SubmissionState::Idle
    }

    /// Enter `Submitting` and build the request, if allowed.
    ///
    /// Clears the form-wide error; field errors stay until edited or
    /// replaced by the response.
    pub fn begin_submission(&mut self) -> Result<RegistrationRequest, SubmissionRefused> {
        if self.submission == SubmissionState::Submitting {
            return Err(SubmissionRefused::AlreadySubmitting);
        }
        if !self.derive_validity() {
            return Err(SubmissionRefused::Invalid);
        }
        self.submission = SubmissionState::Submitting;
        self.submitted_sequence = Some(self.login_sequence);
        self.errors.clear_general();
        Ok(RegistrationRequest::new(
            self.name.trim(),
            self.login.trim(),
            &self.password,
        ))
    }

    /// Return to `Idle` and fold the outcome into errors and availability.
    pub fn complete_submission(&mut self, outcome: &SubmitOutcome) {
        let submitted_sequence = self.finish_submission();
        match outcome {
            SubmitOutcome::Success => {}
            SubmitOutcome::Rejected(rejection) => {
                self.errors.merge_from(rejection.errors());
                // Only force `Taken` if the rejected login is still the one typed.
                if rejection.login_taken() && submitted_sequence == Some(self.login_sequence) {
                    self.availability = LoginAvailabilityStatus::Taken;
                    self.login_sequence = self.login_sequence.wrapping_add(1);
                }
            }
            SubmitOutcome::TransportFailure => {
                self.errors.set_general(GENERIC_SUBMISSION_FAILURE);
            }
        }
    }

    /// Return to `Idle` without an outcome, e.g. when the request was
    /// cancelled.
    pub fn abandon_submission(&mut self) {
        self.finish_submission();
    }

    fn finish_submission(&mut self) -> Option<u64> {
        self.submission = SubmissionState::Idle;
        self.submitted_sequence.take()
    }

    /// Current value of `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => self.name.as_str(),
            Field::Login => self.login.as_str(),
            Field::Password => self.password.as_str(),
        }
    }

    /// Field and form-wide messages.
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Password requirements met so far.
    pub const fn password_criteria(&self) -> PasswordCriteria {
        self.criteria
    }

    /// Login availability.
    pub const fn availability(&self) -> LoginAvailabilityStatus {
        self.availability
    }

    /// Submission state.
    pub const fn submission(&self) -> SubmissionState {
        self.submission
    }

    /// Copy the observable state.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            name: self.name.clone(),
            login: self.login.clone(),
            password_criteria: self.criteria,
            errors: self.errors.clone(),
            availability: self.availability,
            submission: self.submission,
            is_valid: self.derive_validity(),
        }
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("login", &self.login)
            .field("errors", &self.errors)
            .field("criteria", &self.criteria)
            .field("availability", &self.availability)
            .field("submission", &self.submission)
            .field("login_sequence", &self.login_sequence)
            .finish_non_exhaustive()
    }
}
