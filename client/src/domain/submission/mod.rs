//! Registration submission.
//!
//! The coordinator owns the network call and nothing else: entering and
//! leaving `Submitting`, and folding the outcome into field errors, all go
//! through the form.

mod rejection;

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::form::{FormHandle, RegistrationForm, SubmissionRefused};
use crate::domain::ports::{AuthAuthority, AuthAuthorityError, Notifier, Severity};

pub use rejection::{Rejection, map_rejection};

/// Form-wide message when no usable response was received.
pub const GENERIC_SUBMISSION_FAILURE: &str = "Registration failed. Please try again.";
/// Notification sent once the authority accepts the registration.
pub const REGISTRATION_SUCCEEDED: &str = "Account created successfully!";

/// Resolution of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The account was created; the registration session is over.
    Success,
    /// The authority refused the request with an attributable reason.
    Rejected(Rejection),
    /// No response, or a response without a usable reason.
    TransportFailure,
}

impl SubmitOutcome {
    fn from_error(error: &AuthAuthorityError) -> Self {
        error
            .rejection_body()
            .and_then(map_rejection)
            .map_or(Self::TransportFailure, Self::Rejected)
    }
}

/// Sends registration requests on behalf of a form.
#[derive(Clone)]
pub struct SubmissionCoordinator {
    authority: Arc<dyn AuthAuthority>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionCoordinator {
    /// Create a coordinator.
    pub fn new(authority: Arc<dyn AuthAuthority>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            authority,
            notifier,
        }
    }

    /// Submit the form if it is valid and idle.
    ///
    /// The form is back to `Idle` when this resolves, and also when the
    /// returned future is dropped before resolving.
    ///
    /// # Errors
    /// [`SubmissionRefused`] when the form is invalid or already submitting;
    /// no request is sent in that case.
    pub async fn submit(&self, form: &FormHandle) -> Result<SubmitOutcome, SubmissionRefused> {
        let request = form.update(RegistrationForm::begin_submission)?;
        let in_flight = InFlight::new(form);

        let outcome = match self.authority.register(&request).await {
            Ok(()) => {
                info!(login = request.login(), "registration accepted");
                SubmitOutcome::Success
            }
            Err(error) => {
                warn!(login = request.login(), %error, "registration failed");
                SubmitOutcome::from_error(&error)
            }
        };

        in_flight.complete(&outcome);
        self.notify(&outcome);
        Ok(outcome)
    }

    fn notify(&self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Success => self
                .notifier
                .notify(Severity::Success, REGISTRATION_SUCCEEDED),
            SubmitOutcome::Rejected(rejection) => {
                self.notifier.notify(Severity::Error, rejection.message());
            }
            SubmitOutcome::TransportFailure => self
                .notifier
                .notify(Severity::Error, GENERIC_SUBMISSION_FAILURE),
        }
    }
}

impl fmt::Debug for SubmissionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionCoordinator").finish_non_exhaustive()
    }
}

/// Returns the form to `Idle` if the submission is dropped mid-flight.
struct InFlight<'a> {
    form: &'a FormHandle,
    settled: bool,
}

impl<'a> InFlight<'a> {
    const fn new(form: &'a FormHandle) -> Self {
        Self {
            form,
            settled: false,
        }
    }

    fn complete(mut self, outcome: &SubmitOutcome) {
        self.form.update(|form| form.complete_submission(outcome));
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("registration request dropped before completing");
            self.form.update(RegistrationForm::abandon_submission);
        }
    }
}

#[cfg(test)]
mod tests {
    //! Coordinator behaviour against mocked ports.
    use super::*;
    use crate::domain::availability::{AvailabilityResult, LoginAvailabilityStatus};
    use crate::domain::fields::Field;
    use crate::domain::form::{LoginEffect, SubmissionState};
    use crate::domain::ports::{ErrorBody, MockAuthAuthority, MockNotifier};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn valid_handle() -> FormHandle {
        let handle = FormHandle::default();
        handle.update(|form| {
            form.set_field(Field::Name, "Ana Silva");
            form.set_field(Field::Password, "Senha123");
            if let LoginEffect::ScheduleCheck(ticket) = form.set_field(Field::Login, "anasilva") {
                form.apply_availability_result(&ticket, AvailabilityResult::Available);
            }
        });
        handle
    }

    fn notifier_expecting(severity: Severity, message: &'static str) -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(severity), eq(message))
            .times(1)
            .return_const(());
        notifier
    }

    #[tokio::test]
    async fn accepted_registration_succeeds_and_notifies() {
        let mut authority = MockAuthAuthority::new();
        authority
            .expect_register()
            .withf(|request| {
                request.name() == "Ana Silva"
                    && request.login() == "anasilva"
                    && request.password() == "Senha123"
            })
            .times(1)
            .return_once(|_| Ok(()));
        let coordinator = SubmissionCoordinator::new(
            Arc::new(authority),
            Arc::new(notifier_expecting(Severity::Success, REGISTRATION_SUCCEEDED)),
        );
        let form = valid_handle();

        let outcome = coordinator.submit(&form).await.expect("valid form");

        assert_eq!(outcome, SubmitOutcome::Success);
        assert_eq!(form.snapshot().submission, SubmissionState::Idle);
    }

    #[tokio::test]
    async fn invalid_form_is_refused_without_a_request() {
        let mut authority = MockAuthAuthority::new();
        authority.expect_register().never();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        let coordinator = SubmissionCoordinator::new(Arc::new(authority), Arc::new(notifier));
        let form = FormHandle::default();
        form.update(|form| form.set_field(Field::Name, "Ana"));

        let refused = coordinator.submit(&form).await.expect_err("invalid form");

        assert_eq!(refused, SubmissionRefused::Invalid);
    }

    #[tokio::test]
    async fn duplicate_login_rejection_is_attributed_to_the_login() {
        let mut authority = MockAuthAuthority::new();
        authority.expect_register().times(1).return_once(|_| {
            Err(AuthAuthorityError::rejected(
                400_u16,
                ErrorBody::message_only("Login já cadastrado"),
            ))
        });
        let coordinator = SubmissionCoordinator::new(
            Arc::new(authority),
            Arc::new(notifier_expecting(Severity::Error, "Login já cadastrado")),
        );
        let form = valid_handle();

        let outcome = coordinator.submit(&form).await.expect("valid form");

        assert!(matches!(outcome, SubmitOutcome::Rejected(ref r) if r.login_taken()));
        let snapshot = form.snapshot();
        assert_eq!(snapshot.errors.get(Field::Login), Some("Login já cadastrado"));
        assert_eq!(snapshot.errors.general(), None);
        assert_eq!(snapshot.availability, LoginAvailabilityStatus::Taken);
        assert!(!snapshot.is_valid);
    }

    #[rstest]
    #[case::timeout(AuthAuthorityError::timeout("deadline elapsed"))]
    #[case::unreachable(AuthAuthorityError::transport("dns failure"))]
    #[case::empty_body(AuthAuthorityError::rejected(502_u16, ErrorBody::Empty))]
    #[tokio::test]
    async fn unattributable_failures_use_the_generic_message(#[case] error: AuthAuthorityError) {
        let mut authority = MockAuthAuthority::new();
        authority
            .expect_register()
            .times(1)
            .return_once(move |_| Err(error));
        let coordinator = SubmissionCoordinator::new(
            Arc::new(authority),
            Arc::new(notifier_expecting(Severity::Error, GENERIC_SUBMISSION_FAILURE)),
        );
        let form = valid_handle();

        let outcome = coordinator.submit(&form).await.expect("valid form");

        assert_eq!(outcome, SubmitOutcome::TransportFailure);
        let snapshot = form.snapshot();
        assert_eq!(snapshot.errors.general(), Some(GENERIC_SUBMISSION_FAILURE));
        assert_eq!(snapshot.errors.get(Field::Login), None);
        assert_eq!(snapshot.submission, SubmissionState::Idle);
    }

    #[test]
    fn dropped_guard_abandons_the_submission() {
        let form = valid_handle();
        form.update(RegistrationForm::begin_submission)
            .expect("valid form");
        assert_eq!(form.snapshot().submission, SubmissionState::Submitting);

        drop(InFlight::new(&form));

        assert_eq!(form.snapshot().submission, SubmissionState::Idle);
    }
}
