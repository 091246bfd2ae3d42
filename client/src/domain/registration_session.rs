//! One registration attempt wired end to end.
//!
//! The session owns the form, debounces login edits into availability
//! checks and applies their results through the form's staleness check.
//! Rendering layers read [`FormSnapshot`]s from [`RegistrationSession::subscribe`].

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::domain::availability::{
    AvailabilityChecker, AvailabilityTicket, LoginAvailabilityStatus,
};
use crate::domain::debounce::Debouncer;
use crate::domain::fields::Field;
use crate::domain::form::{FormHandle, FormSnapshot, LoginEffect, SubmissionRefused};
use crate::domain::ports::{AuthAuthority, Notifier};
use crate::domain::submission::{SubmissionCoordinator, SubmitOutcome};

/// Quiet period before a login edit is checked.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(400);

struct Inner {
    form: FormHandle,
    checker: AvailabilityChecker,
    submissions: SubmissionCoordinator,
    debouncer: Debouncer<Field>,
    debounce_delay: Duration,
}

/// Registration form plus its background checks.
///
/// Must be used from within a Tokio runtime. Dropping the last clone cancels
/// pending checks; a check already in flight finishes but is not applied.
#[derive(Clone)]
pub struct RegistrationSession {
    inner: Arc<Inner>,
}

impl RegistrationSession {
    /// Start an empty registration attempt.
    pub fn new(
        authority: Arc<dyn AuthAuthority>,
        notifier: Arc<dyn Notifier>,
        debounce_delay: Duration,
    ) -> Self {
        let inner = Inner {
            form: FormHandle::default(),
            checker: AvailabilityChecker::new(Arc::clone(&authority)),
            submissions: SubmissionCoordinator::new(authority, notifier),
            debouncer: Debouncer::new(),
            debounce_delay,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Apply a user edit.
    ///
    /// Field errors are cleared before any availability check is scheduled.
    pub fn set_field(&self, field: Field, value: &str) {
        let effect = self.inner.form.update(|form| form.set_field(field, value));
        match effect {
            LoginEffect::Unchanged => {}
            LoginEffect::CancelCheck => {
                self.inner.debouncer.cancel(&Field::Login);
            }
            LoginEffect::ScheduleCheck(ticket) => {
                let session = Arc::downgrade(&self.inner);
                self.inner.debouncer.schedule(
                    Field::Login,
                    self.inner.debounce_delay,
                    run_check(session, ticket),
                );
            }
        }
    }

    /// Latest published state.
    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.form.snapshot()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.inner.form.subscribe()
    }

    /// Whether the form may be submitted right now.
    pub fn is_valid(&self) -> bool {
        self.inner.form.read(|form| form.derive_validity())
    }

    /// Whether a login check is waiting for its debounce delay.
    pub fn has_pending_check(&self) -> bool {
        self.inner.debouncer.is_pending(&Field::Login)
    }

    /// Wait until availability is no longer `Checking`.
    pub async fn availability_settled(&self) -> LoginAvailabilityStatus {
        let mut snapshots = self.subscribe();
        let settled = snapshots
            .wait_for(|snapshot| snapshot.availability != LoginAvailabilityStatus::Checking)
            .await
            .map(|snapshot| snapshot.availability);
        // The sender lives in `self`, so the channel cannot close while waiting.
        settled.unwrap_or_else(|_| self.snapshot().availability)
    }

    /// Submit the form.
    ///
    /// # Errors
    /// [`SubmissionRefused`] when the form is invalid or already submitting.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmissionRefused> {
        self.inner.submissions.submit(&self.inner.form).await
    }
}

impl fmt::Debug for RegistrationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationSession")
            .field("form", &self.inner.form)
            .field("debounce_delay", &self.inner.debounce_delay)
            .finish_non_exhaustive()
    }
}

async fn run_check(session: Weak<Inner>, ticket: AvailabilityTicket) {
    let Some(checker) = session.upgrade().map(|inner| inner.checker.clone()) else {
        return;
    };
    let result = checker.check(ticket.login()).await;

    let Some(inner) = session.upgrade() else {
        debug!(login = %ticket.login(), "session closed before availability resolved");
        return;
    };
    inner
        .form
        .update(|form| form.apply_availability_result(&ticket, result));
}
