//! Registration domain: validation, availability checking, form state and
//! submission.
//!
//! Purpose: keep every ordering-sensitive rule of the registration flow in
//! one place, independent of transport and presentation. Adapters reach the
//! domain only through the traits in [`ports`].
//!
//! Public surface:
//! - RegistrationSession: wires form, debounce, checks and submission.
//! - RegistrationForm / FormHandle: the state machine and its shared owner.
//! - AvailabilityChecker, SubmissionCoordinator, SignInService: services.
//! - Debouncer: keyed delay-and-cancel scheduler.

pub mod auth;
pub mod availability;
pub mod debounce;
pub mod fields;
pub mod form;
pub mod ports;
pub mod registration_session;
pub mod session;
pub mod submission;
pub mod validation;

pub use self::auth::{
    CredentialsValidationError, LoginCredentials, SignInOutcome, SignInService,
};
pub use self::availability::{
    AvailabilityChecker, AvailabilityResult, AvailabilityTicket, LoginAvailabilityStatus,
};
pub use self::debounce::Debouncer;
pub use self::fields::{Field, FieldErrors};
pub use self::form::{
    AvailabilityApplication, FormHandle, FormSnapshot, LoginEffect, RegistrationForm,
    RegistrationRequest, SubmissionRefused, SubmissionState,
};
pub use self::registration_session::{DEFAULT_DEBOUNCE_DELAY, RegistrationSession};
pub use self::session::{AuthenticatedUser, BearerToken, SessionContext, SessionValidationError};
pub use self::submission::{
    GENERIC_SUBMISSION_FAILURE, REGISTRATION_SUCCEEDED, Rejection, SubmissionCoordinator,
    SubmitOutcome, map_rejection,
};
pub use self::validation::{
    CheckableLogin, LoginValidationError, NameValidationError, PasswordCriteria,
    evaluate_password, validate_name,
};
