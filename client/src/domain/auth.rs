//! Sign-in: credential checks and the service that trades them for a
//! bearer session.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{AuthAuthority, AuthAuthorityError, ErrorBody, Notifier, Severity};
use crate::domain::session::SessionContext;

/// Shown when the authority rejects credentials without a plain-text reason.
pub const SIGN_IN_FAILED: &str = "Login failed.";
/// Shown when no response was received.
pub const SERVER_UNREACHABLE: &str = "Could not reach the server.";

/// Sign-in input refused before the authority is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialsValidationError {
    /// Nothing but whitespace was typed as the login.
    #[error("login must not be empty")]
    EmptyLogin,
    /// No password was typed.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Login and password as submitted on the sign-in form.
///
/// The login is stored trimmed. The password is kept byte for byte, is
/// wiped on drop and never appears in `Debug` output.
///
/// ```
/// use registration_client::domain::{CredentialsValidationError, LoginCredentials};
///
/// let creds = LoginCredentials::try_from_parts(" anasilva ", "Senha123").unwrap();
/// assert_eq!(creds.login(), "anasilva");
/// assert_eq!(
///     LoginCredentials::try_from_parts("anasilva", ""),
///     Err(CredentialsValidationError::EmptyPassword)
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Check both inputs, reporting a blank login before a blank password.
    ///
    /// # Errors
    /// [`CredentialsValidationError`] naming the first empty input.
    pub fn try_from_parts(login: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        match (login.trim(), password) {
            ("", _) => Err(CredentialsValidationError::EmptyLogin),
            (_, "") => Err(CredentialsValidationError::EmptyPassword),
            (login, password) => Ok(Self {
                login: login.to_owned(),
                password: Zeroizing::new(password.to_owned()),
            }),
        }
    }

    /// Trimmed login sent to the authority.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Password exactly as typed.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoginCredentials {{ login: {:?}, password: <redacted> }}", self.login)
    }
}

/// Result of a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Credentials accepted; the session now holds the token.
    SignedIn {
        /// Name returned by the authority.
        display_name: String,
    },
    /// The authority answered but refused the credentials.
    Rejected {
        /// Message shown to the user.
        message: String,
    },
    /// No usable response.
    TransportFailure,
}

/// Exchanges credentials for a bearer token and records it in the session.
#[derive(Clone)]
pub struct SignInService {
    authority: Arc<dyn AuthAuthority>,
    notifier: Arc<dyn Notifier>,
    session: SessionContext,
}

impl SignInService {
    /// Create the service.
    pub fn new(
        authority: Arc<dyn AuthAuthority>,
        notifier: Arc<dyn Notifier>,
        session: SessionContext,
    ) -> Self {
        Self {
            authority,
            notifier,
            session,
        }
    }

    /// Session updated on success.
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Attempt to sign in, notifying the user of the outcome.
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> SignInOutcome {
        match self.authority.authenticate(credentials).await {
            Ok(user) => {
                let display_name = user.display_name().to_owned();
                self.session.sign_in(user);
                info!(login = credentials.login(), "signed in");
                self.notifier
                    .notify(Severity::Success, &format!("Welcome, {display_name}!"));
                SignInOutcome::SignedIn { display_name }
            }
            Err(error) => {
                warn!(login = credentials.login(), %error, "sign-in failed");
                let outcome = sign_in_failure(&error);
                let message = match &outcome {
                    SignInOutcome::Rejected { message } => message.as_str(),
                    _ => SERVER_UNREACHABLE,
                };
                self.notifier.notify(Severity::Error, message);
                outcome
            }
        }
    }
}

impl fmt::Debug for SignInService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInService")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn sign_in_failure(error: &AuthAuthorityError) -> SignInOutcome {
    match error {
        AuthAuthorityError::Rejected { body, .. } => {
            // Only a plain-text body is trusted as a user-facing reason.
            let message = match body {
                ErrorBody::Raw(_) => body.message().unwrap_or(SIGN_IN_FAILED),
                ErrorBody::Structured { .. } | ErrorBody::Empty => SIGN_IN_FAILED,
            };
            SignInOutcome::Rejected {
                message: message.to_owned(),
            }
        }
        AuthAuthorityError::Decode { .. } => SignInOutcome::Rejected {
            message: SIGN_IN_FAILED.to_owned(),
        },
        AuthAuthorityError::Transport { .. } | AuthAuthorityError::Timeout { .. } => {
            SignInOutcome::TransportFailure
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{FixtureAuthAuthority, MockAuthAuthority, MockNotifier};
    use crate::domain::session::AuthenticatedUser;
    use mockall::predicate::eq;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyLogin)]
    #[case(" \t ", "", CredentialsValidationError::EmptyLogin)]
    #[case("ana", "", CredentialsValidationError::EmptyPassword)]
    fn blank_inputs_are_refused(
        #[case] login: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(login, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn password_is_kept_verbatim_and_redacted() {
        let creds = LoginCredentials::try_from_parts("  ana  ", " s3cret ").expect("valid");
        assert_eq!(creds.password(), " s3cret ");
        assert!(!format!("{creds:?}").contains("s3cret"));
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
    async fn successful_sign_in_stores_the_token() {
        let session = SessionContext::new();
        let service = SignInService::new(
            Arc::new(FixtureAuthAuthority::default()),
            Arc::new(notifier_expecting(Severity::Success, "Welcome, Fixture Admin!")),
            session.clone(),
        );
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("valid");

        let outcome = service.sign_in(&creds).await;

        assert_eq!(
            outcome,
            SignInOutcome::SignedIn {
                display_name: "Fixture Admin".to_owned()
            }
        );
        assert!(session.is_authenticated());
    }

    #[rstest]
    #[case::raw_text(ErrorBody::Raw("Usuário ou senha inválidos".to_owned()), "Usuário ou senha inválidos")]
    #[case::structured(ErrorBody::message_only("ignored"), SIGN_IN_FAILED)]
    #[case::blank_text(ErrorBody::Raw("  ".to_owned()), SIGN_IN_FAILED)]
    #[case::empty(ErrorBody::Empty, SIGN_IN_FAILED)]
    #[tokio::test]
    async fn rejections_show_plain_text_bodies_only(
        #[case] body: ErrorBody,
        #[case] expected: &'static str,
    ) {
        let mut authority = MockAuthAuthority::new();
        authority
            .expect_authenticate()
            .times(1)
            .return_once(move |_| Err(AuthAuthorityError::rejected(401_u16, body)));
        let session = SessionContext::new();
        let service = SignInService::new(
            Arc::new(authority),
            Arc::new(notifier_expecting(Severity::Error, expected)),
            session.clone(),
        );
        let creds = LoginCredentials::try_from_parts("ana", "wrong").expect("valid");

        let outcome = service.sign_in(&creds).await;

        assert_eq!(
            outcome,
            SignInOutcome::Rejected {
                message: expected.to_owned()
            }
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn unreachable_authority_is_a_transport_failure() {
        let mut authority = MockAuthAuthority::new();
        authority
            .expect_authenticate()
            .times(1)
            .return_once(|_| Err(AuthAuthorityError::timeout("10s elapsed")));
        let service = SignInService::new(
            Arc::new(authority),
            Arc::new(notifier_expecting(Severity::Error, SERVER_UNREACHABLE)),
            SessionContext::new(),
        );
        let creds = LoginCredentials::try_from_parts("ana", "pw").expect("valid");

        assert_eq!(service.sign_in(&creds).await, SignInOutcome::TransportFailure);
    }

    #[tokio::test]
    async fn a_new_sign_in_replaces_the_previous_user() {
        let session = SessionContext::new();
        session.sign_in(AuthenticatedUser::try_new("old", "Old User").expect("valid"));
        let service = SignInService::new(
            Arc::new(FixtureAuthAuthority::default()),
            Arc::new(notifier_expecting(Severity::Success, "Welcome, Fixture Admin!")),
            session.clone(),
        );
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("valid");

        service.sign_in(&creds).await;

        assert_eq!(session.display_name().as_deref(), Some("Fixture Admin"));
        assert_eq!(
            session.bearer_token().map(|t| t.expose().to_owned()),
            Some("fixture-token".to_owned())
        );
    }
}
