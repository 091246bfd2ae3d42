//! Mapping of authority rejection bodies onto form fields.
//!
//! A stable error code wins when the authority sends one. Otherwise the
//! message text is matched against keywords, which only understands the
//! phrasing the authority has historically used and should not be extended.

use crate::domain::fields::{Field, FieldErrors};
use crate::domain::ports::ErrorBody;

const LOGIN_TAKEN_MESSAGE: &str = "This login is already registered.";
const INVALID_LOGIN_MESSAGE: &str = "This login is not accepted.";
const INVALID_PASSWORD_MESSAGE: &str = "This password is not accepted.";
const INVALID_NAME_MESSAGE: &str = "This name is not accepted.";

const DUPLICATE_MARKERS: [&str; 8] = [
    "já", "cadastrad", "existe", "em uso", "taken", "exists", "already", "duplicat",
];

/// A rejection resolved to the most specific field available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    errors: FieldErrors,
    login_taken: bool,
    message: String,
}

impl Rejection {
    fn on_field(field: Field, message: &str, login_taken: bool) -> Self {
        let mut errors = FieldErrors::default();
        errors.set(field, message);
        Self {
            errors,
            login_taken,
            message: message.to_owned(),
        }
    }

    fn general(message: &str) -> Self {
        let mut errors = FieldErrors::default();
        errors.set_general(message);
        Self {
            errors,
            login_taken: false,
            message: message.to_owned(),
        }
    }

    /// Errors to merge into the form.
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The login is already registered; availability must become `Taken`.
    pub const fn login_taken(&self) -> bool {
        self.login_taken
    }

    /// Message to notify the user with.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Resolve a rejection body to field errors.
///
/// Returns `None` when the body carries neither a known code nor a message,
/// in which case the caller treats the failure as unattributable.
///
/// # Examples
/// ```
/// use registration_client::domain::{Field, map_rejection};
/// use registration_client::domain::ports::ErrorBody;
///
/// let rejection = map_rejection(&ErrorBody::message_only("Login já cadastrado")).unwrap();
/// assert!(rejection.login_taken());
/// assert_eq!(rejection.errors().get(Field::Login), Some("Login já cadastrado"));
/// ```
pub fn map_rejection(body: &ErrorBody) -> Option<Rejection> {
    let message = body.message();
    if let Some(rejection) = body.code().and_then(|code| from_code(code, message)) {
        return Some(rejection);
    }
    message.map(from_keywords)
}

fn from_code(code: &str, message: Option<&str>) -> Option<Rejection> {
    let (field, fallback, login_taken) = match code.to_ascii_lowercase().as_str() {
        "login_taken" | "duplicate_login" => (Field::Login, LOGIN_TAKEN_MESSAGE, true),
        "invalid_login" => (Field::Login, INVALID_LOGIN_MESSAGE, false),
        "invalid_password" | "weak_password" => (Field::Password, INVALID_PASSWORD_MESSAGE, false),
        "invalid_name" => (Field::Name, INVALID_NAME_MESSAGE, false),
        _ => return None,
    };
    Some(Rejection::on_field(
        field,
        message.unwrap_or(fallback),
        login_taken,
    ))
}

fn from_keywords(message: &str) -> Rejection {
    let lowered = message.to_lowercase();
    if lowered.contains("login") {
        let taken = DUPLICATE_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker));
        Rejection::on_field(Field::Login, message, taken)
    } else if lowered.contains("senha") || lowered.contains("password") {
        Rejection::on_field(Field::Password, message, false)
    } else {
        Rejection::general(message)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn structured(message: Option<&str>, code: Option<&str>) -> ErrorBody {
        ErrorBody::Structured {
            message: message.map(str::to_owned),
            code: code.map(str::to_owned),
        }
    }

    #[rstest]
    #[case::duplicate_pt("Login já cadastrado", Some(Field::Login), true)]
    #[case::duplicate_in_use("O login informado está em uso", Some(Field::Login), true)]
    #[case::duplicate_en("Login already exists", Some(Field::Login), true)]
    #[case::login_format("Login inválido", Some(Field::Login), false)]
    #[case::password_pt("Senha muito fraca", Some(Field::Password), false)]
    #[case::password_en("Password too short", Some(Field::Password), false)]
    #[case::general("Erro interno no servidor", None, false)]
    fn messages_are_mapped_by_keyword(
        #[case] message: &str,
        #[case] field: Option<Field>,
        #[case] taken: bool,
    ) {
        let rejection = map_rejection(&ErrorBody::message_only(message)).expect("has message");
        match field {
            Some(field) => {
                assert_eq!(rejection.errors().get(field), Some(message));
                assert_eq!(rejection.errors().general(), None);
            }
            None => assert_eq!(rejection.errors().general(), Some(message)),
        }
        assert_eq!(rejection.login_taken(), taken);
        assert_eq!(rejection.message(), message);
    }

    #[test]
    fn raw_text_bodies_are_mapped_like_messages() {
        let rejection =
            map_rejection(&ErrorBody::Raw("Login já cadastrado".to_owned())).expect("has text");
        assert!(rejection.login_taken());
    }

    #[rstest]
    #[case("login_taken", Field::Login, true)]
    #[case("DUPLICATE_LOGIN", Field::Login, true)]
    #[case("invalid_login", Field::Login, false)]
    #[case("weak_password", Field::Password, false)]
    #[case("invalid_name", Field::Name, false)]
    fn codes_take_precedence_over_keywords(
        #[case] code: &str,
        #[case] field: Field,
        #[case] taken: bool,
    ) {
        // The message alone would be routed to the general slot.
        let body = structured(Some("Não foi possível concluir"), Some(code));
        let rejection = map_rejection(&body).expect("known code");
        assert_eq!(rejection.errors().get(field), Some("Não foi possível concluir"));
        assert_eq!(rejection.login_taken(), taken);
    }

    #[test]
    fn known_code_without_message_uses_a_fallback() {
        let rejection = map_rejection(&structured(None, Some("login_taken"))).expect("known code");
        assert_eq!(rejection.errors().get(Field::Login), Some(LOGIN_TAKEN_MESSAGE));
    }

    #[test]
    fn unknown_code_falls_back_to_keywords() {
        let body = structured(Some("Senha inválida"), Some("E4012"));
        let rejection = map_rejection(&body).expect("has message");
        assert_eq!(rejection.errors().get(Field::Password), Some("Senha inválida"));
    }

    #[rstest]
    #[case(ErrorBody::Empty)]
    #[case(ErrorBody::Raw("   ".to_owned()))]
    #[case(structured(None, Some("E4012")))]
    #[case(structured(None, None))]
    fn bodies_without_a_message_are_unattributable(#[case] body: ErrorBody) {
        assert_eq!(map_rejection(&body), None);
    }
}
