//! HTTP implementation of the [`AuthAuthority`] port.

use async_trait::async_trait;
use serde_json::Value;

use super::dto::{LoginRequestDto, LoginResponseDto, RegisterRequestDto};
use super::transport::HttpTransport;
use crate::domain::ports::{AuthAuthority, AuthAuthorityError, AvailabilityReply};
use crate::domain::{AuthenticatedUser, LoginCredentials, RegistrationRequest};

const CHECK_LOGIN_PATH: &str = "/api/Auth/check-login";
const REGISTER_PATH: &str = "/api/Auth/register";
const SIGN_IN_PATH: &str = "/api/Auth/login";

/// Authority adapter speaking the `/api/Auth` JSON API.
#[derive(Debug, Clone)]
pub struct HttpAuthAuthority {
    transport: HttpTransport,
}

impl HttpAuthAuthority {
    /// Wrap a configured transport.
    pub const fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AuthAuthority for HttpAuthAuthority {
    async fn check_login(&self, login: &str) -> Result<AvailabilityReply, AuthAuthorityError> {
        let body = self
            .transport
            .get(CHECK_LOGIN_PATH, &[("login", login)])
            .await?;
        let payload: Value = serde_json::from_slice(&body).map_err(|error| {
            AuthAuthorityError::decode(format!("invalid availability payload: {error}"))
        })?;
        Ok(AvailabilityReply::new(payload))
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<(), AuthAuthorityError> {
        let payload = RegisterRequestDto {
            name: request.name(),
            login: request.login(),
            password: request.password(),
        };
        self.transport.post(REGISTER_PATH, &payload).await?;
        Ok(())
    }

    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, AuthAuthorityError> {
        let payload = LoginRequestDto {
            login: credentials.login(),
            password: credentials.password(),
        };
        let body = self.transport.post(SIGN_IN_PATH, &payload).await?;
        parse_sign_in(&body)
    }
}

fn parse_sign_in(body: &[u8]) -> Result<AuthenticatedUser, AuthAuthorityError> {
    let decoded: LoginResponseDto = serde_json::from_slice(body).map_err(|error| {
        AuthAuthorityError::decode(format!("invalid sign-in payload: {error}"))
    })?;
    AuthenticatedUser::try_new(&decoded.token, decoded.name.as_deref().unwrap_or_default())
        .map_err(|error| AuthAuthorityError::decode(error.to_string()))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for response decoding.
    use super::*;
    use rstest::rstest;

    #[test]
    fn sign_in_payload_yields_token_and_name() {
        let user = parse_sign_in(br#"{"token":"abc.def","name":"Ana Silva"}"#)
            .expect("valid payload");
        assert_eq!(user.token().expose(), "abc.def");
        assert_eq!(user.display_name(), "Ana Silva");
    }

    #[test]
    fn missing_name_is_tolerated() {
        let user = parse_sign_in(br#"{"token":"abc.def"}"#).expect("valid payload");
        assert_eq!(user.display_name(), "");
    }

    #[rstest]
    #[case::blank_token(br#"{"token":"  ","name":"Ana"}"#.as_slice())]
    #[case::missing_token(br#"{"name":"Ana"}"#.as_slice())]
    #[case::not_json(b"ok".as_slice())]
    fn unusable_sign_in_payloads_are_decode_errors(#[case] body: &[u8]) {
        let error = parse_sign_in(body).expect_err("unusable payload");
        assert!(matches!(error, AuthAuthorityError::Decode { .. }));
    }
}
