//! Reqwest client bound to one authority base URL.
//!
//! Attaches the session's bearer token to every request and turns every
//! non-success status into [`AuthAuthorityError::Rejected`] carrying the
//! decoded body.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::dto::{body_preview, parse_error_body};
use crate::domain::SessionContext;
use crate::domain::ports::AuthAuthorityError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// User-agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("registration-client/", env!("CARGO_PKG_VERSION"));

/// Client identity and timeout applied to every request.
#[derive(Debug, Clone)]
pub struct HttpTransportOptions {
    /// Overall per-request timeout.
    pub timeout: Duration,
    /// HTTP user-agent header.
    pub user_agent: String,
}

impl Default for HttpTransportOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// JSON-over-HTTP transport with bearer injection.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    session: SessionContext,
}

impl HttpTransport {
    /// Build a transport for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        session: SessionContext,
        options: HttpTransportOptions,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Base URL requests are resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET path?query`, returning the success body.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<u8>, AuthAuthorityError> {
        let url = self.endpoint(path)?;
        self.send(self.client.get(url).query(query)).await
    }

    /// `POST path` with a JSON body, returning the success body.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Vec<u8>, AuthAuthorityError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(path)?;
        self.send(self.client.post(url).json(body)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthAuthorityError> {
        self.base_url.join(path).map_err(|error| {
            AuthAuthorityError::transport(format!("invalid endpoint path {path:?}: {error}"))
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, AuthAuthorityError> {
        let request = match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        };
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn map_transport_error(error: reqwest::Error) -> AuthAuthorityError {
    if error.is_timeout() {
        AuthAuthorityError::timeout(error.to_string())
    } else {
        AuthAuthorityError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AuthAuthorityError {
    debug!(
        status = status.as_u16(),
        body = %body_preview(body),
        "authority returned an error status"
    );
    AuthAuthorityError::rejected(status.as_u16(), parse_error_body(body))
}
