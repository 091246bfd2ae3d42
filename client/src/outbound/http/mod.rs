//! Reqwest-backed adapters for the authority's HTTP API.
//!
//! The transport owns request building, bearer injection, timeouts and
//! status mapping; the authority adapter owns paths and payload shapes.

mod auth_authority;
mod dto;
mod transport;

pub use auth_authority::HttpAuthAuthority;
pub use transport::{DEFAULT_USER_AGENT, HttpTransport, HttpTransportOptions};
