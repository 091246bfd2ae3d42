//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed authority client
//! - **notify**: notification sinks for logs and UI channels
//!
//! Adapters are thin translators between domain types and wire or
//! presentation formats. They contain no business logic.

pub mod http;
pub mod notify;
