//! Application layer: configuration and adapter wiring.

pub mod builders;
pub mod config;

pub use builders::{ClientBuildError, RegistrationClient};
pub use config::{ClientSettings, DEFAULT_BASE_URL};
